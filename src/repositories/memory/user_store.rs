use std::sync::RwLock;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use crate::domain::entities::User;
use crate::errors::errors::AppError;
use crate::repositories::stores::{UserQuery, UserStore};

/// 메모리 사용자 저장소
///
/// 삽입 순서를 유지하므로 `find` 결과 순서는 생성 순서와 같습니다.
#[derive(Default)]
pub struct MemoryUserStore {
    records: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 유니크 제약 없이 레코드를 넣습니다. 중복 연결 상태를 재현하는 테스트용입니다.
    pub fn insert_unchecked(&self, mut user: User) -> User {
        if user.id.is_none() {
            user.id = Some(ObjectId::new());
        }
        self.records.write().unwrap_or_else(|e| e.into_inner()).push(user.clone());
        user
    }

    pub fn all(&self) -> Vec<User> {
        self.records.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// `user.github`, `user.auth` 유니크 제약 확인 (`skip`은 저장 대상 자신)
fn check_unique(records: &[User], user: &User, skip: Option<ObjectId>) -> Result<(), AppError> {
    let others = records.iter().filter(|u| skip.is_none() || u.id != skip);

    for other in others {
        if user.github.is_some() && other.github == user.github {
            return Err(AppError::ConflictError(format!(
                "user.github {} is already linked",
                user.github.as_deref().unwrap_or_default()
            )));
        }
        if user.auth.is_some() && other.auth == user.auth {
            return Err(AppError::ConflictError("user.auth is already linked".to_string()));
        }
    }

    Ok(())
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self, id: &str) -> Result<User, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::NotFound(id.to_string()))?;

        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|u| u.id == Some(object_id))
            .cloned()
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    async fn find(&self, query: UserQuery) -> Result<Vec<User>, AppError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());

        let matches = records
            .iter()
            .filter(|u| match &query {
                UserQuery::Github(id) => u.github.as_deref() == Some(id.as_str()),
                UserQuery::Auth(auth_id) => u.auth == Some(*auth_id),
            })
            .cloned()
            .collect();

        Ok(matches)
    }

    async fn create(&self, mut user: User) -> Result<User, AppError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());

        check_unique(&records, &user, None)?;

        user.id = Some(ObjectId::new());
        records.push(user.clone());
        Ok(user)
    }

    async fn save(&self, user: User) -> Result<User, AppError> {
        let id = user.id
            .ok_or_else(|| AppError::ValidationError("저장할 사용자에 ID가 없습니다".to_string()))?;

        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());

        check_unique(&records, &user, Some(id))?;

        match records.iter_mut().find(|u| u.id == Some(id)) {
            Some(existing) => {
                *existing = user.clone();
                Ok(user)
            }
            None => Err(AppError::NotFound(id.to_hex())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::oauth::GithubProfile;
    use serde_json::json;

    fn user(login: &str) -> User {
        let profile = GithubProfile::from_api(json!({ "id": 1, "login": login })).unwrap();
        User::from_github_profile(&profile)
    }

    #[actix_web::test]
    async fn test_create_assigns_id_and_get_round_trip() {
        let store = MemoryUserStore::new();
        let created = store.create(user("octocat")).await.unwrap();
        let id = created.id_string().unwrap();

        assert_eq!(store.get(&id).await.unwrap(), created);
    }

    #[actix_web::test]
    async fn test_get_unknown_or_malformed_is_not_found() {
        let store = MemoryUserStore::new();

        assert!(store.get(&ObjectId::new().to_hex()).await.unwrap_err().is_not_found());
        assert!(store.get("not-an-object-id").await.unwrap_err().is_not_found());
    }

    #[actix_web::test]
    async fn test_find_by_github() {
        let store = MemoryUserStore::new();
        let mut linked = user("linked");
        linked.link_github("12345");
        store.create(linked).await.unwrap();
        store.create(user("other")).await.unwrap();

        let found = store.find(UserQuery::Github("12345".to_string())).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "linked");

        assert!(store.find(UserQuery::Github("999".to_string())).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_github_link_is_unique() {
        let store = MemoryUserStore::new();
        let mut first = user("first");
        first.link_github("12345");
        store.create(first).await.unwrap();

        let mut second = store.create(user("second")).await.unwrap();
        second.link_github("12345");

        assert!(store.save(second).await.unwrap_err().is_conflict());
    }

    #[actix_web::test]
    async fn test_save_missing_is_not_found() {
        let store = MemoryUserStore::new();
        let mut ghost = user("ghost");
        ghost.id = Some(ObjectId::new());

        assert!(store.save(ghost).await.unwrap_err().is_not_found());
    }
}
