use std::collections::HashMap;
use std::sync::RwLock;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use crate::domain::entities::Auth;
use crate::errors::errors::AppError;
use crate::repositories::stores::AuthStore;

/// 메모리 Auth 바인딩 저장소
#[derive(Default)]
pub struct MemoryAuthStore {
    records: RwLock<HashMap<ObjectId, Auth>>,
}

impl MemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 유니크 제약 없이 레코드를 넣습니다. 중복 바인딩을 재현하는 테스트용입니다.
    pub fn insert_unchecked(&self, mut auth: Auth) -> Auth {
        let id = *auth.id.get_or_insert_with(ObjectId::new);
        self.records.write().unwrap_or_else(|e| e.into_inner()).insert(id, auth.clone());
        auth
    }

    pub fn all(&self) -> Vec<Auth> {
        let mut auths: Vec<Auth> = self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        auths.sort_by_key(|a| a.id);
        auths
    }
}

fn check_unique(records: &HashMap<ObjectId, Auth>, auth: &Auth) -> Result<(), AppError> {
    let Some(github) = auth.github.as_deref() else {
        return Ok(());
    };

    let taken = records
        .values()
        .any(|other| other.id != auth.id && other.github.as_deref() == Some(github));

    if taken {
        return Err(AppError::ConflictError(format!("auth.github {} is already bound", github)));
    }

    Ok(())
}

#[async_trait]
impl AuthStore for MemoryAuthStore {
    async fn get(&self, id: &str) -> Result<Auth, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::NotFound(id.to_string()))?;

        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&object_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    async fn find_by_github(&self, credential_id: &str) -> Result<Vec<Auth>, AppError> {
        // ObjectId는 생성 시각 순으로 정렬되므로 결과 순서가 안정적입니다.
        Ok(self
            .all()
            .into_iter()
            .filter(|a| a.github.as_deref() == Some(credential_id))
            .collect())
    }

    async fn create(&self, mut auth: Auth) -> Result<Auth, AppError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());

        auth.id = None;
        check_unique(&records, &auth)?;

        let id = ObjectId::new();
        auth.id = Some(id);
        records.insert(id, auth.clone());
        Ok(auth)
    }

    async fn save(&self, auth: Auth) -> Result<Auth, AppError> {
        let id = auth.id
            .ok_or_else(|| AppError::ValidationError("저장할 Auth에 ID가 없습니다".to_string()))?;

        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());

        if !records.contains_key(&id) {
            return Err(AppError::NotFound(id.to_hex()));
        }

        check_unique(&records, &auth)?;
        records.insert(id, auth.clone());
        Ok(auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_create_and_find_by_github() {
        let store = MemoryAuthStore::new();
        let created = store.create(Auth::for_github("12345")).await.unwrap();

        let found = store.find_by_github("12345").await.unwrap();
        assert_eq!(found, vec![created.clone()]);

        let fetched = store.get(&created.id_string().unwrap()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[actix_web::test]
    async fn test_github_binding_is_unique() {
        let store = MemoryAuthStore::new();
        store.create(Auth::for_github("12345")).await.unwrap();

        assert!(store.create(Auth::for_github("12345")).await.unwrap_err().is_conflict());
    }

    #[actix_web::test]
    async fn test_get_missing_is_not_found() {
        let store = MemoryAuthStore::new();
        assert!(store.get(&ObjectId::new().to_hex()).await.unwrap_err().is_not_found());
    }
}
