//! # Auth 바인딩 리포지토리 구현
//!
//! MongoDB `auths` 컬렉션. 바인딩은 한 번 만들어지면 거의 바뀌지 않으므로 ID 조회를 Redis에 캐싱합니다.

use std::sync::Arc;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{bson::{doc, oid::ObjectId}, options::IndexOptions, IndexModel};
use crate::{
    caching::redis::RedisClient,
    core::registry::Repository,
    db::Database,
    domain::entities::auths::auth::Auth,
    repositories::stores::AuthStore,
};
use singleton_macro::repository;
use crate::errors::errors::AppError;

#[repository(name = "auth", collection = "auths")]
pub struct AuthRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

const CACHE_TTL_SECONDS: u64 = 600;

impl AuthRepository {
    /// `github` 필드에 sparse unique 인덱스를 생성합니다.
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let github_index = IndexModel::builder()
            .keys(doc! { "github": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .sparse(true)
                .name("github_unique".to_string())
                .build())
            .build();

        self.collection::<Auth>()
            .create_index(github_index)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl AuthStore for AuthRepository {
    async fn get(&self, id: &str) -> Result<Auth, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::NotFound(id.to_string()))?;

        let cache_key = self.cache_key(id);

        if let Ok(Some(cached)) = self.redis.get::<Auth>(&cache_key).await {
            return Ok(cached);
        }

        let auth = self.collection::<Auth>()
            .find_one(doc! { "_id": object_id })
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        let _ = self.redis
            .set_with_expiry(&cache_key, &auth, CACHE_TTL_SECONDS)
            .await;

        Ok(auth)
    }

    async fn find_by_github(&self, credential_id: &str) -> Result<Vec<Auth>, AppError> {
        let auths: Vec<Auth> = self.collection::<Auth>()
            .find(doc! { "github": credential_id })
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(auths)
    }

    async fn create(&self, mut auth: Auth) -> Result<Auth, AppError> {
        auth.id = None;

        let result = self.collection::<Auth>()
            .insert_one(&auth)
            .await?;

        let id = result.inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::InternalError("생성된 Auth ID가 ObjectId가 아닙니다".to_string()))?;

        auth.id = Some(id);
        Ok(auth)
    }

    async fn save(&self, auth: Auth) -> Result<Auth, AppError> {
        let id = auth.id
            .ok_or_else(|| AppError::ValidationError("저장할 Auth에 ID가 없습니다".to_string()))?;

        let result = self.collection::<Auth>()
            .replace_one(doc! { "_id": id }, &auth)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(id.to_hex()));
        }

        let _ = self.invalidate_cache(&id.to_hex()).await;

        Ok(auth)
    }
}
