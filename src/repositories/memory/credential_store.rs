use std::collections::HashMap;
use std::sync::RwLock;
use async_trait::async_trait;
use crate::domain::entities::GithubCredential;
use crate::errors::errors::AppError;
use crate::repositories::stores::CredentialStore;

/// GitHub 사용자 ID를 키로 하는 메모리 자격 증명 저장소
#[derive(Default)]
pub struct MemoryCredentialStore {
    records: RwLock<HashMap<String, GithubCredential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, id: &str) -> Result<GithubCredential, AppError> {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    async fn create(&self, credential: GithubCredential) -> Result<GithubCredential, AppError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());

        if records.contains_key(&credential.id) {
            return Err(AppError::ConflictError(format!("github credential {} already exists", credential.id)));
        }

        records.insert(credential.id.clone(), credential.clone());
        Ok(credential)
    }

    async fn update(&self, credential: GithubCredential) -> Result<GithubCredential, AppError> {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());

        match records.get_mut(&credential.id) {
            Some(existing) => {
                *existing = credential.clone();
                Ok(credential)
            }
            None => Err(AppError::NotFound(credential.id)),
        }
    }
}
