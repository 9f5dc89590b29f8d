//! Auth 바인딩 엔티티
//!
//! 로컬 사용자와 외부 자격 증명 사이의 간접 연결 레코드입니다.
//! `auth` 연결 방식에서 사용자는 `user.auth`로 이 레코드를 참조하고,
//! 이 레코드가 `github` 필드로 GitHub 자격 증명을 참조합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Auth {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 연결된 GitHub 자격 증명 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Auth {
    /// GitHub 자격 증명에 묶인 새 바인딩
    pub fn for_github(credential_id: &str) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            github: Some(credential_id.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn link_github(&mut self, credential_id: &str) {
        self.github = Some(credential_id.to_string());
        self.updated_at = DateTime::now();
    }
}
