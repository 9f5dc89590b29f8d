//! 프로바이더 HTML 뷰
//!
//! 디렉터리의 `*.html` 파일을 시작 시점에 한 번 읽어 메모리에 보관합니다.
//! 파일 IO는 `web::block`으로 블로킹 스레드 풀에서 실행합니다.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use actix_web::web;
use crate::errors::errors::{AppError, ErrorContext};

#[derive(Debug, Clone)]
pub struct View {
    path: PathBuf,
    templates: HashMap<String, String>,
}

impl View {
    /// 뷰 디렉터리를 읽어 템플릿을 적재합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - 디렉터리가 없거나 읽을 수 없는 경우
    pub async fn create(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let dir = path.clone();

        let templates = web::block(move || load_templates(&dir))
            .await
            .context("뷰 적재 작업 실패")??;

        log::info!("🖼️ 뷰 적재: {} (템플릿 {}개)", path.display(), templates.len());

        Ok(Self { path, templates })
    }

    /// 이름(확장자 제외)으로 템플릿을 찾습니다.
    pub fn render(&self, name: &str) -> Result<&str, AppError> {
        self.templates
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AppError::NotFound(format!("view {}", name)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn load_templates(dir: &Path) -> Result<HashMap<String, String>, AppError> {
    let config_error = |e: std::io::Error| {
        AppError::ConfigurationError(format!("뷰 디렉터리 {}를 읽을 수 없습니다: {}", dir.display(), e))
    };

    let mut templates = HashMap::new();

    for entry in fs::read_dir(dir).map_err(config_error)? {
        let path = entry.map_err(config_error)?.path();

        if path.extension().and_then(|ext| ext.to_str()) != Some("html") {
            continue;
        }

        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };

        let body = fs::read_to_string(&path).map_err(config_error)?;
        templates.insert(name.to_string(), body);
    }

    Ok(templates)
}
