//! GitHub 프로바이더
//!
//! - [`client`] - oauth2 + reqwest 기반 GitHub 호출
//! - [`strategy`] - 인증 런타임에 등록되는 `GithubStrategy`
//! - [`reconciler`] - 외부 신원과 로컬 `user`/`auth` 레코드 재조정
//! - [`provider`] - 뷰/런타임/전략/라우트를 병렬로 준비하는 시작 시퀀스

pub mod client;
pub mod strategy;
pub mod reconciler;
pub mod provider;
#[cfg(test)]
pub mod fake;

pub use client::{GithubApi, GithubHttpClient};
pub use strategy::GithubStrategy;
pub use reconciler::GithubReconciler;
pub use provider::{GithubProvider, GithubRoutes};
