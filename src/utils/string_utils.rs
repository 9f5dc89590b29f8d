//! # 문자열 유틸리티

use crate::errors::errors::AppError;

/// 로컬 사용자 이름의 최대 길이
const MAX_USERNAME_LEN: usize = 39;

/// 필수 문자열 필드 검증 및 정리
///
/// 빈 문자열이나 공백만 있는 경우 ValidationError를 반환하고,
/// 유효한 문자열인 경우 앞뒤 공백을 제거한 문자열을 반환합니다.
///
/// ```rust,ignore
/// assert_eq!(validate_required_string("  abc  ", "code").unwrap(), "abc");
/// assert!(validate_required_string("   ", "code").is_err());
/// ```
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(
            format!("{}은(는) 필수입니다", field_name)
        ));
    }
    Ok(trimmed.to_string())
}

/// 선택적 문자열 필드 정리
///
/// None 값이거나 빈 문자열/공백만 있는 경우 None을 반환합니다.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// GitHub 로그인 이름에서 로컬 사용자 이름을 만듭니다.
///
/// 영문 소문자, 숫자, `-`, `_`만 남기고 나머지는 `-`로 바꿉니다.
/// 결과가 비면 `github-{id}`를 사용합니다.
pub fn username_from_login(login: &str, fallback_id: &str) -> String {
    let slug: String = login
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        return format!("github-{}", fallback_id);
    }

    slug.chars().take(MAX_USERNAME_LEN).collect()
}
