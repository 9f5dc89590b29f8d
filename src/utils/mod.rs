//! 공통 유틸리티 함수 모듈
//!
//! - [`string_utils`] - 문자열 검증, 정리, 로컬 사용자 이름 생성

pub mod string_utils;
