//! 사이드카 주입기 에러 타입
//!
//! [`InjectError`]는 주입기 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<InjectError> for SqlProxyError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.
//!
//! # 에러 카테고리
//!
//! - **함수 설정**: `Configuration`
//! - **대상 문서**: `Metadata`, `PathResolution`
//! - **입출력 봉투**: `Envelope`
//! - **노드 형태**: `Shape`
//!
//! 모든 에러는 배치 전체를 중단시킵니다. 부분 결과는 반환되지 않습니다.

use sqlproxy_core::error::{ShapeError, SqlProxyError, TransformError};

/// 사이드카 주입기 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum InjectError {
    /// 함수 설정의 필수 필드 누락 또는 타입 오류 (문서 처리 전에 검출)
    #[error("{}", describe_configuration(.missing, .unquoted))]
    Configuration {
        /// 누락된 필드 경로 (예: `spec.proxyImage`)
        missing: Vec<String>,
        /// 따옴표 없이 숫자/불리언으로 쓰인 필드 경로
        unquoted: Vec<String>,
    },

    /// 대상 문서의 메타데이터가 올바르지 않음
    #[error("document #{index}: {reason}")]
    Metadata {
        /// 배치 내 문서 위치
        index: usize,
        /// 실패 사유
        reason: String,
    },

    /// 주입 대상 문서에서 컨테이너 목록을 찾을 수 없음
    #[error("no container list found in {kind} '{name}' (tried: {})", .tried.join(", "))]
    PathResolution {
        /// 문서 kind
        kind: String,
        /// 문서 metadata.name
        name: String,
        /// 시도한 후보 경로
        tried: Vec<String>,
    },

    /// 입출력 봉투(ResourceList) 형식 에러
    #[error("{0}")]
    Envelope(String),

    /// 노드 형태 불일치
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),
}

fn describe_configuration(missing: &[String], unquoted: &[String]) -> String {
    let mut parts = Vec::with_capacity(2);
    if !missing.is_empty() {
        parts.push(format!(
            "missing or empty function config fields: {}",
            missing.join(", ")
        ));
    }
    if !unquoted.is_empty() {
        parts.push(format!(
            "function config fields must be a quoted string: {}",
            unquoted.join(", ")
        ));
    }
    parts.join("; ")
}

impl From<InjectError> for SqlProxyError {
    fn from(err: InjectError) -> Self {
        match err {
            InjectError::Configuration { .. } => {
                SqlProxyError::Transform(TransformError::Configuration(err.to_string()))
            }
            InjectError::Metadata { .. } | InjectError::PathResolution { .. } => {
                SqlProxyError::Transform(TransformError::Document(err.to_string()))
            }
            InjectError::Envelope(reason) => {
                SqlProxyError::Transform(TransformError::Envelope(reason))
            }
            InjectError::Shape(e) => SqlProxyError::Shape(e),
        }
    }
}
