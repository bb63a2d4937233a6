//! 에러 타입: 도메인별 에러 정의

use crate::node::NodeKind;

/// sqlproxy 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum SqlProxyError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 노드 트리 변환 에러
    #[error("node error: {0}")]
    Node(#[from] NodeError),

    /// 노드 형태 불일치
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),

    /// 변환 처리 에러
    #[error("{0}")]
    Transform(#[from] TransformError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// YAML ↔ 노드 트리 변환 에러
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// YAML 파싱 실패
    #[error("failed to parse yaml: {reason}")]
    Parse { reason: String },

    /// 지원하지 않는 YAML 태그
    #[error("unsupported yaml tag: {tag}")]
    UnsupportedTag { tag: String },

    /// 스칼라가 아닌 매핑 키
    #[error("mapping keys must be scalars, found {found}")]
    NonScalarKey { found: NodeKind },

    /// 중복된 매핑 키
    #[error("duplicate mapping key: {key}")]
    DuplicateKey { key: String },
}

/// 노드 형태 불일치 에러
///
/// 타입 접근자가 기대한 형태를 찾지 못했을 때 반환됩니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// 경로의 노드가 기대한 형태가 아님
    #[error("expected {expected} at {path}, found {found}")]
    Mismatch {
        path: String,
        expected: NodeKind,
        found: NodeKind,
    },

    /// 경로에 필드가 없음
    #[error("missing field {path}")]
    Missing { path: String },
}

/// 변환 처리 에러
///
/// 변환 모듈의 도메인 에러는 이 세 범주 중 하나로 변환됩니다.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// 함수 설정 문서 에러
    #[error("function config error: {0}")]
    Configuration(String),

    /// 대상 문서 에러 (메타데이터, 경로 탐색)
    #[error("document error: {0}")]
    Document(String),

    /// 입출력 봉투(envelope) 에러
    #[error("envelope error: {0}")]
    Envelope(String),
}
