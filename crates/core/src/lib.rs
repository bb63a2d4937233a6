#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod node;
pub mod pipeline;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, NodeError, ShapeError, SqlProxyError, TransformError};

// 설정
pub use config::SqlProxyConfig;

// 노드 트리
pub use node::{ManifestNode, Mapping, NodeKind, Scalar};

// 필터 trait
pub use pipeline::ResourceFilter;
