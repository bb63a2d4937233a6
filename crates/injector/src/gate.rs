//! 어노테이션 게이트: 문서가 주입 대상인지 판정합니다.
//!
//! `metadata.annotations`에 트리거 키가 존재하면 대상입니다. 값은 검사하지 않습니다.

use sqlproxy_core::node::ManifestNode;

use crate::document;
use crate::error::InjectError;

/// 주입 트리거 어노테이션 키
pub const TRIGGER_ANNOTATION: &str = "kustomize.treyd.io/cloud-sql-proxy";

/// 문서가 사이드카 주입 대상인지 판정합니다.
///
/// `metadata` 또는 `annotations`가 없으면 대상이 아닙니다.
///
/// # Errors
/// `metadata` 또는 `annotations`가 매핑이 아닌 경우 [`InjectError::Metadata`]
pub fn is_target(doc: &ManifestNode, index: usize) -> Result<bool, InjectError> {
    let Some(metadata) = document::metadata(doc, index)? else {
        return Ok(false);
    };

    match metadata.get("annotations") {
        None => Ok(false),
        Some(node) if node.is_null() => Ok(false),
        Some(ManifestNode::Mapping(annotations)) => {
            Ok(annotations.contains_key(TRIGGER_ANNOTATION))
        }
        Some(other) => Err(InjectError::Metadata {
            index,
            reason: format!(
                "metadata.annotations must be a mapping, found {}",
                other.kind()
            ),
        }),
    }
}
