//! 문서 메타데이터 뷰: 게이트 판정과 진단 메시지용 식별 정보
//!
//! 문서는 최상위 매핑이어야 하며, `metadata`가 있다면 역시 매핑이어야 합니다.
//! `metadata`가 없거나 null이면 메타데이터 없음으로 취급합니다 (에러 아님).

use std::fmt;

use sqlproxy_core::node::{ManifestNode, Mapping};

use crate::error::InjectError;

/// 진단용 문서 식별자 (`kind`, `metadata.name`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentId {
    pub kind: String,
    pub name: String,
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// 문서의 `metadata` 매핑을 반환합니다.
///
/// # Errors
/// - 문서 루트가 매핑이 아닌 경우
/// - `metadata`가 매핑도 null도 아닌 경우
pub fn metadata(doc: &ManifestNode, index: usize) -> Result<Option<&Mapping>, InjectError> {
    let root = doc.as_mapping().ok_or_else(|| InjectError::Metadata {
        index,
        reason: format!("document must be a mapping, found {}", doc.kind()),
    })?;

    match root.get("metadata") {
        None => Ok(None),
        Some(node) if node.is_null() => Ok(None),
        Some(ManifestNode::Mapping(m)) => Ok(Some(m)),
        Some(other) => Err(InjectError::Metadata {
            index,
            reason: format!("metadata must be a mapping, found {}", other.kind()),
        }),
    }
}

/// 문서의 `kind`와 `metadata.name`을 읽습니다.
///
/// 주입 대상 문서는 에러 메시지에서 식별 가능해야 하므로 두 값 모두 필수입니다.
pub fn identify(doc: &ManifestNode, index: usize) -> Result<DocumentId, InjectError> {
    let kind = doc
        .as_mapping()
        .and_then(|root| root.get("kind"))
        .and_then(ManifestNode::as_str)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| InjectError::Metadata {
            index,
            reason: "kind must be a non-empty string".to_owned(),
        })?;

    let name = metadata(doc, index)?
        .and_then(|m| m.get("name"))
        .and_then(ManifestNode::as_str)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| InjectError::Metadata {
            index,
            reason: format!("{kind}: metadata.name must be a non-empty string"),
        })?;

    Ok(DocumentId {
        kind: kind.to_owned(),
        name: name.to_owned(),
    })
}
