//! ResourceList 봉투: KRM 함수 입출력 형식
//!
//! ```yaml
//! apiVersion: config.kubernetes.io/v1
//! kind: ResourceList
//! items: [...]
//! functionConfig: {...}
//! ```
//!
//! `items` 외의 최상위 필드(`results` 등)는 손대지 않고 그대로 출력합니다.
//! 입력은 YAML 또는 JSON을 받으며, 출력은 둘 중 하나를 선택합니다.

use tracing::warn;

use sqlproxy_core::node::{ManifestNode, Mapping};

use crate::error::InjectError;

/// ResourceList kind
pub const RESOURCE_LIST_KIND: &str = "ResourceList";

/// 알려진 ResourceList apiVersion
const KNOWN_API_VERSIONS: [&str; 2] = ["config.kubernetes.io/v1", "config.kubernetes.io/v1alpha1"];

/// KRM 함수 입출력 봉투
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceList {
    root: Mapping,
}

impl ResourceList {
    /// 항목과 함수 설정으로 새 봉투를 만듭니다.
    pub fn new(items: Vec<ManifestNode>, function_config: Option<ManifestNode>) -> Self {
        let mut root = Mapping::new();
        root.insert("apiVersion", ManifestNode::string(KNOWN_API_VERSIONS[0]));
        root.insert("kind", ManifestNode::string(RESOURCE_LIST_KIND));
        root.insert("items", ManifestNode::Sequence(items));
        if let Some(function_config) = function_config {
            root.insert("functionConfig", function_config);
        }
        Self { root }
    }

    /// YAML 또는 JSON 문자열을 파싱합니다.
    ///
    /// # Errors
    /// - 입력이 비었거나 파싱할 수 없는 경우
    /// - 최상위가 매핑이 아니거나 `kind`가 `ResourceList`가 아닌 경우
    /// - `items`가 시퀀스가 아닌 경우
    pub fn from_yaml_str(input: &str) -> Result<Self, InjectError> {
        if input.trim().is_empty() {
            return Err(InjectError::Envelope("empty input, expected a ResourceList".to_owned()));
        }

        let node = ManifestNode::from_yaml_str(input)
            .map_err(|e| InjectError::Envelope(format!("invalid ResourceList: {e}")))?;

        let found = node.kind();
        let ManifestNode::Mapping(root) = node else {
            return Err(InjectError::Envelope(format!(
                "ResourceList must be a mapping, found {found}"
            )));
        };

        match root.get("kind").and_then(ManifestNode::as_str) {
            Some(RESOURCE_LIST_KIND) => {}
            other => {
                return Err(InjectError::Envelope(format!(
                    "expected kind {RESOURCE_LIST_KIND}, found {}",
                    other.unwrap_or("<none>")
                )));
            }
        }

        match root.get("apiVersion").and_then(ManifestNode::as_str) {
            Some(v) if KNOWN_API_VERSIONS.contains(&v) => {}
            other => warn!(
                api_version = other.unwrap_or("<none>"),
                "unrecognized ResourceList apiVersion"
            ),
        }

        match root.get("items") {
            None | Some(ManifestNode::Sequence(_)) => {}
            Some(node) if node.is_null() => {}
            Some(other) => {
                return Err(InjectError::Envelope(format!(
                    "ResourceList items must be a sequence, found {}",
                    other.kind()
                )));
            }
        }

        Ok(Self { root })
    }

    /// 함수 설정 문서
    pub fn function_config(&self) -> Option<&ManifestNode> {
        self.root.get("functionConfig").filter(|n| !n.is_null())
    }

    pub fn items(&self) -> &[ManifestNode] {
        self.root
            .get("items")
            .and_then(ManifestNode::as_sequence)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 항목을 꺼냅니다. 봉투에는 빈 목록이 남습니다.
    pub fn take_items(&mut self) -> Vec<ManifestNode> {
        self.root
            .get_mut("items")
            .and_then(ManifestNode::as_sequence_mut)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    /// 항목을 설정합니다. `items` 키의 원래 위치를 유지합니다.
    pub fn set_items(&mut self, items: Vec<ManifestNode>) {
        self.root.insert("items", ManifestNode::Sequence(items));
    }

    pub fn to_yaml_string(&self) -> Result<String, InjectError> {
        serde_yaml::to_string(&self.root)
            .map_err(|e| InjectError::Envelope(format!("failed to serialize ResourceList: {e}")))
    }

    pub fn to_json_string(&self) -> Result<String, InjectError> {
        serde_json::to_string_pretty(&self.root)
            .map_err(|e| InjectError::Envelope(format!("failed to serialize ResourceList: {e}")))
    }
}
