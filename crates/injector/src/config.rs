//! 프록시 설정: 함수 설정 문서에서 사이드카 입력값을 읽어옵니다.
//!
//! [`ProxyConfig`]는 입력 봉투의 `functionConfig.spec`에서 한 번만 생성되며
//! 실행 동안 변경되지 않습니다. 세 필드 모두 필수이며 기본값이 없습니다.
//!
//! # 사용 예시
//!
//! ```
//! use sqlproxy_core::ManifestNode;
//! use sqlproxy_injector::ProxyConfig;
//!
//! let fn_config = ManifestNode::from_yaml_str(r#"
//! apiVersion: kustomize.treyd.io/v1
//! kind: CloudSqlProxy
//! spec:
//!   proxyImage: gcr.io/cloud-sql-connectors/cloud-sql-proxy
//!   proxyVersion: "2.0.0"
//!   proxyInstances: project:region:instance=tcp:5432
//! "#).unwrap();
//!
//! let config = ProxyConfig::from_function_config(&fn_config).unwrap();
//! assert_eq!(config.image(), "gcr.io/cloud-sql-connectors/cloud-sql-proxy:2.0.0");
//! ```

use serde::Serialize;

use sqlproxy_core::node::{ManifestNode, Scalar};

use crate::error::InjectError;

/// 사이드카 생성 입력값
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfig {
    /// 프록시 이미지 (태그 제외)
    pub proxy_image: String,
    /// 프록시 이미지 태그
    pub proxy_version: String,
    /// `-instances=` 플래그 값
    pub proxy_instances: String,
}

/// 함수 설정 `spec` 아래의 필수 필드 이름
const REQUIRED_FIELDS: [&str; 3] = ["proxyImage", "proxyVersion", "proxyInstances"];

impl ProxyConfig {
    pub fn new(
        proxy_image: impl Into<String>,
        proxy_version: impl Into<String>,
        proxy_instances: impl Into<String>,
    ) -> Self {
        Self {
            proxy_image: proxy_image.into(),
            proxy_version: proxy_version.into(),
            proxy_instances: proxy_instances.into(),
        }
    }

    /// 함수 설정 문서에서 입력값을 읽습니다.
    ///
    /// 누락, null, 빈 문자열, 스칼라가 아닌 값은 모두 누락으로 취급하며
    /// 문제가 있는 필드를 한 번에 모두 보고합니다.
    /// 따옴표 없는 숫자/불리언 스칼라는 거부합니다. `proxyVersion: 2.10`은
    /// YAML에서 실수 2.1이므로 그대로 쓰면 다른 이미지 태그가 됩니다.
    pub fn from_function_config(function_config: &ManifestNode) -> Result<Self, InjectError> {
        let spec = function_config
            .as_mapping()
            .and_then(|root| root.get("spec"))
            .and_then(ManifestNode::as_mapping);

        let mut values = Vec::with_capacity(REQUIRED_FIELDS.len());
        let mut missing = Vec::new();
        let mut unquoted = Vec::new();
        for field in REQUIRED_FIELDS {
            match field_value(spec.and_then(|s| s.get(field))) {
                FieldValue::Text(value) => values.push(value),
                FieldValue::Missing => missing.push(format!("spec.{field}")),
                FieldValue::Unquoted => unquoted.push(format!("spec.{field}")),
            }
        }

        match (missing.is_empty() && unquoted.is_empty(), values.as_slice()) {
            (true, [image, version, instances]) => Ok(Self::new(
                image.clone(),
                version.clone(),
                instances.clone(),
            )),
            _ => Err(InjectError::Configuration { missing, unquoted }),
        }
    }

    /// `proxyImage:proxyVersion`
    pub fn image(&self) -> String {
        format!("{}:{}", self.proxy_image, self.proxy_version)
    }
}

enum FieldValue {
    Text(String),
    Missing,
    /// YAML이 숫자나 불리언으로 해석한 값
    Unquoted,
}

fn field_value(node: Option<&ManifestNode>) -> FieldValue {
    match node {
        Some(ManifestNode::Scalar(Scalar::String(s))) if !s.is_empty() => {
            FieldValue::Text(s.clone())
        }
        Some(ManifestNode::Scalar(Scalar::Number(_) | Scalar::Bool(_))) => FieldValue::Unquoted,
        _ => FieldValue::Missing,
    }
}
