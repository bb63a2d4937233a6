//! 배치 드라이버: 문서 배치 전체에 게이트 → 경로 탐색 → 빌드 → 삽입을 적용합니다.
//!
//! [`SidecarInjector`]는 core의 [`ResourceFilter`] trait을 구현합니다.
//!
//! # 문서별 흐름
//!
//! ```text
//! Start --> Gate --skip--------------------------------> Done
//!             |
//!             +--proceed--> Resolve --> Build --> Mutate --> Done
//! ```
//!
//! 출력 순서는 입력 순서와 같습니다. 한 문서라도 실패하면 배치 전체가 실패하며
//! 부분 결과는 반환되지 않습니다.

use tracing::{debug, info};

use sqlproxy_core::error::SqlProxyError;
use sqlproxy_core::node::ManifestNode;
use sqlproxy_core::pipeline::ResourceFilter;

use crate::config::ProxyConfig;
use crate::container::build_sidecar;
use crate::document;
use crate::error::InjectError;
use crate::gate;
use crate::mutate::prepend_container;
use crate::paths::ContainerPathTable;

/// 사이드카 주입기
#[derive(Debug, Clone)]
pub struct SidecarInjector {
    config: ProxyConfig,
    paths: ContainerPathTable,
}

impl SidecarInjector {
    /// 기본 경로 테이블로 주입기를 생성합니다.
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            config,
            paths: ContainerPathTable::conventional(),
        }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn paths(&self) -> &ContainerPathTable {
        &self.paths
    }

    /// 단일 문서에 사이드카를 주입합니다.
    ///
    /// # Returns
    /// 주입했으면 `true`, 게이트를 통과하지 못해 그대로 두었으면 `false`
    pub fn inject_document(
        &self,
        doc: &mut ManifestNode,
        index: usize,
    ) -> Result<bool, InjectError> {
        if !gate::is_target(doc, index)? {
            return Ok(false);
        }

        let id = document::identify(doc, index)?;
        let sidecar = build_sidecar(&self.config, &id.kind)?;
        let containers = self.paths.resolve(doc, &id)?;
        prepend_container(containers, sidecar);

        info!(
            document = %id,
            containers = containers.len(),
            "injected cloud sql proxy sidecar"
        );
        Ok(true)
    }

    /// 문서 배치를 변환합니다.
    ///
    /// 에러가 발생하면 입력 배치를 버리고 에러만 반환합니다.
    pub fn transform(&self, mut items: Vec<ManifestNode>) -> Result<Vec<ManifestNode>, InjectError> {
        let mut injected = 0usize;
        for (index, doc) in items.iter_mut().enumerate() {
            if self.inject_document(doc, index)? {
                injected += 1;
            } else {
                debug!(index, "document not annotated, passing through");
            }
        }

        info!(total = items.len(), injected, "sidecar injection complete");
        Ok(items)
    }
}

impl ResourceFilter for SidecarInjector {
    fn name(&self) -> &str {
        "cloud-sql-proxy-sidecar"
    }

    fn filter(&self, items: Vec<ManifestNode>) -> Result<Vec<ManifestNode>, SqlProxyError> {
        Ok(self.transform(items)?)
    }
}

/// 사이드카 주입기 빌더
pub struct SidecarInjectorBuilder {
    config: Option<ProxyConfig>,
    paths: ContainerPathTable,
}

impl SidecarInjectorBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: None,
            paths: ContainerPathTable::conventional(),
        }
    }

    /// 프록시 설정을 지정합니다.
    pub fn config(mut self, config: ProxyConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 함수 설정 문서에서 프록시 설정을 읽습니다.
    pub fn function_config(mut self, function_config: &ManifestNode) -> Result<Self, InjectError> {
        self.config = Some(ProxyConfig::from_function_config(function_config)?);
        Ok(self)
    }

    /// 컨테이너 경로 테이블을 교체합니다.
    pub fn paths(mut self, paths: ContainerPathTable) -> Self {
        self.paths = paths;
        self
    }

    /// 주입기를 빌드합니다.
    ///
    /// # Errors
    /// 프록시 설정이 지정되지 않았으면 세 필드 모두 누락으로 보고합니다.
    pub fn build(self) -> Result<SidecarInjector, InjectError> {
        let config = self.config.ok_or_else(|| InjectError::Configuration {
            missing: vec![
                "spec.proxyImage".to_owned(),
                "spec.proxyVersion".to_owned(),
                "spec.proxyInstances".to_owned(),
            ],
            unquoted: Vec::new(),
        })?;

        Ok(SidecarInjector {
            config,
            paths: self.paths,
        })
    }
}

impl Default for SidecarInjectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
