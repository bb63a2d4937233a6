//! 사이드카 컨테이너 빌더
//!
//! [`build_sidecar`]는 [`ProxyConfig`]만으로 결정되는 순수 함수입니다.
//! 매번 새 매핑을 만들기 때문에 기존 필드와 충돌할 일이 없으며,
//! 필드 순서는 항상 `name, image, command, securityContext, lifecycle`입니다.

use sqlproxy_core::error::ShapeError;
use sqlproxy_core::node::{ManifestNode, Mapping};

use crate::config::ProxyConfig;

/// 주입되는 사이드카 컨테이너 이름
pub const SIDECAR_NAME: &str = "proxysql";

/// 프록시 준비를 기다리는 postStart 훅
const POST_START_COMMAND: [&str; 3] = ["/bin/bash", "-c", "wait-for-port 5432"];

/// 프록시 실행 커맨드
///
/// `kind`는 문맥으로만 받으며 현재 출력에는 영향을 주지 않습니다.
pub fn proxy_command(config: &ProxyConfig, _kind: &str) -> Vec<String> {
    vec![
        "/cloud_sql_proxy".to_owned(),
        "-term_timeout=3600s".to_owned(),
        "-ip_address_types=PRIVATE".to_owned(),
        "-log_debug_stdout".to_owned(),
        format!("-instances={}", config.proxy_instances),
        "--enable_iam_login".to_owned(),
    ]
}

/// 사이드카 컨테이너 노드를 생성합니다.
///
/// 중첩 필드는 "없으면 만들고 내려가기" 단계로 채웁니다.
pub fn build_sidecar(config: &ProxyConfig, kind: &str) -> Result<ManifestNode, ShapeError> {
    let mut container = Mapping::new();
    container.insert("name", ManifestNode::string(SIDECAR_NAME));
    container.insert("image", ManifestNode::string(config.image()));
    container.insert(
        "command",
        ManifestNode::string_list(proxy_command(config, kind)),
    );

    container
        .get_or_insert_mapping("securityContext")?
        .insert("runAsNonRoot", ManifestNode::bool(true));

    container
        .get_or_insert_mapping("lifecycle")?
        .get_or_insert_mapping("postStart")?
        .get_or_insert_mapping("exec")?
        .insert("command", ManifestNode::string_list(POST_START_COMMAND));

    Ok(container.into())
}
