//! 목록 변경기: 찾아낸 컨테이너 시퀀스 앞에 사이드카를 붙입니다.

use sqlproxy_core::node::ManifestNode;

/// `containers`를 `[container] ++ containers`로 교체합니다.
///
/// 기존 노드는 복사하지 않고 이동하며 순서를 유지합니다.
/// 같은 이름의 컨테이너가 이미 있어도 확인하지 않으므로 재적용하면 사이드카가 중복됩니다.
pub fn prepend_container(containers: &mut Vec<ManifestNode>, container: ManifestNode) {
    let original = std::mem::take(containers);
    let mut updated = Vec::with_capacity(original.len() + 1);
    updated.push(container);
    updated.extend(original);
    *containers = updated;
}
