//! 변환 trait: 문서 배치 필터 확장 포인트 정의

use crate::error::SqlProxyError;
use crate::node::ManifestNode;

/// 문서 배치를 변환하는 필터 trait
///
/// 입력 순서를 보존해야 하며, 에러가 발생하면 부분 결과 없이 전체 배치가 실패합니다.
pub trait ResourceFilter: Send + Sync {
    /// 필터 이름
    fn name(&self) -> &str;

    /// 문서 배치를 변환하여 반환
    fn filter(&self, items: Vec<ManifestNode>) -> Result<Vec<ManifestNode>, SqlProxyError>;
}
