//! 컨테이너 경로 탐색기: 워크로드 종류와 무관하게 컨테이너 목록을 찾습니다.
//!
//! [`ContainerPathTable`]은 순서가 있는 [`CandidatePath`] 목록입니다.
//! 문서 루트에서 각 후보 경로를 차례로 따라가며, 모든 중간 세그먼트가 매핑이고
//! 마지막 세그먼트가 시퀀스인 첫 번째 경로를 채택합니다.
//!
//! # 기본 테이블
//!
//! | 순서 | 경로 | 대표 kind |
//! |------|------|-----------|
//! | 1 | `spec.template.spec.containers` | Deployment, StatefulSet, DaemonSet, ReplicaSet, Job |
//! | 2 | `spec.jobTemplate.spec.template.spec.containers` | CronJob |
//! | 3 | `spec.containers` | Pod |
//! | 4 | `template.spec.containers` | PodTemplate |
//!
//! # 확장
//!
//! 새로운 워크로드 형태를 지원하려면 [`ContainerPathTable::with_extra`]로
//! 경로를 뒤에 추가합니다. 탐색 로직은 변경할 필요가 없습니다.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use sqlproxy_core::node::ManifestNode;

use crate::document::DocumentId;
use crate::error::InjectError;

/// 컨테이너 목록 후보 경로
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePath {
    segments: Vec<String>,
}

impl CandidatePath {
    /// 세그먼트 목록으로 경로를 만듭니다.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// `spec.template.spec.containers` 형식의 문자열을 파싱합니다.
    ///
    /// 빈 문자열이나 빈 세그먼트가 있으면 `None`
    pub fn parse(path: &str) -> Option<Self> {
        if path.is_empty() || path.split('.').any(str::is_empty) {
            return None;
        }
        Some(Self::new(path.split('.')))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for CandidatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl Serialize for CandidatePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 순서가 있는 후보 경로 테이블
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerPathTable {
    candidates: Vec<CandidatePath>,
}

impl Default for ContainerPathTable {
    fn default() -> Self {
        Self::conventional()
    }
}

impl ContainerPathTable {
    /// 일반적인 워크로드 형태를 다루는 기본 테이블
    pub fn conventional() -> Self {
        Self {
            candidates: vec![
                CandidatePath::new(["spec", "template", "spec", "containers"]),
                CandidatePath::new([
                    "spec",
                    "jobTemplate",
                    "spec",
                    "template",
                    "spec",
                    "containers",
                ]),
                CandidatePath::new(["spec", "containers"]),
                CandidatePath::new(["template", "spec", "containers"]),
            ],
        }
    }

    /// 기본 테이블 뒤에 설정의 추가 경로를 붙입니다. 이미 있는 경로는 무시합니다.
    ///
    /// # Errors
    /// 비었거나 빈 세그먼트를 포함한 경로 문자열 목록
    pub fn with_extra<S: AsRef<str>>(extra: &[S]) -> Result<Self, Vec<String>> {
        let mut table = Self::conventional();
        let mut invalid = Vec::new();
        for path in extra {
            match CandidatePath::parse(path.as_ref()) {
                Some(candidate) if !table.candidates.contains(&candidate) => {
                    table.candidates.push(candidate);
                }
                Some(_) => {}
                None => invalid.push(path.as_ref().to_owned()),
            }
        }
        if invalid.is_empty() {
            Ok(table)
        } else {
            Err(invalid)
        }
    }

    pub fn candidates(&self) -> &[CandidatePath] {
        &self.candidates
    }

    /// 문서에서 처음으로 해석되는 후보 경로를 찾습니다.
    pub fn locate(&self, doc: &ManifestNode) -> Option<&CandidatePath> {
        self.candidates.iter().find(|candidate| {
            match doc.sequence_at(candidate.segments()) {
                Ok(_) => true,
                Err(e) => {
                    debug!(path = %candidate, reason = %e, "candidate path did not resolve");
                    false
                }
            }
        })
    }

    /// 문서의 컨테이너 시퀀스를 (복사 없이) 가변 참조로 반환합니다.
    ///
    /// # Errors
    /// 어떤 후보도 해석되지 않으면 [`InjectError::PathResolution`]
    pub fn resolve<'d>(
        &self,
        doc: &'d mut ManifestNode,
        id: &DocumentId,
    ) -> Result<&'d mut Vec<ManifestNode>, InjectError> {
        let Some(candidate) = self.locate(doc) else {
            return Err(InjectError::PathResolution {
                kind: id.kind.clone(),
                name: id.name.clone(),
                tried: self.candidates.iter().map(ToString::to_string).collect(),
            });
        };

        debug!(document = %id, path = %candidate, "resolved container list");
        Ok(doc.sequence_at_mut(candidate.segments())?)
    }
}
