#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`gate`]: 트리거 어노테이션 판정
//! - [`paths`]: 후보 경로 테이블과 컨테이너 목록 탐색
//! - [`container`]: 사이드카 컨테이너 빌더
//! - [`mutate`]: 컨테이너 목록 앞에 사이드카 삽입
//! - [`injector`]: 배치 드라이버 (`ResourceFilter` 구현)
//! - [`envelope`]: ResourceList 입출력 봉투
//! - [`config`]: 함수 설정 → `ProxyConfig`
//! - [`document`]: 메타데이터 뷰와 문서 식별자
//! - [`error`]: 도메인 에러 타입

pub mod config;
pub mod container;
pub mod document;
pub mod envelope;
pub mod error;
pub mod gate;
pub mod injector;
pub mod mutate;
pub mod paths;

// --- 주요 타입 re-export ---

// 주입기
pub use injector::{SidecarInjector, SidecarInjectorBuilder};

// 설정
pub use config::ProxyConfig;

// 에러
pub use error::InjectError;

// 봉투
pub use envelope::ResourceList;

// 경로 탐색
pub use paths::{CandidatePath, ContainerPathTable};

// 빌더 / 게이트
pub use container::{SIDECAR_NAME, build_sidecar};
pub use document::DocumentId;
pub use gate::TRIGGER_ANNOTATION;
