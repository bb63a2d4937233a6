//! 설정 관리: sqlproxy.toml 파싱 및 런타임 설정
//!
//! [`SqlProxyConfig`]는 함수 실행 환경(로깅, 추가 컨테이너 경로)을 담는 최상위 구조체입니다.
//! 사이드카 내용(이미지, 버전, 인스턴스)은 여기가 아니라 입력 봉투의 `functionConfig`에서 옵니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`SQLPROXY_GENERAL_LOG_LEVEL=debug` 형식)
//! 3. 설정 파일 (`sqlproxy.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), sqlproxy_core::error::SqlProxyError> {
//! use sqlproxy_core::config::SqlProxyConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = SqlProxyConfig::load("sqlproxy.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = SqlProxyConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, SqlProxyError};

/// sqlproxy 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqlProxyConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 주입기 설정
    #[serde(default)]
    pub injector: InjectorConfig,
    /// 값이 비어 있어 무시된 환경변수 키
    ///
    /// 설정 로딩은 로깅 초기화보다 먼저 일어나므로 경고는 여기 모아 두었다가
    /// [`warn_ignored_overrides`](Self::warn_ignored_overrides)로 출력합니다.
    #[serde(skip)]
    pub ignored_env_overrides: Vec<String>,
}

impl SqlProxyConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SqlProxyError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일 없이 기본값 + 환경변수 오버라이드로 설정을 만듭니다.
    pub fn from_env() -> Result<Self, SqlProxyError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, SqlProxyError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SqlProxyError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                SqlProxyError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, SqlProxyError> {
        toml::from_str(toml_str).map_err(|e| {
            SqlProxyError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `SQLPROXY_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "SQLPROXY_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "SQLPROXY_GENERAL_LOG_FORMAT");

        if let Some(key) = override_csv(
            &mut self.injector.extra_container_paths,
            "SQLPROXY_INJECTOR_EXTRA_CONTAINER_PATHS",
        ) {
            self.ignored_env_overrides.push(key);
        }
    }

    /// 무시된 환경변수 오버라이드를 경고로 기록합니다.
    ///
    /// tracing 구독자가 설치된 뒤에 호출해야 합니다.
    pub fn warn_ignored_overrides(&self) {
        for env_key in &self.ignored_env_overrides {
            warn!(env_key = env_key.as_str(), "empty list in env var, ignoring");
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), SqlProxyError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        for path in &self.injector.extra_container_paths {
            if path.is_empty() || path.split('.').any(str::is_empty) {
                return Err(ConfigError::InvalidValue {
                    field: "injector.extra_container_paths".to_owned(),
                    reason: format!("'{path}' must be a non-empty dot-separated field path"),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 주입기 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectorConfig {
    /// 기본 컨테이너 경로 테이블 뒤에 추가할 경로 (예: `spec.workload.containers`)
    pub extra_container_paths: Vec<String>,
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

/// 쉼표로 구분된 목록으로 덮어씁니다. 항목이 하나도 없으면 값을 유지하고 키를 반환합니다.
fn override_csv(target: &mut Vec<String>, env_key: &str) -> Option<String> {
    let val = std::env::var(env_key).ok()?;
    let parsed: Vec<String> = val
        .split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect();
    if parsed.is_empty() {
        return Some(env_key.to_owned());
    }
    *target = parsed;
    None
}
