//! sqlproxy.toml 통합 설정 테스트
//!
//! - sqlproxy.toml.example 파싱 테스트
//! - 파일 로딩 / 누락 파일 에러 테스트
//! - 환경변수 우선순위 테스트

use std::fs;

use sqlproxy_core::config::SqlProxyConfig;
use sqlproxy_core::error::{ConfigError, SqlProxyError};

// =============================================================================
// sqlproxy.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../sqlproxy.toml.example");
    let config = SqlProxyConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "warn");
    assert_eq!(config.general.log_format, "pretty");
    assert!(config.injector.extra_container_paths.is_empty());
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../sqlproxy.toml.example");
    let config = SqlProxyConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../sqlproxy.toml.example");
    let from_file = SqlProxyConfig::parse(content).expect("should parse");
    let defaults = SqlProxyConfig::default();

    assert_eq!(from_file.general.log_level, defaults.general.log_level);
    assert_eq!(from_file.general.log_format, defaults.general.log_format);
    assert_eq!(
        from_file.injector.extra_container_paths,
        defaults.injector.extra_container_paths
    );
}

// =============================================================================
// 파일 로딩 테스트
// =============================================================================

#[tokio::test]
async fn from_file_reads_toml() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("sqlproxy.toml");
    fs::write(
        &path,
        "[general]\nlog_level = \"debug\"\nlog_format = \"json\"\n",
    )
    .expect("should write config");

    let config = SqlProxyConfig::from_file(&path)
        .await
        .expect("should load config");
    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.general.log_format, "json");
}

#[tokio::test]
async fn from_file_missing_returns_file_not_found() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("nope.toml");

    let err = SqlProxyConfig::from_file(&path).await.unwrap_err();
    assert!(matches!(
        err,
        SqlProxyError::Config(ConfigError::FileNotFound { .. })
    ));
}

#[tokio::test]
async fn from_file_rejects_invalid_values() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("sqlproxy.toml");
    fs::write(&path, "[injector]\nextra_container_paths = [\"\"]\n").expect("should write");

    let err = SqlProxyConfig::from_file(&path).await.unwrap_err();
    assert!(matches!(
        err,
        SqlProxyError::Config(ConfigError::InvalidValue { .. })
    ));
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

fn with_env<T>(key: &str, value: &str, f: impl FnOnce() -> T) -> T {
    let original = std::env::var(key).ok();
    // SAFETY: 테스트는 serial로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var(key, value);
    }

    let result = f();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var(key, val),
            None => std::env::remove_var(key),
        }
    }
    result
}

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[general]
log_level = "info"
"#;

    let level = with_env("SQLPROXY_GENERAL_LOG_LEVEL", "error", || {
        let mut config = SqlProxyConfig::parse(toml).expect("should parse");
        config.apply_env_overrides();
        config.general.log_level
    });

    assert_eq!(level, "error");
}

#[test]
#[serial_test::serial]
fn env_override_csv_for_extra_paths() {
    let paths = with_env(
        "SQLPROXY_INJECTOR_EXTRA_CONTAINER_PATHS",
        "spec.a.containers, spec.b.containers",
        || {
            SqlProxyConfig::from_env()
                .expect("env config should validate")
                .injector
                .extra_container_paths
        },
    );

    assert_eq!(paths, vec!["spec.a.containers", "spec.b.containers"]);
}

#[test]
#[serial_test::serial]
fn from_env_rejects_invalid_override() {
    let result = with_env("SQLPROXY_GENERAL_LOG_FORMAT", "xml", SqlProxyConfig::from_env);
    assert!(result.is_err(), "invalid env override should fail validation");
}

#[test]
#[serial_test::serial]
fn empty_csv_override_is_recorded_not_applied() {
    let config = with_env("SQLPROXY_INJECTOR_EXTRA_CONTAINER_PATHS", " , ", || {
        SqlProxyConfig::from_env().expect("env config should validate")
    });

    assert!(config.injector.extra_container_paths.is_empty());
    assert_eq!(
        config.ignored_env_overrides,
        vec!["SQLPROXY_INJECTOR_EXTRA_CONTAINER_PATHS"]
    );
}

#[test]
#[serial_test::serial]
fn ignored_overrides_are_not_serialized() {
    let config = with_env("SQLPROXY_INJECTOR_EXTRA_CONTAINER_PATHS", "", || {
        let mut config = SqlProxyConfig::parse("[general]\nlog_level = \"info\"\n")
            .expect("should parse");
        config.apply_env_overrides();
        config
    });

    assert_eq!(config.ignored_env_overrides.len(), 1);
    let rendered = toml::to_string(&config).expect("should serialize");
    assert!(!rendered.contains("ignored_env_overrides"));
}
