//! 리소스 설정 통합 테스트
//!
//! - 예시 설정 파일 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use blackduck_resource_core::config::{CONFIG_PATH_ENV, ResourceConfig};
use blackduck_resource_core::error::{ConfigError, ResourceError};

// =============================================================================
// 예시 설정 파일 파싱 테스트
// =============================================================================

const EXAMPLE: &str = include_str!("../../../blackduck-resource.toml.example");

#[test]
fn example_config_parses_successfully() {
    let config = ResourceConfig::parse(EXAMPLE).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "compact");
    assert_eq!(config.hub.timeout_secs, 30);
    assert_eq!(config.detect.agent_dir, "/opt/resource");
}

#[test]
fn example_config_matches_code_defaults() {
    let parsed = ResourceConfig::parse(EXAMPLE).expect("should parse");
    let defaults = ResourceConfig::default();

    assert_eq!(parsed.general.log_level, defaults.general.log_level);
    assert_eq!(parsed.general.log_format, defaults.general.log_format);
    assert_eq!(parsed.hub.timeout_secs, defaults.hub.timeout_secs);
    assert_eq!(parsed.hub.cache_path, defaults.hub.cache_path);
    assert_eq!(parsed.hub.cache_enabled, defaults.hub.cache_enabled);
    assert_eq!(parsed.detect.agent_dir, defaults.detect.agent_dir);
    assert_eq!(parsed.detect.java_bin, defaults.detect.java_bin);
    assert_eq!(parsed.fetch.output_file, defaults.fetch.output_file);
}

// =============================================================================
// 부분 설정 테스트
// =============================================================================

#[test]
fn partial_config_hub_only() {
    let config = ResourceConfig::parse(
        r#"
[hub]
timeout_secs = 5
cache_enabled = false
"#,
    )
    .expect("should parse");

    assert_eq!(config.hub.timeout_secs, 5);
    assert!(!config.hub.cache_enabled);
    // 나머지 섹션은 기본값
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.fetch.output_file, "latest_version.json");
}

#[test]
fn partial_config_two_sections() {
    let config = ResourceConfig::parse(
        r#"
[general]
log_format = "json"

[detect]
agent_dir = "/usr/local/detect"
"#,
    )
    .expect("should parse");

    assert_eq!(config.general.log_format, "json");
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.detect.agent_dir, "/usr/local/detect");
    assert_eq!(config.detect.java_bin, "java");
}

#[test]
fn empty_config_uses_defaults() {
    let config = ResourceConfig::parse("").expect("empty config should parse");
    assert_eq!(config.hub.cache_path, "./project.cache");
    config.validate().expect("defaults should validate");
}

// =============================================================================
// 에러 테스트
// =============================================================================

#[test]
fn malformed_toml_is_parse_error() {
    let err = ResourceConfig::parse("[hub\ntimeout_secs = ").unwrap_err();
    assert!(matches!(
        err,
        ResourceError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[test]
fn wrong_type_is_parse_error() {
    let err = ResourceConfig::parse("[hub]\ntimeout_secs = \"thirty\"\n").unwrap_err();
    assert!(matches!(
        err,
        ResourceError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[test]
fn nested_output_file_fails_validation() {
    let config = ResourceConfig::parse("[fetch]\noutput_file = \"../escape.json\"\n")
        .expect("should parse");
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("fetch.output_file"));
}

#[test]
fn zero_timeout_fails_validation() {
    let config = ResourceConfig::parse("[hub]\ntimeout_secs = 0\n").expect("should parse");
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("hub.timeout_secs"));
}

// =============================================================================
// 파일 로딩 테스트
// =============================================================================

#[tokio::test]
async fn from_file_reads_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resource.toml");
    tokio::fs::write(&path, "[general]\nlog_level = \"debug\"\n")
        .await
        .unwrap();

    let config = ResourceConfig::from_file(&path).await.expect("should load");
    assert_eq!(config.general.log_level, "debug");
}

#[tokio::test]
async fn from_file_missing_is_file_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = ResourceConfig::from_file(dir.path().join("absent.toml"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ResourceError::Config(ConfigError::FileNotFound { .. })
    ));
}

#[tokio::test]
async fn from_file_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resource.toml");
    tokio::fs::write(&path, "[general]\nlog_format = \"xml\"\n")
        .await
        .unwrap();

    let err = ResourceConfig::from_file(&path).await.unwrap_err();
    assert!(matches!(
        err,
        ResourceError::Config(ConfigError::InvalidValue { .. })
    ));
}

// =============================================================================
// 환경변수 오버라이드 테스트
// =============================================================================

fn with_env<T>(key: &str, value: &str, f: impl FnOnce() -> T) -> T {
    let original = std::env::var(key).ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
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
    let mut config =
        ResourceConfig::parse("[general]\nlog_level = \"warn\"\n").expect("should parse");
    with_env("BLACKDUCK_RESOURCE_GENERAL_LOG_LEVEL", "error", || {
        config.apply_env_overrides();
    });
    assert_eq!(config.general.log_level, "error");
}

#[test]
#[serial_test::serial]
fn env_override_bool_field() {
    let mut config = ResourceConfig::default();
    with_env("BLACKDUCK_RESOURCE_HUB_CACHE_ENABLED", "false", || {
        config.apply_env_overrides();
    });
    assert!(!config.hub.cache_enabled);
}

#[test]
#[serial_test::serial]
fn env_override_numeric_field() {
    let mut config = ResourceConfig::default();
    with_env("BLACKDUCK_RESOURCE_HUB_TIMEOUT_SECS", "90", || {
        config.apply_env_overrides();
    });
    assert_eq!(config.hub.timeout_secs, 90);
}

#[test]
#[serial_test::serial]
fn env_override_unparsable_number_is_ignored() {
    let mut config = ResourceConfig::default();
    with_env("BLACKDUCK_RESOURCE_HUB_TIMEOUT_SECS", "soon", || {
        config.apply_env_overrides();
    });
    assert_eq!(config.hub.timeout_secs, 30);
}

#[tokio::test]
#[serial_test::serial]
async fn load_reads_file_named_by_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resource.toml");
    std::fs::write(&path, "[detect]\njava_bin = \"/usr/bin/java\"\n").unwrap();

    let original = std::env::var(CONFIG_PATH_ENV).ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var(CONFIG_PATH_ENV, &path);
    }
    let result = ResourceConfig::load().await;
    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var(CONFIG_PATH_ENV, val),
            None => std::env::remove_var(CONFIG_PATH_ENV),
        }
    }

    let config = result.expect("should load");
    assert_eq!(config.detect.java_bin, "/usr/bin/java");
}
