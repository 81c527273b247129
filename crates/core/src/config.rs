//! 설정 관리 — 리소스 런타임 설정
//!
//! [`ResourceConfig`]는 `check` / `in` / `out` 세 프로그램이 공유하는 설정입니다.
//! 연결 정보(`source`)는 오케스트레이터가 stdin으로 전달하므로 여기에 포함되지 않고,
//! 로그, HTTP 타임아웃, 캐시 경로, 스캐너 위치처럼 컨테이너 이미지에 고정되는 값만 다룹니다.
//!
//! # 설정 로딩 우선순위
//! 1. 환경변수 (`BLACKDUCK_RESOURCE_HUB_TIMEOUT_SECS=10` 형식)
//! 2. 설정 파일 (`BLACKDUCK_RESOURCE_CONFIG`가 가리키는 TOML 파일)
//! 3. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), blackduck_resource_core::error::ResourceError> {
//! use blackduck_resource_core::config::ResourceConfig;
//!
//! // 환경변수 기반 로딩
//! let config = ResourceConfig::load().await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = ResourceConfig::parse("[hub]\ntimeout_secs = 10")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, ResourceError};

/// 설정 파일 경로를 지정하는 환경변수
pub const CONFIG_PATH_ENV: &str = "BLACKDUCK_RESOURCE_CONFIG";

/// 허용되는 최대 HTTP 타임아웃 (초)
const MAX_TIMEOUT_SECS: u64 = 600;

/// 리소스 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// 일반 설정 (로깅)
    #[serde(default)]
    pub general: GeneralConfig,
    /// 스캐너 서비스 클라이언트 설정
    #[serde(default)]
    pub hub: HubConfig,
    /// 스캔 도구 실행 설정 (`out`)
    #[serde(default)]
    pub detect: DetectConfig,
    /// 결과 파일 설정 (`in`)
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl ResourceConfig {
    /// 설정 파일(있다면)을 읽고 환경변수 오버라이드를 적용한 뒤 검증합니다.
    ///
    /// `BLACKDUCK_RESOURCE_CONFIG`가 없으면 기본값에서 시작합니다.
    pub async fn load() -> Result<Self, ResourceError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => Self::from_file(path).await?,
            _ => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                ResourceError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, ResourceError> {
        toml::from_str(toml_str).map_err(|e| {
            ResourceError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `BLACKDUCK_RESOURCE_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_string(
            &mut self.general.log_level,
            "BLACKDUCK_RESOURCE_GENERAL_LOG_LEVEL",
        );
        override_string(
            &mut self.general.log_format,
            "BLACKDUCK_RESOURCE_GENERAL_LOG_FORMAT",
        );

        override_u64(
            &mut self.hub.timeout_secs,
            "BLACKDUCK_RESOURCE_HUB_TIMEOUT_SECS",
        );
        override_string(&mut self.hub.cache_path, "BLACKDUCK_RESOURCE_HUB_CACHE_PATH");
        override_bool(
            &mut self.hub.cache_enabled,
            "BLACKDUCK_RESOURCE_HUB_CACHE_ENABLED",
        );

        override_string(
            &mut self.detect.agent_dir,
            "BLACKDUCK_RESOURCE_DETECT_AGENT_DIR",
        );
        override_string(&mut self.detect.java_bin, "BLACKDUCK_RESOURCE_DETECT_JAVA_BIN");

        override_string(
            &mut self.fetch.output_file,
            "BLACKDUCK_RESOURCE_FETCH_OUTPUT_FILE",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ResourceError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty", "compact"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.hub.timeout_secs == 0 || self.hub.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidValue {
                field: "hub.timeout_secs".to_owned(),
                reason: format!("must be 1-{MAX_TIMEOUT_SECS}"),
            }
            .into());
        }

        if self.hub.cache_enabled && self.hub.cache_path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "hub.cache_path".to_owned(),
                reason: "must not be empty when the cache is enabled".to_owned(),
            }
            .into());
        }

        if self.detect.java_bin.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "detect.java_bin".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        // 결과 파일은 destination 디렉토리 바로 아래에만 쓴다
        let output = Path::new(&self.fetch.output_file);
        if self.fetch.output_file.is_empty() || output.components().count() != 1 {
            return Err(ConfigError::InvalidValue {
                field: "fetch.output_file".to_owned(),
                reason: "must be a plain file name".to_owned(),
            }
            .into());
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
    /// 로그 형식 (json, pretty, compact)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "compact".to_owned(),
        }
    }
}

/// 스캐너 서비스 클라이언트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// 요청 단위 타임아웃 (초)
    pub timeout_secs: u64,
    /// 프로젝트 캐시 파일 경로
    pub cache_path: String,
    /// 프로젝트 캐시 사용 여부
    pub cache_enabled: bool,
}

impl HubConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            cache_path: "./project.cache".to_owned(),
            cache_enabled: true,
        }
    }
}

/// 스캔 도구 실행 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    /// `synopsys-detect-*.jar`를 찾을 디렉토리
    pub agent_dir: String,
    /// Java 실행 파일
    pub java_bin: String,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            agent_dir: "/opt/resource".to_owned(),
            java_bin: "java".to_owned(),
        }
    }
}

/// `in` 결과 파일 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// destination 디렉토리에 기록할 파일 이름
    pub output_file: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            output_file: "latest_version.json".to_owned(),
        }
    }
}

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = ResourceConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "compact");
        assert_eq!(config.hub.timeout(), Duration::from_secs(30));
        assert_eq!(config.hub.cache_path, "./project.cache");
        assert!(config.hub.cache_enabled);
        assert_eq!(config.detect.agent_dir, "/opt/resource");
        assert_eq!(config.fetch.output_file, "latest_version.json");
        config.validate().unwrap();
    }

    #[test]
    fn parse_partial_toml_keeps_defaults() {
        let config = ResourceConfig::parse("[hub]\ntimeout_secs = 5\n").unwrap();
        assert_eq!(config.hub.timeout_secs, 5);
        assert_eq!(config.hub.cache_path, "./project.cache");
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn parse_invalid_toml_fails() {
        let err = ResourceConfig::parse("[hub\n").unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = ResourceConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = ResourceConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = ResourceConfig::default();
        config.hub.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn validate_allows_empty_cache_path_when_disabled() {
        let mut config = ResourceConfig::default();
        config.hub.cache_enabled = false;
        config.hub.cache_path = String::new();
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_nested_output_file() {
        let mut config = ResourceConfig::default();
        config.fetch.output_file = "../escape.json".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("output_file"));
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: serial 테스트로 실행되어 환경변수 조작이 다른 테스트와 겹치지 않습니다.
        unsafe { std::env::set_var("TEST_BDR_STR", "overridden") };
        override_string(&mut val, "TEST_BDR_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_BDR_STR") };
    }

    #[test]
    #[serial]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = true;
        // SAFETY: serial 테스트로 실행되어 환경변수 조작이 다른 테스트와 겹치지 않습니다.
        unsafe { std::env::set_var("TEST_BDR_BOOL_BAD", "not-a-bool") };
        override_bool(&mut val, "TEST_BDR_BOOL_BAD");
        assert!(val);
        unsafe { std::env::remove_var("TEST_BDR_BOOL_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_u64_valid() {
        let mut val = 30;
        // SAFETY: serial 테스트로 실행되어 환경변수 조작이 다른 테스트와 겹치지 않습니다.
        unsafe { std::env::set_var("TEST_BDR_U64", "12") };
        override_u64(&mut val, "TEST_BDR_U64");
        assert_eq!(val, 12);
        unsafe { std::env::remove_var("TEST_BDR_U64") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_BDR_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = ResourceConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = ResourceConfig::parse(&toml_str).unwrap();
        assert_eq!(config.hub.cache_path, parsed.hub.cache_path);
        assert_eq!(config.detect.agent_dir, parsed.detect.agent_dir);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let err = ResourceConfig::from_file("/nonexistent/path/resource.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
