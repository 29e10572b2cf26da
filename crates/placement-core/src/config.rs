use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://placement-predictor-backend.onrender.com/predict";
pub const ENDPOINT_ENV: &str = "PLACEMENT_ENDPOINT";

#[derive(Debug, Clone, Deserialize)]
pub struct PlacementConfig {
    pub version: u32,
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfig {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl PlacementConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.backend.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Validation { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSource {
    Flag,
    Environment,
    ConfigFile,
    BuiltIn,
}

impl EndpointSource {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Flag => "--endpoint flag",
            Self::Environment => ENDPOINT_ENV,
            Self::ConfigFile => "config file",
            Self::BuiltIn => "built-in default",
        }
    }
}

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs
        .home_dir()
        .join(".config")
        .join("placement")
        .join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<PlacementConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: PlacementConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&parsed)?;
    Ok(parsed)
}

pub fn load_optional_config(path: &Path) -> Result<Option<PlacementConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    load_config(path).map(Some)
}

pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|error| ConfigError::Validation {
        message: format!("endpoint '{trimmed}' is not a valid URL: {error}"),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::Validation {
            message: format!("endpoint '{trimmed}' must use http or https, not {scheme}"),
        }),
    }
}

pub fn select_endpoint(
    flag: Option<&str>,
    environment: Option<&str>,
    config: Option<&PlacementConfig>,
) -> (String, EndpointSource) {
    let non_blank = |value: &&str| !value.trim().is_empty();

    if let Some(value) = flag.filter(non_blank) {
        return (value.to_string(), EndpointSource::Flag);
    }
    if let Some(value) = environment.filter(non_blank) {
        return (value.to_string(), EndpointSource::Environment);
    }
    if let Some(value) = config
        .and_then(|config| config.backend.endpoint.as_deref())
        .filter(non_blank)
    {
        return (value.to_string(), EndpointSource::ConfigFile);
    }
    (DEFAULT_ENDPOINT.to_string(), EndpointSource::BuiltIn)
}

pub fn validate_config(config: &PlacementConfig) -> Result<(), ConfigError> {
    if config.version != 1 {
        return Err(ConfigError::Validation {
            message: "version must be 1".to_string(),
        });
    }

    if let Some(endpoint) = config.backend.endpoint.as_deref() {
        if endpoint.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "backend.endpoint must be non-empty when set".to_string(),
            });
        }
        parse_endpoint(endpoint)?;
    }

    if config.backend.timeout_secs == Some(0) {
        return Err(ConfigError::Validation {
            message: "backend.timeout_secs must be greater than zero".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_config_from_toml(raw: &str) -> Result<PlacementConfig, ConfigError> {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        fs::write(file.path(), raw).expect("write temp config");
        load_config(file.path())
    }

    #[test]
    fn accepts_version_only_config() {
        let config = load_config_from_toml("version = 1\n").expect("valid config");
        assert!(config.backend.endpoint.is_none());
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn accepts_backend_section() {
        let raw = r#"
version = 1

[backend]
endpoint = "http://localhost:8000/predict"
timeout_secs = 15
"#;

        let config = load_config_from_toml(raw).expect("valid config");
        assert_eq!(
            config.backend.endpoint.as_deref(),
            Some("http://localhost:8000/predict")
        );
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn rejects_unknown_version() {
        let error = load_config_from_toml("version = 2\n").expect_err("config should fail");
        assert!(error.to_string().contains("version must be 1"));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let raw = r#"
version = 1

[backend]
endpoint = "ftp://example.com/predict"
"#;

        let error = load_config_from_toml(raw).expect_err("config should fail");
        assert!(error.to_string().contains("must use http or https"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let raw = r#"
version = 1

[backend]
timeout_secs = 0
"#;

        let error = load_config_from_toml(raw).expect_err("config should fail");
        assert!(error.to_string().contains("greater than zero"));
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let error = load_config_from_toml("version = \"one\"\n").expect_err("config should fail");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_optional_config_is_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let loaded = load_optional_config(&dir.path().join("config.toml")).expect("optional");
        assert!(loaded.is_none());
    }

    #[test]
    fn endpoint_precedence_prefers_flag_then_env_then_file() {
        let config = PlacementConfig {
            version: 1,
            backend: BackendConfig {
                endpoint: Some("http://file/predict".to_string()),
                timeout_secs: None,
            },
        };

        assert_eq!(
            select_endpoint(Some("http://flag/predict"), Some("http://env"), Some(&config)),
            ("http://flag/predict".to_string(), EndpointSource::Flag)
        );
        assert_eq!(
            select_endpoint(None, Some("http://env/predict"), Some(&config)),
            ("http://env/predict".to_string(), EndpointSource::Environment)
        );
        assert_eq!(
            select_endpoint(Some("  "), None, Some(&config)),
            ("http://file/predict".to_string(), EndpointSource::ConfigFile)
        );
        assert_eq!(
            select_endpoint(None, None, None),
            (DEFAULT_ENDPOINT.to_string(), EndpointSource::BuiltIn)
        );
    }

    #[test]
    fn parse_endpoint_rejects_relative_urls() {
        let error = parse_endpoint("/predict").expect_err("relative");
        assert!(error.to_string().contains("is not a valid URL"));
    }
}
