use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use placement_core::config::{
    EndpointSource, load_optional_config, parse_endpoint, select_endpoint,
};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: Url,
    pub endpoint_source: EndpointSource,
    pub timeout: Option<Duration>,
}

pub fn resolve_settings(
    config_path: &Path,
    endpoint_flag: Option<&str>,
    environment: Option<&str>,
) -> Result<Settings> {
    let config = load_optional_config(config_path).map_err(|error| {
        anyhow!(
            "invalid config at {}: {error}\nFix the config and retry.",
            config_path.display()
        )
    })?;

    let (raw, endpoint_source) = select_endpoint(endpoint_flag, environment, config.as_ref());
    let endpoint = parse_endpoint(&raw)
        .with_context(|| format!("invalid endpoint from {}", endpoint_source.describe()))?;

    tracing::debug!(%endpoint, source = endpoint_source.describe(), "settings resolved");
    Ok(Settings {
        endpoint,
        endpoint_source,
        timeout: config.as_ref().and_then(|config| config.timeout()),
    })
}
