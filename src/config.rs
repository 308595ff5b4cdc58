use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

use crate::models::enums::ExtractionProfile;

/// Application-level constants
pub const APP_NAME: &str = "Labscan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
/// Upper bound on report text accepted over HTTP (1 MiB).
pub const DEFAULT_MAX_TEXT_BYTES: usize = 1024 * 1024;

const ENV_BIND_ADDR: &str = "LABSCAN_BIND_ADDR";
const ENV_PROFILE: &str = "LABSCAN_PROFILE";
const ENV_MAX_TEXT_BYTES: &str = "LABSCAN_MAX_TEXT_BYTES";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "labscan=info,labscan_lib=info,tower_http=info"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid LABSCAN_BIND_ADDR '{0}'")]
    InvalidBindAddr(String),

    #[error("Invalid LABSCAN_PROFILE '{0}' (expected basic or comprehensive)")]
    InvalidProfile(String),

    #[error("Invalid LABSCAN_MAX_TEXT_BYTES '{0}'")]
    InvalidMaxTextBytes(String),
}

/// Runtime settings for the HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub default_profile: ExtractionProfile,
    pub max_text_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
            default_profile: ExtractionProfile::Comprehensive,
            max_text_bytes: DEFAULT_MAX_TEXT_BYTES,
        }
    }
}

impl ServerConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset or blank keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(addr) = get(ENV_BIND_ADDR) {
            config.bind_addr =
                SocketAddr::from_str(&addr).map_err(|_| ConfigError::InvalidBindAddr(addr))?;
        }
        if let Some(profile) = get(ENV_PROFILE) {
            config.default_profile = ExtractionProfile::from_str(&profile.to_lowercase())
                .map_err(|_| ConfigError::InvalidProfile(profile))?;
        }
        if let Some(max) = get(ENV_MAX_TEXT_BYTES) {
            config.max_text_bytes = max
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidMaxTextBytes(max))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
    }

    #[test]
    fn reads_all_keys() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("LABSCAN_BIND_ADDR", "0.0.0.0:9000"),
            ("LABSCAN_PROFILE", "Basic"),
            ("LABSCAN_MAX_TEXT_BYTES", "2048"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.default_profile, ExtractionProfile::Basic);
        assert_eq!(config.max_text_bytes, 2048);
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[("LABSCAN_PROFILE", "  ")])).unwrap();
        assert_eq!(config.default_profile, ExtractionProfile::Comprehensive);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("LABSCAN_BIND_ADDR", "localhost")])),
            Err(ConfigError::InvalidBindAddr(_))
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("LABSCAN_PROFILE", "full")])),
            Err(ConfigError::InvalidProfile(_))
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("LABSCAN_MAX_TEXT_BYTES", "0")])),
            Err(ConfigError::InvalidMaxTextBytes(_))
        ));
    }

    #[test]
    fn app_name_is_labscan() {
        assert_eq!(APP_NAME, "Labscan");
    }
}
