use std::{collections::HashMap, env, net::SocketAddr, time::Duration};
use thiserror::Error;

/// How the deployed backend addresses an update. Callers always update by
/// id; this only decides where the id travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateAddressing {
    /// `PUT /api/moods/update/{id}`
    #[default]
    PerRecord,
    /// `PUT /api/moods/update` with `id` in the body.
    Collection,
}

impl std::str::FromStr for UpdateAddressing {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "per-record" | "path" => Ok(Self::PerRecord),
            "collection" => Ok(Self::Collection),
            other => Err(ConfigError::UpdateMode(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MOOD_API_UPDATE_MODE must be 'per-record' or 'collection', got '{0}'")]
    UpdateMode(String),

    #[error("invalid listen address: {0}")]
    ListenAddr(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_base_url: String,
    pub update_addressing: UpdateAddressing,
    pub api_timeout: Duration,
    pub secure_cookies: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            api_base_url: "http://127.0.0.1:8081".into(),
            update_addressing: UpdateAddressing::PerRecord,
            api_timeout: Duration::from_secs(30),
            secure_cookies: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env::vars().collect())
    }

    fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str| vars.get(key).map(|value| value.trim()).filter(|v| !v.is_empty());

        let update_addressing = match var("MOOD_API_UPDATE_MODE") {
            Some(mode) => mode.parse()?,
            None => defaults.update_addressing,
        };

        Ok(Self {
            host: var("HOST").map(str::to_string).unwrap_or(defaults.host),
            port: var("PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            api_base_url: var("MOOD_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            update_addressing,
            api_timeout: var("MOOD_API_TIMEOUT_SECS")
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.api_timeout),
            secure_cookies: var("COOKIE_SECURE")
                .and_then(|value| value.parse::<bool>().ok())
                .unwrap_or(defaults.secure_cookies),
        })
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::ListenAddr(format!("{}:{}", self.host, self.port)))
    }
}
