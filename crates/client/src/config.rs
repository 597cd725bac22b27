//! Client configuration loaded from the environment.

use std::path::PathBuf;

use crate::error::ClientError;

pub const API_URL_ENV: &str = "SASB_API_URL";
pub const TOKEN_PATH_ENV: &str = "SASB_TOKEN_PATH";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every request path is appended to (no trailing slash).
    pub api_url: String,
    /// File holding the persisted token pair.
    pub token_path: PathBuf,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, token_path: impl Into<PathBuf>) -> Self {
        Self {
            api_url: normalize_base_url(&api_url.into()),
            token_path: token_path.into(),
            user_agent: default_user_agent(),
        }
    }

    /// Read `SASB_API_URL` and `SASB_TOKEN_PATH`, falling back to defaults.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let token_path = match std::env::var_os(TOKEN_PATH_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_token_path()?,
        };

        Ok(Self::new(api_url, token_path))
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = normalize_base_url(&api_url.into());
        self
    }

    pub fn with_token_path(mut self, token_path: impl Into<PathBuf>) -> Self {
        self.token_path = token_path.into();
        self
    }
}

/// `{data_dir}/sasb/tokens.json`, e.g. `~/.local/share/sasb/tokens.json` on Linux.
pub fn default_token_path() -> Result<PathBuf, ClientError> {
    let base = dirs::data_dir()
        .ok_or_else(|| ClientError::Config("no platform data directory available".into()))?;
    Ok(base.join("sasb").join("tokens.json"))
}

fn default_user_agent() -> String {
    format!("sasb-client/{}", env!("CARGO_PKG_VERSION"))
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slash() {
        let config = ClientConfig::new("http://api.local/api/ ", "/tmp/tokens.json");
        assert_eq!(config.api_url, "http://api.local/api");
        assert!(config.user_agent.starts_with("sasb-client/"));
    }

    #[test]
    fn builders_override_fields() {
        let config = ClientConfig::new(DEFAULT_API_URL, "/tmp/a.json")
            .with_api_url("http://other:9000/")
            .with_token_path("/tmp/b.json");
        assert_eq!(config.api_url, "http://other:9000");
        assert_eq!(config.token_path, PathBuf::from("/tmp/b.json"));
    }
}
