//! Client configuration.
//!
//! A [`ClientConfig`] is built once and moved into the [`Client`](crate::Client),
//! after which it can't change.

use super::error::Result;
use serde::Deserialize;
use std::time::Duration;

const ENV_PREFIX: &str = "T1DISK_";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: String,
    permanent_auth: bool,
    timeout: Option<Duration>,
}

#[derive(Deserialize)]
struct EnvConfig {
    base_url: String,
    #[serde(default)]
    permanent_auth: bool,
    timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// `base_url` is the API root, e.g. `https://api.example.com/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        ClientConfig {
            base_url,
            permanent_auth: false,
            timeout: None,
        }
    }

    /// Asks the server for a token that does not expire with the session.
    pub fn permanent_auth(mut self, permanent_auth: bool) -> Self {
        self.permanent_auth = permanent_auth;
        self
    }

    /// Timeout applied to every request. There is none by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reads `T1DISK_BASE_URL`, `T1DISK_PERMANENT_AUTH` and `T1DISK_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    pub(crate) fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        let env: EnvConfig = envy::prefixed(ENV_PREFIX).from_iter(vars)?;
        Ok(env.into())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_permanent_auth(&self) -> bool {
        self.permanent_auth
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl From<EnvConfig> for ClientConfig {
    fn from(env: EnvConfig) -> Self {
        let config = ClientConfig::new(env.base_url).permanent_auth(env.permanent_auth);
        match env.timeout_secs {
            Some(secs) => config.timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let config = ClientConfig::new("http://localhost:8080/api//");
        assert_eq!(config.base_url(), "http://localhost:8080/api");
        assert_eq!(
            config.endpoint("/files/create/"),
            "http://localhost:8080/api/files/create/"
        );
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::new("http://localhost");
        assert!(!config.is_permanent_auth());
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn reads_prefixed_vars() {
        let config = ClientConfig::from_vars(vars(&[
            ("T1DISK_BASE_URL", "https://disk.example.com/api/"),
            ("T1DISK_PERMANENT_AUTH", "true"),
            ("T1DISK_TIMEOUT_SECS", "30"),
            ("UNRELATED", "x"),
        ]))
        .unwrap();

        assert_eq!(config.base_url(), "https://disk.example.com/api");
        assert!(config.is_permanent_auth());
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn missing_base_url_is_a_config_error() {
        let err = ClientConfig::from_vars(vars(&[("T1DISK_PERMANENT_AUTH", "false")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
