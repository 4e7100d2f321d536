//! Client configuration, resolved once at startup.

use std::time::Duration;

use figment::providers::Env;
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Prefix of the environment variables read by [`ClientConfig::from_env`].
pub const ENV_PREFIX: &str = "CONSOLE_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend address every catalog path is joined to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment name, reported at startup only.
    #[serde(default = "default_app_env")]
    pub app_env: String,

    /// Applies to every call; a timed-out call is a network failure.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// How long the host keeps showing the 401 message before the login redirect.
    #[serde(default = "default_redirect_delay", with = "humantime_serde")]
    pub redirect_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            app_env: default_app_env(),
            timeout: default_timeout(),
            redirect_delay: default_redirect_delay(),
        }
    }
}

impl ClientConfig {
    /// Reads `CONSOLE_BASE_URL`, `CONSOLE_APP_ENV`, `CONSOLE_TIMEOUT` and
    /// `CONSOLE_REDIRECT_DELAY`, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::figment().extract()?)
    }

    pub fn figment() -> Figment {
        Figment::new().merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `base_url` without trailing slashes.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080/api".to_string()
}

fn default_app_env() -> String {
    "production".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_redirect_delay() -> Duration {
    Duration::from_secs(10)
}
