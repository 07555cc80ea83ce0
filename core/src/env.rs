//! Environment-backed configuration for the API client.

use std::{env, fmt};

use once_cell::sync::OnceCell;
use url::Url;

use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "PORTFOLIO_API_BASE_URL";
pub const NODE_ENV_VAR: &str = "PORTFOLIO_ENV";

static ENV: OnceCell<Env> = OnceCell::new();

/// Deployment mode of the running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeEnv {
    #[default]
    Development,
    Test,
    Production,
}

impl NodeEnv {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeEnv::Development => "development",
            NodeEnv::Test => "test",
            NodeEnv::Production => "production",
        }
    }
}

impl fmt::Display for NodeEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Env {
    /// Absolute root that relative request paths are joined to.
    pub api_base_url: String,
    pub node_env: NodeEnv,
}

impl Env {
    /// Parse configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let api_base_url = lookup(BASE_URL_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingBaseUrl(BASE_URL_VAR))?;

        if Url::parse(&api_base_url).is_err() {
            return Err(ConfigError::InvalidBaseUrl {
                var: BASE_URL_VAR,
                value: api_base_url,
            });
        }

        let node_env = match lookup(NODE_ENV_VAR)
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty())
            .as_deref()
        {
            None | Some("development") => NodeEnv::Development,
            Some("test") => NodeEnv::Test,
            Some("production") => NodeEnv::Production,
            Some(other) => {
                return Err(ConfigError::InvalidNodeEnv {
                    var: NODE_ENV_VAR,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            api_base_url,
            node_env,
        })
    }
}

/// Process-wide configuration, read and validated on first use.
///
/// A failed read is not cached; the next call tries again.
pub fn get_env() -> Result<&'static Env, ConfigError> {
    ENV.get_or_try_init(Env::from_env)
}
