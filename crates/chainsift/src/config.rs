use std::env;

pub const DEFAULT_BITQUERY_ENDPOINT: &str = "https://graphql.bitquery.io";

const API_KEY_VAR: &str = "BITQUERY_API_KEY";
const ENDPOINT_VAR: &str = "BITQUERY_ENDPOINT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing env var: {0}")]
    MissingVar(&'static str),
    #[error("Env var {0} is set but empty")]
    EmptyVar(&'static str),
}

/// Credentials and endpoint for the Bitquery GraphQL API.
#[derive(Clone)]
pub struct BitqueryConfig {
    pub endpoint: String,
    pub api_key: String,
}

impl std::fmt::Debug for BitqueryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitqueryConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl BitqueryConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Reads the configuration from the process environment, loading a
    /// `.env` file first when one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR).ok_or(ConfigError::MissingVar(API_KEY_VAR))?;
        if api_key.trim().is_empty() {
            return Err(ConfigError::EmptyVar(API_KEY_VAR));
        }

        let endpoint = lookup(ENDPOINT_VAR)
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BITQUERY_ENDPOINT.to_string());

        log::info!("{}={}", ENDPOINT_VAR, endpoint);
        Ok(Self::new(endpoint, api_key.trim()))
    }
}
