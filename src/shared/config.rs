use crate::shared::errors::{AppError, AppResult};
use std::time::Duration;

pub const API_URL_VAR: &str = "IMPORT_API_URL";
pub const TIMEOUT_VAR: &str = "IMPORT_API_TIMEOUT_SECS";
pub const USER_AGENT_VAR: &str = "IMPORT_API_USER_AGENT";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "import-wizard/0.1";

/// Connection settings for the import service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ImportApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Load from the process environment, reading `.env` first if present
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(API_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AppError::InvalidInput(format!("{} is not set", API_URL_VAR)))?;

        let timeout_secs = match lookup(TIMEOUT_VAR) {
            Some(raw) => raw.trim().parse::<u64>()?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let user_agent = lookup(USER_AGENT_VAR).unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            base_url: normalize_base_url(&base_url),
            timeout: Duration::from_secs(timeout_secs),
            user_agent,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
