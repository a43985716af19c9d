use anyhow::{bail, Result};
use education_service::EducationConfig;
use progress_tracker::BadgePolicy;
use std::env;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Process settings read from the environment (after `.env` is loaded)
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Persistence is disabled when unset
    pub database_url: Option<String>,
    /// JSON file with `EducationConfig` overrides
    pub config_path: Option<String>,
    /// Overrides the policy from the config file when set
    pub badge_policy: Option<BadgePolicy>,
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(non_empty)
    }

    /// Builds the config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let badge_policy = match lookup("BADGE_POLICY") {
            Some(raw) => match BadgePolicy::parse(&raw) {
                Some(policy) => Some(policy),
                None => bail!(
                    "BADGE_POLICY must be 'return_all' or 'exclude_existing'; received '{}'",
                    raw
                ),
            },
            None => None,
        };

        Ok(Self {
            bind_addr: lookup("EDUCATION_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            database_url: lookup("DATABASE_URL"),
            config_path: lookup("EDUCATION_CONFIG_PATH"),
            badge_policy,
        })
    }

    pub fn education_config(&self) -> Result<EducationConfig> {
        let config = match &self.config_path {
            Some(path) => EducationConfig::from_json_file(path)?,
            None => EducationConfig::default(),
        };
        Ok(match self.badge_policy {
            Some(policy) => config.with_badge_policy(policy),
            None => config,
        })
    }
}
