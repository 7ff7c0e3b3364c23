//! Config validation: base URL presence and UUID-shaped table ids.

use crate::config::DatabaseConfig;
use crate::error::ConfigError;
use regex::Regex;
use std::sync::OnceLock;

const UUID_PATTERN: &str = r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$";

fn uuid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(UUID_PATTERN).unwrap_or_else(|e| panic!("uuid pattern: {}", e)))
}

/// True for the hyphenated textual UUID form (`xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`), any case.
pub fn is_valid_uuid(value: &str) -> bool {
    uuid_regex().is_match(value)
}

/// Reject a config that would fail on first use. Runs before any network call.
pub fn validate(config: &DatabaseConfig) -> Result<(), ConfigError> {
    if config.api_base_url.trim().is_empty() {
        return Err(ConfigError::Validation("API_BASE_URL must not be empty".into()));
    }
    for (name, id) in &config.tables {
        if !is_valid_uuid(id) {
            return Err(ConfigError::InvalidTableId {
                name: name.clone(),
                id: id.clone(),
            });
        }
    }
    Ok(())
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self)
    }
}
