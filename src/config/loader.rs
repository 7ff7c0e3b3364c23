//! Load config from a JSON document, a JSON file, or the process environment.

use crate::config::DatabaseConfig;
use crate::error::ConfigError;
use std::collections::BTreeMap;
use std::path::Path;

pub const ENV_API_BASE_URL: &str = "API_BASE_URL";
pub const ENV_SAMPLE_TABLES: &str = "SAMPLE_TABLES";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";

impl DatabaseConfig {
    /// Parse `{"API_BASE_URL": "...", "SAMPLE_TABLES": {"name": "id"}}`.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Read and parse a JSON config file.
    pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loading database config");
        Self::from_json_str(&raw)
    }

    /// Read `API_BASE_URL`, `SAMPLE_TABLES` (a JSON object) and optional `REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DatabaseConfig::from_env`] with a caller-supplied variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup(ENV_API_BASE_URL)
            .ok_or_else(|| ConfigError::Load(format!("{} is not set", ENV_API_BASE_URL)))?;
        let tables: BTreeMap<String, String> = match lookup(ENV_SAMPLE_TABLES) {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
                .map_err(|e| ConfigError::Load(format!("{}: {}", ENV_SAMPLE_TABLES, e)))?,
            _ => BTreeMap::new(),
        };
        let request_timeout_secs = match lookup(ENV_REQUEST_TIMEOUT_SECS) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::Load(format!("{} must be a whole number of seconds", ENV_REQUEST_TIMEOUT_SECS))
            })?),
            None => None,
        };
        Ok(DatabaseConfig {
            api_base_url,
            tables,
            request_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    #[test]
    fn test_from_json_str() {
        let config = DatabaseConfig::from_json_str(
            r#"{"API_BASE_URL":"http://localhost:3000","SAMPLE_TABLES":{"users":"table-123","orders":"table-456"}}"#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.table_id("users"), Some("table-123"));
        assert_eq!(config.table_id("orders"), Some("table-456"));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_from_json_str_missing_base_url() {
        let err = DatabaseConfig::from_json_str(r#"{"SAMPLE_TABLES":{}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("API_BASE_URL", "http://api.local"),
            ("SAMPLE_TABLES", r#"{"users":"3f2504e0-4f89-11d3-9a0c-0305e82c3301"}"#),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ]);
        let config = DatabaseConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.api_base_url, "http://api.local");
        assert_eq!(config.tables.len(), 1);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_from_lookup_requires_base_url() {
        let err = DatabaseConfig::from_lookup(|_| None).unwrap_err();
        assert_eq!(err, ConfigError::Load("API_BASE_URL is not set".into()));
    }

    #[test]
    fn test_from_lookup_rejects_bad_tables_json() {
        let err = DatabaseConfig::from_lookup(|k| match k {
            "API_BASE_URL" => Some("http://api.local".into()),
            "SAMPLE_TABLES" => Some("users=abc".into()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Load(m) if m.starts_with("SAMPLE_TABLES")));
    }

    #[tokio::test]
    async fn test_load_from_missing_path() {
        let err = DatabaseConfig::load_from_path("/definitely/not/here.json")
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
