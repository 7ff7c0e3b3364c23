//! Raw config types matching the provider JSON (`API_BASE_URL`, `SAMPLE_TABLES`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default per-request timeout when the config does not set one.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Base URL of the table service, e.g. `https://api.example.com/db`.
    #[serde(rename = "API_BASE_URL")]
    pub api_base_url: String,
    /// Human-readable table name -> table id.
    #[serde(rename = "SAMPLE_TABLES", default)]
    pub tables: BTreeMap<String, String>,
    #[serde(
        rename = "REQUEST_TIMEOUT_SECS",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub request_timeout_secs: Option<u64>,
}

impl DatabaseConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        DatabaseConfig {
            api_base_url: api_base_url.into(),
            tables: BTreeMap::new(),
            request_timeout_secs: None,
        }
    }

    /// Builder-style table registration.
    pub fn with_table(mut self, name: impl Into<String>, id: impl Into<String>) -> Self {
        self.tables.insert(name.into(), id.into());
        self
    }

    pub fn table_id(&self, name: &str) -> Option<&str> {
        self.tables.get(name).map(String::as_str)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}
