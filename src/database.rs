//! Composition root: config, transport, store and the shared in-flight set.

use crate::api::{HttpTableApi, TableApi};
use crate::config::{ConfigHolder, DatabaseConfig};
use crate::error::DatabaseError;
use crate::handle::TableHandle;
use crate::inflight::InFlight;
use crate::query::QueryOptions;
use crate::service::{RecordService, RetryPolicy};
use crate::store::TableStore;
use std::sync::Arc;

/// Cheap to clone; clones share the store and in-flight set.
#[derive(Clone)]
pub struct Database {
    config: Arc<DatabaseConfig>,
    api: Arc<dyn TableApi>,
    service: RecordService,
    in_flight: InFlight,
}

impl Database {
    /// Validate `config` and connect over HTTP with the default retry policy.
    pub fn new(config: DatabaseConfig) -> Result<Self, DatabaseError> {
        config.validate()?;
        let api = HttpTableApi::from_config(&config)?;
        tracing::info!(base_url = %api.base_url(), tables = config.tables.len(), "database configured");
        Ok(Self::with_api(config, Arc::new(api), RetryPolicy::default()))
    }

    /// Build from the process-wide holder. Fails with `NotConfigured` when nothing was set.
    pub fn from_holder(holder: &ConfigHolder) -> Result<Self, DatabaseError> {
        let config = holder.get()?;
        Self::new(DatabaseConfig::clone(&config))
    }

    /// Use a custom transport. The config is taken as-is.
    pub fn with_api(config: DatabaseConfig, api: Arc<dyn TableApi>, retry: RetryPolicy) -> Self {
        let store = TableStore::new();
        store.initialize_tables(&config.tables);
        Database {
            config: Arc::new(config),
            service: RecordService::new(Arc::clone(&api), store, retry),
            api,
            in_flight: InFlight::new(),
        }
    }

    /// Replace the retry policy; the store and in-flight set are kept.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.service = RecordService::new(Arc::clone(&self.api), self.service.store().clone(), retry);
        self
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn store(&self) -> &TableStore {
        self.service.store()
    }

    pub fn service(&self) -> &RecordService {
        &self.service
    }

    /// Handle for one table. `initial_options` drive `ensure_loaded` and `refresh(None)`.
    pub fn table(&self, table_name: &str, initial_options: Option<QueryOptions>) -> TableHandle {
        TableHandle::new(
            table_name,
            self.service.clone(),
            self.in_flight.clone(),
            initial_options,
        )
    }

    pub fn clear_table_data(&self, table_name: &str) -> Result<(), DatabaseError> {
        self.store().clear_table_data(table_name)
    }
}
