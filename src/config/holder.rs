//! Configuration holder owned by the composition root. Last writer wins.

use crate::config::DatabaseConfig;
use crate::error::ConfigError;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Clone, Default)]
pub struct ConfigHolder {
    current: Arc<RwLock<Option<Arc<DatabaseConfig>>>>,
}

impl ConfigHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the configuration unconditionally.
    pub fn set(&self, config: DatabaseConfig) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(config));
    }

    /// Validate, then replace. On failure the previous configuration stays in place.
    pub fn set_validated(&self, config: DatabaseConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.set(config);
        Ok(())
    }

    pub fn get(&self) -> Result<Arc<DatabaseConfig>, ConfigError> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ConfigError::NotConfigured)
    }

    pub fn is_set(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
