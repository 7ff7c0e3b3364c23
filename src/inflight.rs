//! Cooperative per-table in-flight flags, released on drop.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Records,
    Schema,
}

type Key = (ResourceKind, String);

/// Shared set of `(kind, table_id)` loads currently running. Cloning shares the set.
#[derive(Clone, Debug, Default)]
pub struct InFlight {
    active: Arc<Mutex<HashSet<Key>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `(kind, table_id)`. `None` when another load holds it.
    pub fn try_acquire(&self, kind: ResourceKind, table_id: &str) -> Option<InFlightGuard> {
        let key = (kind, table_id.to_string());
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard {
            active: Arc::clone(&self.active),
            key,
        })
    }

    pub fn is_active(&self, kind: ResourceKind, table_id: &str) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(kind, table_id.to_string()))
    }
}

#[derive(Debug)]
pub struct InFlightGuard {
    active: Arc<Mutex<HashSet<Key>>>,
    key: Key,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
