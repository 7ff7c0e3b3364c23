//! Table-state store: owns [`TableState`] and applies [`TableAction`]s atomically.
//! Readers go through [`TableStore::read`] or a [`watch`] subscription; nothing else writes.

mod action;
mod state;

pub use action::TableAction;
pub use state::*;

use crate::error::DatabaseError;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone)]
pub struct TableStore {
    tx: Arc<watch::Sender<TableState>>,
}

impl Default for TableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TableStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(TableState::default());
        TableStore { tx: Arc::new(tx) }
    }

    /// Seed the table index from a name -> id map.
    pub fn initialize_tables(&self, tables: &BTreeMap<String, String>) {
        self.dispatch(TableAction::InitializeTables(tables.clone()));
    }

    /// Apply one transition and notify subscribers.
    pub fn dispatch(&self, action: TableAction) {
        tracing::trace!(action = ?action, "dispatch");
        self.tx.send_modify(|state| state.apply(action));
    }

    /// Run a selector against the current state. Do not hold the result across an await.
    pub fn read<R>(&self, f: impl FnOnce(&TableState) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn snapshot(&self) -> TableState {
        self.tx.borrow().clone()
    }

    /// Receiver that observes every committed transition.
    pub fn subscribe(&self) -> watch::Receiver<TableState> {
        self.tx.subscribe()
    }

    /// Resolve a table name to its id or fail with [`DatabaseError::UnknownTable`].
    pub fn resolve_table_id(&self, table_name: &str) -> Result<String, DatabaseError> {
        self.read(|s| s.table_id(table_name).map(str::to_string))
            .ok_or_else(|| DatabaseError::UnknownTable(table_name.to_string()))
    }

    /// Drop the cached page and reset `initialized` for a table; the next load re-fetches.
    pub fn clear_table_data(&self, table_name: &str) -> Result<(), DatabaseError> {
        let table_id = self.resolve_table_id(table_name)?;
        self.dispatch(TableAction::ClearTableData { table_id });
        Ok(())
    }
}
