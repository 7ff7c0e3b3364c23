//! Normalized table state, its reducer and selectors.

use crate::query::QueryOptions;
use crate::schema::TableSchema;
use crate::store::TableAction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Open map of field values inside a record.
pub type Fields = Map<String, Value>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    pub id: String,
    #[serde(default)]
    pub fields: Fields,
}

impl TableRecord {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        TableRecord {
            id: id.into(),
            fields,
        }
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Last fetched page for one table. Replaced wholesale by a fetch, patched in place by writes.
#[derive(Clone, Debug, PartialEq)]
pub struct TableRecordPage {
    pub items: Vec<TableRecord>,
    pub total: u64,
    pub last_updated: DateTime<Utc>,
    pub next_page_token: Option<String>,
    pub query: QueryOptions,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadingStatus {
    #[default]
    Idle,
    Loading,
    Error,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadingState {
    pub tables: LoadingStatus,
    pub records: LoadingStatus,
    pub schemas: LoadingStatus,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableIndex {
    pub by_id: HashMap<String, TableDescriptor>,
    pub by_name: HashMap<String, String>,
    pub all_ids: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaCache {
    pub by_table_id: HashMap<String, TableSchema>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordCache {
    pub by_table_id: HashMap<String, TableRecordPage>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableState {
    pub tables: TableIndex,
    pub schemas: SchemaCache,
    pub records: RecordCache,
    pub loading: LoadingState,
    pub error: Option<String>,
    pub initialized: HashMap<String, bool>,
}

impl TableState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one transition. The only way state changes.
    pub fn apply(&mut self, action: TableAction) {
        match action {
            TableAction::InitializeTables(tables) => {
                for (name, id) in tables {
                    self.tables.by_id.insert(
                        id.clone(),
                        TableDescriptor {
                            id: id.clone(),
                            name: name.clone(),
                        },
                    );
                    self.tables.by_name.insert(name, id.clone());
                    if !self.tables.all_ids.contains(&id) {
                        self.tables.all_ids.push(id.clone());
                    }
                    // initialized only moves back to false through ClearTableData.
                    self.initialized.entry(id).or_insert(false);
                }
            }
            TableAction::FetchRecordsPending => {
                self.loading.records = LoadingStatus::Loading;
                self.error = None;
            }
            TableAction::FetchRecordsFulfilled {
                table_id,
                records,
                total,
                next_page_token,
                fetched_at,
                query,
            } => {
                self.records.by_table_id.insert(
                    table_id.clone(),
                    TableRecordPage {
                        items: records,
                        total,
                        last_updated: fetched_at,
                        next_page_token,
                        query,
                    },
                );
                self.initialized.insert(table_id, true);
                self.loading.records = LoadingStatus::Idle;
                self.error = None;
            }
            TableAction::FetchRecordsRejected { message } => {
                self.loading.records = LoadingStatus::Error;
                self.error = Some(message);
            }
            TableAction::FetchSchemaPending => {
                self.loading.schemas = LoadingStatus::Loading;
                self.error = None;
            }
            TableAction::FetchSchemaFulfilled { table_id, schema } => {
                self.schemas.by_table_id.insert(table_id, schema);
                self.loading.schemas = LoadingStatus::Idle;
                self.error = None;
            }
            TableAction::FetchSchemaRejected { message } => {
                self.loading.schemas = LoadingStatus::Error;
                self.error = Some(message);
            }
            TableAction::RecordCreated { table_id, record } => {
                if let Some(page) = self.records.by_table_id.get_mut(&table_id) {
                    page.items.push(record);
                }
            }
            TableAction::RecordsCreated { table_id, records } => {
                if let Some(page) = self.records.by_table_id.get_mut(&table_id) {
                    page.items.extend(records);
                }
            }
            TableAction::RecordUpdated { table_id, record } => {
                if let Some(page) = self.records.by_table_id.get_mut(&table_id) {
                    if let Some(slot) = page.items.iter_mut().find(|r| r.id == record.id) {
                        *slot = record;
                    }
                }
            }
            TableAction::RecordDeleted { table_id, record_id } => {
                if let Some(page) = self.records.by_table_id.get_mut(&table_id) {
                    page.items.retain(|r| r.id != record_id);
                }
            }
            TableAction::RecordsDeleted {
                table_id,
                record_ids,
            } => {
                if let Some(page) = self.records.by_table_id.get_mut(&table_id) {
                    let doomed: HashSet<&str> = record_ids.iter().map(String::as_str).collect();
                    page.items.retain(|r| !doomed.contains(r.id.as_str()));
                }
            }
            TableAction::WriteRejected { message } => {
                self.error = Some(message);
            }
            TableAction::ClearTableData { table_id } => {
                self.records.by_table_id.remove(&table_id);
                if self.initialized.contains_key(&table_id) {
                    self.initialized.insert(table_id, false);
                }
            }
        }
    }

    pub fn table_id(&self, table_name: &str) -> Option<&str> {
        self.tables.by_name.get(table_name).map(String::as_str)
    }

    pub fn table_page(&self, table_name: &str) -> Option<&TableRecordPage> {
        self.table_id(table_name)
            .and_then(|id| self.records.by_table_id.get(id))
    }

    /// Cached records for a table; empty when the name is unknown or nothing was fetched.
    pub fn table_records(&self, table_name: &str) -> &[TableRecord] {
        self.table_page(table_name)
            .map(|p| p.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn table_total(&self, table_name: &str) -> u64 {
        self.table_page(table_name).map(|p| p.total).unwrap_or(0)
    }

    pub fn table_schema(&self, table_name: &str) -> Option<&TableSchema> {
        self.table_id(table_name)
            .and_then(|id| self.schemas.by_table_id.get(id))
    }

    pub fn is_initialized(&self, table_name: &str) -> bool {
        self.table_id(table_name)
            .and_then(|id| self.initialized.get(id).copied())
            .unwrap_or(false)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.records == LoadingStatus::Loading
    }

    pub fn schema_loading(&self) -> bool {
        self.loading.schemas == LoadingStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
