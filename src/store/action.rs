//! Closed set of transitions the table-state store accepts.

use crate::query::QueryOptions;
use crate::schema::TableSchema;
use crate::store::TableRecord;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub enum TableAction {
    /// Seed the table index from a name -> id map.
    InitializeTables(BTreeMap<String, String>),
    FetchRecordsPending,
    FetchRecordsFulfilled {
        table_id: String,
        records: Vec<TableRecord>,
        total: u64,
        next_page_token: Option<String>,
        fetched_at: DateTime<Utc>,
        /// Options the page was fetched with; the next page repeats them.
        query: QueryOptions,
    },
    FetchRecordsRejected {
        message: String,
    },
    FetchSchemaPending,
    FetchSchemaFulfilled {
        table_id: String,
        schema: TableSchema,
    },
    FetchSchemaRejected {
        message: String,
    },
    RecordCreated {
        table_id: String,
        record: TableRecord,
    },
    RecordsCreated {
        table_id: String,
        records: Vec<TableRecord>,
    },
    RecordUpdated {
        table_id: String,
        record: TableRecord,
    },
    RecordDeleted {
        table_id: String,
        record_id: String,
    },
    RecordsDeleted {
        table_id: String,
        record_ids: Vec<String>,
    },
    /// A create/update/delete failed. Writes have no loading flag; only the error is recorded.
    WriteRejected {
        message: String,
    },
    /// Drop the cached page and reset `initialized` so the next `ensure_loaded` re-fetches.
    ClearTableData {
        table_id: String,
    },
}
