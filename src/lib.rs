//! Table Cache SDK: configuration-driven client and normalized cache for a remote table service.

pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod fields;
pub mod handle;
pub mod inflight;
pub mod query;
pub mod response;
pub mod schema;
pub mod service;
pub mod store;

pub use api::{HttpTableApi, TableApi};
pub use config::{ConfigHolder, DatabaseConfig};
pub use database::Database;
pub use error::{ConfigError, DatabaseError};
pub use fields::format_field_value;
pub use handle::{ErrorCallback, TableHandle, DEFAULT_PAGE_SIZE};
pub use query::{Amount, QueryFilter, QueryOptions, QuerySort, SortDirection, DEFAULT_QUERY_LIMIT};
pub use schema::{FieldType, TableField, TableSchema};
pub use service::{RecordService, RetryPolicy};
pub use store::{Fields, TableAction, TableRecord, TableState, TableStore};
