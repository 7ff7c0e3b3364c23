//! RecordService: table operations over a [`crate::api::TableApi`], merged into the store.

mod crud;
mod retry;

pub use crud::{
    CreatedRecords, DeletedRecord, DeletedRecords, FetchedRecords, FetchedSchema, RecordPayload,
    RecordService,
};
pub use retry::RetryPolicy;
