//! Per-table facade: cached reads plus operations that report failures instead of returning them.

use crate::error::DatabaseError;
use crate::inflight::{InFlight, ResourceKind};
use crate::query::QueryOptions;
use crate::schema::TableSchema;
use crate::service::{
    CreatedRecords, DeletedRecord, DeletedRecords, FetchedRecords, FetchedSchema, RecordPayload,
    RecordService,
};
use crate::store::{Fields, TableRecord, TableState, TableStore};
use chrono::{DateTime, Utc};
use tokio::sync::watch;

/// Page size used by the initial load and by [`TableHandle::fetch_next_page`].
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Receives a failed operation's error in place of a `Result`.
pub type ErrorCallback<'a> = dyn Fn(&DatabaseError) + Send + Sync + 'a;

#[derive(Clone)]
pub struct TableHandle {
    name: String,
    service: RecordService,
    in_flight: InFlight,
    initial_options: QueryOptions,
}

impl TableHandle {
    pub(crate) fn new(
        name: impl Into<String>,
        service: RecordService,
        in_flight: InFlight,
        initial_options: Option<QueryOptions>,
    ) -> Self {
        let mut initial_options = initial_options.unwrap_or_default();
        if initial_options.limit.is_none() {
            initial_options.limit = Some(DEFAULT_PAGE_SIZE);
        }
        TableHandle {
            name: name.into(),
            service,
            in_flight,
            initial_options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn store(&self) -> &TableStore {
        self.service.store()
    }

    pub fn table_id(&self) -> Option<String> {
        self.store()
            .read(|s| s.table_id(&self.name).map(str::to_string))
    }

    pub fn records(&self) -> Vec<TableRecord> {
        self.store().read(|s| s.table_records(&self.name).to_vec())
    }

    pub fn schema(&self) -> Option<TableSchema> {
        self.store().read(|s| s.table_schema(&self.name).cloned())
    }

    pub fn is_loading(&self) -> bool {
        self.store().read(TableState::is_loading)
    }

    pub fn schema_loading(&self) -> bool {
        self.store().read(TableState::schema_loading)
    }

    pub fn error(&self) -> Option<String> {
        self.store().read(|s| s.error().map(str::to_string))
    }

    pub fn next_page_token(&self) -> Option<String> {
        self.store()
            .read(|s| s.table_page(&self.name).and_then(|p| p.next_page_token.clone()))
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.store()
            .read(|s| s.table_page(&self.name).map(|p| p.last_updated))
    }

    pub fn total(&self) -> u64 {
        self.store().read(|s| s.table_total(&self.name))
    }

    pub fn is_initialized(&self) -> bool {
        self.store().read(|s| s.is_initialized(&self.name))
    }

    /// Change feed over the whole store; pair with the getters above to re-read.
    pub fn subscribe(&self) -> watch::Receiver<TableState> {
        self.store().subscribe()
    }

    /// Fetch whatever is missing: the schema if absent, the first page if never loaded.
    /// Both run concurrently; loads already in flight for this table are not repeated.
    pub async fn ensure_loaded(&self, on_error: Option<&ErrorCallback<'_>>) {
        let (need_schema, need_records) = self.store().read(|s| {
            (
                s.table_schema(&self.name).is_none(),
                !s.is_initialized(&self.name),
            )
        });
        let schema = async {
            if need_schema {
                self.load_schema(on_error).await;
            }
        };
        let records = async {
            if need_records {
                self.load_records(self.initial_options.clone(), on_error)
                    .await;
            }
        };
        tokio::join!(schema, records);
    }

    /// Re-fetch records with `options` (the handle's initial options when `None`).
    pub async fn refresh(
        &self,
        options: Option<QueryOptions>,
        on_error: Option<&ErrorCallback<'_>>,
    ) -> Option<FetchedRecords> {
        let options = options.unwrap_or_else(|| self.initial_options.clone());
        self.load_records(options, on_error).await
    }

    /// Fetch the page after the cached one with the query that produced it. No-op without a
    /// token or while a load runs.
    pub async fn fetch_next_page(&self, on_error: Option<&ErrorCallback<'_>>) -> Option<FetchedRecords> {
        let (token, query) = self.store().read(|s| {
            s.table_page(&self.name)
                .and_then(|p| Some((p.next_page_token.clone()?, p.query.clone())))
        })?;
        let options = query.with_page_token(token).with_limit(DEFAULT_PAGE_SIZE);
        self.load_records(options, on_error).await
    }

    pub async fn add_record(&self, fields: Fields, on_error: Option<&ErrorCallback<'_>>) -> Option<RecordPayload> {
        let result = self.service.create_record(&self.name, fields).await;
        self.settle("add record", result, on_error)
    }

    pub async fn modify_record(
        &self,
        record_id: &str,
        updates: Fields,
        on_error: Option<&ErrorCallback<'_>>,
    ) -> Option<RecordPayload> {
        let result = self
            .service
            .update_record(&self.name, record_id, updates)
            .await;
        self.settle("modify record", result, on_error)
    }

    pub async fn remove_record(&self, record_id: &str, on_error: Option<&ErrorCallback<'_>>) -> Option<DeletedRecord> {
        let result = self.service.delete_record(&self.name, record_id).await;
        self.settle("remove record", result, on_error)
    }

    pub async fn add_records(
        &self,
        records: Vec<Fields>,
        on_error: Option<&ErrorCallback<'_>>,
    ) -> Option<CreatedRecords> {
        let result = self.service.create_records(&self.name, records).await;
        self.settle("add records", result, on_error)
    }

    pub async fn remove_records(
        &self,
        record_ids: Vec<String>,
        on_error: Option<&ErrorCallback<'_>>,
    ) -> Option<DeletedRecords> {
        let result = self.service.delete_records(&self.name, record_ids).await;
        self.settle("remove records", result, on_error)
    }

    async fn load_records(&self, options: QueryOptions, on_error: Option<&ErrorCallback<'_>>) -> Option<FetchedRecords> {
        let Some(_guard) = self
            .in_flight
            .try_acquire(ResourceKind::Records, &self.flight_key())
        else {
            tracing::debug!(table = %self.name, "records load already in flight");
            return None;
        };
        let result = self.service.fetch_records(&self.name, &options).await;
        self.settle("fetch records", result, on_error)
    }

    async fn load_schema(&self, on_error: Option<&ErrorCallback<'_>>) -> Option<FetchedSchema> {
        let Some(_guard) = self
            .in_flight
            .try_acquire(ResourceKind::Schema, &self.flight_key())
        else {
            tracing::debug!(table = %self.name, "schema load already in flight");
            return None;
        };
        let result = self.service.fetch_schema(&self.name).await;
        self.settle("fetch schema", result, on_error)
    }

    // Unknown names still get a key so their (failing) loads are not stacked.
    fn flight_key(&self) -> String {
        self.table_id().unwrap_or_else(|| self.name.clone())
    }

    fn settle<T>(
        &self,
        what: &'static str,
        result: Result<T, DatabaseError>,
        on_error: Option<&ErrorCallback<'_>>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                match on_error {
                    Some(callback) => callback(&e),
                    None => tracing::error!(table = %self.name, op = what, error = %e, "table operation failed"),
                }
                None
            }
        }
    }
}
