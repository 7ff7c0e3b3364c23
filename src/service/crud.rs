//! Record operations: resolve the table, make one backend call, merge the result into the store.

use crate::api::TableApi;
use crate::error::DatabaseError;
use crate::query::{QueryOptions, RecordQuery};
use crate::response::{CreateRecordsRequest, DeleteRecordsRequest, UpdateRecordRequest};
use crate::schema::TableSchema;
use crate::service::RetryPolicy;
use crate::store::{Fields, TableAction, TableRecord, TableStore};
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub struct FetchedRecords {
    pub table_id: String,
    pub records: Vec<TableRecord>,
    pub total: u64,
    pub next_page_token: Option<String>,
}

/// Result of a single-record create or update.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordPayload {
    pub table_id: String,
    pub record: TableRecord,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreatedRecords {
    pub table_id: String,
    pub records: Vec<TableRecord>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeletedRecord {
    pub table_id: String,
    pub record_id: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeletedRecords {
    pub table_id: String,
    pub record_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FetchedSchema {
    pub table_id: String,
    pub schema: TableSchema,
}

/// The operation set. Reads retry per [`RetryPolicy`]; writes are single attempt.
#[derive(Clone)]
pub struct RecordService {
    api: Arc<dyn TableApi>,
    store: TableStore,
    retry: RetryPolicy,
}

impl RecordService {
    pub fn new(api: Arc<dyn TableApi>, store: TableStore, retry: RetryPolicy) -> Self {
        RecordService { api, store, retry }
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Query a page of records. Retried with backoff; the page replaces the cached one.
    pub async fn fetch_records(
        &self,
        table_name: &str,
        options: &QueryOptions,
    ) -> Result<FetchedRecords, DatabaseError> {
        let table_id = match self.store.resolve_table_id(table_name) {
            Ok(id) => id,
            Err(e) => {
                self.store.dispatch(TableAction::FetchRecordsRejected {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };
        self.store.dispatch(TableAction::FetchRecordsPending);

        let query = RecordQuery::from(options);
        let api = &self.api;
        let id = table_id.as_str();
        let query_ref = &query;
        let result = self
            .retry
            .run("fetch records", || async move { api.query_records(id, query_ref).await })
            .await;

        match result {
            Ok(resp) => {
                tracing::debug!(table = %table_name, count = resp.records.len(), total = resp.total, "records fetched");
                self.store.dispatch(TableAction::FetchRecordsFulfilled {
                    table_id: table_id.clone(),
                    records: resp.records.clone(),
                    total: resp.total,
                    next_page_token: resp.next_page_token.clone(),
                    fetched_at: Utc::now(),
                    query: options.clone(),
                });
                Ok(FetchedRecords {
                    table_id,
                    records: resp.records,
                    total: resp.total,
                    next_page_token: resp.next_page_token,
                })
            }
            Err(e) => {
                self.store.dispatch(TableAction::FetchRecordsRejected {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    pub async fn create_record(&self, table_name: &str, fields: Fields) -> Result<RecordPayload, DatabaseError> {
        let table_id = self.resolve_for_write(table_name)?;
        let body = CreateRecordsRequest::new(vec![fields]);
        let result = self
            .api
            .create_records(&table_id, &body)
            .await
            .and_then(|resp| {
                resp.records
                    .into_iter()
                    .next()
                    .ok_or(DatabaseError::EmptyResponse("create record"))
            });
        let record = self.settle_write(result)?;
        self.store.dispatch(TableAction::RecordCreated {
            table_id: table_id.clone(),
            record: record.clone(),
        });
        Ok(RecordPayload { table_id, record })
    }

    pub async fn create_records(
        &self,
        table_name: &str,
        records: Vec<Fields>,
    ) -> Result<CreatedRecords, DatabaseError> {
        let table_id = self.resolve_for_write(table_name)?;
        let body = CreateRecordsRequest::new(records);
        let result = self
            .api
            .create_records(&table_id, &body)
            .await
            .map(|resp| resp.records);
        let records = self.settle_write(result)?;
        self.store.dispatch(TableAction::RecordsCreated {
            table_id: table_id.clone(),
            records: records.clone(),
        });
        Ok(CreatedRecords { table_id, records })
    }

    pub async fn update_record(
        &self,
        table_name: &str,
        record_id: &str,
        updates: Fields,
    ) -> Result<RecordPayload, DatabaseError> {
        let table_id = self.resolve_for_write(table_name)?;
        let body = UpdateRecordRequest { fields: updates };
        let result = self
            .api
            .update_record(&table_id, record_id, &body)
            .await
            .map(|resp| resp.record);
        let record = self.settle_write(result)?;
        self.store.dispatch(TableAction::RecordUpdated {
            table_id: table_id.clone(),
            record: record.clone(),
        });
        Ok(RecordPayload { table_id, record })
    }

    pub async fn delete_record(&self, table_name: &str, record_id: &str) -> Result<DeletedRecord, DatabaseError> {
        let table_id = self.resolve_for_write(table_name)?;
        let result = self.api.delete_record(&table_id, record_id).await;
        self.settle_write(result)?;
        self.store.dispatch(TableAction::RecordDeleted {
            table_id: table_id.clone(),
            record_id: record_id.to_string(),
        });
        Ok(DeletedRecord {
            table_id,
            record_id: record_id.to_string(),
        })
    }

    pub async fn delete_records(
        &self,
        table_name: &str,
        record_ids: Vec<String>,
    ) -> Result<DeletedRecords, DatabaseError> {
        let table_id = self.resolve_for_write(table_name)?;
        let body = DeleteRecordsRequest {
            ids: record_ids.clone(),
        };
        let result = self.api.delete_records(&table_id, &body).await;
        self.settle_write(result)?;
        self.store.dispatch(TableAction::RecordsDeleted {
            table_id: table_id.clone(),
            record_ids: record_ids.clone(),
        });
        Ok(DeletedRecords { table_id, record_ids })
    }

    /// Fetch the table's schema. Single attempt.
    pub async fn fetch_schema(&self, table_name: &str) -> Result<FetchedSchema, DatabaseError> {
        let table_id = match self.store.resolve_table_id(table_name) {
            Ok(id) => id,
            Err(e) => {
                self.store.dispatch(TableAction::FetchSchemaRejected {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };
        self.store.dispatch(TableAction::FetchSchemaPending);
        match self.api.get_table(&table_id).await {
            Ok(resp) => {
                self.store.dispatch(TableAction::FetchSchemaFulfilled {
                    table_id: table_id.clone(),
                    schema: resp.table.clone(),
                });
                Ok(FetchedSchema {
                    table_id,
                    schema: resp.table,
                })
            }
            Err(e) => {
                self.store.dispatch(TableAction::FetchSchemaRejected {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn resolve_for_write(&self, table_name: &str) -> Result<String, DatabaseError> {
        self.store.resolve_table_id(table_name).map_err(|e| {
            self.store.dispatch(TableAction::WriteRejected {
                message: e.to_string(),
            });
            e
        })
    }

    fn settle_write<T>(&self, result: Result<T, DatabaseError>) -> Result<T, DatabaseError> {
        result.map_err(|e| {
            tracing::debug!(error = %e, "write failed");
            self.store.dispatch(TableAction::WriteRejected {
                message: e.to_string(),
            });
            e
        })
    }
}
