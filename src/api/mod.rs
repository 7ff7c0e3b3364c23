//! Transport seam: one method per backend endpoint. [`HttpTableApi`] is the reqwest implementation.

mod http;

pub use http::HttpTableApi;

use crate::error::DatabaseError;
use crate::query::RecordQuery;
use crate::response::{
    CreateRecordsRequest, CreateRecordsResponse, DeleteRecordsRequest, QueryResponse, TableResponse,
    UpdateRecordRequest, UpdateRecordResponse,
};
use async_trait::async_trait;

#[async_trait]
pub trait TableApi: Send + Sync {
    /// `POST /table/{id}/record/query`
    async fn query_records(&self, table_id: &str, query: &RecordQuery) -> Result<QueryResponse, DatabaseError>;

    /// `POST /table/{id}/record`
    async fn create_records(
        &self,
        table_id: &str,
        body: &CreateRecordsRequest,
    ) -> Result<CreateRecordsResponse, DatabaseError>;

    /// `PATCH /table/{id}/record/{recordId}`
    async fn update_record(
        &self,
        table_id: &str,
        record_id: &str,
        body: &UpdateRecordRequest,
    ) -> Result<UpdateRecordResponse, DatabaseError>;

    /// `DELETE /table/{id}/record/{recordId}`
    async fn delete_record(&self, table_id: &str, record_id: &str) -> Result<(), DatabaseError>;

    /// `DELETE /table/{id}/record`
    async fn delete_records(&self, table_id: &str, body: &DeleteRecordsRequest) -> Result<(), DatabaseError>;

    /// `GET /table/{id}`
    async fn get_table(&self, table_id: &str) -> Result<TableResponse, DatabaseError>;
}
