//! Request and response bodies exchanged with the table service.

use crate::schema::TableSchema;
use crate::store::{Fields, TableRecord};
use serde::{Deserialize, Serialize};

/// `POST /table/{id}/record/query` response.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub records: Vec<TableRecord>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewRecord {
    pub fields: Fields,
}

/// `POST /table/{id}/record` body: every record wrapped as `{fields}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateRecordsRequest {
    pub records: Vec<NewRecord>,
}

impl CreateRecordsRequest {
    pub fn new(records: Vec<Fields>) -> Self {
        CreateRecordsRequest {
            records: records.into_iter().map(|fields| NewRecord { fields }).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CreateRecordsResponse {
    #[serde(default)]
    pub records: Vec<TableRecord>,
}

/// `PATCH /table/{id}/record/{recordId}` body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UpdateRecordRequest {
    pub fields: Fields,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UpdateRecordResponse {
    pub record: TableRecord,
}

/// `DELETE /table/{id}/record` body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeleteRecordsRequest {
    pub ids: Vec<String>,
}

/// `GET /table/{id}` response; the schema sits under `table`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TableResponse {
    pub table: TableSchema,
}
