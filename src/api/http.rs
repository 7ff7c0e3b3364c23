//! JSON-over-HTTP client bound to the configured base URL.

use crate::api::TableApi;
use crate::config::DatabaseConfig;
use crate::error::DatabaseError;
use crate::query::RecordQuery;
use crate::response::{
    CreateRecordsRequest, CreateRecordsResponse, DeleteRecordsRequest, QueryResponse, TableResponse,
    UpdateRecordRequest, UpdateRecordResponse,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct HttpTableApi {
    client: Client,
    base_url: String,
}

impl HttpTableApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DatabaseError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing reqwest client (shared connection pool, custom headers).
    pub fn with_client(client: Client, base_url: &str) -> Self {
        HttpTableApi {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, method: &'static str, path: &str, req: RequestBuilder) -> Result<Response, DatabaseError> {
        tracing::debug!(method, path = %path, "request");
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(method, path = %path, status = status.as_u16(), "request failed");
        Err(DatabaseError::from_status(status.as_u16(), &body))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: &str,
        req: RequestBuilder,
    ) -> Result<T, DatabaseError> {
        let resp = self.send(method, path, req).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| DatabaseError::Decode(format!("{} {}: {}", method, path, e)))
    }
}

#[async_trait]
impl TableApi for HttpTableApi {
    async fn query_records(&self, table_id: &str, query: &RecordQuery) -> Result<QueryResponse, DatabaseError> {
        let path = format!("/table/{}/record/query", table_id);
        let req = self.client.post(self.url(&path)).json(query);
        self.send_json("POST", &path, req).await
    }

    async fn create_records(
        &self,
        table_id: &str,
        body: &CreateRecordsRequest,
    ) -> Result<CreateRecordsResponse, DatabaseError> {
        let path = format!("/table/{}/record", table_id);
        let req = self.client.post(self.url(&path)).json(body);
        self.send_json("POST", &path, req).await
    }

    async fn update_record(
        &self,
        table_id: &str,
        record_id: &str,
        body: &UpdateRecordRequest,
    ) -> Result<UpdateRecordResponse, DatabaseError> {
        let path = format!("/table/{}/record/{}", table_id, record_id);
        let req = self.client.patch(self.url(&path)).json(body);
        self.send_json("PATCH", &path, req).await
    }

    async fn delete_record(&self, table_id: &str, record_id: &str) -> Result<(), DatabaseError> {
        let path = format!("/table/{}/record/{}", table_id, record_id);
        let req = self.client.delete(self.url(&path));
        self.send("DELETE", &path, req).await?;
        Ok(())
    }

    async fn delete_records(&self, table_id: &str, body: &DeleteRecordsRequest) -> Result<(), DatabaseError> {
        let path = format!("/table/{}/record", table_id);
        let req = self.client.delete(self.url(&path)).json(body);
        self.send("DELETE", &path, req).await?;
        Ok(())
    }

    async fn get_table(&self, table_id: &str) -> Result<TableResponse, DatabaseError> {
        let path = format!("/table/{}", table_id);
        let req = self.client.get(self.url(&path));
        self.send_json("GET", &path, req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let api = HttpTableApi::new("http://localhost:3000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:3000/api");
        assert_eq!(api.url("/table/t1"), "http://localhost:3000/api/table/t1");
    }

    #[test]
    fn test_from_config() {
        let config = DatabaseConfig::new("http://db.local");
        let api = HttpTableApi::from_config(&config).unwrap();
        assert_eq!(api.base_url(), "http://db.local");
    }
}
