//! Shared fixtures: a wiremock backend and a `Database` pointed at it.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::time::Duration;
use table_cache_sdk::{Database, DatabaseConfig, RetryPolicy};
use uuid::Uuid;
use wiremock::MockServer;

pub struct Fixture {
    pub server: MockServer,
    pub db: Database,
    pub users_id: String,
    pub orders_id: String,
}

impl Fixture {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let users_id = Uuid::new_v4().to_string();
        let orders_id = Uuid::new_v4().to_string();
        let config = DatabaseConfig::new(server.uri())
            .with_table("users", users_id.clone())
            .with_table("orders", orders_id.clone());
        let db = Database::new(config)
            .expect("valid config")
            .with_retry_policy(RetryPolicy::new(3, Duration::from_millis(5)));
        Fixture {
            server,
            db,
            users_id,
            orders_id,
        }
    }

    pub fn query_path(&self) -> String {
        format!("/table/{}/record/query", self.users_id)
    }

    pub fn records_path(&self) -> String {
        format!("/table/{}/record", self.users_id)
    }

    pub fn table_path(&self) -> String {
        format!("/table/{}", self.users_id)
    }

    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }
}

pub fn record(id: &str, name: &str) -> Value {
    json!({"id": id, "fields": {"name": name}})
}

/// Query response body with records named after their ids.
pub fn page(ids: &[&str], total: u64, next_page_token: Option<&str>) -> Value {
    let records: Vec<Value> = ids.iter().map(|id| record(id, &id.to_uppercase())).collect();
    let mut body = json!({"records": records, "total": total});
    if let Some(token) = next_page_token {
        body["next_page_token"] = json!(token);
    }
    body
}

pub fn schema_body() -> Value {
    json!({
        "table": {
            "id": "users",
            "name": "users",
            "fields": {"items": [
                {"name": "name", "type": "text"},
                {"name": "joined", "type": "date"}
            ]},
            "views": {"items": []}
        }
    })
}

pub fn error_body(code: &str, message: &str) -> Value {
    json!({"error": {"code": code, "message": message, "details": null}})
}
