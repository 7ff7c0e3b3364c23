//! RecordService against a mock table service: retry, request shapes, store merges.

mod common;

use common::{error_body, page, record, schema_body, Fixture};
use serde_json::json;
use table_cache_sdk::store::LoadingStatus;
use table_cache_sdk::{DatabaseError, Fields, QueryFilter, QueryOptions, QuerySort};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn fields(pairs: &[(&str, serde_json::Value)]) -> Fields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[tokio::test]
async fn test_fetch_recovers_after_two_failures() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path(fx.query_path()))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_body("internal", "boom")))
        .up_to_n_times(2)
        .expect(2)
        .mount(&fx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(fx.query_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["r1", "r2"], 2, None)))
        .expect(1)
        .mount(&fx.server)
        .await;

    let fetched = fx
        .db
        .service()
        .fetch_records("users", &QueryOptions::new())
        .await
        .unwrap();

    assert_eq!(fetched.table_id, fx.users_id);
    assert_eq!(fetched.records.len(), 2);
    fx.db.store().read(|s| {
        assert_eq!(s.table_records("users").len(), 2);
        assert_eq!(s.table_total("users"), 2);
        assert!(s.is_initialized("users"));
        assert_eq!(s.loading.records, LoadingStatus::Idle);
        assert!(s.error().is_none());
    });
}

#[tokio::test]
async fn test_fetch_gives_up_after_three_attempts() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path(fx.query_path()))
        .respond_with(ResponseTemplate::new(503).set_body_json(error_body("unavailable", "try later")))
        .expect(3)
        .mount(&fx.server)
        .await;

    let err = fx
        .db
        .service()
        .fetch_records("users", &QueryOptions::new())
        .await
        .unwrap_err();

    match &err {
        DatabaseError::Status { status, code, message } => {
            assert_eq!(*status, 503);
            assert_eq!(code.as_deref(), Some("unavailable"));
            assert_eq!(message, "try later");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    fx.db.store().read(|s| {
        assert_eq!(s.loading.records, LoadingStatus::Error);
        assert_eq!(s.error(), Some(err.to_string().as_str()));
        assert!(s.table_page("users").is_none());
    });
}

#[tokio::test]
async fn test_unknown_table_sends_no_request() {
    let fx = Fixture::start().await;
    let svc = fx.db.service();

    let err = svc
        .fetch_records("invoices", &QueryOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "table invoices not found");
    assert!(svc.create_record("invoices", Fields::new()).await.is_err());
    assert!(svc.delete_records("invoices", vec!["r1".into()]).await.is_err());
    assert!(svc.fetch_schema("invoices").await.is_err());

    assert_eq!(fx.request_count().await, 0);
}

#[tokio::test]
async fn test_query_body_carries_defaults_and_options() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path(fx.query_path()))
        .and(body_json(json!({"filters": [], "sort": [], "limit": 100, "amount": "all"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["r1"], 1, None)))
        .expect(1)
        .mount(&fx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(fx.query_path()))
        .and(body_partial_json(json!({
            "filters": [{"field": "status", "operator": "eq", "value": "active"}],
            "sort": [{"field": "name", "direction": "desc"}],
            "limit": 10,
            "page_token": "abc",
            "fields": ["name"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["r2"], 1, None)))
        .expect(1)
        .mount(&fx.server)
        .await;

    let svc = fx.db.service();
    svc.fetch_records("users", &QueryOptions::new()).await.unwrap();
    let options = QueryOptions::new()
        .with_filter(QueryFilter::new("status", "eq", "active"))
        .with_sort(QuerySort::desc("name"))
        .with_limit(10)
        .with_page_token("abc")
        .with_fields(["name"]);
    let fetched = svc.fetch_records("users", &options).await.unwrap();
    assert_eq!(fetched.records[0].id, "r2");
    // A fetch replaces the cached page.
    let ids: Vec<String> = fx
        .db
        .store()
        .read(|s| s.table_records("users").iter().map(|r| r.id.clone()).collect());
    assert_eq!(ids, vec!["r2"]);
}

#[tokio::test]
async fn test_writes_are_single_attempt() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path(fx.records_path()))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .expect(1)
        .mount(&fx.server)
        .await;

    let err = fx
        .db
        .service()
        .create_record("users", fields(&[("name", json!("Ada"))]))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "request failed with status 500: database unavailable");
    fx.db.store().read(|s| {
        assert_eq!(s.error(), Some(err.to_string().as_str()));
        assert_eq!(s.loading.records, LoadingStatus::Idle);
    });
}

#[tokio::test]
async fn test_write_round_trip_patches_page() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path(fx.query_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["r1", "r2", "r3"], 3, Some("next"))))
        .mount(&fx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(fx.records_path()))
        .and(body_json(json!({"records": [{"fields": {"name": "Ada"}}]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"records": [record("r4", "Ada")]})))
        .expect(1)
        .mount(&fx.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("{}/r2", fx.records_path())))
        .and(body_json(json!({"fields": {"name": "Grace"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"record": record("r2", "Grace")})))
        .expect(1)
        .mount(&fx.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/r1", fx.records_path())))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&fx.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(fx.records_path()))
        .and(body_json(json!({"ids": ["r3", "r4"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": 2})))
        .expect(1)
        .mount(&fx.server)
        .await;

    let svc = fx.db.service();
    svc.fetch_records("users", &QueryOptions::new()).await.unwrap();
    svc.create_record("users", fields(&[("name", json!("Ada"))]))
        .await
        .unwrap();
    svc.update_record("users", "r2", fields(&[("name", json!("Grace"))]))
        .await
        .unwrap();
    svc.delete_record("users", "r1").await.unwrap();
    svc.delete_records("users", vec!["r3".into(), "r4".into()])
        .await
        .unwrap();

    fx.db.store().read(|s| {
        let page = s.table_page("users").unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "r2");
        assert_eq!(page.items[0].field("name"), Some(&json!("Grace")));
        // Writes do not touch the total or cursor.
        assert_eq!(page.total, 3);
        assert_eq!(page.next_page_token.as_deref(), Some("next"));
    });
}

#[tokio::test]
async fn test_bulk_create_appends_all() {
    let fx = Fixture::start().await;
    Mock::given(method("POST"))
        .and(path(fx.query_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&["r1"], 1, None)))
        .mount(&fx.server)
        .await;
    Mock::given(method("POST"))
        .and(path(fx.records_path()))
        .and(body_json(json!({"records": [
            {"fields": {"name": "A"}},
            {"fields": {"name": "B"}}
        ]})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"records": [record("r2", "A"), record("r3", "B")]})),
        )
        .expect(1)
        .mount(&fx.server)
        .await;

    let svc = fx.db.service();
    svc.fetch_records("users", &QueryOptions::new()).await.unwrap();
    let created = svc
        .create_records(
            "users",
            vec![fields(&[("name", json!("A"))]), fields(&[("name", json!("B"))])],
        )
        .await
        .unwrap();

    assert_eq!(created.records.len(), 2);
    assert_eq!(fx.db.store().read(|s| s.table_records("users").len()), 3);
}

#[tokio::test]
async fn test_schema_is_cached_per_table() {
    let fx = Fixture::start().await;
    Mock::given(method("GET"))
        .and(path(fx.table_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(schema_body()))
        .expect(1)
        .mount(&fx.server)
        .await;

    let fetched = fx.db.service().fetch_schema("users").await.unwrap();

    assert_eq!(fetched.schema.fields.items.len(), 2);
    fx.db.store().read(|s| {
        let schema = s.table_schema("users").unwrap();
        assert!(schema.field("joined").is_some());
        assert!(s.table_schema("orders").is_none());
        assert_eq!(s.loading.schemas, LoadingStatus::Idle);
    });
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let fx = Fixture::start().await;
    Mock::given(method("GET"))
        .and(path(fx.table_path()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&fx.server)
        .await;

    let err = fx.db.service().fetch_schema("users").await.unwrap_err();
    assert!(matches!(err, DatabaseError::Decode(_)), "{err:?}");
}
