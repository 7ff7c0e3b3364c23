//! Example consumer: a separate Rust project that uses table-cache-sdk as a dependency.
//!
//! Needs `API_BASE_URL` and `SAMPLE_TABLES` (JSON object of name -> table id) in the
//! environment or a `.env` file. Run from repo root: `cargo run -p example-consumer`

use table_cache_sdk::{format_field_value, ConfigHolder, Database, DatabaseConfig, DatabaseError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("table_cache_sdk=info")),
        )
        .init();

    let holder = ConfigHolder::new();
    holder.set_validated(DatabaseConfig::from_env()?)?;
    let db = Database::from_holder(&holder)?;

    let Some(table_name) = db.config().table_names().next().map(str::to_string) else {
        tracing::warn!("SAMPLE_TABLES is empty; nothing to load");
        return Ok(());
    };
    let table = db.table(&table_name, None);
    let report = |e: &DatabaseError| tracing::error!(table = %table_name, error = %e, "load failed");
    table.ensure_loaded(Some(&report)).await;

    let schema = table.schema();
    println!("{} ({} of {} records)", table_name, table.records().len(), table.total());
    for record in table.records() {
        let cells: Vec<String> = match &schema {
            Some(schema) => schema
                .visible_fields()
                .map(|f| {
                    let value = record.field(f.record_key()).cloned().unwrap_or_default();
                    format!("{}={}", f.name, format_field_value(&value, Some(f)))
                })
                .collect(),
            None => record
                .fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, format_field_value(v, None)))
                .collect(),
        };
        println!("  {}: {}", record.id, cells.join(" | "));
    }
    if let Some(token) = table.next_page_token() {
        tracing::info!(next_page_token = %token, "more records available");
    }
    Ok(())
}
