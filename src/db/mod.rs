//! Local SQLite cache: order lines, measures, catalog documents and
//! preferences (including per-table last-sync timestamps).

mod document_repo;
mod measure_repo;
mod order_line_repo;
mod preferences;

pub use document_repo::DocumentRepository;
pub use measure_repo::MeasureRepository;
pub use order_line_repo::OrderLineRepository;
pub use preferences::PreferenceStore;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations
pub async fn init_db(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite:{}?mode=rwc", path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::debug!("Opened local cache at {}", path.display());

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_init_db_creates_tables() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("test.db");

        let pool = init_db(&db_path).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert!(table_names.contains(&"order_lines"));
        assert!(table_names.contains(&"measures"));
        assert!(table_names.contains(&"documents"));
        assert!(table_names.contains(&"preferences"));
    }
}
