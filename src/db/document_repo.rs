use serde_json::Value;
use sqlx::SqlitePool;

use crate::models::TableKey;

/// Raw JSON documents of collections without a dedicated table.
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Replace the cached copy of `collection`.
    ///
    /// Documents are keyed by their `id` field; documents without one are
    /// keyed by their position in `documents`.
    pub async fn replace_collection(
        &self,
        collection: TableKey,
        documents: &[Value],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM documents WHERE collection = ?")
            .bind(collection.collection())
            .execute(&mut *tx)
            .await?;

        for (index, document) in documents.iter().enumerate() {
            let id = match document.get("id") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => index.to_string(),
            };
            sqlx::query("INSERT OR REPLACE INTO documents (collection, id, body) VALUES (?, ?, ?)")
                .bind(collection.collection())
                .bind(&id)
                .bind(document.to_string())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await
    }

    pub async fn list(&self, collection: TableKey) -> Result<Vec<Value>, sqlx::Error> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT body FROM documents WHERE collection = ? ORDER BY id")
                .bind(collection.collection())
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|(body,)| {
                serde_json::from_str(&body).map_err(|e| sqlx::Error::Decode(Box::new(e)))
            })
            .collect()
    }

    pub async fn count(&self, collection: TableKey) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM documents WHERE collection = ?")
            .bind(collection.collection())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_replace_collection_is_scoped() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("test.db")).await.unwrap();
        let repo = DocumentRepository::new(pool);

        repo.replace_collection(TableKey::News, &[json!({"id": "n1", "title": "Hello"})])
            .await
            .unwrap();
        repo.replace_collection(
            TableKey::Products,
            &[json!({"id": "p1", "name": "Leeks"}), json!({"name": "No id"})],
        )
        .await
        .unwrap();
        repo.replace_collection(TableKey::Products, &[json!({"id": 7, "name": "Kale"})])
            .await
            .unwrap();

        assert_eq!(repo.count(TableKey::News).await.unwrap(), 1);
        let products = repo.list(TableKey::Products).await.unwrap();
        assert_eq!(products, vec![json!({"id": 7, "name": "Kale"})]);
    }
}
