use sqlx::SqlitePool;

use crate::models::Measure;

pub struct MeasureRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct MeasureRow {
    id: String,
    name: String,
    abbreviation: String,
}

impl From<MeasureRow> for Measure {
    fn from(row: MeasureRow) -> Self {
        Measure {
            id: row.id,
            name: row.name,
            abbreviation: row.abbreviation,
        }
    }
}

impl MeasureRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn replace_all(&self, measures: &[Measure]) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM measures").execute(&mut *tx).await?;

        for measure in measures {
            sqlx::query("INSERT OR REPLACE INTO measures (id, name, abbreviation) VALUES (?, ?, ?)")
                .bind(&measure.id)
                .bind(&measure.name)
                .bind(&measure.abbreviation)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await
    }

    pub async fn list(&self) -> Result<Vec<Measure>, sqlx::Error> {
        let rows: Vec<MeasureRow> = sqlx::query_as("SELECT * FROM measures ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Measure::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Measure>, sqlx::Error> {
        let row: Option<MeasureRow> = sqlx::query_as("SELECT * FROM measures WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Measure::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_replace_all_drops_previous_rows() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_db(&temp_dir.path().join("test.db")).await.unwrap();
        let repo = MeasureRepository::new(pool);

        repo.replace_all(&[Measure::new("kg", "Kilogram", "kg")])
            .await
            .unwrap();
        repo.replace_all(&[
            Measure::new("u", "Unit", "u"),
            Measure::new("l", "Litre", "l"),
        ])
        .await
        .unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Litre", "Unit"]);
        assert!(repo.get_by_id("kg").await.unwrap().is_none());
        assert_eq!(repo.get_by_id("u").await.unwrap().unwrap().abbreviation, "u");
    }
}
