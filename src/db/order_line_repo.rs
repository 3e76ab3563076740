use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::models::{ContainerType, OrderLine};

pub struct OrderLineRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct OrderLineRow {
    order_id: String,
    user_id: String,
    week: i64,
    product_id: String,
    quantity: f64,
    container: String,
    updated_at: String,
}

impl OrderLineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, line: &OrderLine) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO order_lines (order_id, user_id, week, product_id, quantity, container, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(order_id, product_id) DO UPDATE SET
                user_id = excluded.user_id,
                week = excluded.week,
                quantity = excluded.quantity,
                container = excluded.container,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&line.order_id)
        .bind(&line.user_id)
        .bind(line.week as i64)
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(line.container.key())
        .bind(line.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get(
        &self,
        order_id: &str,
        product_id: &str,
    ) -> Result<Option<OrderLine>, sqlx::Error> {
        let row: Option<OrderLineRow> =
            sqlx::query_as("SELECT * FROM order_lines WHERE order_id = ? AND product_id = ?")
                .bind(order_id)
                .bind(product_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(row_to_order_line).transpose()
    }

    pub async fn list_for_user_week(
        &self,
        user_id: &str,
        week: u32,
    ) -> Result<Vec<OrderLine>, sqlx::Error> {
        let rows: Vec<OrderLineRow> = sqlx::query_as(
            "SELECT * FROM order_lines WHERE user_id = ? AND week = ? ORDER BY order_id, product_id",
        )
        .bind(user_id)
        .bind(week as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_order_line).collect()
    }

    pub async fn list_for_order(&self, order_id: &str) -> Result<Vec<OrderLine>, sqlx::Error> {
        let rows: Vec<OrderLineRow> =
            sqlx::query_as("SELECT * FROM order_lines WHERE order_id = ? ORDER BY product_id")
                .bind(order_id)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(row_to_order_line).collect()
    }

    pub async fn delete(&self, order_id: &str, product_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM order_lines WHERE order_id = ? AND product_id = ?")
            .bind(order_id)
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_for_order(&self, order_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM order_lines WHERE order_id = ?")
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Replace every cached line of a member's week with `lines`.
    pub async fn replace_for_user_week(
        &self,
        user_id: &str,
        week: u32,
        lines: &[OrderLine],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM order_lines WHERE user_id = ? AND week = ?")
            .bind(user_id)
            .bind(week as i64)
            .execute(&mut *tx)
            .await?;

        for line in lines {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO order_lines (order_id, user_id, week, product_id, quantity, container, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&line.order_id)
            .bind(&line.user_id)
            .bind(line.week as i64)
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(line.container.key())
            .bind(line.updated_at.to_rfc3339())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }
}

fn row_to_order_line(row: OrderLineRow) -> Result<OrderLine, sqlx::Error> {
    let container = ContainerType::from_str(&row.container)
        .map_err(|e| sqlx::Error::Decode(e.into()))?;
    let updated_at = DateTime::parse_from_rfc3339(&row.updated_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    let week = u32::try_from(row.week).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(OrderLine {
        order_id: row.order_id,
        user_id: row.user_id,
        week,
        product_id: row.product_id,
        quantity: row.quantity,
        container,
        updated_at,
    })
}
