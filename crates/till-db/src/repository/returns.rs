//! # Return Repository
//!
//! Read side for customer returns. Returns are append-only and always point
//! at the sale they reverse.

use sqlx::SqlitePool;

use crate::error::DbResult;
use till_core::{ReturnItem, SaleReturn};

const RETURN_COLUMNS: &str = r#"
    id, return_number, sale_id, original_invoice_number, return_date,
    total_amount_cents, reason, processed_by_user_id, notes, created_at
"#;

#[derive(Debug, Clone)]
pub struct ReturnRepository {
    pool: SqlitePool,
}

impl ReturnRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReturnRepository { pool }
    }

    /// Every return, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<SaleReturn>> {
        let sql = format!(
            "SELECT {} FROM returns ORDER BY return_date DESC, id DESC",
            RETURN_COLUMNS
        );
        let returns = sqlx::query_as::<_, SaleReturn>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(returns)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<SaleReturn>> {
        let sql = format!("SELECT {} FROM returns WHERE id = ?1", RETURN_COLUMNS);
        let found = sqlx::query_as::<_, SaleReturn>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found)
    }

    pub async fn get_items(&self, return_id: i64) -> DbResult<Vec<ReturnItem>> {
        let items = sqlx::query_as::<_, ReturnItem>(
            r#"
            SELECT id, return_id, product_id, product_name, quantity, price_cents, total_cents
            FROM return_items
            WHERE return_id = ?1
            ORDER BY id
            "#,
        )
        .bind(return_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn list_for_sale(&self, sale_id: i64) -> DbResult<Vec<SaleReturn>> {
        let sql = format!(
            "SELECT {} FROM returns WHERE sale_id = ?1 ORDER BY id",
            RETURN_COLUMNS
        );
        let returns = sqlx::query_as::<_, SaleReturn>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(returns)
    }

    /// Units of a product already brought back against a sale.
    pub async fn returned_quantity(&self, sale_id: i64, product_id: i64) -> DbResult<i64> {
        let qty: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(ri.quantity), 0)
            FROM return_items ri
            INNER JOIN returns r ON r.id = ri.return_id
            WHERE r.sale_id = ?1 AND ri.product_id = ?2
            "#,
        )
        .bind(sale_id)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(qty)
    }
}
