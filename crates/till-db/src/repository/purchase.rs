//! # Purchase Repository
//!
//! Read side for stock received from suppliers.

use sqlx::SqlitePool;

use crate::error::DbResult;
use till_core::{Purchase, PurchaseItem, PurchaseSummary};

const PURCHASE_COLUMNS: &str = r#"
    id, purchase_number, supplier_id, purchase_date, subtotal_cents,
    tax_cents, total_cents, payment_status, amount_paid_cents, notes,
    user_id, created_at
"#;

/// Rows shown by `list_recent` when the caller doesn't pick a limit.
pub const DEFAULT_RECENT_LIMIT: u32 = 50;

#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Purchase>> {
        let sql = format!("SELECT {} FROM purchases WHERE id = ?1", PURCHASE_COLUMNS);
        let purchase = sqlx::query_as::<_, Purchase>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(purchase)
    }

    pub async fn get_items(&self, purchase_id: i64) -> DbResult<Vec<PurchaseItem>> {
        let items = sqlx::query_as::<_, PurchaseItem>(
            r#"
            SELECT id, purchase_id, product_id, product_code, product_name,
                   qty, cost_price_cents, total_cents
            FROM purchase_items
            WHERE purchase_id = ?1
            ORDER BY id
            "#,
        )
        .bind(purchase_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Latest purchases with the supplier's name, newest first.
    pub async fn list_recent(&self, limit: Option<u32>) -> DbResult<Vec<PurchaseSummary>> {
        let rows = sqlx::query_as::<_, PurchaseSummary>(
            r#"
            SELECT p.id, p.purchase_number, p.supplier_id, s.name AS supplier_name,
                   p.purchase_date, p.total_cents, p.amount_paid_cents, p.payment_status
            FROM purchases p
            INNER JOIN suppliers s ON s.id = p.supplier_id
            ORDER BY p.purchase_date DESC, p.id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit.unwrap_or(DEFAULT_RECENT_LIMIT))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_for_supplier(&self, supplier_id: i64) -> DbResult<Vec<Purchase>> {
        let sql = format!(
            "SELECT {} FROM purchases WHERE supplier_id = ?1 ORDER BY purchase_date DESC, id DESC",
            PURCHASE_COLUMNS
        );
        let purchases = sqlx::query_as::<_, Purchase>(&sql)
            .bind(supplier_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(purchases)
    }
}
