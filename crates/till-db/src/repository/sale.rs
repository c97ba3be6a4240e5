//! # Sale Repository
//!
//! Read side for posted sales. Sales are created only by
//! [`LedgerEngine::create_sale`](crate::ledger::LedgerEngine::create_sale)
//! and never edited afterwards.
//!
//! ## Date Ranges
//! ```text
//! list_by_date_range(2026-03-01, 2026-03-31)
//!
//!   sale_date is local wall-clock text, so the range compares the calendar
//!   day: date(sale_date) BETWEEN '2026-03-01' AND '2026-03-31'  (inclusive)
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::DbResult;
use crate::repository::sql_day;
use till_core::{Money, Sale, SaleItem, SaleWithItems};

pub(crate) const SALE_COLUMNS: &str = r#"
    id, invoice_number, sale_date, subtotal_cents, discount_cents,
    tax_cents, total_cents, payment_type, amount_paid_cents, change_cents,
    user_id, customer_id, notes, created_at
"#;

#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {} FROM sales WHERE id = ?1", SALE_COLUMNS);
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    pub async fn get_by_invoice_number(&self, invoice_number: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {} FROM sales WHERE invoice_number = ?1", SALE_COLUMNS);
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(invoice_number.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Lines of a sale in the order they were rung up.
    pub async fn get_items(&self, sale_id: i64) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, product_code, product_name,
                   qty, price_cents, discount_cents, total_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn get_with_items(&self, id: i64) -> DbResult<Option<SaleWithItems>> {
        let Some(sale) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let items = self.get_items(id).await?;

        Ok(Some(SaleWithItems { sale, items }))
    }

    /// Sales whose local date falls in `from..=to`, newest first.
    pub async fn list_by_date_range(&self, from: NaiveDate, to: NaiveDate) -> DbResult<Vec<Sale>> {
        let sql = format!(
            r#"
            SELECT {} FROM sales
            WHERE date(sale_date) BETWEEN ?1 AND ?2
            ORDER BY sale_date DESC, id DESC
            "#,
            SALE_COLUMNS
        );
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(sql_day(from))
            .bind(sql_day(to))
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Gross takings for one local day, before returns.
    pub async fn total_for_day(&self, day: NaiveDate) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_cents), 0) FROM sales WHERE date(sale_date) = ?1",
        )
        .bind(sql_day(day))
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }

    pub async fn count_for_day(&self, day: NaiveDate) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE date(sale_date) = ?1")
                .bind(sql_day(day))
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
