//! # Inventory Ledger
//!
//! The only code that writes `products.stock_qty` after a product exists.
//! Every function takes the posting scope's connection and never opens a
//! scope of its own.
//!
//! ```text
//!   sale line      ──► adjust_stock(-qty)
//!   purchase line  ──► adjust_stock(+qty) + record_cost_price(cost)
//!   return line    ──► adjust_stock(+qty)
//!
//!   UPDATE products SET stock_qty = stock_qty + ?delta
//!        └── one statement: concurrent writers can't lose an update
//! ```

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::LedgerResult;
use till_core::{CoreError, Money, StockMovement, StockSnapshot};

/// Applies a stock movement. No lower bound here; the oversell policy is
/// checked by the caller against a [`stock_snapshot`].
pub async fn adjust_stock(conn: &mut SqliteConnection, movement: &StockMovement) -> LedgerResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock_qty = stock_qty + ?1, updated_at = ?2
        WHERE id = ?3
        "#,
    )
    .bind(movement.delta)
    .bind(Utc::now())
    .bind(movement.product_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CoreError::ProductNotFound(movement.product_id).into());
    }

    debug!(
        product_id = movement.product_id,
        delta = movement.delta,
        reason = %movement.reason,
        "Stock adjusted"
    );
    Ok(())
}

/// Last cost wins.
pub async fn record_cost_price(
    conn: &mut SqliteConnection,
    product_id: i64,
    cost: Money,
) -> LedgerResult<()> {
    let result = sqlx::query(
        "UPDATE products SET cost_price_cents = ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(cost.cents())
    .bind(Utc::now())
    .bind(product_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CoreError::ProductNotFound(product_id).into());
    }

    Ok(())
}

pub async fn stock_snapshot(conn: &mut SqliteConnection, product_id: i64) -> LedgerResult<StockSnapshot> {
    let snapshot = sqlx::query_as::<_, StockSnapshot>(
        r#"
        SELECT id AS product_id, code, stock_qty, min_stock_level
        FROM products
        WHERE id = ?1
        "#,
    )
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(CoreError::ProductNotFound(product_id))?;

    Ok(snapshot)
}
