//! Return posting, run inside the scope opened by
//! `LedgerEngine::create_return`.
//!
//! ```text
//! sold       = Σ sale_items.qty    for (sale, product)
//! returned   = Σ return_items.qty  for (sale, product), read inside this scope
//! guard      : returned + requested <= sold        (enforce_return_quantities)
//! ```
//!
//! Earlier lines of the same return are already inserted when a later line is
//! checked, so a product split across two lines is capped as a whole.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::debug;

use super::inventory::{adjust_stock, stock_snapshot};
use super::{format_business_date, local_now};
use crate::error::LedgerResult;
use till_core::inventory::check_returnable;
use till_core::numbering::format_timestamp_number;
use till_core::{
    CoreError, DocumentKind, LedgerContext, LedgerPolicy, Money, PostedDocument, ReturnHeader,
    ReturnLine,
};

pub(super) async fn post_return(
    conn: &mut SqliteConnection,
    policy: LedgerPolicy,
    ctx: &LedgerContext,
    header: &ReturnHeader,
    lines: &[ReturnLine],
    total: Money,
) -> LedgerResult<PostedDocument> {
    let sale_invoice: Option<String> =
        sqlx::query_scalar("SELECT invoice_number FROM sales WHERE id = ?1")
            .bind(header.sale_id)
            .fetch_optional(&mut *conn)
            .await?;
    let sale_invoice = sale_invoice.ok_or(CoreError::SaleNotFound(header.sale_id))?;

    let original_invoice_number = header
        .original_invoice_number
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or(sale_invoice);

    let return_date = header.return_date.unwrap_or_else(local_now);
    let return_number = match &header.return_number {
        Some(number) => number.trim().to_string(),
        None => format_timestamp_number(DocumentKind::Return, local_now()),
    };

    let return_id = sqlx::query(
        r#"
        INSERT INTO returns (
            return_number, sale_id, original_invoice_number, return_date,
            total_amount_cents, reason, processed_by_user_id, notes, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&return_number)
    .bind(header.sale_id)
    .bind(&original_invoice_number)
    .bind(format_business_date(return_date))
    .bind(total.cents())
    .bind(&header.reason)
    .bind(ctx.user_id)
    .bind(&header.notes)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    debug!(
        return_id,
        number = %return_number,
        sale_id = header.sale_id,
        "Return header inserted"
    );

    for line in lines {
        stock_snapshot(&mut *conn, line.product_id).await?;

        if policy.enforce_return_quantities {
            let (sold, returned) = sold_and_returned(&mut *conn, header.sale_id, line.product_id).await?;
            check_returnable(header.sale_id, line.product_id, sold, returned, line.quantity)?;
        }

        sqlx::query(
            r#"
            INSERT INTO return_items (
                return_id, product_id, product_name, quantity, price_cents, total_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(return_id)
        .bind(line.product_id)
        .bind(line.product_name.trim())
        .bind(line.quantity)
        .bind(line.price.cents())
        .bind(line.total().cents())
        .execute(&mut *conn)
        .await?;

        adjust_stock(&mut *conn, &line.stock_movement()).await?;
    }

    Ok(PostedDocument {
        id: return_id,
        number: return_number,
    })
}

async fn sold_and_returned(
    conn: &mut SqliteConnection,
    sale_id: i64,
    product_id: i64,
) -> LedgerResult<(i64, i64)> {
    let sold: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(qty), 0) FROM sale_items WHERE sale_id = ?1 AND product_id = ?2",
    )
    .bind(sale_id)
    .bind(product_id)
    .fetch_one(&mut *conn)
    .await?;

    let returned: i64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(ri.quantity), 0)
        FROM return_items ri
        INNER JOIN returns r ON r.id = ri.return_id
        WHERE r.sale_id = ?1 AND ri.product_id = ?2
        "#,
    )
    .bind(sale_id)
    .bind(product_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok((sold, returned))
}
