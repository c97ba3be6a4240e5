//! Purchase posting, run inside the scope opened by
//! `LedgerEngine::create_purchase`.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::debug;

use super::inventory::{adjust_stock, record_cost_price, stock_snapshot};
use super::{format_business_date, local_now};
use crate::error::LedgerResult;
use till_core::numbering::format_timestamp_number;
use till_core::posting::PurchaseTotals;
use till_core::{CoreError, DocumentKind, LedgerContext, PostedDocument, PurchaseHeader, PurchaseLine};

pub(super) async fn post_purchase(
    conn: &mut SqliteConnection,
    ctx: &LedgerContext,
    header: &PurchaseHeader,
    lines: &[PurchaseLine],
    totals: &PurchaseTotals,
) -> LedgerResult<PostedDocument> {
    let supplier_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM suppliers WHERE id = ?1")
        .bind(header.supplier_id)
        .fetch_optional(&mut *conn)
        .await?;
    if supplier_exists.is_none() {
        return Err(CoreError::SupplierNotFound(header.supplier_id).into());
    }

    let purchase_date = header.purchase_date.unwrap_or_else(local_now);
    let purchase_number = match &header.purchase_number {
        Some(number) => number.trim().to_string(),
        None => format_timestamp_number(DocumentKind::Purchase, local_now()),
    };

    let purchase_id = sqlx::query(
        r#"
        INSERT INTO purchases (
            purchase_number, supplier_id, purchase_date, subtotal_cents, tax_cents,
            total_cents, payment_status, amount_paid_cents, notes, user_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(&purchase_number)
    .bind(header.supplier_id)
    .bind(format_business_date(purchase_date))
    .bind(totals.subtotal.cents())
    .bind(totals.tax.cents())
    .bind(totals.total.cents())
    .bind(totals.payment_status)
    .bind(totals.amount_paid.cents())
    .bind(&header.notes)
    .bind(ctx.user_id)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    debug!(
        purchase_id,
        number = %purchase_number,
        status = %totals.payment_status,
        "Purchase header inserted"
    );

    for line in lines {
        // Resolves the product before any row references it.
        stock_snapshot(&mut *conn, line.product_id).await?;

        sqlx::query(
            r#"
            INSERT INTO purchase_items (
                purchase_id, product_id, product_code, product_name,
                qty, cost_price_cents, total_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(purchase_id)
        .bind(line.product_id)
        .bind(line.product_code.trim())
        .bind(line.product_name.trim())
        .bind(line.qty)
        .bind(line.cost_price.cents())
        .bind(line.total().cents())
        .execute(&mut *conn)
        .await?;

        adjust_stock(&mut *conn, &line.stock_movement()).await?;
        record_cost_price(&mut *conn, line.product_id, line.cost_price).await?;
    }

    Ok(PostedDocument {
        id: purchase_id,
        number: purchase_number,
    })
}
