//! Sale posting, run inside the scope opened by `LedgerEngine::create_sale`.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{debug, warn};

use super::inventory::{adjust_stock, stock_snapshot};
use super::{format_business_date, local_now};
use crate::error::LedgerResult;
use crate::numbering::reserve_invoice_number;
use crate::repository::customer::CUSTOMER_COLUMNS;
use till_core::inventory::check_availability;
use till_core::posting::SaleTotals;
use till_core::{
    CoreError, Customer, LedgerContext, LedgerPolicy, Money, PaymentType, PostedDocument,
    SaleHeader, SaleLine, ValidationError,
};

pub(super) async fn post_sale(
    conn: &mut SqliteConnection,
    policy: LedgerPolicy,
    ctx: &LedgerContext,
    header: &SaleHeader,
    lines: &[SaleLine],
    totals: &SaleTotals,
) -> LedgerResult<PostedDocument> {
    let sale_date = header.sale_date.unwrap_or_else(local_now);

    let invoice_number = match &header.invoice_number {
        Some(number) => number.trim().to_string(),
        None => reserve_invoice_number(&mut *conn, sale_date.date()).await?,
    };

    let customer = match header.customer_id {
        Some(id) => Some(load_customer(&mut *conn, id).await?),
        None => None,
    };

    let sale_id = sqlx::query(
        r#"
        INSERT INTO sales (
            invoice_number, sale_date, subtotal_cents, discount_cents, tax_cents,
            total_cents, payment_type, amount_paid_cents, change_cents,
            user_id, customer_id, notes, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        "#,
    )
    .bind(&invoice_number)
    .bind(format_business_date(sale_date))
    .bind(totals.subtotal.cents())
    .bind(totals.discount.cents())
    .bind(totals.tax.cents())
    .bind(totals.total.cents())
    .bind(header.payment_type)
    .bind(totals.amount_paid.cents())
    .bind(totals.change.cents())
    .bind(ctx.user_id)
    .bind(header.customer_id)
    .bind(&header.notes)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    debug!(sale_id, invoice = %invoice_number, lines = lines.len(), "Sale header inserted");

    for line in lines {
        let snapshot = stock_snapshot(&mut *conn, line.product_id).await?;
        let movement = line.stock_movement();
        check_availability(&snapshot, &movement, policy.allow_negative_stock)?;

        sqlx::query(
            r#"
            INSERT INTO sale_items (
                sale_id, product_id, product_code, product_name,
                qty, price_cents, discount_cents, total_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(sale_id)
        .bind(line.product_id)
        .bind(line.product_code.trim())
        .bind(line.product_name.trim())
        .bind(line.qty)
        .bind(line.price.cents())
        .bind(line.discount.cents())
        .bind(line.total().cents())
        .execute(&mut *conn)
        .await?;

        adjust_stock(&mut *conn, &movement).await?;

        let remaining = movement.apply_to(snapshot.stock_qty);
        if remaining < 0 {
            warn!(code = %snapshot.code, stock = remaining, "Sold below zero stock");
        } else if till_core::inventory::is_low_stock(remaining, snapshot.min_stock_level) {
            debug!(code = %snapshot.code, stock = remaining, "Product now low on stock");
        }
    }

    // The walk-in customer is shared by every anonymous sale and never carries
    // balances.
    if let Some(customer) = customer.filter(|c| !c.is_walk_in()) {
        let credit = if header.payment_type == PaymentType::Credit {
            check_credit_limit(&customer, totals.total, policy)?;
            totals.total
        } else {
            Money::zero()
        };

        sqlx::query(
            r#"
            UPDATE customers
            SET total_purchases_cents = total_purchases_cents + ?1,
                current_credit_cents = current_credit_cents + ?2
            WHERE id = ?3
            "#,
        )
        .bind(totals.total.cents())
        .bind(credit.cents())
        .bind(customer.id)
        .execute(&mut *conn)
        .await?;

        debug!(
            customer_id = customer.id,
            total = %totals.total,
            credit = %credit,
            "Customer balances updated"
        );
    }

    Ok(PostedDocument {
        id: sale_id,
        number: invoice_number,
    })
}

async fn load_customer(conn: &mut SqliteConnection, id: i64) -> LedgerResult<Customer> {
    let sql = format!("SELECT {} FROM customers WHERE id = ?1", CUSTOMER_COLUMNS);
    let customer = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(CoreError::CustomerNotFound(id))?;

    Ok(customer)
}

/// Advisory unless the policy makes it a hard stop.
fn check_credit_limit(customer: &Customer, amount: Money, policy: LedgerPolicy) -> LedgerResult<()> {
    let balance = customer
        .current_credit()
        .checked_add(amount)
        .ok_or_else(|| CoreError::from(ValidationError::overflow("credit_balance")))?;
    if balance <= customer.credit_limit() {
        return Ok(());
    }

    if policy.enforce_credit_limit {
        return Err(CoreError::CreditLimitExceeded {
            customer_id: customer.id,
            limit: customer.credit_limit(),
            balance,
        }
        .into());
    }

    warn!(
        customer_id = customer.id,
        limit = %customer.credit_limit(),
        balance = %balance,
        "Credit limit exceeded, posting anyway"
    );
    Ok(())
}
