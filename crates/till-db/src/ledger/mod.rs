//! # Ledger Engine
//!
//! Posts sales, purchases and returns. Each posting is one transactional
//! scope: header, lines, stock movements and customer balances commit
//! together or not at all.
//!
//! ## Posting Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     create_sale(ctx, header, lines)                     │
//! │                                                                         │
//! │  validate_sale()        ← pure, till-core. Fails → nothing opened       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pool.begin()           ← one connection, one transaction               │
//! │       │                                                                 │
//! │       ├── reserve invoice number (document_sequences upsert)            │
//! │       ├── load customer                                                 │
//! │       ├── INSERT sales                                                  │
//! │       ├── per line: snapshot → policy → INSERT sale_items → stock -qty  │
//! │       └── customer totals / credit                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  finish()                                                               │
//! │       ├── Ok  → COMMIT   → PostedDocument { id, number }                │
//! │       └── Err → ROLLBACK → the original error, unchanged                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dropping a posting future mid-flight drops the transaction, which rolls
//! back.

mod inventory;
mod purchase;
mod refund;
mod sale;


pub use inventory::{adjust_stock, record_cost_price, stock_snapshot};

use chrono::{Local, NaiveDateTime, SubsecRound};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{error, info, warn};

use crate::error::LedgerResult;
use till_core::posting::{validate_purchase, validate_return, validate_sale};
use till_core::{
    LedgerContext, LedgerPolicy, Money, PostedDocument, PurchaseHeader, PurchaseLine, ReturnHeader,
    ReturnLine, SaleHeader, SaleLine,
};

/// Local wall-clock time, whole seconds.
pub(crate) fn local_now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// Business dates are stored as `YYYY-MM-DD HH:MM:SS` text.
pub(crate) fn format_business_date(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Transaction engine over a shared pool.
///
/// ## Usage
/// ```rust,ignore
/// let ctx = LedgerContext::new(user_id);
/// let header = SaleHeader::new(PaymentType::Cash, Money::from_cents(500));
/// let lines = [SaleLine::new(product.id, &product.code, &product.name, 2, product.sell_price())];
///
/// let posted = db.ledger().create_sale(&ctx, &header, &lines).await?;
/// println!("{}", posted.number); // INV-20260314-0001
/// ```
#[derive(Debug, Clone)]
pub struct LedgerEngine {
    pool: SqlitePool,
    policy: LedgerPolicy,
}

impl LedgerEngine {
    pub fn new(pool: SqlitePool, policy: LedgerPolicy) -> Self {
        LedgerEngine { pool, policy }
    }

    pub fn policy(&self) -> LedgerPolicy {
        self.policy
    }

    /// Records a sale, decrements stock per line and updates the customer's
    /// running totals.
    ///
    /// ## Errors
    /// - Validation: empty cart, bad line, insufficient payment, credit sale
    ///   without a named customer. Nothing is opened.
    /// - Referential: unknown customer or product. Rolled back.
    /// - Policy: oversell (when disallowed), credit limit (when enforced).
    /// - Storage: duplicate invoice number, busy database, I/O.
    pub async fn create_sale(
        &self,
        ctx: &LedgerContext,
        header: &SaleHeader,
        lines: &[SaleLine],
    ) -> LedgerResult<PostedDocument> {
        let totals = validate_sale(header, lines, self.policy.tax_rate())?;

        let mut tx = self.pool.begin().await?;
        let outcome = sale::post_sale(&mut *tx, self.policy, ctx, header, lines, &totals).await;

        finish(tx, outcome, "sale", totals.total).await
    }

    /// Records stock received from a supplier. Each line raises stock and
    /// sets the product's cost price.
    pub async fn create_purchase(
        &self,
        ctx: &LedgerContext,
        header: &PurchaseHeader,
        lines: &[PurchaseLine],
    ) -> LedgerResult<PostedDocument> {
        let totals = validate_purchase(header, lines)?;

        let mut tx = self.pool.begin().await?;
        let outcome = purchase::post_purchase(&mut *tx, ctx, header, lines, &totals).await;

        finish(tx, outcome, "purchase", totals.total).await
    }

    /// Records goods brought back against a sale. Each line raises stock.
    /// The sale itself is never modified.
    pub async fn create_return(
        &self,
        ctx: &LedgerContext,
        header: &ReturnHeader,
        lines: &[ReturnLine],
    ) -> LedgerResult<PostedDocument> {
        let total = validate_return(header, lines)?;

        let mut tx = self.pool.begin().await?;
        let outcome = refund::post_return(&mut *tx, self.policy, ctx, header, lines, total).await;

        finish(tx, outcome, "return", total).await
    }
}

/// Commits on success, rolls back on failure. A failed rollback is logged
/// and the posting error is still the one returned.
async fn finish(
    tx: Transaction<'_, Sqlite>,
    outcome: LedgerResult<PostedDocument>,
    document: &'static str,
    total: Money,
) -> LedgerResult<PostedDocument> {
    match outcome {
        Ok(posted) => {
            tx.commit().await?;
            info!(
                document,
                id = posted.id,
                number = %posted.number,
                total = %total,
                "Posted"
            );
            Ok(posted)
        }
        Err(err) => {
            warn!(document, error = %err, "Posting failed, rolling back");
            if let Err(rollback_err) = tx.rollback().await {
                error!(document, error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}
