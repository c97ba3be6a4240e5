//! # Numbering Service
//!
//! Hands out document numbers.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Invoice   INV-YYYYMMDD-NNNN                                           │
//! │                                                                         │
//! │  document_sequences                                                    │
//! │  ┌────────┬──────────┬────────────┐                                    │
//! │  │ prefix │ day      │ last_value │                                    │
//! │  ├────────┼──────────┼────────────┤                                    │
//! │  │ INV    │ 20260314 │ 7          │ ← one upsert: +1 and RETURNING     │
//! │  └────────┴──────────┴────────────┘                                    │
//! │                                                                         │
//! │  First number of a day is seeded from the count of that day's sales,   │
//! │  so databases that predate the table keep counting where they were.    │
//! │                                                                         │
//! │  Purchase  PUR-YYYYMMDD-HHMMSS   }  local clock, no storage round trip │
//! │  Return    RET-YYYYMMDD-HHMMSS   }  same-second clash → UniqueViolation│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inside a posting scope the ledger calls [`reserve_invoice_number`] on the
//! scope's connection, so a rolled-back sale also rolls back its number.

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::ledger::local_now;
use crate::repository::sql_day;
use till_core::numbering::{day_key, format_invoice_number, format_timestamp_number};
use till_core::DocumentKind;

/// Reserves the next invoice sequence value for `day` and formats it.
///
/// A single statement, so two writers can never be handed the same value.
pub async fn reserve_invoice_number(conn: &mut SqliteConnection, day: NaiveDate) -> DbResult<String> {
    let sequence: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO document_sequences (prefix, day, last_value)
        VALUES (
            ?1,
            ?2,
            (SELECT COUNT(*) FROM sales WHERE date(sale_date) = ?3) + 1
        )
        ON CONFLICT (prefix, day) DO UPDATE SET last_value = last_value + 1
        RETURNING last_value
        "#,
    )
    .bind(DocumentKind::Invoice.prefix())
    .bind(day_key(day))
    .bind(sql_day(day))
    .fetch_one(&mut *conn)
    .await?;

    let number = format_invoice_number(day, sequence);
    debug!(number = %number, "Reserved invoice number");
    Ok(number)
}

#[derive(Debug, Clone)]
pub struct NumberingService {
    pool: SqlitePool,
}

impl NumberingService {
    pub fn new(pool: SqlitePool) -> Self {
        NumberingService { pool }
    }

    /// Reserves today's next invoice number.
    ///
    /// The value is consumed even if no sale ever uses it. Sales posted
    /// without an explicit number reserve their own inside the posting scope.
    pub async fn next_invoice_number(&self) -> DbResult<String> {
        self.next_invoice_number_for(local_now().date()).await
    }

    pub async fn next_invoice_number_for(&self, day: NaiveDate) -> DbResult<String> {
        let mut conn = self.pool.acquire().await?;
        reserve_invoice_number(&mut *conn, day).await
    }

    pub fn next_purchase_number(&self) -> String {
        format_timestamp_number(DocumentKind::Purchase, local_now())
    }

    pub fn next_return_number(&self) -> String {
        format_timestamp_number(DocumentKind::Return, local_now())
    }
}
