//! # Document Number Formats
//!
//! ```text
//! Invoice   INV-YYYYMMDD-NNNN     per-day sequence, 1-based
//! Purchase  PUR-YYYYMMDD-HHMMSS   local time of posting
//! Return    RET-YYYYMMDD-HHMMSS   local time of posting
//! ```
//!
//! Formatting only. Reserving the next invoice sequence value is a storage
//! concern handled by `till-db::numbering`.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Invoice,
    Purchase,
    Return,
}

impl DocumentKind {
    pub const fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "INV",
            DocumentKind::Purchase => "PUR",
            DocumentKind::Return => "RET",
        }
    }
}

/// Day key used for sequences and number stems: `YYYYMMDD`.
pub fn day_key(day: NaiveDate) -> String {
    day.format("%Y%m%d").to_string()
}

/// `INV-20260314-0007`. Sequences past 9999 simply grow wider.
pub fn format_invoice_number(day: NaiveDate, sequence: i64) -> String {
    format!("{}-{}-{:04}", DocumentKind::Invoice.prefix(), day_key(day), sequence)
}

/// `PUR-20260314-153012` / `RET-20260314-153012`.
pub fn format_timestamp_number(kind: DocumentKind, at: NaiveDateTime) -> String {
    format!("{}-{}", kind.prefix(), at.format("%Y%m%d-%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn test_invoice_number_format() {
        assert_eq!(format_invoice_number(day(), 1), "INV-20260314-0001");
        assert_eq!(format_invoice_number(day(), 42), "INV-20260314-0042");
        assert_eq!(format_invoice_number(day(), 12345), "INV-20260314-12345");
    }

    #[test]
    fn test_timestamp_number_format() {
        let at = day().and_hms_opt(9, 5, 7).unwrap();
        assert_eq!(
            format_timestamp_number(DocumentKind::Purchase, at),
            "PUR-20260314-090507"
        );
        assert_eq!(
            format_timestamp_number(DocumentKind::Return, at),
            "RET-20260314-090507"
        );
    }

    #[test]
    fn test_day_key() {
        assert_eq!(day_key(day()), "20260314");
    }
}
