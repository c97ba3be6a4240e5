//! # Repository Module
//!
//! Read side and catalog maintenance. Posting documents goes through
//! [`crate::ledger::LedgerEngine`], never through these types.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  db.products()   ──► insert, lookups, low-stock list                   │
//! │  db.customers()  ──► insert, lookups, deactivate, history              │
//! │  db.suppliers()  ──► insert, lookups, outstanding balance              │
//! │  db.sales()      ──► sale + items, date ranges, day totals             │
//! │  db.purchases()  ──► purchase + items, recent list with supplier name  │
//! │  db.returns()    ──► return + items, per-sale history                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqlitePool (any connection; no transactional scope)                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod customer;
pub mod product;
pub mod purchase;
pub mod returns;
pub mod sale;
pub mod supplier;

pub use customer::CustomerRepository;
pub use product::ProductRepository;
pub use purchase::PurchaseRepository;
pub use returns::ReturnRepository;
pub use sale::SaleRepository;
pub use supplier::SupplierRepository;

/// Local day as the `YYYY-MM-DD` text SQLite's `date()` yields.
pub(crate) fn sql_day(day: chrono::NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}
