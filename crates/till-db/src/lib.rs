//! # till-db: Storage Gateway and Ledger Engine
//!
//! SQLite storage for the till ledger, and the engine that posts sales,
//! purchases and returns against it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Data Flow                                 │
//! │                                                                         │
//! │  Caller (checkout screen, seed binary, report job)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     till-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐   │   │
//! │  │   │   Database   │   │ LedgerEngine │   │   Repositories   │   │   │
//! │  │   │  (pool.rs)   │   │  (ledger/)   │   │  (repository/)   │   │   │
//! │  │   │              │◄──│ create_sale  │   │ products, sales  │   │   │
//! │  │   │  SqlitePool  │   │ create_purch.│   │ purchases, ...   │   │   │
//! │  │   │  TillConfig  │   │ create_return│   │                  │   │   │
//! │  │   └──────────────┘   └──────┬───────┘   └──────────────────┘   │   │
//! │  │                             │                                   │   │
//! │  │              Inventory ledger + Numbering service               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (WAL) ── migrations/sqlite/*.sql embedded at compile time      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use till_db::{Database, TillConfig};
//! use till_core::{LedgerContext, Money, PaymentType, SaleHeader, SaleLine};
//!
//! let config = TillConfig::load(None)?;
//! let db = Database::new(config.db_config()).await?;
//!
//! let posted = db
//!     .ledger()
//!     .create_sale(
//!         &LedgerContext::new(1),
//!         &SaleHeader::new(PaymentType::Cash, Money::from_cents(1000)),
//!         &[SaleLine::new(7, "COKE-330", "Coca-Cola 330ml", 2, Money::from_cents(450))],
//!     )
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod numbering;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::TillConfig;
pub use error::{DbError, DbResult, FailureKind, LedgerError, LedgerResult};
pub use ledger::LedgerEngine;
pub use numbering::NumberingService;
pub use pool::{Database, DbConfig};

pub use repository::{
    CustomerRepository, ProductRepository, PurchaseRepository, ReturnRepository, SaleRepository,
    SupplierRepository,
};
