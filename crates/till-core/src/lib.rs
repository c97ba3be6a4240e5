//! # till-core: Pure Business Logic for the Till Ledger
//!
//! Every decision the ledger makes that does not need the database: money
//! arithmetic, document totals, input validation, stock rules and document
//! number formats.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Till Ledger Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        Caller (till UI, back office, import tools)              │   │
//! │  │    builds SaleHeader / PurchaseHeader / ReturnHeader + lines    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  types   │ │ posting  │ │inventory │ │numbering │          │   │
//! │  │   │ Product  │ │ totals   │ │ movements│ │ INV/PUR/ │          │   │
//! │  │   │ Sale ... │ │ validate │ │ policy   │ │ RET fmt  │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    till-db (Storage + Ledger)                   │   │
//! │  │      SQLite scopes, repositories, ledger engine, numbering      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Rows and enums (Product, Sale, PaymentType, ...)
//! - [`money`] - Integer minor-unit money
//! - [`posting`] - Ledger requests, totals and request validation
//! - [`inventory`] - Stock movements, low-stock rule, oversell/over-return checks
//! - [`policy`] - Store-level ledger switches
//! - [`numbering`] - Invoice / purchase / return number formats
//! - [`validation`] - Field validators
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::money::Money;
//! use till_core::posting::{validate_sale, SaleHeader, SaleLine};
//! use till_core::types::{PaymentType, TaxRate};
//!
//! let header = SaleHeader::new(PaymentType::Cash, Money::from_cents(500));
//! let lines = [SaleLine::new(1, "TEA-100", "Green Tea", 3, Money::from_cents(100))];
//!
//! let totals = validate_sale(&header, &lines, TaxRate::zero()).unwrap();
//! assert_eq!(totals.total.cents(), 300);
//! assert_eq!(totals.change.cents(), 200);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod inventory;
pub mod money;
pub mod numbering;
pub mod policy;
pub mod posting;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::{StockMovement, StockSnapshot};
pub use money::Money;
pub use numbering::DocumentKind;
pub use policy::LedgerPolicy;
pub use posting::{
    LedgerContext, PostedDocument, PurchaseHeader, PurchaseLine, ReturnHeader, ReturnLine,
    SaleHeader, SaleLine,
};
pub use types::*;

// =============================================================================
// Constants
// =============================================================================

/// Largest quantity accepted on a single sale, purchase or return line.
///
/// ## Business Reason
/// Purchase lines can be wholesale-sized, so the cap is generous. It keeps
/// stock deltas sane and catches a scanned barcode typed into the qty field.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;
