//! # Domain Types
//!
//! Rows the ledger reads and writes, plus the enums that classify them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Catalog / counterparties        Aggregates (header + lines)           │
//! │  ┌────────────┐                  ┌────────────┐   ┌──────────────┐     │
//! │  │  Product   │◄─── stock ───────│    Sale    │──►│  SaleItem    │     │
//! │  │  Customer  │◄─── balances ────│            │   └──────────────┘     │
//! │  │  Supplier  │                  ├────────────┤   ┌──────────────┐     │
//! │  └────────────┘◄─── payables ────│  Purchase  │──►│ PurchaseItem │     │
//! │                                  ├────────────┤   └──────────────┘     │
//! │                                  │ SaleReturn │   ┌──────────────┐     │
//! │                                  │            │──►│  ReturnItem  │     │
//! │                                  └────────────┘   └──────────────┘     │
//! │                                                                         │
//! │  PaymentType: Cash | Card | Mobile | Credit                             │
//! │  PaymentStatus: Pending | Partial | Paid   (derived, then persisted)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every row is keyed by its SQLite rowid (`i64`). Business identifiers
//! (product `code`, `invoice_number`, `purchase_number`, `return_number`)
//! are unique as well but are never used as foreign keys.
//!
//! ## Dates
//! Business dates (`sale_date`, `purchase_date`, `return_date`) are store-local
//! wall-clock time. Audit columns (`created_at`, `updated_at`) are UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

/// Row id of the reserved anonymous customer created by the schema.
pub const WALK_IN_CUSTOMER_ID: i64 = 1;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (825 bps = 8.25%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product and its running stock level.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Business identifier printed on shelf labels.
    pub code: String,

    pub name: String,
    pub category: Option<String>,

    /// Last purchase cost. Overwritten by every posted purchase line.
    pub cost_price_cents: i64,

    pub sell_price_cents: i64,

    /// Units on hand. May go negative when the store allows overselling.
    pub stock_qty: i64,

    /// Threshold at or below which the product counts as low on stock.
    pub min_stock_level: i64,

    pub barcode: Option<String>,

    /// Preferred supplier (lookup only, never enforced).
    pub supplier_id: Option<i64>,

    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    #[inline]
    pub fn sell_price(&self) -> Money {
        Money::from_cents(self.sell_price_cents)
    }

    /// Derived on every read; there is no stored low-stock flag to drift.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        crate::inventory::is_low_stock(self.stock_qty, self.min_stock_level)
    }
}

/// Catalog entry to insert.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub cost_price: Money,
    pub sell_price: Money,
    pub stock_qty: i64,
    pub min_stock_level: i64,
    pub barcode: Option<String>,
    pub supplier_id: Option<i64>,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer and the balances the ledger maintains for them.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,

    /// Cumulative total of every sale posted against this customer.
    pub total_purchases_cents: i64,

    pub credit_limit_cents: i64,

    /// Outstanding balance from `Credit` sales.
    pub current_credit_cents: i64,

    pub is_credit_customer: bool,
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Customer {
    #[inline]
    pub fn is_walk_in(&self) -> bool {
        self.id == WALK_IN_CUSTOMER_ID
    }

    #[inline]
    pub fn total_purchases(&self) -> Money {
        Money::from_cents(self.total_purchases_cents)
    }

    #[inline]
    pub fn credit_limit(&self) -> Money {
        Money::from_cents(self.credit_limit_cents)
    }

    #[inline]
    pub fn current_credit(&self) -> Money {
        Money::from_cents(self.current_credit_cents)
    }

    /// `credit_limit - current_credit`; negative once the limit is overrun.
    #[inline]
    pub fn available_credit(&self) -> Money {
        self.credit_limit() - self.current_credit()
    }

    /// Name shown on receipts.
    pub fn display_name(&self) -> &str {
        if self.is_walk_in() {
            "Walk-in Customer"
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCustomer {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub credit_limit: Money,
    pub is_credit_customer: bool,
}

// =============================================================================
// Supplier
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSupplier {
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

// =============================================================================
// Payment Type
// =============================================================================

/// How a sale was settled. Stored as its variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "PascalCase"))]
#[ts(export)]
pub enum PaymentType {
    Cash,
    Card,
    Mobile,
    /// Charged to the customer's running credit balance.
    Credit,
}

impl PaymentType {
    pub const ALL: [PaymentType; 4] = [
        PaymentType::Cash,
        PaymentType::Card,
        PaymentType::Mobile,
        PaymentType::Credit,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Cash => "Cash",
            PaymentType::Card => "Card",
            PaymentType::Mobile => "Mobile",
            PaymentType::Credit => "Credit",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = ValidationError;

    /// Case-insensitive, so values typed into a till UI parse as expected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PaymentType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::InvalidPaymentType(s.to_string()))
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Settlement state of a purchase with its supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "PascalCase"))]
#[ts(export)]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
}

impl PaymentStatus {
    /// Derives the status from what has been paid against a total.
    ///
    /// ```text
    /// paid >= total       → Paid
    /// 0 < paid < total    → Partial
    /// otherwise           → Pending
    /// ```
    pub fn from_amounts(total: Money, paid: Money) -> Self {
        if paid >= total {
            PaymentStatus::Paid
        } else if paid.is_positive() {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Pending
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Partial => "Partial",
            PaymentStatus::Paid => "Paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "partial" => Ok(PaymentStatus::Partial),
            "paid" => Ok(PaymentStatus::Paid),
            _ => Err(ValidationError::InvalidPaymentStatus(s.to_string())),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A posted sale header. Immutable once committed.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub invoice_number: String,
    #[ts(as = "String")]
    pub sale_date: NaiveDateTime,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub payment_type: PaymentType,
    pub amount_paid_cents: i64,
    pub change_cents: i64,
    pub user_id: i64,
    pub customer_id: Option<i64>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn change(&self) -> Money {
        Money::from_cents(self.change_cents)
    }
}

/// A sale line. Code and name are frozen at sale time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub product_code: String,
    pub product_name: String,
    pub qty: i64,
    pub price_cents: i64,
    /// Per-unit discount.
    pub discount_cents: i64,
    /// `qty * price - qty * discount`
    pub total_cents: i64,
}

/// A sale header with its lines, as returned by the read side.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleWithItems {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

// =============================================================================
// Purchase
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Purchase {
    pub id: i64,
    pub purchase_number: String,
    pub supplier_id: i64,
    #[ts(as = "String")]
    pub purchase_date: NaiveDateTime,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub payment_status: PaymentStatus,
    pub amount_paid_cents: i64,
    pub notes: Option<String>,
    pub user_id: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Purchase {
    /// What is still owed to the supplier for this purchase.
    pub fn outstanding(&self) -> Money {
        let owed = Money::from_cents(self.total_cents - self.amount_paid_cents);
        if owed.is_negative() {
            Money::zero()
        } else {
            owed
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PurchaseItem {
    pub id: i64,
    pub purchase_id: i64,
    pub product_id: i64,
    pub product_code: String,
    pub product_name: String,
    pub qty: i64,
    pub cost_price_cents: i64,
    pub total_cents: i64,
}

/// Purchase header joined with its supplier's name, for history lists.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PurchaseSummary {
    pub id: i64,
    pub purchase_number: String,
    pub supplier_id: i64,
    pub supplier_name: String,
    #[ts(as = "String")]
    pub purchase_date: NaiveDateTime,
    pub total_cents: i64,
    pub amount_paid_cents: i64,
    pub payment_status: PaymentStatus,
}

// =============================================================================
// Return
// =============================================================================

/// A posted customer return against an earlier sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleReturn {
    pub id: i64,
    pub return_number: String,
    pub sale_id: i64,
    /// Invoice number of the sale, copied when the return was posted.
    pub original_invoice_number: String,
    #[ts(as = "String")]
    pub return_date: NaiveDateTime,
    pub total_amount_cents: i64,
    pub reason: Option<String>,
    pub processed_by_user_id: i64,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ReturnItem {
    pub id: i64,
    pub return_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub total_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn customer(id: i64, limit: i64, credit: i64) -> Customer {
        Customer {
            id,
            name: "Amina".to_string(),
            phone: None,
            email: None,
            address: None,
            total_purchases_cents: 0,
            credit_limit_cents: limit,
            current_credit_cents: credit,
            is_credit_customer: true,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_tax_rate() {
        let rate = TaxRate::from_bps(825);
        assert_eq!(rate.bps(), 825);
        assert!((rate.percentage() - 8.25).abs() < 0.001);
        assert!(TaxRate::default().is_zero());
    }

    #[rstest]
    #[case("Cash", PaymentType::Cash)]
    #[case("card", PaymentType::Card)]
    #[case(" MOBILE ", PaymentType::Mobile)]
    #[case("Credit", PaymentType::Credit)]
    fn test_payment_type_parsing(#[case] input: &str, #[case] expected: PaymentType) {
        assert_eq!(input.parse::<PaymentType>().unwrap(), expected);
    }

    #[test]
    fn test_payment_type_rejects_unknown() {
        let err = "Cheque".parse::<PaymentType>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPaymentType(ref v) if v == "Cheque"));
    }

    #[rstest]
    #[case::fully_paid(1000, 1000, PaymentStatus::Paid)]
    #[case::overpaid(1000, 1200, PaymentStatus::Paid)]
    #[case::partial(1000, 1, PaymentStatus::Partial)]
    #[case::nothing_paid(1000, 0, PaymentStatus::Pending)]
    #[case::zero_total(0, 0, PaymentStatus::Paid)]
    fn test_payment_status_derivation(
        #[case] total: i64,
        #[case] paid: i64,
        #[case] expected: PaymentStatus,
    ) {
        let status = PaymentStatus::from_amounts(Money::from_cents(total), Money::from_cents(paid));
        assert_eq!(status, expected);
    }

    #[test]
    fn test_payment_status_round_trips_through_text() {
        for status in [PaymentStatus::Pending, PaymentStatus::Partial, PaymentStatus::Paid] {
            assert_eq!(status.to_string().parse::<PaymentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_available_credit() {
        let c = customer(5, 50_000, 12_500);
        assert_eq!(c.available_credit().cents(), 37_500);

        let over = customer(5, 10_000, 12_500);
        assert!(over.available_credit().is_negative());
    }

    #[test]
    fn test_walk_in_display_name() {
        assert_eq!(customer(WALK_IN_CUSTOMER_ID, 0, 0).display_name(), "Walk-in Customer");
        assert_eq!(customer(2, 0, 0).display_name(), "Amina");
    }

    #[test]
    fn test_payment_type_serializes_as_variant_name() {
        let json = serde_json::to_string(&PaymentType::Mobile).unwrap();
        assert_eq!(json, "\"Mobile\"");
    }
}
