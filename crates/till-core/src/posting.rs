//! # Posting Rules
//!
//! Request types for the three ledger operations and the pure functions that
//! turn a request into validated totals.
//!
//! ## Where This Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  caller builds                 THIS MODULE                 till-db      │
//! │  ───────────                   ───────────                 ───────      │
//! │  SaleHeader + [SaleLine] ──►  validate_sale()     ──►  LedgerEngine    │
//! │                                  └─ SaleTotals           (one scope)   │
//! │  PurchaseHeader + [...]  ──►  validate_purchase() ──►                  │
//! │                                  └─ PurchaseTotals                     │
//! │  ReturnHeader + [...]    ──►  validate_return()   ──►                  │
//! │                                  └─ total Money                        │
//! │                                                                         │
//! │  Nothing here touches storage: a request that fails validation never   │
//! │  opens a transaction.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sale arithmetic
//! ```text
//! subtotal = Σ qty × price
//! discount = Σ qty × unit discount + header discount
//! tax      = header tax, or subtotal × store tax rate
//! total    = subtotal - discount + tax
//! change   = amount_paid - total        (must be ≥ 0)
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::inventory::{MovementReason, StockMovement};
use crate::money::Money;
use crate::types::{PaymentStatus, PaymentType, TaxRate, WALK_IN_CUSTOMER_ID};
use crate::validation::{
    validate_amount, validate_document_number, validate_name, validate_quantity, ValidationResult,
};

// =============================================================================
// Context & Result
// =============================================================================

/// Who is posting. Passed explicitly into every ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LedgerContext {
    pub user_id: i64,
}

impl LedgerContext {
    pub const fn new(user_id: i64) -> Self {
        LedgerContext { user_id }
    }
}

/// Identity of a committed sale, purchase or return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PostedDocument {
    pub id: i64,
    pub number: String,
}

// =============================================================================
// Sale
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleHeader {
    /// Reserved from the numbering service when absent.
    pub invoice_number: Option<String>,
    /// Local time of posting when absent.
    #[ts(as = "Option<String>")]
    pub sale_date: Option<NaiveDateTime>,
    pub customer_id: Option<i64>,
    pub payment_type: PaymentType,
    pub amount_paid: Money,
    /// Header-level discount on top of the per-line discounts.
    pub discount: Money,
    /// Explicit tax amount. Computed from the store rate when absent.
    pub tax: Option<Money>,
    pub notes: Option<String>,
}

impl SaleHeader {
    pub fn new(payment_type: PaymentType, amount_paid: Money) -> Self {
        SaleHeader {
            invoice_number: None,
            sale_date: None,
            customer_id: None,
            payment_type,
            amount_paid,
            discount: Money::zero(),
            tax: None,
            notes: None,
        }
    }

    pub fn for_customer(mut self, customer_id: i64) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_discount(mut self, discount: Money) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_tax(mut self, tax: Money) -> Self {
        self.tax = Some(tax);
        self
    }

    pub fn with_invoice_number(mut self, number: impl Into<String>) -> Self {
        self.invoice_number = Some(number.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.sale_date = Some(date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// One sale line. `product_code` and `product_name` are the values shown to
/// the cashier and are persisted as-is; they are not re-read from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLine {
    pub product_id: i64,
    pub product_code: String,
    pub product_name: String,
    pub qty: i64,
    pub price: Money,
    /// Per-unit discount.
    pub discount: Money,
}

impl SaleLine {
    pub fn new(
        product_id: i64,
        product_code: impl Into<String>,
        product_name: impl Into<String>,
        qty: i64,
        price: Money,
    ) -> Self {
        SaleLine {
            product_id,
            product_code: product_code.into(),
            product_name: product_name.into(),
            qty,
            price,
            discount: Money::zero(),
        }
    }

    pub fn with_discount(mut self, per_unit: Money) -> Self {
        self.discount = per_unit;
        self
    }

    /// `qty × price`
    #[inline]
    pub fn gross(&self) -> Money {
        self.price * self.qty
    }

    /// `qty × discount`
    #[inline]
    pub fn discount_total(&self) -> Money {
        self.discount * self.qty
    }

    /// `qty × price - qty × discount`
    #[inline]
    pub fn total(&self) -> Money {
        self.gross() - self.discount_total()
    }

    pub fn stock_movement(&self) -> StockMovement {
        StockMovement::outbound(self.product_id, self.qty, MovementReason::Sale)
    }
}

/// Derived header amounts for a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
    pub amount_paid: Money,
    pub change: Money,
}

/// Derives the sale totals. Any amount that would not fit in `i64` minor
/// units is reported as `AmountOverflow` instead of wrapping.
pub fn compute_sale_totals(
    header: &SaleHeader,
    lines: &[SaleLine],
    tax_rate: TaxRate,
) -> ValidationResult<SaleTotals> {
    let subtotal = checked_sum(
        "subtotal",
        lines.iter().map(|l| l.price.multiply_quantity(l.qty)),
    )?;
    let line_discounts = checked_sum(
        "discount",
        lines.iter().map(|l| l.discount.multiply_quantity(l.qty)),
    )?;
    let discount = line_discounts
        .checked_add(header.discount)
        .ok_or_else(|| ValidationError::overflow("discount"))?;
    let tax = header
        .tax
        .unwrap_or_else(|| subtotal.calculate_tax(tax_rate));
    let total = subtotal
        .checked_sub(discount)
        .and_then(|net| net.checked_add(tax))
        .ok_or_else(|| ValidationError::overflow("total"))?;
    let change = header
        .amount_paid
        .checked_sub(total)
        .ok_or_else(|| ValidationError::overflow("change"))?;

    Ok(SaleTotals {
        subtotal,
        discount,
        tax,
        total,
        amount_paid: header.amount_paid,
        change,
    })
}

fn checked_sum<I>(field: &str, amounts: I) -> ValidationResult<Money>
where
    I: IntoIterator<Item = Option<Money>>,
{
    amounts.into_iter().try_fold(Money::zero(), |acc, amount| {
        amount
            .and_then(|amount| acc.checked_add(amount))
            .ok_or_else(|| ValidationError::overflow(field))
    })
}

/// Validates a sale request and returns its totals.
///
/// ## Rejections
/// - no lines → `EmptyCart`
/// - a line with `qty <= 0` or above `MAX_LINE_QUANTITY`, a negative price
///   or a discount above its price
/// - amounts too large for minor units → `AmountOverflow`
/// - a negative header discount, tax or payment
/// - discounts larger than the subtotal
/// - `amount_paid < total` → `InsufficientPayment`, for every payment type
/// - a `Credit` sale without a named customer
pub fn validate_sale(
    header: &SaleHeader,
    lines: &[SaleLine],
    tax_rate: TaxRate,
) -> ValidationResult<SaleTotals> {
    if lines.is_empty() {
        return Err(ValidationError::EmptyCart);
    }

    if let Some(number) = &header.invoice_number {
        validate_document_number("invoice_number", number)?;
    }

    if header.payment_type == PaymentType::Credit
        && header.customer_id.map_or(true, |id| id == WALK_IN_CUSTOMER_ID)
    {
        return Err(ValidationError::required("customer_id"));
    }

    for line in lines {
        validate_name("product_code", &line.product_code)?;
        validate_name("product_name", &line.product_name)?;
        validate_quantity(line.qty)?;
        validate_amount("price", line.price)?;
        validate_amount("discount", line.discount)?;
        if line.discount > line.price {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: line.price.cents(),
            });
        }
    }

    validate_amount("discount", header.discount)?;
    if let Some(tax) = header.tax {
        validate_amount("tax", tax)?;
    }
    validate_amount("amount_paid", header.amount_paid)?;

    let totals = compute_sale_totals(header, lines, tax_rate)?;

    if totals.discount > totals.subtotal {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: totals.subtotal.cents(),
        });
    }

    if totals.amount_paid < totals.total {
        return Err(ValidationError::InsufficientPayment {
            total: totals.total,
            paid: totals.amount_paid,
        });
    }

    Ok(totals)
}

// =============================================================================
// Purchase
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseHeader {
    pub purchase_number: Option<String>,
    pub supplier_id: i64,
    #[ts(as = "Option<String>")]
    pub purchase_date: Option<NaiveDateTime>,
    pub tax: Money,
    pub amount_paid: Money,
    pub notes: Option<String>,
}

impl PurchaseHeader {
    pub fn new(supplier_id: i64) -> Self {
        PurchaseHeader {
            purchase_number: None,
            supplier_id,
            purchase_date: None,
            tax: Money::zero(),
            amount_paid: Money::zero(),
            notes: None,
        }
    }

    pub fn with_tax(mut self, tax: Money) -> Self {
        self.tax = tax;
        self
    }

    pub fn with_amount_paid(mut self, paid: Money) -> Self {
        self.amount_paid = paid;
        self
    }

    pub fn with_purchase_number(mut self, number: impl Into<String>) -> Self {
        self.purchase_number = Some(number.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.purchase_date = Some(date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseLine {
    pub product_id: i64,
    pub product_code: String,
    pub product_name: String,
    pub qty: i64,
    /// Unit cost; becomes the product's cost price when posted.
    pub cost_price: Money,
}

impl PurchaseLine {
    pub fn new(
        product_id: i64,
        product_code: impl Into<String>,
        product_name: impl Into<String>,
        qty: i64,
        cost_price: Money,
    ) -> Self {
        PurchaseLine {
            product_id,
            product_code: product_code.into(),
            product_name: product_name.into(),
            qty,
            cost_price,
        }
    }

    #[inline]
    pub fn total(&self) -> Money {
        self.cost_price * self.qty
    }

    pub fn stock_movement(&self) -> StockMovement {
        StockMovement::inbound(self.product_id, self.qty, MovementReason::Purchase)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub amount_paid: Money,
    pub payment_status: PaymentStatus,
}

pub fn compute_purchase_totals(
    header: &PurchaseHeader,
    lines: &[PurchaseLine],
) -> ValidationResult<PurchaseTotals> {
    let subtotal = checked_sum(
        "subtotal",
        lines.iter().map(|l| l.cost_price.multiply_quantity(l.qty)),
    )?;
    let total = subtotal
        .checked_add(header.tax)
        .ok_or_else(|| ValidationError::overflow("total"))?;

    Ok(PurchaseTotals {
        subtotal,
        tax: header.tax,
        total,
        amount_paid: header.amount_paid,
        payment_status: PaymentStatus::from_amounts(total, header.amount_paid),
    })
}

pub fn validate_purchase(
    header: &PurchaseHeader,
    lines: &[PurchaseLine],
) -> ValidationResult<PurchaseTotals> {
    if lines.is_empty() {
        return Err(ValidationError::NoLines {
            document: "Purchase".to_string(),
        });
    }

    if let Some(number) = &header.purchase_number {
        validate_document_number("purchase_number", number)?;
    }

    for line in lines {
        validate_name("product_code", &line.product_code)?;
        validate_name("product_name", &line.product_name)?;
        validate_quantity(line.qty)?;
        validate_amount("cost_price", line.cost_price)?;
    }

    validate_amount("tax", header.tax)?;
    validate_amount("amount_paid", header.amount_paid)?;

    compute_purchase_totals(header, lines)
}

// =============================================================================
// Return
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReturnHeader {
    pub return_number: Option<String>,
    pub sale_id: i64,
    /// Copied from the sale when absent.
    pub original_invoice_number: Option<String>,
    #[ts(as = "Option<String>")]
    pub return_date: Option<NaiveDateTime>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl ReturnHeader {
    pub fn new(sale_id: i64) -> Self {
        ReturnHeader {
            return_number: None,
            sale_id,
            original_invoice_number: None,
            return_date: None,
            reason: None,
            notes: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_return_number(mut self, number: impl Into<String>) -> Self {
        self.return_number = Some(number.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.return_date = Some(date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReturnLine {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    /// Refund per unit.
    pub price: Money,
}

impl ReturnLine {
    pub fn new(product_id: i64, product_name: impl Into<String>, quantity: i64, price: Money) -> Self {
        ReturnLine {
            product_id,
            product_name: product_name.into(),
            quantity,
            price,
        }
    }

    #[inline]
    pub fn total(&self) -> Money {
        self.price * self.quantity
    }

    pub fn stock_movement(&self) -> StockMovement {
        StockMovement::inbound(self.product_id, self.quantity, MovementReason::Return)
    }
}

pub fn compute_return_total(lines: &[ReturnLine]) -> ValidationResult<Money> {
    checked_sum(
        "total",
        lines.iter().map(|l| l.price.multiply_quantity(l.quantity)),
    )
}

pub fn validate_return(header: &ReturnHeader, lines: &[ReturnLine]) -> ValidationResult<Money> {
    if lines.is_empty() {
        return Err(ValidationError::NoLines {
            document: "Return".to_string(),
        });
    }

    if let Some(number) = &header.return_number {
        validate_document_number("return_number", number)?;
    }

    for line in lines {
        validate_name("product_name", &line.product_name)?;
        validate_quantity(line.quantity)?;
        validate_amount("price", line.price)?;
    }

    compute_return_total(lines)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(v: i64) -> Money {
        Money::from_cents(v)
    }

    fn line(qty: i64, price: i64) -> SaleLine {
        SaleLine::new(1, "P-1", "Product One", qty, cents(price))
    }

    #[test]
    fn test_single_line_sale_totals() {
        let header = SaleHeader::new(PaymentType::Cash, cents(300));
        let totals = validate_sale(&header, &[line(3, 100)], TaxRate::zero()).unwrap();

        assert_eq!(totals.subtotal, cents(300));
        assert_eq!(totals.discount, Money::zero());
        assert_eq!(totals.total, cents(300));
        assert_eq!(totals.change, Money::zero());
    }

    #[test]
    fn test_discounts_and_explicit_tax() {
        let header = SaleHeader::new(PaymentType::Card, cents(2000))
            .with_discount(cents(50))
            .with_tax(cents(120));
        let lines = vec![
            line(2, 500).with_discount(cents(25)), // gross 1000, discount 50
            line(1, 700),
        ];

        let totals = validate_sale(&header, &lines, TaxRate::from_bps(1700)).unwrap();

        assert_eq!(totals.subtotal, cents(1700));
        assert_eq!(totals.discount, cents(100));
        assert_eq!(totals.tax, cents(120));
        assert_eq!(totals.total, cents(1720));
        assert_eq!(totals.change, cents(280));
        assert_eq!(totals.total, totals.subtotal - totals.discount + totals.tax);
        assert_eq!(totals.change, totals.amount_paid - totals.total);
        assert_eq!(lines[0].total(), cents(950));
    }

    #[test]
    fn test_tax_from_store_rate_on_subtotal() {
        // Store rate applies to the subtotal before discounts.
        let header = SaleHeader::new(PaymentType::Cash, cents(10_000)).with_discount(cents(100));
        let totals =
            compute_sale_totals(&header, &[line(1, 1000)], TaxRate::from_bps(1000)).unwrap();
        assert_eq!(totals.tax, cents(100));
        assert_eq!(totals.total, cents(1000));
    }

    #[test]
    fn test_empty_cart_rejected() {
        let header = SaleHeader::new(PaymentType::Cash, cents(0));
        assert!(matches!(
            validate_sale(&header, &[], TaxRate::zero()),
            Err(ValidationError::EmptyCart)
        ));
    }

    #[test]
    fn test_insufficient_payment_rejected() {
        let header = SaleHeader::new(PaymentType::Cash, cents(50));
        let err = validate_sale(&header, &[line(3, 100)], TaxRate::zero()).unwrap_err();
        match err {
            ValidationError::InsufficientPayment { total, paid } => {
                assert_eq!(total, cents(300));
                assert_eq!(paid, cents(50));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_insufficient_payment_applies_to_credit_sales() {
        let header = SaleHeader::new(PaymentType::Credit, cents(0)).for_customer(2);
        assert!(matches!(
            validate_sale(&header, &[line(1, 100)], TaxRate::zero()),
            Err(ValidationError::InsufficientPayment { .. })
        ));
    }

    #[test]
    fn test_credit_sale_needs_named_customer() {
        let anonymous = SaleHeader::new(PaymentType::Credit, cents(100));
        let walk_in = SaleHeader::new(PaymentType::Credit, cents(100)).for_customer(WALK_IN_CUSTOMER_ID);

        for header in [anonymous, walk_in] {
            assert!(matches!(
                validate_sale(&header, &[line(1, 100)], TaxRate::zero()),
                Err(ValidationError::Required { .. })
            ));
        }
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let header = SaleHeader::new(PaymentType::Cash, cents(1000));
        assert!(matches!(
            validate_sale(&header, &[line(0, 100)], TaxRate::zero()),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_discount_above_price_rejected() {
        let header = SaleHeader::new(PaymentType::Cash, cents(1000));
        let lines = [line(1, 100).with_discount(cents(150))];
        assert!(matches!(
            validate_sale(&header, &lines, TaxRate::zero()),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_header_discount_above_subtotal_rejected() {
        let header = SaleHeader::new(PaymentType::Cash, cents(1000)).with_discount(cents(500));
        assert!(validate_sale(&header, &[line(1, 100)], TaxRate::zero()).is_err());
    }

    #[test]
    fn test_sale_quantity_above_cap_rejected() {
        let header = SaleHeader::new(PaymentType::Cash, Money::from_cents(i64::MAX));
        let lines = [line(crate::MAX_LINE_QUANTITY + 1, 100)];
        assert!(matches!(
            validate_sale(&header, &lines, TaxRate::zero()),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "quantity"
        ));
    }

    #[test]
    fn test_sale_amount_overflow_rejected() {
        let header = SaleHeader::new(PaymentType::Cash, Money::from_cents(i64::MAX));

        // A single line whose gross does not fit.
        let huge_price = [line(1_000, i64::MAX / 50)];
        assert!(matches!(
            validate_sale(&header, &huge_price, TaxRate::zero()),
            Err(ValidationError::AmountOverflow { ref field }) if field == "subtotal"
        ));

        // Lines that fit on their own but not summed.
        let two_halves = [line(1, i64::MAX / 2 + 1), line(1, i64::MAX / 2 + 1)];
        assert!(matches!(
            validate_sale(&header, &two_halves, TaxRate::zero()),
            Err(ValidationError::AmountOverflow { .. })
        ));

        // Explicit tax pushing the total past the limit.
        let taxed = header.clone().with_tax(Money::from_cents(i64::MAX));
        assert!(matches!(
            validate_sale(&taxed, &[line(1, 100)], TaxRate::zero()),
            Err(ValidationError::AmountOverflow { ref field }) if field == "total"
        ));
    }

    #[test]
    fn test_sale_line_moves_stock_out() {
        let movement = line(3, 100).stock_movement();
        assert_eq!(movement.delta, -3);
        assert_eq!(movement.reason, MovementReason::Sale);
    }

    #[test]
    fn test_purchase_totals_and_status() {
        let lines = vec![
            PurchaseLine::new(1, "P-1", "Product One", 20, cents(40)),
            PurchaseLine::new(2, "P-2", "Product Two", 5, cents(100)),
        ];

        let unpaid = validate_purchase(&PurchaseHeader::new(1), &lines).unwrap();
        assert_eq!(unpaid.subtotal, cents(1300));
        assert_eq!(unpaid.total, cents(1300));
        assert_eq!(unpaid.payment_status, PaymentStatus::Pending);

        let header = PurchaseHeader::new(1)
            .with_tax(cents(200))
            .with_amount_paid(cents(500));
        let partial = validate_purchase(&header, &lines).unwrap();
        assert_eq!(partial.total, cents(1500));
        assert_eq!(partial.payment_status, PaymentStatus::Partial);

        assert_eq!(lines[0].stock_movement().delta, 20);
    }

    #[test]
    fn test_purchase_requires_lines() {
        assert!(matches!(
            validate_purchase(&PurchaseHeader::new(1), &[]),
            Err(ValidationError::NoLines { .. })
        ));
    }

    #[test]
    fn test_purchase_amount_overflow_rejected() {
        let lines = [PurchaseLine::new(1, "P-1", "Product One", 500_000, cents(i64::MAX / 1_000))];
        assert!(matches!(
            validate_purchase(&PurchaseHeader::new(1), &lines),
            Err(ValidationError::AmountOverflow { ref field }) if field == "subtotal"
        ));

        let header = PurchaseHeader::new(1).with_tax(cents(i64::MAX));
        let small = [PurchaseLine::new(1, "P-1", "Product One", 1, cents(100))];
        assert!(matches!(
            validate_purchase(&header, &small),
            Err(ValidationError::AmountOverflow { ref field }) if field == "total"
        ));

        let too_many = [PurchaseLine::new(1, "P-1", "Product One", crate::MAX_LINE_QUANTITY + 1, cents(1))];
        assert!(matches!(
            validate_purchase(&PurchaseHeader::new(1), &too_many),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_return_total() {
        let lines = vec![
            ReturnLine::new(1, "Product One", 3, cents(100)),
            ReturnLine::new(2, "Product Two", 1, cents(250)),
        ];
        assert_eq!(validate_return(&ReturnHeader::new(9), &lines).unwrap(), cents(550));
        assert_eq!(lines[0].stock_movement().delta, 3);
    }

    #[test]
    fn test_return_rejects_bad_lines() {
        assert!(validate_return(&ReturnHeader::new(9), &[]).is_err());
        let zero = [ReturnLine::new(1, "Product One", 0, cents(100))];
        assert!(validate_return(&ReturnHeader::new(9), &zero).is_err());
    }

    #[test]
    fn test_return_amount_overflow_rejected() {
        let lines = [ReturnLine::new(1, "Product One", 1_000, cents(i64::MAX / 50))];
        assert!(matches!(
            validate_return(&ReturnHeader::new(9), &lines),
            Err(ValidationError::AmountOverflow { ref field }) if field == "total"
        ));

        let too_many = [ReturnLine::new(1, "Product One", crate::MAX_LINE_QUANTITY + 1, cents(1))];
        assert!(matches!(
            validate_return(&ReturnHeader::new(9), &too_many),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}
