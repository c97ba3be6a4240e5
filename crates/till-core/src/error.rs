//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── ValidationError  - Bad input, rejected before any write           │
//! │  └── CoreError        - Business rule / referential failures           │
//! │                                                                         │
//! │  till-db errors (separate crate)                                       │
//! │  ├── DbError          - Storage gateway failures                       │
//! │  └── LedgerError      - What a ledger operation returns                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → LedgerError → caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule and referential errors.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Customer not found: {0}")]
    CustomerNotFound(i64),

    #[error("Supplier not found: {0}")]
    SupplierNotFound(i64),

    #[error("Sale not found: {0}")]
    SaleNotFound(i64),

    /// Selling more than is on hand while the store disallows negative stock.
    ///
    /// ## User Workflow
    /// ```text
    /// CreateSale (qty: 5 of COKE)
    ///      │
    ///      ▼
    /// stock snapshot: 3, allow_negative_stock = false
    ///      │
    ///      ▼
    /// InsufficientStock { code: "COKE", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// whole sale rolled back
    /// ```
    #[error("Insufficient stock for {code}: available {available}, requested {requested}")]
    InsufficientStock {
        code: String,
        available: i64,
        requested: i64,
    },

    /// Returning more units of a product than the referenced sale sold.
    #[error(
        "Cannot return {requested} of product {product_id} on sale {sale_id}: \
         sold {sold}, already returned {already_returned}"
    )]
    ReturnExceedsSold {
        sale_id: i64,
        product_id: i64,
        sold: i64,
        already_returned: i64,
        requested: i64,
    },

    /// Only raised when the credit limit is configured as a hard stop.
    #[error("Credit limit exceeded for customer {customer_id}: limit {limit}, balance would be {balance}")]
    CreditLimitExceeded {
        customer_id: i64,
        limit: Money,
        balance: Money,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True for errors caused by an identifier that does not resolve.
    pub fn is_referential(&self) -> bool {
        matches!(
            self,
            CoreError::ProductNotFound(_)
                | CoreError::CustomerNotFound(_)
                | CoreError::SupplierNotFound(_)
                | CoreError::SaleNotFound(_)
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Everything here is detected from the request alone, so the ledger
/// rejects it before opening a transactional scope.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A sale with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// A purchase or return with no lines.
    #[error("{document} must have at least one line")]
    NoLines { document: String },

    #[error("Insufficient payment: total {total}, paid {paid}")]
    InsufficientPayment { total: Money, paid: Money },

    #[error("Invalid payment type: '{0}'")]
    InvalidPaymentType(String),

    #[error("Invalid payment status: '{0}'")]
    InvalidPaymentStatus(String),

    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} cannot be negative")]
    Negative { field: String },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// An amount derived from the request does not fit in minor units.
    #[error("{field} is too large to record")]
    AmountOverflow { field: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    pub fn must_be_positive(field: impl Into<String>) -> Self {
        ValidationError::MustBePositive {
            field: field.into(),
        }
    }

    pub fn negative(field: impl Into<String>) -> Self {
        ValidationError::Negative {
            field: field.into(),
        }
    }

    pub fn overflow(field: impl Into<String>) -> Self {
        ValidationError::AmountOverflow {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::insufficient_stock(
        CoreError::InsufficientStock { code: "COKE-330".to_string(), available: 3, requested: 5 },
        "Insufficient stock for COKE-330: available 3, requested 5"
    )]
    #[case::return_exceeds_sold(
        CoreError::ReturnExceedsSold { sale_id: 7, product_id: 2, sold: 3, already_returned: 1, requested: 5 },
        "Cannot return 5 of product 2 on sale 7: sold 3, already returned 1"
    )]
    #[case::credit_limit(
        CoreError::CreditLimitExceeded {
            customer_id: 4,
            limit: Money::from_cents(10_000),
            balance: Money::from_cents(12_550),
        },
        "Credit limit exceeded for customer 4: limit 100.00, balance would be 125.50"
    )]
    #[case::supplier_missing(CoreError::SupplierNotFound(9), "Supplier not found: 9")]
    fn test_core_error_display(#[case] error: CoreError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::empty_cart(ValidationError::EmptyCart, "Cart is empty")]
    #[case::insufficient_payment(
        ValidationError::InsufficientPayment {
            total: Money::from_cents(30_000),
            paid: Money::from_cents(5_000),
        },
        "Insufficient payment: total 300.00, paid 50.00"
    )]
    #[case::invalid_payment_type(
        ValidationError::InvalidPaymentType("Cheque".to_string()),
        "Invalid payment type: 'Cheque'"
    )]
    #[case::no_lines(
        ValidationError::NoLines { document: "Purchase".to_string() },
        "Purchase must have at least one line"
    )]
    #[case::required(ValidationError::required("code"), "code is required")]
    #[case::overflow(ValidationError::overflow("subtotal"), "subtotal is too large to record")]
    fn test_validation_error_display(#[case] error: ValidationError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::EmptyCart.into();
        assert!(matches!(core_err, CoreError::Validation(ValidationError::EmptyCart)));
        assert!(!core_err.is_referential());
    }

    #[test]
    fn test_referential_classification() {
        assert!(CoreError::ProductNotFound(1).is_referential());
        assert!(CoreError::SaleNotFound(1).is_referential());
        assert!(!CoreError::CreditLimitExceeded {
            customer_id: 2,
            limit: Money::zero(),
            balance: Money::from_cents(1),
        }
        .is_referential());
    }
}
