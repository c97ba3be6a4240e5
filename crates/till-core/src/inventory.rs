//! # Inventory Rules
//!
//! Pure stock arithmetic. The storage side (`till-db::ledger::inventory`)
//! applies the movements computed here inside the caller's transaction.
//!
//! ```text
//! Sale line     qty 3  ──►  StockMovement { delta: -3 }
//! Purchase line qty 20 ──►  StockMovement { delta: +20 }
//! Return line   qty 3  ──►  StockMovement { delta: +3 }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Low stock is `stock_qty <= min_stock_level`, evaluated on read.
#[inline]
pub fn is_low_stock(stock_qty: i64, min_stock_level: i64) -> bool {
    stock_qty <= min_stock_level
}

// =============================================================================
// Stock Movements
// =============================================================================

/// Why stock moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementReason {
    Sale,
    Purchase,
    Return,
}

impl fmt::Display for MovementReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MovementReason::Sale => "sale",
            MovementReason::Purchase => "purchase",
            MovementReason::Return => "return",
        };
        f.write_str(s)
    }
}

/// A signed change to one product's stock level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockMovement {
    pub product_id: i64,
    pub delta: i64,
    pub reason: MovementReason,
}

impl StockMovement {
    /// Stock leaves the shelf.
    pub fn outbound(product_id: i64, qty: i64, reason: MovementReason) -> Self {
        StockMovement {
            product_id,
            delta: -qty,
            reason,
        }
    }

    /// Stock arrives on the shelf.
    pub fn inbound(product_id: i64, qty: i64, reason: MovementReason) -> Self {
        StockMovement {
            product_id,
            delta: qty,
            reason,
        }
    }

    /// Stock level after this movement.
    #[inline]
    pub fn apply_to(&self, stock_qty: i64) -> i64 {
        stock_qty + self.delta
    }
}

// =============================================================================
// Stock Snapshot
// =============================================================================

/// The slice of a product row the ledger reads before moving its stock.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockSnapshot {
    pub product_id: i64,
    pub code: String,
    pub stock_qty: i64,
    pub min_stock_level: i64,
}

impl StockSnapshot {
    pub fn is_low_stock(&self) -> bool {
        is_low_stock(self.stock_qty, self.min_stock_level)
    }
}

// =============================================================================
// Policy Checks
// =============================================================================

/// Checks that an outbound movement leaves stock at zero or above.
///
/// Always passes when `allow_negative_stock` is set, which is how stores
/// that ring up goods before receiving them keep selling.
pub fn check_availability(
    snapshot: &StockSnapshot,
    movement: &StockMovement,
    allow_negative_stock: bool,
) -> CoreResult<()> {
    if allow_negative_stock || movement.delta >= 0 {
        return Ok(());
    }

    if movement.apply_to(snapshot.stock_qty) < 0 {
        return Err(CoreError::InsufficientStock {
            code: snapshot.code.clone(),
            available: snapshot.stock_qty,
            requested: -movement.delta,
        });
    }

    Ok(())
}

/// Checks that a return does not bring back more units than were sold.
///
/// `already_returned` covers every earlier return of this product against
/// the same sale, including lines earlier in the return being posted.
pub fn check_returnable(
    sale_id: i64,
    product_id: i64,
    sold: i64,
    already_returned: i64,
    requested: i64,
) -> CoreResult<()> {
    if already_returned + requested > sold {
        return Err(CoreError::ReturnExceedsSold {
            sale_id,
            product_id,
            sold,
            already_returned,
            requested,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
