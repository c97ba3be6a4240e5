//! # Ledger Policy
//!
//! Store-level switches for the behaviours a store owner may want either way.
//!
//! | Switch                      | Default | Effect when on                          |
//! |-----------------------------|---------|-----------------------------------------|
//! | `allow_negative_stock`      | on      | sales may drive stock below zero        |
//! | `enforce_return_quantities` | on      | returns capped at the quantity sold     |
//! | `enforce_credit_limit`      | off     | credit sales over the limit are refused |
//! | `tax_rate_bps`              | 0       | tax applied to sale subtotals           |
//!
//! Deserialized from the `[ledger]` table of `till.toml`.

use serde::{Deserialize, Serialize};

use crate::types::TaxRate;
use crate::validation::{validate_tax_rate_bps, ValidationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerPolicy {
    pub allow_negative_stock: bool,
    pub enforce_return_quantities: bool,
    /// When off, an overrun is only logged as a warning.
    pub enforce_credit_limit: bool,
    /// Used when a sale header carries no explicit tax amount.
    pub tax_rate_bps: u32,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        LedgerPolicy {
            allow_negative_stock: true,
            enforce_return_quantities: true,
            enforce_credit_limit: false,
            tax_rate_bps: 0,
        }
    }
}

impl LedgerPolicy {
    /// A policy that refuses oversells and credit overruns.
    pub fn strict() -> Self {
        LedgerPolicy {
            allow_negative_stock: false,
            enforce_return_quantities: true,
            enforce_credit_limit: true,
            tax_rate_bps: 0,
        }
    }

    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_tax_rate_bps(self.tax_rate_bps)
    }
}
