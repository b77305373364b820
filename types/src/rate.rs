//! The negotiated rate entity (SPEC_FULL.md §3.3).

use crate::money::Money;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateType {
    Amount,
    Percentage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegotiatedRate {
    pub amount: Money,
    pub rate_type: RateType,
    #[serde(default)]
    pub payment_method_code: Option<String>,
    pub found: bool,
}

impl NegotiatedRate {
    /// The effective service amount the engine should start from: `amount`
    /// directly for `Amount` rates, or `billed * amount / 100` for
    /// `Percentage` rates (SPEC_FULL.md §3.3).
    pub fn effective_amount(&self, billed: &Money) -> Money {
        match self.rate_type {
            RateType::Amount => self.amount.clone(),
            RateType::Percentage => billed * &self.amount / Money::from(100),
        }
    }
}
