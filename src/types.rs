//! Core domain types: session parameters, lot-size constant, and the
//! error taxonomy shared by every strategy.

use serde::{Deserialize, Serialize};

use crate::strategy::valuation;

/// Product units sold per auction round unless configuration overrides it.
pub const DEFAULT_LOT_SIZE: i64 = 2;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Caller-usage violations. None of these are transient: every variant is
/// raised synchronously at the point of violation and never retried.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BidderError {
    #[error("lot size must be positive, got {lot_size}")]
    InvalidLotSize { lot_size: i64 },

    #[error("insufficient product quantity: {quantity} is below the lot size {lot_size}")]
    InsufficientQuantity { quantity: i64, lot_size: i64 },

    #[error("insufficient cash: {cash}")]
    InsufficientCash { cash: i64 },

    #[error("bids cannot be negative: own {own}, opponent {opponent}")]
    NegativeBid { own: i64, opponent: i64 },

    #[error("empty sample range: [{min}, {max})")]
    EmptyRange { min: i64, max: i64 },
}

// ---------------------------------------------------------------------------
// Session parameters
// ---------------------------------------------------------------------------

/// Immutable parameters of one auction session, derived once at
/// construction time and never touched afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    /// Product units sold per round.
    pub lot_size: i64,
    /// Total product units across the session.
    pub total_quantity: i64,
    /// Starting cash budget.
    pub total_cash: i64,
    /// Number of rounds in the session (`total_quantity / lot_size`).
    pub total_rounds: i64,
    /// Ceiling sized to win every remaining round at lower cost.
    pub base_valuation: i64,
    /// Ceiling sized to win a strict majority of rounds at higher cost.
    pub optimal_valuation: i64,
}

impl SessionParams {
    /// Validate the session inputs and derive all fixed parameters.
    pub fn derive(quantity: i64, cash: i64, lot_size: i64) -> Result<Self, BidderError> {
        if lot_size <= 0 {
            return Err(BidderError::InvalidLotSize { lot_size });
        }
        if quantity < lot_size {
            return Err(BidderError::InsufficientQuantity { quantity, lot_size });
        }
        if cash <= 0 {
            return Err(BidderError::InsufficientCash { cash });
        }

        Ok(Self {
            lot_size,
            total_quantity: quantity,
            total_cash: cash,
            total_rounds: quantity / lot_size,
            base_valuation: valuation::base_valuation(quantity, cash, lot_size),
            optimal_valuation: valuation::optimal_valuation(quantity, cash, lot_size),
        })
    }

    /// Strict-majority threshold: rounds needed to win the session outright.
    pub fn min_rounds_to_win(&self) -> i64 {
        self.total_rounds / 2 + 1
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
