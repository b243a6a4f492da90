//! Budget-pacing baseline strategy.
//!
//! Spreads the remaining budget evenly over the remaining rounds. No
//! opponent modelling; useful as the sparring partner for the valuation
//! engine and as a sanity baseline in simulations.

use tracing::debug;

use crate::types::{BidderError, SessionParams, DEFAULT_LOT_SIZE};

pub struct PacedBidder {
    cash_balance: i64,
    rounds_remaining: i64,
}

impl PacedBidder {
    /// Create a pacing bidder with the default lot size.
    pub fn new(quantity: i64, cash: i64) -> Result<Self, BidderError> {
        Self::with_lot_size(quantity, cash, DEFAULT_LOT_SIZE)
    }

    /// Create a pacing bidder with an explicit lot size.
    pub fn with_lot_size(quantity: i64, cash: i64, lot_size: i64) -> Result<Self, BidderError> {
        let params = SessionParams::derive(quantity, cash, lot_size)?;
        Ok(Self {
            cash_balance: params.total_cash,
            rounds_remaining: params.total_rounds,
        })
    }

    /// Remaining spendable cash.
    pub fn cash_balance(&self) -> i64 {
        self.cash_balance
    }

    pub fn place_bid(&mut self) -> Result<i64, BidderError> {
        if self.rounds_remaining == 0 || self.cash_balance == 0 {
            return Ok(0);
        }
        let bid = self.cash_balance / self.rounds_remaining;
        debug!(bid, rounds_remaining = self.rounds_remaining, "paced bid");
        Ok(bid)
    }

    pub fn record_outcome(&mut self, own: i64, opponent: i64) -> Result<(), BidderError> {
        if own < 0 || opponent < 0 {
            return Err(BidderError::NegativeBid { own, opponent });
        }
        self.cash_balance -= own;
        self.rounds_remaining = (self.rounds_remaining - 1).max(0);
        Ok(())
    }
}
