//! Valuation formulas.
//!
//! Pure integer arithmetic converting a session's (quantity, cash) into the
//! two per-lot price ceilings the bidding engine works with.

/// Ceiling for winning every remaining round: spreads the whole budget
/// evenly across all lots.
pub fn base_valuation(quantity: i64, cash: i64, lot_size: i64) -> i64 {
    cash * lot_size / quantity
}

/// Ceiling for winning only the minimum number of rounds needed for a
/// strict majority: concentrates the budget on roughly half the lots.
pub fn optimal_valuation(quantity: i64, cash: i64, lot_size: i64) -> i64 {
    cash / (quantity / (lot_size * 2) + 1)
}
