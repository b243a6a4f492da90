//! Valuation bidding engine.
//!
//! Stateful per-session strategy for a repeated sealed-bid first-price
//! auction against a single opponent. Tracks the opponent's revealed bids
//! to estimate their remaining budget, bids under one of two valuation
//! ceilings depending on progress toward a strict majority of rounds, and
//! switches to outbid-their-bankroll tactics in the endgame.

use tracing::debug;

use crate::strategy::sampler::{BidSampler, UniformSampler};
use crate::types::{BidderError, SessionParams, DEFAULT_LOT_SIZE};

/// Bid when sitting a round out to preserve cash.
const SAVE_BID: i64 = 0;

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Bidding engine with a fixed win-quota objective (strict majority of
/// rounds) under a hard budget constraint.
///
/// Construction is fallible and only yields a ready engine, so there is no
/// uninitialized state to guard at runtime. Methods take `&mut self`:
/// operations on one instance are mutually exclusive by construction. For
/// cross-task sharing, confine the engine to a task via
/// [`crate::actor::BidderActor`].
pub struct ValuationBidder {
    params: SessionParams,
    cash_balance: i64,
    won_rounds: i64,
    opponent_won_rounds: i64,
    opponent_bids: Vec<i64>,
    sampler: Box<dyn BidSampler>,
}

impl std::fmt::Debug for ValuationBidder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValuationBidder")
            .field("params", &self.params)
            .field("cash_balance", &self.cash_balance)
            .field("won_rounds", &self.won_rounds)
            .field("opponent_won_rounds", &self.opponent_won_rounds)
            .field("opponent_bids", &self.opponent_bids)
            .field("sampler", &"<dyn BidSampler>")
            .finish()
    }
}

impl ValuationBidder {
    /// Create an engine for a session with the default lot size.
    pub fn new(quantity: i64, cash: i64) -> Result<Self, BidderError> {
        Self::with_lot_size(quantity, cash, DEFAULT_LOT_SIZE)
    }

    /// Create an engine for a session with an explicit lot size.
    pub fn with_lot_size(quantity: i64, cash: i64, lot_size: i64) -> Result<Self, BidderError> {
        let params = SessionParams::derive(quantity, cash, lot_size)?;
        Ok(Self {
            params,
            cash_balance: params.total_cash,
            won_rounds: 0,
            opponent_won_rounds: 0,
            opponent_bids: Vec::new(),
            sampler: Box::new(UniformSampler),
        })
    }

    /// Replace the random source (deterministic samplers in tests).
    pub fn with_sampler(mut self, sampler: Box<dyn BidSampler>) -> Self {
        self.sampler = sampler;
        self
    }

    /// Start a fresh session on the same engine: re-derives all parameters
    /// and clears every counter and the opponent history. Validation runs
    /// before any mutation, so a failed reset leaves the session untouched.
    pub fn reset(&mut self, quantity: i64, cash: i64) -> Result<(), BidderError> {
        let params = SessionParams::derive(quantity, cash, self.params.lot_size)?;
        self.params = params;
        self.cash_balance = params.total_cash;
        self.won_rounds = 0;
        self.opponent_won_rounds = 0;
        self.opponent_bids.clear();
        Ok(())
    }

    /// Immutable session parameters.
    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    /// Remaining spendable cash.
    pub fn cash_balance(&self) -> i64 {
        self.cash_balance
    }

    /// Rounds won so far.
    pub fn won_rounds(&self) -> i64 {
        self.won_rounds
    }

    /// Rounds the opponent won so far (ties included).
    pub fn opponent_won_rounds(&self) -> i64 {
        self.opponent_won_rounds
    }

    /// Completed rounds observed so far.
    pub fn rounds_played(&self) -> usize {
        self.opponent_bids.len()
    }

    /// Produce the sealed bid for the current round.
    ///
    /// Reads state without mutating it; the bounded random draw in the
    /// mid-game branch is the only nondeterminism.
    pub fn place_bid(&mut self) -> Result<i64, BidderError> {
        if self.cash_balance == 0 {
            debug!("budget exhausted, sitting the round out");
            return Ok(SAVE_BID);
        }

        // First round: nothing observed yet, open conservatively.
        if self.opponent_bids.is_empty() {
            let opening = self.params.optimal_valuation / 2;
            debug!(bid = opening, "opening bid");
            return Ok(opening);
        }

        let min_rounds_to_win = self.params.min_rounds_to_win();
        let valuation = if self.won_rounds < min_rounds_to_win {
            self.params.optimal_valuation
        } else {
            // Majority secured: the cheaper win-all-remaining ceiling.
            self.params.base_valuation
        };

        let opponent_spend: i64 = self.opponent_bids.iter().sum();
        let opponent_cash = self.params.total_cash - opponent_spend;

        // Endgame: the opponent can no longer match the ceiling, or either
        // side is one win from a majority. Bid just past their estimated
        // remaining cash, falling back to a tie amount, then to saving.
        if opponent_cash < valuation
            || self.won_rounds == min_rounds_to_win - 1
            || self.opponent_won_rounds == min_rounds_to_win - 1
        {
            let bid = self.bid_or_save(opponent_cash + 1, opponent_cash);
            debug!(
                bid,
                opponent_cash,
                won = self.won_rounds,
                opponent_won = self.opponent_won_rounds,
                "endgame bid"
            );
            return Ok(bid);
        }

        let average_opponent_bid = opponent_spend / self.opponent_bids.len() as i64;
        if average_opponent_bid <= valuation {
            let bid = self.sampler.pick(average_opponent_bid, valuation + 1)?;
            debug!(bid, average_opponent_bid, valuation, "randomized bid");
            return Ok(if self.cash_balance >= bid { bid } else { SAVE_BID });
        }

        // Opponent's average already exceeds what this ceiling justifies.
        debug!(average_opponent_bid, valuation, "minimal defensive bid");
        Ok(1)
    }

    /// Record a completed round: both revealed bids, viewed from this
    /// engine's side. A tie counts as an opponent win.
    ///
    /// The reported own bid is trusted as-is; callers must not report a bid
    /// exceeding the last value returned by [`Self::place_bid`].
    pub fn record_outcome(&mut self, own: i64, opponent: i64) -> Result<(), BidderError> {
        if own < 0 || opponent < 0 {
            return Err(BidderError::NegativeBid { own, opponent });
        }

        if own > opponent {
            self.won_rounds += 1;
        } else {
            self.opponent_won_rounds += 1;
        }

        self.cash_balance -= own;
        self.opponent_bids.push(opponent);
        Ok(())
    }

    fn bid_or_save(&self, win_bid: i64, tie_bid: i64) -> i64 {
        if self.cash_balance >= win_bid {
            win_bid
        } else if self.cash_balance >= tie_bid {
            tie_bid
        } else {
            SAVE_BID
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::sampler::MockBidSampler;
    use crate::strategy::valuation;
    use crate::types::DEFAULT_LOT_SIZE;

    fn make_bidder() -> ValuationBidder {
        ValuationBidder::new(10, 100).unwrap()
    }

    #[test]
    fn test_construction_rejects_quantity_below_lot() {
        let err = ValuationBidder::new(DEFAULT_LOT_SIZE - 1, 100).unwrap_err();
        assert!(matches!(err, BidderError::InsufficientQuantity { .. }));
    }

    #[test]
    fn test_construction_rejects_zero_cash() {
        let err = ValuationBidder::new(10, 0).unwrap_err();
        assert!(matches!(err, BidderError::InsufficientCash { .. }));
    }

    #[test]
    fn test_opening_bid_is_half_the_optimal_valuation() {
        let mut bidder = make_bidder();
        assert_eq!(bidder.place_bid().unwrap(), 16);
        assert_eq!(bidder.cash_balance(), 100);
    }

    #[test]
    fn test_zero_bid_when_balance_exhausted() {
        let mut bidder = make_bidder();
        bidder.record_outcome(100, 20).unwrap();
        assert_eq!(bidder.place_bid().unwrap(), 0);
    }

    #[test]
    fn test_random_bid_between_opponent_average_and_valuation() {
        let mut bidder = make_bidder();
        let opponent_bids = [20, 15, 18];
        for bid in opponent_bids {
            bidder.record_outcome(1, bid).unwrap();
        }
        let average: i64 = opponent_bids.iter().sum::<i64>() / opponent_bids.len() as i64;
        let ceiling = valuation::optimal_valuation(10, 100, DEFAULT_LOT_SIZE);

        for _ in 0..100 {
            let bid = bidder.place_bid().unwrap();
            assert!(bid >= average, "bid {bid} below average {average}");
            assert!(bid <= ceiling, "bid {bid} above ceiling {ceiling}");
        }
    }

    #[test]
    fn test_zero_bid_when_random_bid_unaffordable() {
        let mut bidder = make_bidder();
        for bid in [20, 15, 18] {
            bidder.record_outcome(1, bid).unwrap();
        }
        // Burn almost the whole budget; 7 left cannot cover any draw ≥ 13.
        bidder.record_outcome(90, 0).unwrap();

        for _ in 0..5 {
            assert_eq!(bidder.place_bid().unwrap(), 0);
        }
    }

    #[test]
    fn test_minimal_bid_when_opponent_average_exceeds_valuation() {
        let mut bidder = make_bidder();
        bidder.record_outcome(1, 50).unwrap();

        for _ in 0..5 {
            assert_eq!(bidder.place_bid().unwrap(), 1);
        }
    }

    #[test]
    fn test_base_valuation_after_majority_won() {
        let mut bidder = make_bidder();
        // Three cheap wins out of five rounds: majority secured, so the
        // ceiling drops to the base valuation.
        let opponent_bids = [2, 4, 3];
        for bid in opponent_bids {
            bidder.record_outcome(5, bid).unwrap();
        }
        let average: i64 = opponent_bids.iter().sum::<i64>() / opponent_bids.len() as i64;
        let ceiling = valuation::base_valuation(10, 100, DEFAULT_LOT_SIZE);

        for _ in 0..100 {
            let bid = bidder.place_bid().unwrap();
            assert!(bid >= average);
            assert!(bid <= ceiling);
        }
    }

    #[test]
    fn test_endgame_outbids_estimated_opponent_cash() {
        let mut bidder = make_bidder();

        // Opponent overspends: 70 gone, 30 left — below the 33 ceiling.
        bidder.record_outcome(1, 70).unwrap();
        assert_eq!(bidder.place_bid().unwrap(), 31);

        bidder.record_outcome(15, 10).unwrap();
        assert_eq!(bidder.place_bid().unwrap(), 21);

        bidder.record_outcome(20, 15).unwrap();
        assert_eq!(bidder.place_bid().unwrap(), 6);
    }

    #[test]
    fn test_endgame_tie_fallback_when_win_bid_unaffordable() {
        let mut bidder = make_bidder();
        // Both sides spend 70: 30 left each. 31 is unaffordable, so bid
        // exactly the opponent's remaining cash for the tie.
        bidder.record_outcome(70, 70).unwrap();
        assert_eq!(bidder.place_bid().unwrap(), 30);
    }

    #[test]
    fn test_endgame_when_one_win_from_majority() {
        let mut bidder = make_bidder();
        bidder.record_outcome(17, 15).unwrap(); // win
        bidder.record_outcome(20, 60).unwrap(); // loss
        bidder.record_outcome(15, 10).unwrap(); // win — one more takes the session

        for _ in 0..5 {
            assert_eq!(bidder.place_bid().unwrap(), 16);
        }
    }

    #[test]
    fn test_endgame_when_opponent_one_win_from_majority() {
        let mut bidder = make_bidder();
        bidder.record_outcome(15, 17).unwrap(); // loss
        bidder.record_outcome(15, 10).unwrap(); // win
        bidder.record_outcome(20, 60).unwrap(); // loss — opponent at match point

        for _ in 0..5 {
            assert_eq!(bidder.place_bid().unwrap(), 14);
        }
    }

    #[test]
    fn test_record_outcome_rejects_negative_bids_without_mutation() {
        let mut bidder = make_bidder();
        assert_eq!(
            bidder.record_outcome(-1, 5).unwrap_err(),
            BidderError::NegativeBid { own: -1, opponent: 5 }
        );
        assert_eq!(
            bidder.record_outcome(5, -1).unwrap_err(),
            BidderError::NegativeBid { own: 5, opponent: -1 }
        );

        // Fail-fast: nothing changed.
        assert_eq!(bidder.cash_balance(), 100);
        assert_eq!(bidder.won_rounds(), 0);
        assert_eq!(bidder.opponent_won_rounds(), 0);
        assert_eq!(bidder.rounds_played(), 0);
    }

    #[test]
    fn test_record_outcome_updates_exactly_one_counter() {
        let mut bidder = make_bidder();

        bidder.record_outcome(10, 5).unwrap();
        assert_eq!((bidder.won_rounds(), bidder.opponent_won_rounds()), (1, 0));

        bidder.record_outcome(5, 10).unwrap();
        assert_eq!((bidder.won_rounds(), bidder.opponent_won_rounds()), (1, 1));

        // Ties credit the opponent.
        bidder.record_outcome(7, 7).unwrap();
        assert_eq!((bidder.won_rounds(), bidder.opponent_won_rounds()), (1, 2));
    }

    #[test]
    fn test_record_outcome_decrements_cash_by_own_bid() {
        let mut bidder = make_bidder();
        bidder.record_outcome(16, 20).unwrap();
        assert_eq!(bidder.cash_balance(), 84);
        bidder.record_outcome(0, 20).unwrap();
        assert_eq!(bidder.cash_balance(), 84);
    }

    #[test]
    fn test_reset_restores_a_fresh_session() {
        let mut bidder = make_bidder();
        bidder.record_outcome(16, 20).unwrap();
        bidder.record_outcome(20, 15).unwrap();

        bidder.reset(20, 500).unwrap();
        assert_eq!(bidder.cash_balance(), 500);
        assert_eq!(bidder.won_rounds(), 0);
        assert_eq!(bidder.opponent_won_rounds(), 0);
        assert_eq!(bidder.rounds_played(), 0);
        // Opening bid again, now from the new session's valuation.
        let opening = valuation::optimal_valuation(20, 500, DEFAULT_LOT_SIZE) / 2;
        assert_eq!(bidder.place_bid().unwrap(), opening);
    }

    #[test]
    fn test_failed_reset_leaves_session_untouched() {
        let mut bidder = make_bidder();
        bidder.record_outcome(16, 20).unwrap();

        assert!(bidder.reset(1, 500).is_err());
        assert_eq!(bidder.cash_balance(), 84);
        assert_eq!(bidder.rounds_played(), 1);
        assert_eq!(bidder.params().total_cash, 100);
    }

    #[test]
    fn test_mock_sampler_drives_the_randomized_branch() {
        let mut sampler = MockBidSampler::new();
        // avg 17 over [20, 15, 18], optimal ceiling 33 → range [17, 34).
        sampler
            .expect_pick()
            .withf(|&min, &max| min == 17 && max == 34)
            .times(1)
            .returning(|_, _| Ok(25));

        let mut bidder = ValuationBidder::new(10, 100)
            .unwrap()
            .with_sampler(Box::new(sampler));
        for bid in [20, 15, 18] {
            bidder.record_outcome(1, bid).unwrap();
        }
        assert_eq!(bidder.place_bid().unwrap(), 25);
    }

    #[test]
    fn test_budget_safe_over_a_contract_respecting_session() {
        let mut bidder = make_bidder();
        let opponent_script = [25, 10, 40, 5, 30];

        for opponent_bid in opponent_script {
            let own = bidder.place_bid().unwrap();
            assert!(own <= bidder.cash_balance(), "bid exceeds balance");
            bidder.record_outcome(own, opponent_bid).unwrap();
            assert!(bidder.cash_balance() >= 0, "balance went negative");
        }

        assert_eq!(bidder.rounds_played(), 5);
        assert_eq!(
            bidder.won_rounds() + bidder.opponent_won_rounds(),
            bidder.rounds_played() as i64
        );
    }
}
