//! Bidding strategies — valuation engine, budget pacing, and the shared
//! bidder contract they implement.

pub mod engine;
pub mod paced;
pub mod sampler;
pub mod valuation;

pub use engine::ValuationBidder;
pub use paced::PacedBidder;

use crate::types::BidderError;

/// Round-by-round contract every strategy implements.
///
/// A session drives a bidder through repeated pairs of calls: one sealed
/// bid for the current round, then the revealed outcome of that round.
/// Methods take `&mut self`, so operations on one instance are serialized
/// by the borrow checker; see [`crate::actor`] for sharing across tasks.
pub trait Bidder: Send {
    /// Produce the sealed bid for the current round.
    fn place_bid(&mut self) -> Result<i64, BidderError>;

    /// Observe a completed round: this bidder's own bid and the opponent's.
    fn record_outcome(&mut self, own: i64, opponent: i64) -> Result<(), BidderError>;
}

impl Bidder for ValuationBidder {
    fn place_bid(&mut self) -> Result<i64, BidderError> {
        ValuationBidder::place_bid(self)
    }

    fn record_outcome(&mut self, own: i64, opponent: i64) -> Result<(), BidderError> {
        ValuationBidder::record_outcome(self, own, opponent)
    }
}

impl Bidder for PacedBidder {
    fn place_bid(&mut self) -> Result<i64, BidderError> {
        PacedBidder::place_bid(self)
    }

    fn record_outcome(&mut self, own: i64, opponent: i64) -> Result<(), BidderError> {
        PacedBidder::record_outcome(self, own, opponent)
    }
}
