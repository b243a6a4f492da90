//! Session orchestration.
//!
//! Plays a full auction session between two confined bidders: collects both
//! sealed bids each round, reveals the outcome to both sides, allocates the
//! round's lot, and produces a final report.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::actor::BidderHandle;
use crate::types::SessionParams;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Who took the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionWinner {
    Home,
    Rival,
    Draw,
}

/// One completed round, as seen by the driver.
#[derive(Debug, Clone, Serialize)]
pub struct RoundRecord {
    pub round: i64,
    pub home_bid: i64,
    pub rival_bid: i64,
    pub home_units: i64,
    pub rival_units: i64,
}

/// Summary of a complete session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub params: SessionParams,
    pub rounds: Vec<RoundRecord>,
    pub home_units: i64,
    pub rival_units: i64,
    pub home_spent: i64,
    pub rival_spent: i64,
    pub winner: SessionWinner,
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Run one full session of `params.total_rounds` rounds.
///
/// Each round both bidders seal a bid, then both observe the pair from
/// their own perspective. The higher bid takes the whole lot; a tie splits
/// it evenly. Bids are trusted as reported — budget discipline is the
/// engines' contract, not the driver's.
pub async fn run_session(
    home: &BidderHandle,
    rival: &BidderHandle,
    params: &SessionParams,
) -> Result<SessionReport> {
    let session_id = Uuid::new_v4();
    let started_at = Utc::now();

    info!(
        %session_id,
        home = home.name(),
        rival = rival.name(),
        rounds = params.total_rounds,
        cash = params.total_cash,
        quantity = params.total_quantity,
        "session starting"
    );

    let mut rounds = Vec::with_capacity(params.total_rounds as usize);
    let (mut home_units, mut rival_units) = (0i64, 0i64);
    let (mut home_spent, mut rival_spent) = (0i64, 0i64);

    for round in 1..=params.total_rounds {
        let home_bid = home.place_bid().await?;
        let rival_bid = rival.place_bid().await?;

        home.record_outcome(home_bid, rival_bid).await?;
        rival.record_outcome(rival_bid, home_bid).await?;

        let (home_won, rival_won) = allocate_lot(params.lot_size, home_bid, rival_bid);
        home_units += home_won;
        rival_units += rival_won;
        home_spent += home_bid;
        rival_spent += rival_bid;

        info!(
            round,
            home_bid,
            rival_bid,
            home_units,
            rival_units,
            "round complete"
        );

        rounds.push(RoundRecord {
            round,
            home_bid,
            rival_bid,
            home_units: home_won,
            rival_units: rival_won,
        });
    }

    let winner = decide_winner(
        home_units,
        rival_units,
        params.total_cash - home_spent,
        params.total_cash - rival_spent,
    );

    let report = SessionReport {
        session_id,
        started_at,
        finished_at: Utc::now(),
        params: *params,
        rounds,
        home_units,
        rival_units,
        home_spent,
        rival_spent,
        winner,
    };

    info!(
        %session_id,
        home_units,
        rival_units,
        home_spent,
        rival_spent,
        winner = ?winner,
        "session complete"
    );

    Ok(report)
}

/// First-price allocation of one lot between two sealed bids.
fn allocate_lot(lot_size: i64, home_bid: i64, rival_bid: i64) -> (i64, i64) {
    if home_bid > rival_bid {
        (lot_size, 0)
    } else if rival_bid > home_bid {
        (0, lot_size)
    } else {
        let half = lot_size / 2;
        (half, lot_size - half)
    }
}

/// More units wins; equal units falls back to more remaining cash.
fn decide_winner(
    home_units: i64,
    rival_units: i64,
    home_cash_left: i64,
    rival_cash_left: i64,
) -> SessionWinner {
    if home_units != rival_units {
        if home_units > rival_units {
            SessionWinner::Home
        } else {
            SessionWinner::Rival
        }
    } else if home_cash_left != rival_cash_left {
        if home_cash_left > rival_cash_left {
            SessionWinner::Home
        } else {
            SessionWinner::Rival
        }
    } else {
        SessionWinner::Draw
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
