//! Task confinement for bidders.
//!
//! A bidder is a single unit of mutable state whose operations must be
//! mutually exclusive. Within one task the borrow checker enforces that;
//! for cross-task use, [`BidderActor::spawn`] moves the bidder onto its own
//! tokio task and serializes every operation through a command channel.
//! [`BidderHandle`] is the cloneable message-passing front.

use anyhow::{anyhow, Context, Result};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::strategy::Bidder;
use crate::types::BidderError;

/// Commands the bidder task processes strictly in arrival order.
enum Command {
    PlaceBid {
        reply: oneshot::Sender<Result<i64, BidderError>>,
    },
    RecordOutcome {
        own: i64,
        opponent: i64,
        reply: oneshot::Sender<Result<(), BidderError>>,
    },
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

pub struct BidderActor;

impl BidderActor {
    /// Move `bidder` onto a dedicated task and return a handle to it.
    ///
    /// The task runs until every handle is dropped; usage errors are
    /// reported back to the caller and never terminate the task.
    pub fn spawn(name: impl Into<String>, mut bidder: Box<dyn Bidder>) -> BidderHandle {
        let name = name.into();
        let (tx, mut rx) = mpsc::channel::<Command>(16);

        let task_name = name.clone();
        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    Command::PlaceBid { reply } => {
                        let _ = reply.send(bidder.place_bid());
                    }
                    Command::RecordOutcome { own, opponent, reply } => {
                        let _ = reply.send(bidder.record_outcome(own, opponent));
                    }
                }
            }
            debug!(bidder = %task_name, "all handles dropped, bidder task exiting");
        });

        BidderHandle { name, tx }
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Cloneable front for a confined bidder. All clones feed the same command
/// queue, so concurrent callers are serialized by the bidder task.
#[derive(Clone)]
pub struct BidderHandle {
    name: String,
    tx: mpsc::Sender<Command>,
}

impl BidderHandle {
    /// Display name of the bidder behind this handle.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Request the sealed bid for the current round.
    pub async fn place_bid(&self) -> Result<i64> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Command::PlaceBid { reply })
            .await
            .map_err(|_| anyhow!("bidder task '{}' terminated", self.name))?;
        let bid = response
            .await
            .with_context(|| format!("bidder task '{}' dropped the reply", self.name))??;
        Ok(bid)
    }

    /// Report a completed round to the bidder.
    pub async fn record_outcome(&self, own: i64, opponent: i64) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(Command::RecordOutcome { own, opponent, reply })
            .await
            .map_err(|_| anyhow!("bidder task '{}' terminated", self.name))?;
        response
            .await
            .with_context(|| format!("bidder task '{}' dropped the reply", self.name))??;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
