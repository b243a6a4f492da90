//! auctionbot — autonomous sealed-bid auction bidding agent.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! assembles the two configured bidders, and plays one full session.

use anyhow::{bail, Result};
use tracing::info;

use auctionbot::actor::{BidderActor, BidderHandle};
use auctionbot::config::{AppConfig, SessionConfig};
use auctionbot::driver::{self, SessionReport};
use auctionbot::strategy::{Bidder, PacedBidder, ValuationBidder};
use auctionbot::types::SessionParams;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    info!(
        quantity = cfg.session.quantity,
        cash = cfg.session.cash,
        lot_size = cfg.session.lot_size,
        home = %cfg.agents.home,
        rival = %cfg.agents.rival,
        "auctionbot starting up"
    );

    let params = SessionParams::derive(
        cfg.session.quantity,
        cfg.session.cash,
        cfg.session.lot_size,
    )?;

    // Confine each bidder to its own task; the driver talks to handles.
    let home = spawn_bidder(&cfg.agents.home, &cfg.session)?;
    let rival = spawn_bidder(&cfg.agents.rival, &cfg.session)?;

    let report = driver::run_session(&home, &rival, &params).await?;
    log_report(&report);

    if std::env::var("AUCTION_REPORT_JSON").is_ok() {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

/// Build the named strategy and move it onto its own task.
fn spawn_bidder(kind: &str, session: &SessionConfig) -> Result<BidderHandle> {
    let bidder: Box<dyn Bidder> = match kind {
        "valuation" => Box::new(ValuationBidder::with_lot_size(
            session.quantity,
            session.cash,
            session.lot_size,
        )?),
        "paced" => Box::new(PacedBidder::with_lot_size(
            session.quantity,
            session.cash,
            session.lot_size,
        )?),
        other => bail!("unknown strategy: {other}"),
    };
    Ok(BidderActor::spawn(kind, bidder))
}

/// Log a human-readable session summary.
fn log_report(report: &SessionReport) {
    info!(
        session_id = %report.session_id,
        rounds = report.rounds.len(),
        home_units = report.home_units,
        rival_units = report.rival_units,
        home_spent = report.home_spent,
        rival_spent = report.rival_spent,
        winner = ?report.winner,
        "session finished"
    );
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("auctionbot=info"));

    let json_logging = std::env::var("AUCTION_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
