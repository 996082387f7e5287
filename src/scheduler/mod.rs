/// Auction lifecycle sweeper. Advances auction status along
/// Pending -> Active -> Ended from the stored time windows on a fixed
/// interval, and hands newly ended auctions to the notifier.
// region:    --- Imports
use crate::auction::model::Auction;
use crate::bidding::model::{Bid, User};
use crate::error::AppError;
use crate::notifier::{AuctionWonEmail, Notifier};
use crate::query::queries;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, error, info};

// endregion: --- Imports

// region:    --- Sweep Report

/// Outcome of one sweep tick.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Auctions moved Pending -> Active.
    pub started: u64,
    /// Auctions moved Active -> Ended.
    pub ended: Vec<i64>,
    /// Auctions moved Pending -> Ended: their whole window passed between
    /// sweeps, so they never went through Active.
    pub expired: Vec<i64>,
}

impl SweepReport {
    pub fn newly_ended(&self) -> impl Iterator<Item = i64> + '_ {
        self.ended.iter().chain(self.expired.iter()).copied()
    }
}

// endregion: --- Sweep Report

// region:    --- Auction Sweeper

pub struct AuctionSweeper<N> {
    pool: Arc<PgPool>,
    interval: Duration,
    notifier: Arc<N>,
}

/// Handle to a running sweeper. Dropping it leaves the sweeper running;
/// `stop` shuts it down and waits for the task to finish.
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

impl<N> AuctionSweeper<N>
where
    N: Notifier + Send + Sync + 'static,
{
    pub fn new(pool: Arc<PgPool>, interval: Duration, notifier: Arc<N>) -> Self {
        Self {
            pool,
            interval,
            notifier,
        }
    }

    /// Spawn the sweep loop. A failed tick is logged and abandoned; the
    /// next tick re-queries the same rows since nothing was advanced.
    pub fn start(self) -> SweeperHandle {
        let (shutdown, mut rx) = watch::channel(false);
        info!(
            "{:<12} --> starting, interval {:?}",
            "Sweeper", self.interval
        );

        let task = tokio::spawn(async move {
            let mut ticker = interval(self.interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.run_tick(Utc::now()).await {
                            error!("{:<12} --> sweep tick failed: {:?}", "Sweeper", e);
                        }
                    }
                    _ = rx.changed() => {
                        info!("{:<12} --> stopped", "Sweeper");
                        break;
                    }
                }
            }
        });

        SweeperHandle { shutdown, task }
    }

    /// One full tick: sweep, then winner notifications for every auction
    /// the sweep ended. Notification failures are logged per auction and
    /// never fail the tick.
    pub async fn run_tick(&self, now: DateTime<Utc>) -> Result<SweepReport, sqlx::Error> {
        let report = Self::sweep_once(&self.pool, now).await?;
        for auction_id in report.newly_ended() {
            if let Err(e) = self.notify_winner(auction_id).await {
                error!(
                    "{:<12} --> winner notification failed for auction {}: {}",
                    "Sweeper", auction_id, e
                );
            }
        }
        Ok(report)
    }

    /// One deterministic sweep against the given clock. Three bulk updates,
    /// each independent and idempotent.
    pub async fn sweep_once(
        pool: &PgPool,
        now: DateTime<Utc>,
    ) -> Result<SweepReport, sqlx::Error> {
        let started = sqlx::query(
            "UPDATE auctions SET status = 'Active'
             WHERE status = 'Pending' AND start_time <= $1 AND end_time > $1",
        )
        .bind(now)
        .execute(pool)
        .await?
        .rows_affected();

        let ended = sqlx::query_scalar::<_, i64>(
            "UPDATE auctions SET status = 'Ended'
             WHERE status = 'Active' AND end_time <= $1
             RETURNING id",
        )
        .bind(now)
        .fetch_all(pool)
        .await?;

        // Missed-window case: the process was down for the auction's whole
        // duration, so it is still Pending with its end time in the past.
        let expired = sqlx::query_scalar::<_, i64>(
            "UPDATE auctions SET status = 'Ended'
             WHERE status = 'Pending' AND end_time <= $1
             RETURNING id",
        )
        .bind(now)
        .fetch_all(pool)
        .await?;

        if started > 0 || !ended.is_empty() || !expired.is_empty() {
            info!(
                "{:<12} --> started: {}, ended: {}, expired: {}",
                "Sweeper",
                started,
                ended.len(),
                expired.len()
            );
        } else {
            debug!("{:<12} --> nothing to transition", "Sweeper");
        }

        Ok(SweepReport {
            started,
            ended,
            expired,
        })
    }

    /// Best-effort winner email for a newly ended auction. An auction that
    /// drew no bids is skipped.
    async fn notify_winner(&self, auction_id: i64) -> Result<(), AppError> {
        let pool = &*self.pool;
        let auction = sqlx::query_as::<_, Auction>(queries::GET_AUCTION)
            .bind(auction_id)
            .fetch_optional(pool)
            .await?
            .ok_or(AppError::AuctionNotFound)?;

        let Some(winning_bid) = sqlx::query_as::<_, Bid>(queries::FIND_WINNING_BID)
            .bind(auction_id)
            .fetch_optional(pool)
            .await?
        else {
            info!(
                "{:<12} --> auction {} ended with no bids",
                "Sweeper", auction_id
            );
            return Ok(());
        };

        let bidder = sqlx::query_as::<_, User>(queries::GET_USER)
            .bind(winning_bid.bidder_id)
            .fetch_optional(pool)
            .await?
            .ok_or(AppError::UserNotFound)?;
        let auctioneer = sqlx::query_as::<_, User>(queries::GET_USER)
            .bind(auction.created_by)
            .fetch_optional(pool)
            .await?
            .ok_or(AppError::UserNotFound)?;

        self.notifier
            .auction_won(AuctionWonEmail {
                to: bidder.email,
                winner_name: bidder.user_name,
                auction_title: auction.title,
                winning_bid: auction.current_bid,
                auctioneer_name: auctioneer.user_name,
                auctioneer_email: auctioneer.email,
            })
            .await
            .map_err(AppError::Notification)
    }
}

// endregion: --- Auction Sweeper
