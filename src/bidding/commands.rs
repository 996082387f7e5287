/// Bid placement command handling.
// region:    --- Imports
use crate::auction::model::{Auction, AuctionStatus};
use crate::database::DatabaseManager;
use crate::error::AppError;
use crate::notifier::{BidPlacedEmail, Notifier};
use crate::query::handlers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Command

/// Place-bid command. `bidder_id` comes from the gateway-authenticated
/// identity header, not the request body.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub auction_id: i64,
    pub bidder_id: i64,
    pub amount: Option<i64>,
}

// endregion: --- Command

// region:    --- Validation

/// Time/status gate. Works from the auction's time window rather than the
/// persisted status, which can lag one sweep interval behind.
pub fn check_open(auction: &Auction, now: DateTime<Utc>) -> Result<(), AppError> {
    let stored: AuctionStatus = auction
        .status
        .parse()
        .map_err(|_| AppError::InvalidStatus)?;

    match stored {
        AuctionStatus::Cancelled => return Err(AppError::InvalidStatus),
        AuctionStatus::Ended => return Err(AppError::AlreadyEnded),
        AuctionStatus::Pending | AuctionStatus::Active => {}
    }

    match AuctionStatus::from_wallclock(auction.start_time, auction.end_time, now) {
        AuctionStatus::Pending => Err(AppError::NotStarted),
        AuctionStatus::Ended => Err(AppError::AlreadyEnded),
        _ => Ok(()),
    }
}

/// Amount checks, in contract order: present, positive, above the current
/// bid, at or above the starting bid. The starting-bid check is evaluated
/// independently because `current_bid` equals `starting_bid` until the
/// first bid lands.
pub fn check_amount(
    amount: Option<i64>,
    current_bid: i64,
    starting_bid: i64,
) -> Result<i64, AppError> {
    let amount = amount.ok_or(AppError::MissingAmount)?;
    if amount <= 0 {
        return Err(AppError::InvalidAmount);
    }
    if amount <= current_bid {
        return Err(AppError::BidTooLow { current_bid });
    }
    if amount < starting_bid {
        return Err(AppError::BelowStartingBid);
    }
    Ok(amount)
}

// endregion: --- Validation

// region:    --- Place Bid

/// Validates and commits a single bid. Returns the new current bid.
///
/// The write path is one transaction: a conditional update on the auction
/// (`current_bid < amount`) that loses cleanly when a concurrent bid got
/// there first, then an upsert keyed on (auction_id, bidder_id) so a repeat
/// bid overwrites the bidder's existing record instead of adding a second.
pub async fn handle_place_bid<N>(
    cmd: PlaceBidCommand,
    db_manager: &DatabaseManager,
    notifier: Arc<N>,
) -> Result<i64, AppError>
where
    N: Notifier + Send + Sync + 'static,
{
    info!("{:<12} --> place bid: {:?}", "Command", cmd);

    let auction = handlers::get_auction(db_manager, cmd.auction_id).await?;
    let now = Utc::now();

    check_open(&auction, now)?;
    let amount = check_amount(cmd.amount, auction.current_bid, auction.starting_bid)?;

    let bidder = handlers::get_user(db_manager, cmd.bidder_id).await?;

    let auction_id = cmd.auction_id;
    let bidder_id = bidder.id;
    let bidder_name = bidder.user_name.clone();
    let profile_image = bidder.profile_image.clone();

    let new_current = db_manager
        .transaction(move |tx| {
            Box::pin(async move {
                // Conditional update: zero rows means a concurrent bid won
                // the race since validation, and this bid no longer tops it.
                let updated = sqlx::query_scalar::<_, i64>(
                    "UPDATE auctions
                     SET current_bid = $1, highest_bidder = $2
                     WHERE id = $3 AND current_bid < $1
                     RETURNING current_bid",
                )
                .bind(amount)
                .bind(bidder_id)
                .bind(auction_id)
                .fetch_optional(&mut **tx)
                .await?;

                let Some(new_current) = updated else {
                    let current_bid = sqlx::query_scalar::<_, i64>(
                        "SELECT current_bid FROM auctions WHERE id = $1",
                    )
                    .bind(auction_id)
                    .fetch_one(&mut **tx)
                    .await?;
                    return Err(AppError::BidTooLow { current_bid });
                };

                sqlx::query(
                    "INSERT INTO bids (auction_id, bidder_id, bidder_name, profile_image, amount, bid_time)
                     VALUES ($1, $2, $3, $4, $5, $6)
                     ON CONFLICT (auction_id, bidder_id)
                     DO UPDATE SET amount = EXCLUDED.amount,
                                   bidder_name = EXCLUDED.bidder_name,
                                   profile_image = EXCLUDED.profile_image,
                                   bid_time = EXCLUDED.bid_time",
                )
                .bind(auction_id)
                .bind(bidder_id)
                .bind(&bidder_name)
                .bind(&profile_image)
                .bind(amount)
                .bind(now)
                .execute(&mut **tx)
                .await?;

                Ok::<_, AppError>(new_current)
            })
        })
        .await?;

    info!(
        "{:<12} --> bid committed: auction {} current bid {}",
        "Command", auction_id, new_current
    );

    // Best-effort confirmation email. The bid is already committed, so a
    // mailer failure is logged and never surfaced to the bidder.
    let email = BidPlacedEmail {
        to: bidder.email,
        bidder_name: bidder.user_name,
        auction_title: auction.title,
        amount,
    };
    tokio::spawn(async move {
        if let Err(e) = notifier.bid_placed(email).await {
            error!("{:<12} --> bid confirmation email failed: {}", "Command", e);
        }
    });

    Ok(new_current)
}

// endregion: --- Place Bid

// endregion: --- Tests
