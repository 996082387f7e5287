// region:    --- Imports
use super::queries;
use crate::auction::model::{Auction, AuctionDetail, BidSummary};
use crate::bidding::model::{Bid, User};
use crate::database::DatabaseManager;
use crate::error::AppError;
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// Fetch one auction
pub async fn get_auction(
    db_manager: &DatabaseManager,
    auction_id: i64,
) -> Result<Auction, AppError> {
    info!("{:<12} --> get auction id: {}", "Query", auction_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, Auction>(queries::GET_AUCTION)
                    .bind(auction_id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or(AppError::AuctionNotFound)
            })
        })
        .await
}

/// Fetch an auction with its derived bid list
pub async fn get_auction_detail(
    db_manager: &DatabaseManager,
    auction_id: i64,
) -> Result<AuctionDetail, AppError> {
    info!("{:<12} --> get auction detail id: {}", "Query", auction_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let auction = sqlx::query_as::<_, Auction>(queries::GET_AUCTION)
                    .bind(auction_id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or(AppError::AuctionNotFound)?;

                let bids = sqlx::query_as::<_, BidSummary>(queries::GET_BID_SUMMARIES)
                    .bind(auction_id)
                    .fetch_all(&mut **tx)
                    .await?;

                Ok(AuctionDetail { auction, bids })
            })
        })
        .await
}

/// Fetch all auctions
pub async fn get_all_auctions(db_manager: &DatabaseManager) -> Result<Vec<Auction>, AppError> {
    info!("{:<12} --> get all auctions", "Query");
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                Ok(sqlx::query_as::<_, Auction>(queries::GET_ALL_AUCTIONS)
                    .fetch_all(&mut **tx)
                    .await?)
            })
        })
        .await
}

/// Fetch bid history for an auction
pub async fn get_auction_bids(
    db_manager: &DatabaseManager,
    auction_id: i64,
) -> Result<Vec<Bid>, AppError> {
    info!("{:<12} --> get auction bids id: {}", "Query", auction_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                Ok(sqlx::query_as::<_, Bid>(queries::GET_AUCTION_BIDS)
                    .bind(auction_id)
                    .fetch_all(&mut **tx)
                    .await?)
            })
        })
        .await
}

/// Fetch the highest bid amount for an auction, if any
pub async fn get_highest_bid(
    db_manager: &DatabaseManager,
    auction_id: i64,
) -> Result<Option<i64>, AppError> {
    info!("{:<12} --> get highest bid id: {}", "Query", auction_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                Ok(sqlx::query_scalar::<_, Option<i64>>(queries::GET_HIGHEST_BID)
                    .bind(auction_id)
                    .fetch_one(&mut **tx)
                    .await?)
            })
        })
        .await
}

/// Fetch the bid that holds an auction's current price
pub async fn find_winning_bid(
    db_manager: &DatabaseManager,
    auction_id: i64,
) -> Result<Option<Bid>, AppError> {
    info!("{:<12} --> find winning bid id: {}", "Query", auction_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                Ok(sqlx::query_as::<_, Bid>(queries::FIND_WINNING_BID)
                    .bind(auction_id)
                    .fetch_optional(&mut **tx)
                    .await?)
            })
        })
        .await
}

/// Fetch one user
pub async fn get_user(db_manager: &DatabaseManager, user_id: i64) -> Result<User, AppError> {
    info!("{:<12} --> get user id: {}", "Query", user_id);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query_as::<_, User>(queries::GET_USER)
                    .bind(user_id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or(AppError::UserNotFound)
            })
        })
        .await
}

// endregion: --- Query Handlers
