// region:    --- Imports
use crate::bidding::commands::{self, PlaceBidCommand};
use crate::database::DatabaseManager;
use crate::error::AppError;
use crate::notifier::{AuctionWonEmail, MailerClient, Notifier};
use crate::query;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

pub type AppState = (Arc<DatabaseManager>, Arc<MailerClient>);

// region:    --- Identity Headers

/// Identity and role are established by the API gateway and forwarded as
/// headers; this service trusts them.
fn authenticated_user(headers: &HeaderMap) -> Result<i64, AppError> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .ok_or(AppError::Unauthenticated)
}

fn require_role(headers: &HeaderMap, role: &str) -> Result<(), AppError> {
    let actual = headers
        .get("x-user-role")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthenticated)?;
    if actual != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

// endregion: --- Identity Headers

// region:    --- Command Handlers

#[derive(Debug, Deserialize)]
pub struct PlaceBidRequest {
    pub amount: Option<i64>,
}

/// Place a bid on an auction.
pub async fn handle_place_bid(
    State((db_manager, mailer)): State<AppState>,
    Path(auction_id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<PlaceBidRequest>,
) -> Result<impl IntoResponse, AppError> {
    let bidder_id = authenticated_user(&headers)?;
    info!(
        "{:<12} --> place bid: auction {} bidder {}",
        "Handler", auction_id, bidder_id
    );

    let cmd = PlaceBidCommand {
        auction_id,
        bidder_id,
        amount: body.amount,
    };
    let current_bid = commands::handle_place_bid(cmd, &db_manager, mailer).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "Bid placed.",
            "currentBid": current_bid,
        })),
    ))
}

/// Manually (re)send the winning-bid email for an ended auction. Unlike the
/// bid-placement path this awaits the send, since observing the delivery is
/// the point of the endpoint.
pub async fn handle_send_winning_notification(
    State((db_manager, mailer)): State<AppState>,
    Path(auction_id): Path<i64>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    require_role(&headers, "Super Admin")?;
    info!(
        "{:<12} --> send winning notification: auction {}",
        "Handler", auction_id
    );

    let auction = query::handlers::get_auction(&db_manager, auction_id).await?;
    if auction.end_time > Utc::now() {
        return Err(AppError::NotEnded);
    }

    let winning_bid = query::handlers::find_winning_bid(&db_manager, auction_id)
        .await?
        .ok_or(AppError::NoBids)?;
    let bidder = query::handlers::get_user(&db_manager, winning_bid.bidder_id).await?;
    let auctioneer = query::handlers::get_user(&db_manager, auction.created_by).await?;

    let email_sent_to = bidder.email.clone();
    mailer
        .auction_won(AuctionWonEmail {
            to: bidder.email,
            winner_name: bidder.user_name.clone(),
            auction_title: auction.title.clone(),
            winning_bid: auction.current_bid,
            auctioneer_name: auctioneer.user_name,
            auctioneer_email: auctioneer.email,
        })
        .await
        .map_err(AppError::Notification)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Winning bid notification sent successfully!",
        "data": {
            "auctionTitle": auction.title,
            "winner": bidder.user_name,
            "winningBid": auction.current_bid,
            "emailSentTo": email_sent_to,
        },
    })))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// All auctions, newest first.
pub async fn handle_get_auctions(
    State((db_manager, _)): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> get auctions", "Handler");
    let auctions = query::handlers::get_all_auctions(&db_manager).await?;
    Ok(Json(auctions))
}

/// One auction with its derived bid list.
pub async fn handle_get_auction(
    State((db_manager, _)): State<AppState>,
    Path(auction_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> get auction id: {}", "Handler", auction_id);
    let detail = query::handlers::get_auction_detail(&db_manager, auction_id).await?;
    Ok(Json(detail))
}

/// Bid history for an auction.
pub async fn handle_get_bid_history(
    State((db_manager, _)): State<AppState>,
    Path(auction_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> get bid history id: {}", "Handler", auction_id);
    let bids = query::handlers::get_auction_bids(&db_manager, auction_id).await?;
    Ok(Json(bids))
}

/// Highest bid amount for an auction, null if there are no bids.
pub async fn handle_get_highest_bid(
    State((db_manager, _)): State<AppState>,
    Path(auction_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> get highest bid id: {}", "Handler", auction_id);
    let highest = query::handlers::get_highest_bid(&db_manager, auction_id).await?;
    Ok(Json(serde_json::json!({ "highestBid": highest })))
}

// endregion: --- Query Handlers
