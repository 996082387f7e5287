// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

// endregion: --- Imports

// region:    --- AppError

/// Service-wide error type. Each variant carries the machine-readable
/// code returned in the JSON error envelope.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Auction item not found.")]
    AuctionNotFound,

    #[error("User not found.")]
    UserNotFound,

    #[error("Please place your bid.")]
    MissingAmount,

    #[error("Bid amount must be a positive number.")]
    InvalidAmount,

    #[error("Bid amount must be greater than the current bid.")]
    BidTooLow { current_bid: i64 },

    #[error("Bid amount must be greater than starting bid.")]
    BelowStartingBid,

    #[error("Auction has not started yet.")]
    NotStarted,

    #[error("Auction has already ended.")]
    AlreadyEnded,

    #[error("Auction has not ended yet.")]
    NotEnded,

    #[error("Auction is not open for bidding.")]
    InvalidStatus,

    #[error("No bids found for this auction.")]
    NoBids,

    #[error("Authenticated user required.")]
    Unauthenticated,

    #[error("Super Admin role required.")]
    Forbidden,

    #[error("Failed to send notification: {0}")]
    Notification(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::AuctionNotFound => "NOT_FOUND",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::MissingAmount => "MISSING_AMOUNT",
            AppError::InvalidAmount => "INVALID_AMOUNT",
            AppError::BidTooLow { .. } => "LOW_BID",
            AppError::BelowStartingBid => "LOW_BID",
            AppError::NotStarted => "NOT_STARTED",
            AppError::AlreadyEnded => "ALREADY_ENDED",
            AppError::NotEnded => "NOT_ENDED",
            AppError::InvalidStatus => "INVALID_STATUS",
            AppError::NoBids => "NO_BIDS",
            AppError::Unauthenticated => "UNAUTHENTICATED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::Notification(_) => "NOTIFICATION_FAILED",
            AppError::Database(_) => "DATABASE_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::AuctionNotFound
            | AppError::UserNotFound
            | AppError::NoBids => StatusCode::NOT_FOUND,
            AppError::MissingAmount
            | AppError::InvalidAmount
            | AppError::BidTooLow { .. }
            | AppError::BelowStartingBid
            | AppError::NotStarted
            | AppError::AlreadyEnded
            | AppError::NotEnded
            | AppError::InvalidStatus => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Notification(_) | AppError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            // LOW_BID keeps the current price in the envelope so the client
            // can re-fetch-free retry with a corrected amount.
            AppError::BidTooLow { current_bid } => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
                "current_bid": current_bid,
            }),
            _ => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        };
        (self.status(), Json(body)).into_response()
    }
}

// endregion: --- AppError
