use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bid row: one live record per (auction, bidder) pair. Repeat bids by the
/// same bidder overwrite `amount` and `bid_time` in place.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub auction_id: i64,
    pub bidder_id: i64,
    pub bidder_name: String,
    pub profile_image: Option<String>,
    pub amount: i64,
    pub bid_time: DateTime<Utc>,
}

/// Minimal user projection: snapshot fields for bid records and the
/// recipient/contact fields for notifications.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub role: String,
}
