// region:    --- Imports
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// endregion: --- Imports

// region:    --- Auction Status

/// Lifecycle status of an auction. Pending/Active/Ended follow the auction's
/// time window; Cancelled is a terminal override set by an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionStatus {
    Pending,
    Active,
    Ended,
    Cancelled,
}

impl AuctionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Pending => "Pending",
            AuctionStatus::Active => "Active",
            AuctionStatus::Ended => "Ended",
            AuctionStatus::Cancelled => "Cancelled",
        }
    }

    /// The status an auction's time window implies right now. The stored
    /// status can lag behind by up to one sweep interval, so bid gating
    /// works from this instead of the persisted column.
    pub fn from_wallclock(
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        if now < start_time {
            AuctionStatus::Pending
        } else if now < end_time {
            AuctionStatus::Active
        } else {
            AuctionStatus::Ended
        }
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuctionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(AuctionStatus::Pending),
            "Active" => Ok(AuctionStatus::Active),
            "Ended" => Ok(AuctionStatus::Ended),
            "Cancelled" => Ok(AuctionStatus::Cancelled),
            other => Err(format!("unknown auction status: {}", other)),
        }
    }
}

// endregion: --- Auction Status

// region:    --- Auction Model

/// Auction row. `current_bid` starts equal to `starting_bid` and only ever
/// increases; `status` is advanced by the sweeper.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Auction {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub condition: String,
    pub starting_bid: i64,
    pub current_bid: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub image_url: Option<String>,
    pub created_by: i64,
    pub highest_bidder: Option<i64>,
    pub commission_calculated: bool,
    pub created_at: DateTime<Utc>,
}

/// One bidder's standing on an auction, derived from the bids table on read.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct BidSummary {
    pub bidder_id: i64,
    pub bidder_name: String,
    pub profile_image: Option<String>,
    pub amount: i64,
}

/// Auction plus its derived bid list, as served to the frontend.
#[derive(Debug, Serialize)]
pub struct AuctionDetail {
    #[serde(flatten)]
    pub auction: Auction,
    pub bids: Vec<BidSummary>,
}

// endregion: --- Auction Model

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn wallclock_status_before_window_is_pending() {
        let now = Utc::now();
        let status =
            AuctionStatus::from_wallclock(now + Duration::hours(1), now + Duration::hours(2), now);
        assert_eq!(status, AuctionStatus::Pending);
    }

    #[test]
    fn wallclock_status_inside_window_is_active() {
        let now = Utc::now();
        let status =
            AuctionStatus::from_wallclock(now - Duration::hours(1), now + Duration::hours(1), now);
        assert_eq!(status, AuctionStatus::Active);
    }

    #[test]
    fn wallclock_status_after_window_is_ended() {
        let now = Utc::now();
        let status =
            AuctionStatus::from_wallclock(now - Duration::hours(2), now - Duration::minutes(1), now);
        assert_eq!(status, AuctionStatus::Ended);
    }

    #[test]
    fn wallclock_status_start_boundary_is_active() {
        let now = Utc::now();
        let status = AuctionStatus::from_wallclock(now, now + Duration::hours(1), now);
        assert_eq!(status, AuctionStatus::Active);
    }

    #[test]
    fn wallclock_status_end_boundary_is_ended() {
        let now = Utc::now();
        let status = AuctionStatus::from_wallclock(now - Duration::hours(1), now, now);
        assert_eq!(status, AuctionStatus::Ended);
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            AuctionStatus::Pending,
            AuctionStatus::Active,
            AuctionStatus::Ended,
            AuctionStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<AuctionStatus>().unwrap(), status);
        }
        assert!("Archived".parse::<AuctionStatus>().is_err());
    }
}
// endregion: --- Tests
