/// Fetch one auction
pub const GET_AUCTION: &str = "SELECT id, title, description, category, condition, starting_bid, current_bid, start_time, end_time, status, image_url, created_by, highest_bidder, commission_calculated, created_at FROM auctions WHERE id = $1";

/// Fetch all auctions, newest first
pub const GET_ALL_AUCTIONS: &str = "SELECT id, title, description, category, condition, starting_bid, current_bid, start_time, end_time, status, image_url, created_by, highest_bidder, commission_calculated, created_at FROM auctions ORDER BY created_at DESC";

/// Per-bidder standings for one auction, highest first
pub const GET_BID_SUMMARIES: &str = r#"
    SELECT bidder_id, bidder_name, profile_image, amount
    FROM bids
    WHERE auction_id = $1
    ORDER BY amount DESC
"#;

/// Bid rows for one auction, most recent first
pub const GET_AUCTION_BIDS: &str = r#"
    SELECT id, auction_id, bidder_id, bidder_name, profile_image, amount, bid_time
    FROM bids
    WHERE auction_id = $1
    ORDER BY bid_time DESC
"#;

/// Highest bid amount for one auction
pub const GET_HIGHEST_BID: &str =
    "SELECT MAX(amount) as highest_bid FROM bids WHERE auction_id = $1";

/// The bid that holds the auction's current price
pub const FIND_WINNING_BID: &str = r#"
    SELECT b.id, b.auction_id, b.bidder_id, b.bidder_name, b.profile_image, b.amount, b.bid_time
    FROM bids b
    JOIN auctions a ON a.id = b.auction_id AND a.current_bid = b.amount
    WHERE b.auction_id = $1
"#;

/// Fetch one user
pub const GET_USER: &str = "SELECT id, user_name, email, profile_image, role FROM users WHERE id = $1";
