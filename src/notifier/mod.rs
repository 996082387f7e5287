// region:    --- Imports
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

// endregion: --- Imports

// region:    --- Email Payloads

/// Bid confirmation, sent to the bidder right after a bid commits.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BidPlacedEmail {
    pub to: String,
    pub bidder_name: String,
    pub auction_title: String,
    pub amount: i64,
}

/// Winning-bid notification, sent to the highest bidder once an auction
/// ends. Carries the auctioneer's contact details for the handover.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuctionWonEmail {
    pub to: String,
    pub winner_name: String,
    pub auction_title: String,
    pub winning_bid: i64,
    pub auctioneer_name: String,
    pub auctioneer_email: String,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a, T: Serialize> {
    template: &'a str,
    payload: &'a T,
}

// endregion: --- Email Payloads

// region:    --- Notifier Trait

/// Fire-and-forget email dispatch. Callers log failures and never let them
/// affect the operation that triggered the send.
#[async_trait]
pub trait Notifier {
    async fn bid_placed(&self, email: BidPlacedEmail) -> Result<(), String>;
    async fn auction_won(&self, email: AuctionWonEmail) -> Result<(), String>;
}

// endregion: --- Notifier Trait

// region:    --- Mailer Client

/// HTTP client for the external mailer service. Templates are rendered and
/// delivered on the mailer side; this end only posts the payload.
pub struct MailerClient {
    client: reqwest::Client,
    base_url: String,
}

impl MailerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn send<T: Serialize + Sync>(&self, template: &str, payload: &T) -> Result<(), String> {
        let request = SendRequest { template, payload };
        let response = self
            .client
            .post(format!("{}/send", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("mailer returned {}", response.status()));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for MailerClient {
    async fn bid_placed(&self, email: BidPlacedEmail) -> Result<(), String> {
        info!(
            "{:<12} --> send bid-placed email to {}",
            "Notifier", email.to
        );
        self.send("bid-placed", &email).await
    }

    async fn auction_won(&self, email: AuctionWonEmail) -> Result<(), String> {
        info!(
            "{:<12} --> send auction-won email to {}",
            "Notifier", email.to
        );
        self.send("auction-won", &email).await
    }
}

// endregion: --- Mailer Client

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_request_nests_payload_under_template() {
        let email = BidPlacedEmail {
            to: "bidder@example.com".to_string(),
            bidder_name: "Ada".to_string(),
            auction_title: "Walnut writing desk".to_string(),
            amount: 1200,
        };
        let request = SendRequest {
            template: "bid-placed",
            payload: &email,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["template"], "bid-placed");
        assert_eq!(value["payload"]["to"], "bidder@example.com");
    }
}
// endregion: --- Tests
