// API client module: contains a small blocking HTTP client that talks to
// the LiveBid auction service. It is intentionally small and synchronous:
// every call blocks until the server answers, which matches the strictly
// sequential scenarios driven on top of it.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default base URL of the auction service; override with `LIVEBID_URL`.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Per-request timeout. A hanging network call would otherwise block a
/// scenario indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors coming out of the auction service client. Transport failures
/// (connection refused, timeout) are kept distinct from HTTP responses so
/// callers can tell "service unreachable" apart from a business refusal.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("auction service unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
    #[error("{op} failed: {status} - {body}")]
    Status {
        op: &'static str,
        status: StatusCode,
        body: String,
    },
}

/// A user of the auction service. The service seeds every new user with an
/// available balance and reserves funds against their active high bids.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub available_balance: i64,
    #[serde(default)]
    pub reserved_balance: i64,
}

/// Full auction state as reported by the service. `current_price` is the
/// authoritative floor for the next bid. `status` is one of `SCHEDULED`,
/// `LIVE` or `CLOSED`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub id: String,
    pub seller_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_price: i64,
    pub current_price: i64,
    #[serde(default)]
    pub current_leader_id: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
}

/// Payload for creating an auction. Times are local-date-time strings in the
/// server's `YYYY-MM-DDTHH:MM:SS` format; prices are minor units (cents).
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewAuction {
    pub seller_id: String,
    pub title: String,
    pub description: String,
    pub start_price: i64,
    pub start_time: String,
    pub end_time: String,
}

impl NewAuction {
    /// Standard auction for the interactive flows and the simulation:
    /// opens one minute from now and runs for an hour, UTC on both ends to
    /// sidestep client/server clock-skew ambiguity.
    pub fn starting_soon(seller_id: &str, title: &str, start_price: i64) -> Self {
        let (start_time, end_time) = auction_window();
        NewAuction {
            seller_id: seller_id.to_string(),
            title: title.to_string(),
            description: "Created via CLI".to_string(),
            start_price,
            start_time,
            end_time,
        }
    }
}

/// Compute the [now+1min, now+1h] auction window in the server's
/// `YYYY-MM-DDTHH:MM:SS` format.
pub fn auction_window() -> (String, String) {
    let now = chrono::Utc::now();
    let fmt = "%Y-%m-%dT%H:%M:%S";
    let start = (now + chrono::Duration::minutes(1)).format(fmt).to_string();
    let end = (now + chrono::Duration::hours(1)).format(fmt).to_string();
    (start, end)
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CreateUserRequest<'a> {
    email: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PlaceBidRequest<'a> {
    bidder_id: &'a str,
    amount: i64,
}

/// Outcome of submitting a bid. The service answers 202 when it has
/// queued/validated the bid; anything else is a rejection carrying the
/// server's explanation, not a client error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BidOutcome {
    Accepted,
    Rejected(String),
}

impl BidOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, BidOutcome::Accepted)
    }
}

/// The operations the auction service exposes to this client. `ApiClient`
/// implements it over HTTP; tests implement it with an in-memory fake so
/// scenario drivers can run against a double.
pub trait AuctionApi {
    fn create_user(&self, email: &str) -> Result<User, ApiError>;
    fn get_user(&self, id: &str) -> Result<User, ApiError>;
    fn create_auction(&self, req: &NewAuction) -> Result<Auction, ApiError>;
    fn get_auction(&self, id: &str) -> Result<Auction, ApiError>;
    fn start_auction(&self, id: &str) -> Result<(), ApiError>;
    fn place_bid(
        &self,
        auction_id: &str,
        bidder_id: &str,
        amount: i64,
    ) -> Result<BidOutcome, ApiError>;
}

/// HTTP client for the auction service: a reqwest blocking client plus the
/// base URL it was constructed with. Cheap to clone; construct one per
/// scenario instead of sharing implicit global configuration.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client against an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(ApiClient {
            client,
            base_url: base_url.into(),
        })
    }

    /// Build a client from the `LIVEBID_URL` environment variable, falling
    /// back to [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url =
            std::env::var("LIVEBID_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into an [`ApiError::Status`] carrying the
    /// server's body text.
    fn fail(op: &'static str, res: reqwest::blocking::Response) -> ApiError {
        let status = res.status();
        let body = res.text().unwrap_or_else(|_| "".into());
        ApiError::Status { op, status, body }
    }
}

impl AuctionApi for ApiClient {
    fn create_user(&self, email: &str) -> Result<User, ApiError> {
        let res = self
            .client
            .post(self.url("/users"))
            .json(&CreateUserRequest { email })
            .send()?;
        if !res.status().is_success() {
            return Err(Self::fail("create user", res));
        }
        Ok(res.json()?)
    }

    fn get_user(&self, id: &str) -> Result<User, ApiError> {
        let res = self.client.get(self.url(&format!("/users/{id}"))).send()?;
        if !res.status().is_success() {
            return Err(Self::fail("get user", res));
        }
        Ok(res.json()?)
    }

    fn create_auction(&self, req: &NewAuction) -> Result<Auction, ApiError> {
        let res = self.client.post(self.url("/auctions")).json(req).send()?;
        if !res.status().is_success() {
            return Err(Self::fail("create auction", res));
        }
        Ok(res.json()?)
    }

    fn get_auction(&self, id: &str) -> Result<Auction, ApiError> {
        let res = self
            .client
            .get(self.url(&format!("/auctions/{id}")))
            .send()?;
        if !res.status().is_success() {
            return Err(Self::fail("get auction", res));
        }
        Ok(res.json()?)
    }

    fn start_auction(&self, id: &str) -> Result<(), ApiError> {
        let res = self
            .client
            .post(self.url(&format!("/auctions/{id}/start")))
            .send()?;
        if !res.status().is_success() {
            return Err(Self::fail("start auction", res));
        }
        Ok(())
    }

    fn place_bid(
        &self,
        auction_id: &str,
        bidder_id: &str,
        amount: i64,
    ) -> Result<BidOutcome, ApiError> {
        let res = self
            .client
            .post(self.url(&format!("/auctions/{auction_id}/bids")))
            .json(&PlaceBidRequest { bidder_id, amount })
            .send()?;
        // 202 means queued for processing; any other status is the service
        // refusing the bid and explaining why in the body.
        if res.status() == StatusCode::ACCEPTED {
            Ok(BidOutcome::Accepted)
        } else {
            let body = res.text().unwrap_or_else(|_| "".into());
            Ok(BidOutcome::Rejected(body))
        }
    }
}
