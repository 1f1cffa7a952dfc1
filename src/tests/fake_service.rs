// In-memory stand-in for the auction service, implementing `AuctionApi`
// with the same observable rules the real server enforces: fresh users get
// 100000 cents available, an accepted bid must beat the current price on a
// LIVE auction, and the high bidder's funds move from available to reserved
// (releasing the previous leader's hold). It also records every call the
// driver makes so tests can assert on traffic, not just outcomes.

use crate::api::{ApiError, Auction, AuctionApi, BidOutcome, NewAuction, User};
use reqwest::StatusCode;
use std::cell::RefCell;
use std::collections::HashMap;
use uuid::Uuid;

const INITIAL_BALANCE: i64 = 100_000;

#[derive(Default)]
struct State {
    users: HashMap<String, User>,
    auctions: HashMap<String, Auction>,
    user_reads: HashMap<String, usize>,
    bid_attempts: Vec<(String, i64)>,
}

#[derive(Default)]
pub struct FakeAuctionService {
    state: RefCell<State>,
    /// Fail every create_user call with a 500, for setup-abort tests.
    pub fail_create_user: bool,
    /// Fail start_auction with a 409, for lifecycle-abort tests.
    pub fail_start: bool,
    /// Reject any bid at or above this amount, as if another client had
    /// pushed the price out of reach.
    pub reject_at_or_above: Option<i64>,
}

impl FakeAuctionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Amounts of every bid the driver attempted, in order.
    pub fn bid_attempts(&self) -> Vec<i64> {
        self.state
            .borrow()
            .bid_attempts
            .iter()
            .map(|(_, amount)| *amount)
            .collect()
    }

    /// Bidder ids of every bid the driver attempted, in order.
    pub fn bid_bidders(&self) -> Vec<String> {
        self.state
            .borrow()
            .bid_attempts
            .iter()
            .map(|(bidder, _)| bidder.clone())
            .collect()
    }

    /// How many times a given user's balances were fetched.
    pub fn user_reads(&self, id: &str) -> usize {
        self.state.borrow().user_reads.get(id).copied().unwrap_or(0)
    }

    fn status_err(op: &'static str, status: StatusCode, body: &str) -> ApiError {
        ApiError::Status {
            op,
            status,
            body: body.to_string(),
        }
    }
}

impl AuctionApi for FakeAuctionService {
    fn create_user(&self, email: &str) -> Result<User, ApiError> {
        if self.fail_create_user {
            return Err(Self::status_err(
                "create user",
                StatusCode::INTERNAL_SERVER_ERROR,
                "boom",
            ));
        }
        let mut state = self.state.borrow_mut();
        if state.users.values().any(|u| u.email == email) {
            return Err(Self::status_err(
                "create user",
                StatusCode::BAD_REQUEST,
                "Email already exists",
            ));
        }
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            available_balance: INITIAL_BALANCE,
            reserved_balance: 0,
        };
        state.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    fn get_user(&self, id: &str) -> Result<User, ApiError> {
        let mut state = self.state.borrow_mut();
        *state.user_reads.entry(id.to_string()).or_insert(0) += 1;
        state
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| Self::status_err("get user", StatusCode::NOT_FOUND, "User not found"))
    }

    fn create_auction(&self, req: &NewAuction) -> Result<Auction, ApiError> {
        let mut state = self.state.borrow_mut();
        let auction = Auction {
            id: Uuid::new_v4().to_string(),
            seller_id: req.seller_id.clone(),
            title: req.title.clone(),
            description: Some(req.description.clone()),
            start_price: req.start_price,
            current_price: req.start_price,
            current_leader_id: None,
            start_time: req.start_time.clone(),
            end_time: req.end_time.clone(),
            status: "SCHEDULED".to_string(),
        };
        state.auctions.insert(auction.id.clone(), auction.clone());
        Ok(auction)
    }

    fn get_auction(&self, id: &str) -> Result<Auction, ApiError> {
        self.state.borrow().auctions.get(id).cloned().ok_or_else(|| {
            Self::status_err("get auction", StatusCode::NOT_FOUND, "Auction not found")
        })
    }

    fn start_auction(&self, id: &str) -> Result<(), ApiError> {
        if self.fail_start {
            return Err(Self::status_err(
                "start auction",
                StatusCode::CONFLICT,
                "Cannot start auction",
            ));
        }
        let mut state = self.state.borrow_mut();
        let auction = state.auctions.get_mut(id).ok_or_else(|| {
            Self::status_err("start auction", StatusCode::NOT_FOUND, "Auction not found")
        })?;
        auction.status = "LIVE".to_string();
        Ok(())
    }

    fn place_bid(
        &self,
        auction_id: &str,
        bidder_id: &str,
        amount: i64,
    ) -> Result<BidOutcome, ApiError> {
        let mut state = self.state.borrow_mut();
        state.bid_attempts.push((bidder_id.to_string(), amount));

        if let Some(limit) = self.reject_at_or_above {
            if amount >= limit {
                return Ok(BidOutcome::Rejected("Bid refused".to_string()));
            }
        }

        let auction = match state.auctions.get(auction_id) {
            Some(a) => a.clone(),
            None => return Ok(BidOutcome::Rejected("Auction not found".to_string())),
        };
        if auction.status != "LIVE" {
            return Ok(BidOutcome::Rejected("Auction is not live".to_string()));
        }
        if amount <= auction.current_price {
            return Ok(BidOutcome::Rejected("Bid too low".to_string()));
        }
        let available = match state.users.get(bidder_id) {
            Some(u) => u.available_balance,
            None => return Ok(BidOutcome::Rejected("Bidder not found".to_string())),
        };
        if available < amount {
            return Ok(BidOutcome::Rejected("Insufficient funds".to_string()));
        }

        // Release the previous leader's hold before reserving the new one.
        if let Some(prev_id) = auction.current_leader_id.clone() {
            if let Some(prev) = state.users.get_mut(&prev_id) {
                prev.available_balance += auction.current_price;
                prev.reserved_balance -= auction.current_price;
            }
        }
        if let Some(bidder) = state.users.get_mut(bidder_id) {
            bidder.available_balance -= amount;
            bidder.reserved_balance += amount;
        }
        let auction = state.auctions.get_mut(auction_id).unwrap();
        auction.current_price = amount;
        auction.current_leader_id = Some(bidder_id.to_string());

        Ok(BidOutcome::Accepted)
    }
}
