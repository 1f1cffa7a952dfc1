// Bid-war simulation driver: provisions a seller and two bidders, creates
// and starts an auction, then runs a fixed alternating-bidder escalation
// loop against the service, reading back both bidders' balances after every
// accepted bid. This is a scripted end-to-end scenario, not a general
// client library; authoritative state lives on the server throughout.

use crate::api::{AuctionApi, BidOutcome, NewAuction, User};
use anyhow::{Context, Result};
use std::thread;
use std::time::Duration;
use uuid::Uuid;

/// Knobs for the bid war. Defaults mirror the canonical scenario: five
/// rounds, 100-cent increments, one second of pacing between rounds so the
/// service is not hammered and timing effects stay observable. Tests shrink
/// the pace to zero.
#[derive(Debug, Clone)]
pub struct WarConfig {
    pub rounds: u32,
    pub increment: i64,
    pub start_price: i64,
    pub pace: Duration,
}

impl Default for WarConfig {
    fn default() -> Self {
        WarConfig {
            rounds: 5,
            increment: 100,
            start_price: 1000,
            pace: Duration::from_secs(1),
        }
    }
}

/// Available/reserved balance pair read back for one bidder after a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub available: i64,
    pub reserved: i64,
}

impl From<&User> for BalanceSnapshot {
    fn from(u: &User) -> Self {
        BalanceSnapshot {
            available: u.available_balance,
            reserved: u.reserved_balance,
        }
    }
}

/// One round of the war: who bid, how much, whether the service took it,
/// and (for accepted rounds) both bidders' balances as read immediately
/// afterwards.
#[derive(Debug, Clone)]
pub struct Round {
    pub bidder_id: String,
    pub amount: i64,
    pub accepted: bool,
    pub balances: Option<[BalanceSnapshot; 2]>,
}

/// Everything the scenario observed, returned to the caller so outcomes can
/// be asserted on rather than eyeballed.
#[derive(Debug, Clone)]
pub struct WarReport {
    pub seller: User,
    pub bidders: [User; 2],
    pub auction_id: String,
    /// Server-reported `currentPrice` immediately after the auction went
    /// live; every round's amount is derived from this, never accumulated
    /// from earlier rounds.
    pub base_price: i64,
    pub rounds: Vec<Round>,
    pub final_price: i64,
    pub ended_early: bool,
}

/// Run the full bid-war scenario against `api`.
///
/// Any setup or lifecycle failure (user creation, auction creation, start)
/// aborts the scenario with an error; there is no partial rollback and no
/// retry. A rejected bid is not an error: it ends the bidding loop early
/// and the report says so.
pub fn run_bid_war<A: AuctionApi>(api: &A, cfg: &WarConfig) -> Result<WarReport> {
    print_header("WAR ROOM SIMULATION");

    // Shared random suffix keeps the three emails unique per run without
    // colliding with earlier runs against the same server.
    let suffix = short_suffix();

    println!("1. Creating Seller...");
    let seller = api
        .create_user(&format!("seller-{suffix}@war.com"))
        .context("creating seller")?;
    println!("   {} (ID: {})", seller.email, seller.id);

    println!("2. Creating 2 Bidders...");
    let p1 = api
        .create_user(&format!("bidder1-{suffix}@war.com"))
        .context("creating bidder 1")?;
    let p2 = api
        .create_user(&format!("bidder2-{suffix}@war.com"))
        .context("creating bidder 2")?;
    println!("   {} (ID: {})", p1.email, p1.id);
    println!("   {} (ID: {})", p2.email, p2.id);

    println!("3. Creating Auction...");
    let req = NewAuction::starting_soon(&seller.id, "Test Auction", cfg.start_price);
    let auction = api.create_auction(&req).context("creating auction")?;
    println!("   {} (ID: {})", auction.title, auction.id);

    println!("4. Starting Auction...");
    api.start_auction(&auction.id).context("starting auction")?;

    // Re-read the auction rather than trusting the creation-time echo: the
    // server's price after start is the sole source of truth for the base.
    let live = api
        .get_auction(&auction.id)
        .context("re-reading auction after start")?;
    if live.current_price != live.start_price {
        println!(
            "   note: currentPrice {} differs from startPrice {} at start",
            live.current_price, live.start_price
        );
    }
    let base_price = live.current_price;

    let pool = [&p1, &p2];
    let mut current_price = base_price;
    let mut rounds = Vec::with_capacity(cfg.rounds as usize);
    let mut ended_early = false;

    print_header("BEGINNING BID WAR");
    for i in 0..cfg.rounds {
        let bidder = pool[(i % 2) as usize];
        // Increments are cumulative from the base price, not compounded off
        // the previous round, so a 1000-cent start yields 1100..1500.
        let amount = base_price + (i as i64 + 1) * cfg.increment;

        println!("\nBid #{} by {} for {}...", i + 1, bidder.email, amount);
        let outcome = api
            .place_bid(&auction.id, &bidder.id, amount)
            .context("placing bid")?;

        if outcome.is_accepted() {
            println!("Bid Accepted: {amount}");
            current_price = amount;
            let b1 = api.get_user(&p1.id).context("reading bidder 1 balance")?;
            let b2 = api.get_user(&p2.id).context("reading bidder 2 balance")?;
            print_balance(&b1);
            print_balance(&b2);
            rounds.push(Round {
                bidder_id: bidder.id.clone(),
                amount,
                accepted: true,
                balances: Some([BalanceSnapshot::from(&b1), BalanceSnapshot::from(&b2)]),
            });
        } else {
            if let BidOutcome::Rejected(why) = &outcome {
                println!("Bid Rejected: {why}");
            }
            println!("War ended early due to rejection.");
            rounds.push(Round {
                bidder_id: bidder.id.clone(),
                amount,
                accepted: false,
                balances: None,
            });
            ended_early = true;
            break;
        }

        if i + 1 < cfg.rounds && !cfg.pace.is_zero() {
            thread::sleep(cfg.pace);
        }
    }

    Ok(WarReport {
        seller,
        bidders: [p1, p2],
        auction_id: auction.id,
        base_price,
        rounds,
        final_price: current_price,
        ended_early,
    })
}

/// Four hex chars, enough to keep parallel demo runs from colliding.
fn short_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..4].to_string()
}

fn print_balance(user: &User) {
    println!(
        "User Balance: Available={}, Reserved={}",
        user.available_balance, user.reserved_balance
    );
}

fn print_header(text: &str) {
    let bar = "=".repeat(50);
    println!("\n{bar}\n{text}\n{bar}");
}
