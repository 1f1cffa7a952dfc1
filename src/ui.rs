// UI layer: provides a simple interactive menu using `dialoguer`.
// Each entry collects the fields an operation needs, delegates to the API
// client and prints the outcome; nothing here is stateful between runs.

use crate::api::{ApiClient, AuctionApi, BidOutcome, NewAuction};
use crate::simulate::{run_bid_war, WarConfig};
use anyhow::Result;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use uuid::Uuid;

/// Main interactive menu. Receives an `ApiClient` instance and runs a
/// simple select loop until the user chooses "Exit".
///
/// Note: `Select::interact()` is keyboard-driven: you can use arrow keys
/// and Enter to choose an option.
pub fn main_menu(api: ApiClient) -> Result<()> {
    println!("LiveBid CLI — auction service at {}", api.base_url());
    loop {
        let items = vec![
            "Create user",
            "Create auction",
            "Start auction",
            "Place bid",
            "View auction",
            "View user balance",
            "Simulate bid war",
            "Exit",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => handle_create_user(&api)?,
            1 => handle_create_auction(&api)?,
            2 => handle_start_auction(&api)?,
            3 => handle_place_bid(&api)?,
            4 => handle_view_auction(&api)?,
            5 => handle_view_user(&api)?,
            6 => {
                // The simulation paces itself; show a spinner so the 1s
                // gaps between rounds don't look like a hang.
                let spinner = spinner("Running bid war...");
                let outcome = run_bid_war(&api, &WarConfig::default());
                spinner.finish_and_clear();
                match outcome {
                    Ok(report) => println!(
                        "\nWar over: {} round(s), final price {}{}",
                        report.rounds.len(),
                        report.final_price,
                        if report.ended_early { " (ended early)" } else { "" }
                    ),
                    Err(e) => println!("Simulation aborted: {e:#}"),
                }
            }
            7 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Prompt for an email (random default) and create the user.
fn handle_create_user(api: &ApiClient) -> Result<()> {
    let default_email = format!(
        "user-{}@example.com",
        &Uuid::new_v4().simple().to_string()[..8]
    );
    let email: String = Input::new()
        .with_prompt("Email")
        .default(default_email)
        .interact_text()?;
    match api.create_user(&email) {
        Ok(user) => println!("User Created: {} (ID: {})", user.email, user.id),
        Err(e) => println!("Failed: {e}"),
    }
    Ok(())
}

/// Collect auction fields and create it. The time window is computed, not
/// prompted for: start in one minute, end in an hour.
fn handle_create_auction(api: &ApiClient) -> Result<()> {
    let seller_id: String = Input::new().with_prompt("Seller ID").interact_text()?;
    let title: String = Input::new()
        .with_prompt("Auction Title")
        .default("Test Auction".to_string())
        .interact_text()?;
    let start_price: i64 = Input::new()
        .with_prompt("Start Price (cents)")
        .default(1000)
        .interact_text()?;

    let req = NewAuction::starting_soon(&seller_id, &title, start_price);
    match api.create_auction(&req) {
        Ok(auction) => println!("Auction Created: {} (ID: {})", auction.title, auction.id),
        Err(e) => println!("Failed: {e}"),
    }
    Ok(())
}

fn handle_start_auction(api: &ApiClient) -> Result<()> {
    let auction_id: String = Input::new().with_prompt("Auction ID").interact_text()?;
    match api.start_auction(&auction_id) {
        Ok(()) => println!("Auction is now LIVE!"),
        Err(e) => println!("Failed: {e}"),
    }
    Ok(())
}

fn handle_place_bid(api: &ApiClient) -> Result<()> {
    let auction_id: String = Input::new().with_prompt("Auction ID").interact_text()?;
    let bidder_id: String = Input::new().with_prompt("Bidder ID").interact_text()?;
    let amount: i64 = Input::new().with_prompt("Amount (cents)").interact_text()?;
    match api.place_bid(&auction_id, &bidder_id, amount) {
        Ok(BidOutcome::Accepted) => println!("Bid Accepted: {amount}"),
        Ok(BidOutcome::Rejected(why)) => println!("Bid Rejected: {why}"),
        Err(e) => println!("Failed: {e}"),
    }
    Ok(())
}

/// Fetch an auction and pretty-print the full JSON the server returned.
fn handle_view_auction(api: &ApiClient) -> Result<()> {
    let auction_id: String = Input::new().with_prompt("Auction ID").interact_text()?;
    match api.get_auction(&auction_id) {
        Ok(auction) => println!("{}", serde_json::to_string_pretty(&auction)?),
        Err(e) => println!("Fetch failed: {e}"),
    }
    Ok(())
}

fn handle_view_user(api: &ApiClient) -> Result<()> {
    let user_id: String = Input::new().with_prompt("User ID").interact_text()?;
    match api.get_user(&user_id) {
        Ok(user) => println!(
            "User Balance: Available={}, Reserved={}",
            user.available_balance, user.reserved_balance
        ),
        Err(e) => println!("Fetch failed: {e}"),
    }
    Ok(())
}

fn spinner(msg: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    pb.set_message(msg);
    pb
}
