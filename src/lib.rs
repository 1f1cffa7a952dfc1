// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive client.
//
// Module responsibilities:
// - `api`: the auction service contract (`AuctionApi`), wire types, the
//   classified error type and the blocking HTTP implementation.
// - `simulate`: the bid-war scenario driver, written against `AuctionApi`
//   so it runs identically over HTTP or an in-memory test double.
// - `ui`: the terminal menu flows that delegate to `api` and `simulate`.
pub mod api;
pub mod simulate;
pub mod ui;

#[cfg(test)]
mod tests;
