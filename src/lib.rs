//! Replays a timestamped stream of limit orders through one order book per stock.
//!
//! Alongside matching, a single pass keeps:
//! - a per-trader ledger of shares and cash
//! - a cumulative median trade price per stock
//! - the best retrospective buy-then-sell ("time traveler") trade per stock
//!
//! [`market::Market`] owns all of that state; the binary in `main.rs` only reads the
//! stream, feeds it in and prints what comes back.

pub mod cli;
pub mod errors;
pub mod input;
pub mod ledger;
pub mod market;
pub mod median;
pub mod orderbook;
pub mod orders;
pub mod report;
pub mod simulate;
pub mod time_traveler;
pub mod trade;
