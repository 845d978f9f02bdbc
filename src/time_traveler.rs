//! Retrospective "time traveler" opportunity per instrument.
//!
//! A time traveler buys at a quoted ask and later sells at a quoted bid, so:
//! - incoming **sell** orders are candidate purchase prices
//! - incoming **buy** orders are candidate sale prices
//!
//! Every order is observed whether or not it traded. The tracker makes one forward pass
//! and keeps the best chronologically ordered (buy, sell) pair it has seen.
//!
//! Once a cheaper ask has been parked as the potential buy, later asks are ignored until
//! a bid promotes it; a still-cheaper ask arriving in that window is never considered.

use serde::Serialize;
use tracing::trace;

use crate::orders::Side;

/// A quoted price at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub timestamp: u64,
    pub price: u64,
}

/// The best buy-then-sell pair found for an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Opportunity {
    pub buy: Quote,
    pub sell: Quote,
}

impl Opportunity {
    pub fn profit(&self) -> u64 {
        self.sell.price - self.buy.price
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing seen yet.
    #[default]
    Idle,
    /// Holding a best buy, no sale above it yet.
    HaveBuy,
    /// Holding a profitable (buy, sell) pair.
    HaveCandidate,
    /// Holding a pair plus a cheaper buy that may start a better one.
    HavePotential,
}

#[derive(Debug, Clone, Default)]
pub struct TimeTraveler {
    phase: Phase,
    best_buy: Quote,
    best_sell: Quote,
    potential_buy: Quote,
}

impl TimeTraveler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Feeds one incoming order quote.
    pub fn observe(&mut self, side: Side, price: u64, timestamp: u64) {
        let quote = Quote { timestamp, price };
        let before = self.phase;

        match (self.phase, side) {
            (Phase::Idle, Side::Sell) => {
                self.best_buy = quote;
                self.phase = Phase::HaveBuy;
            }
            (Phase::Idle, Side::Buy) => {}

            (Phase::HaveBuy, Side::Sell) if price < self.best_buy.price => {
                self.best_buy = quote;
            }
            (Phase::HaveBuy, Side::Buy) if price > self.best_buy.price => {
                self.best_sell = quote;
                self.phase = Phase::HaveCandidate;
            }
            (Phase::HaveBuy, _) => {}

            (Phase::HaveCandidate, Side::Buy) if price > self.best_sell.price => {
                self.best_sell = quote;
            }
            (Phase::HaveCandidate, Side::Sell) if price < self.best_buy.price => {
                self.potential_buy = quote;
                self.phase = Phase::HavePotential;
            }
            (Phase::HaveCandidate, _) => {}

            (Phase::HavePotential, Side::Buy) if self.beats_current(price) => {
                self.best_buy = self.potential_buy;
                self.best_sell = quote;
                self.phase = Phase::HaveCandidate;
            }
            (Phase::HavePotential, _) => {}
        }

        if before != self.phase {
            trace!(?before, after = ?self.phase, "time traveler transition");
        }
    }

    fn beats_current(&self, sell_price: u64) -> bool {
        let potential = i128::from(sell_price) - i128::from(self.potential_buy.price);
        let current = i128::from(self.best_sell.price) - i128::from(self.best_buy.price);
        potential > current
    }

    /// The best pair so far, or `None` if no sale ever beat the purchase price.
    pub fn opportunity(&self) -> Option<Opportunity> {
        (self.best_sell.price > self.best_buy.price).then_some(Opportunity {
            buy: self.best_buy,
            sell: self.best_sell,
        })
    }
}
