//! Cumulative median of executed trade prices.
//!
//! Each instrument keeps every price it ever traded at. A query sorts a copy of that
//! history, so the median reported "at time T" covers **all** trades since the start of the
//! run, not only those since the previous query.

use serde::Serialize;

/// Append-only record of one instrument's trade prices.
#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    prices: Vec<u64>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, price: u64) {
        self.prices.push(price);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Median of everything recorded so far, `None` before the first trade.
    pub fn median(&self) -> Option<u64> {
        median(&self.prices)
    }
}

/// Median with integer semantics: the middle element for odd lengths, the floor average of
/// the two central elements for even lengths.
pub fn median(prices: &[u64]) -> Option<u64> {
    if prices.is_empty() {
        return None;
    }
    let mut sorted = prices.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        // average without overflowing on very large prices
        let (low, high) = (sorted[mid - 1], sorted[mid]);
        Some(low / 2 + high / 2 + (low % 2 + high % 2) / 2)
    }
}

/// A median reported for one instrument at one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MedianQuote {
    pub instrument: usize,
    pub timestamp: u64,
    pub price: u64,
}
