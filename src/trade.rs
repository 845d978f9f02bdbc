use serde::Serialize;

use crate::orders::{Order, Side};

/// A trade represents a matched transaction between two orders of the same instrument.
///
/// # Terminology
/// - **Resting**: the order that was already in the book.
/// - **Incoming**: the order whose arrival triggered the trade.
///
/// Either one may be the buyer. `timestamp` is the incoming order's timestamp.
///
/// # Price
/// The trade executes at the resting order's price, unless the resting order carries a
/// later timestamp than the incoming one, in which case the incoming price anchors it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trade {
    pub timestamp: u64,
    pub instrument: usize,
    pub buyer: usize,
    pub seller: usize,
    pub price: u64,
    pub quantity: u64,
}

impl Trade {
    pub(crate) fn between(incoming: &Order, resting: &Order, quantity: u64) -> Self {
        let price = if resting.timestamp <= incoming.timestamp {
            resting.price
        } else {
            incoming.price
        };
        let (buyer, seller) = match incoming.side {
            Side::Buy => (incoming.trader, resting.trader),
            Side::Sell => (resting.trader, incoming.trader),
        };
        Self {
            timestamp: incoming.timestamp,
            instrument: incoming.instrument,
            buyer,
            seller,
            price,
            quantity,
        }
    }

    /// Cash that changes hands, `price × quantity`.
    pub fn notional(&self) -> i128 {
        i128::from(self.price) * i128::from(self.quantity)
    }
}
