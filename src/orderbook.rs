use crate::{
    orders::{Order, Side},
    trade::Trade,
};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Position of a resting order within its side of the book.
///
/// Keys compare by `(rank, timestamp, sequence)` where `rank` orders prices from most to
/// least aggressive for the side:
/// - asks rank by price ascending
/// - bids rank by price descending (`u64::MAX - price`)
///
/// so the first key of either side is always its best order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PriorityKey {
    rank: u64,
    timestamp: u64,
    sequence: u64,
}

impl PriorityKey {
    pub fn for_order(order: &Order) -> Self {
        let rank = match order.side {
            Side::Buy => u64::MAX - order.price,
            Side::Sell => order.price,
        };
        Self {
            rank,
            timestamp: order.timestamp,
            sequence: order.sequence,
        }
    }
}

/// An [`OrderBook`] stores the **resting** buy and sell orders of one instrument in two
/// [`BTreeMap`]s keyed by [`PriorityKey`]:
/// - `bids` (buy orders), best = highest price
/// - `asks` (sell orders), best = lowest price
///
/// Iterating either map forwards walks it in price-time priority.
#[derive(Debug, Default)]
pub struct OrderBook {
    bids: BTreeMap<PriorityKey, Order>,
    asks: BTreeMap<PriorityKey, Order>,
}

impl OrderBook {
    /// Creates a new, empty [`OrderBook`], with no resting bids or asks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rests an order on its own side without attempting to match it.
    ///
    /// Orders with no remaining quantity are dropped.
    pub fn add_order(&mut self, order: Order) {
        if order.quantity == 0 {
            return;
        }
        let side = match order.side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        side.insert(PriorityKey::for_order(&order), order);
    }

    /// Matches an incoming limit order against the opposite side, then rests whatever is
    /// left of it.
    ///
    /// # Behavior
    /// - A `Buy` walks the `asks` from lowest price up while `ask.price <= incoming.price`.
    /// - A `Sell` walks the `bids` from highest price down while `bid.price >= incoming.price`.
    /// - Each step fills `min(incoming.quantity, resting.quantity)`. A partially filled
    ///   resting order keeps its key, so it stays at the front of the side.
    ///
    /// Returns the [`Trade`]s in execution order.
    pub fn match_order(&mut self, mut incoming: Order) -> Vec<Trade> {
        debug!(?incoming, "matching incoming order");
        let opposite = match incoming.side {
            Side::Buy => &mut self.asks,
            Side::Sell => &mut self.bids,
        };
        let mut trades = Vec::new();

        while incoming.quantity > 0 {
            let Some(mut best) = opposite.first_entry() else {
                break;
            };
            let resting = best.get_mut();
            if !incoming.side.crosses(incoming.price, resting.price) {
                break;
            }

            let fill = incoming.quantity.min(resting.quantity);
            let trade = Trade::between(&incoming, resting, fill);
            incoming.quantity -= fill;
            resting.quantity -= fill;

            if resting.quantity == 0 {
                trace!(sequence = resting.sequence, "resting order filled");
                best.remove();
            }
            trades.push(trade);
        }

        if incoming.quantity > 0 {
            trace!(remaining = incoming.quantity, "resting unfilled remainder");
            self.add_order(incoming);
        }
        trades
    }

    /// Best (highest) resting bid.
    pub fn best_bid(&self) -> Option<&Order> {
        self.bids.values().next()
    }

    /// Best (lowest) resting ask.
    pub fn best_ask(&self) -> Option<&Order> {
        self.asks.values().next()
    }

    /// Resting bids in priority order.
    pub fn bids(&self) -> impl Iterator<Item = &Order> {
        self.bids.values()
    }

    /// Resting asks in priority order.
    pub fn asks(&self) -> impl Iterator<Item = &Order> {
        self.asks.values()
    }

    /// `true` if the best bid is priced at or above the best ask.
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => bid.price >= ask.price,
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

//tests
#[cfg(test)]
mod tests {
    use super::*;

    fn order(sequence: u64, side: Side, timestamp: u64, price: u64, quantity: u64) -> Order {
        Order {
            sequence,
            timestamp,
            trader: sequence as usize,
            instrument: 0,
            side,
            price,
            quantity,
        }
    }

    /// A buy that sweeps several ask levels, lowest first.
    #[test]
    fn test_buy_walks_asks_lowest_first() {
        let mut ob = OrderBook::new();
        ob.add_order(order(1, Side::Sell, 0, 102, 3));
        ob.add_order(order(2, Side::Sell, 0, 101, 5));

        let trades = ob.match_order(order(3, Side::Buy, 1, 102, 6));

        assert_eq!(trades.len(), 2);
        assert_eq!((trades[0].price, trades[0].quantity), (101, 5));
        assert_eq!((trades[1].price, trades[1].quantity), (102, 1));
        assert_eq!(ob.best_ask().unwrap().quantity, 2);
        assert!(ob.best_bid().is_none());
    }

    /// A sell that sweeps bids, highest first, and rests the remainder.
    #[test]
    fn test_sell_walks_bids_highest_first_and_rests() {
        let mut ob = OrderBook::new();
        ob.add_order(order(1, Side::Buy, 0, 99, 4));
        ob.add_order(order(2, Side::Buy, 0, 100, 4));

        let trades = ob.match_order(order(3, Side::Sell, 0, 99, 10));

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].price, 100);
        assert_eq!(trades[0].buyer, 2);
        assert_eq!(trades[1].price, 99);
        assert_eq!(trades[1].buyer, 1);
        assert!(ob.best_bid().is_none());
        let rest = ob.best_ask().unwrap();
        assert_eq!((rest.price, rest.quantity), (99, 2));
    }

    /// No crossing candidate: the order rests in full.
    #[test]
    fn test_no_cross_rests_in_full() {
        let mut ob = OrderBook::new();
        ob.add_order(order(1, Side::Sell, 0, 105, 5));

        let trades = ob.match_order(order(2, Side::Buy, 0, 100, 8));

        assert!(trades.is_empty());
        assert_eq!(ob.best_bid().unwrap().quantity, 8);
        assert!(!ob.is_crossed());
    }

    /// Exact exhaustion leaves neither order on the book.
    #[test]
    fn test_exact_match_clears_both_sides() {
        let mut ob = OrderBook::new();
        ob.add_order(order(1, Side::Sell, 0, 100, 5));

        let trades = ob.match_order(order(2, Side::Buy, 0, 100, 5));

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, 5);
        assert!(ob.is_empty());
    }

    /// Same price: earlier timestamp first, then lower sequence.
    #[test]
    fn test_time_then_sequence_priority() {
        let mut ob = OrderBook::new();
        ob.add_order(order(7, Side::Sell, 2, 100, 1));
        ob.add_order(order(5, Side::Sell, 1, 100, 1));
        ob.add_order(order(3, Side::Sell, 2, 100, 1));

        let sequences: Vec<u64> = ob.asks().map(|o| o.sequence).collect();
        assert_eq!(sequences, vec![5, 3, 7]);

        let trades = ob.match_order(order(8, Side::Buy, 3, 100, 2));
        assert_eq!(trades[0].seller, 5);
        assert_eq!(trades[1].seller, 3);
    }

    /// A partially filled resting order keeps its place ahead of later arrivals.
    #[test]
    fn test_partial_fill_keeps_priority() {
        let mut ob = OrderBook::new();
        ob.add_order(order(1, Side::Buy, 0, 50, 10));
        ob.add_order(order(2, Side::Buy, 0, 50, 10));

        ob.match_order(order(3, Side::Sell, 1, 50, 4));
        let front = ob.best_bid().unwrap();
        assert_eq!((front.sequence, front.quantity), (1, 6));

        let trades = ob.match_order(order(4, Side::Sell, 1, 50, 8));
        assert_eq!(trades.len(), 2);
        assert_eq!((trades[0].buyer, trades[0].quantity), (1, 6));
        assert_eq!((trades[1].buyer, trades[1].quantity), (2, 2));
    }

    /// A resting order stamped later than the incoming one gives up the price.
    #[test]
    fn test_later_resting_order_takes_incoming_price() {
        let mut ob = OrderBook::new();
        ob.add_order(order(1, Side::Sell, 5, 90, 1));

        let trades = ob.match_order(order(2, Side::Buy, 3, 95, 1));

        assert_eq!(trades[0].price, 95);
    }

    #[test]
    fn test_bids_iterate_highest_first() {
        let mut ob = OrderBook::new();
        for (seq, price) in [(1, 10), (2, 30), (3, 20)] {
            ob.add_order(order(seq, Side::Buy, 0, price, 1));
        }
        let prices: Vec<u64> = ob.bids().map(|o| o.price).collect();
        assert_eq!(prices, vec![30, 20, 10]);
    }

    #[test]
    fn test_zero_quantity_is_not_rested() {
        let mut ob = OrderBook::new();
        ob.add_order(order(1, Side::Buy, 0, 10, 0));
        assert!(ob.is_empty());
    }
}
