use serde::Serialize;

use crate::{median::PriceHistory, trade::Trade};

/// Cumulative position of one trader over the run.
///
/// `net_transfer` is signed cash: positive means the trader received money overall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraderAccount {
    pub bought: u64,
    pub sold: u64,
    pub net_transfer: i128,
}

/// Books every executed [`Trade`]: per-trader accounts, per-instrument price history and
/// the number of trades completed (one per matched pair, whatever its quantity).
#[derive(Debug, Clone)]
pub struct TradeLedger {
    accounts: Vec<TraderAccount>,
    histories: Vec<PriceHistory>,
    trades_completed: u64,
}

impl TradeLedger {
    pub fn new(num_traders: usize, num_instruments: usize) -> Self {
        Self {
            accounts: vec![TraderAccount::default(); num_traders],
            histories: vec![PriceHistory::new(); num_instruments],
            trades_completed: 0,
        }
    }

    /// Applies one trade. Ids are expected to be in range; the market validates them
    /// before any order reaches a book.
    pub fn record(&mut self, trade: &Trade) {
        let notional = trade.notional();

        let buyer = &mut self.accounts[trade.buyer];
        buyer.bought += trade.quantity;
        buyer.net_transfer -= notional;

        let seller = &mut self.accounts[trade.seller];
        seller.sold += trade.quantity;
        seller.net_transfer += notional;

        self.histories[trade.instrument].push(trade.price);
        self.trades_completed += 1;
    }

    pub fn trades_completed(&self) -> u64 {
        self.trades_completed
    }

    pub fn accounts(&self) -> &[TraderAccount] {
        &self.accounts
    }

    pub fn account(&self, trader: usize) -> Option<&TraderAccount> {
        self.accounts.get(trader)
    }

    pub fn history(&self, instrument: usize) -> Option<&PriceHistory> {
        self.histories.get(instrument)
    }

    pub fn histories(&self) -> &[PriceHistory] {
        &self.histories
    }
}
