use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    errors::MarketError,
    ledger::{TradeLedger, TraderAccount},
    median::MedianQuote,
    orderbook::OrderBook,
    orders::{MAX_PRICE, MAX_QUANTITY, Order, OrderRequest},
    time_traveler::{Opportunity, TimeTraveler},
    trade::Trade,
};

/// Size of the market and which optional analytics to maintain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketConfig {
    pub num_traders: usize,
    pub num_instruments: usize,
    /// Report medians at every timestamp boundary and in [`Market::finish`].
    pub track_medians: bool,
}

/// What happened when one order was submitted.
///
/// `medians` is only non-empty when the order opened a new timestamp: it then holds the
/// medians as of the **previous** timestamp, reported before the order was matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub medians: Vec<MedianQuote>,
    pub trades: Vec<Trade>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TravelerReport {
    pub instrument: usize,
    pub opportunity: Option<Opportunity>,
}

/// Facts available once the stream is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndOfDay {
    pub final_medians: Vec<MedianQuote>,
    pub trades_completed: u64,
    pub traders: Vec<TraderAccount>,
    pub time_travelers: Vec<TravelerReport>,
}

/// All state of one replay: a book and a time traveler per instrument, plus the ledger.
///
/// Orders must arrive with non-decreasing timestamps; the first regression is reported as
/// [`MarketError::TimestampRegression`] and the caller is expected to abandon the run.
#[derive(Debug)]
pub struct Market {
    config: MarketConfig,
    books: Vec<OrderBook>,
    travelers: Vec<TimeTraveler>,
    ledger: TradeLedger,
    clock: u64,
    next_sequence: u64,
}

impl Market {
    pub fn new(config: MarketConfig) -> Self {
        info!(
            traders = config.num_traders,
            instruments = config.num_instruments,
            "opening market"
        );
        Self {
            config,
            books: (0..config.num_instruments).map(|_| OrderBook::new()).collect(),
            travelers: vec![TimeTraveler::new(); config.num_instruments],
            ledger: TradeLedger::new(config.num_traders, config.num_instruments),
            clock: 0,
            next_sequence: 0,
        }
    }

    /// Accepts one order: matches it against its instrument's book, books the resulting
    /// trades and feeds the quote to the instrument's time traveler.
    ///
    /// # Errors
    /// Out-of-range ids, a zero or above-`u32` price or quantity, or a timestamp earlier than the last
    /// accepted one. A rejected order leaves the market untouched.
    pub fn submit(&mut self, request: OrderRequest) -> Result<Submission, MarketError> {
        if let Err(err) = self.validate(&request) {
            warn!(?request, %err, "rejecting order");
            return Err(err);
        }

        let mut medians = Vec::new();
        if request.timestamp != self.clock {
            if self.config.track_medians {
                medians = self.medians();
            }
            debug!(from = self.clock, to = request.timestamp, "advancing clock");
            self.clock = request.timestamp;
        }

        let order = Order::from_request(request, self.next_sequence);
        self.next_sequence += 1;

        let trades = self.books[request.instrument].match_order(order);
        for trade in &trades {
            self.ledger.record(trade);
        }
        self.travelers[request.instrument].observe(request.side, request.price, request.timestamp);

        Ok(Submission { medians, trades })
    }

    fn validate(&self, request: &OrderRequest) -> Result<(), MarketError> {
        if request.trader >= self.config.num_traders {
            return Err(MarketError::TraderOutOfRange {
                trader: request.trader,
                num_traders: self.config.num_traders,
            });
        }
        if request.instrument >= self.config.num_instruments {
            return Err(MarketError::InstrumentOutOfRange {
                instrument: request.instrument,
                num_instruments: self.config.num_instruments,
            });
        }
        if request.price == 0 {
            return Err(MarketError::NonPositivePrice);
        }
        if request.quantity == 0 {
            return Err(MarketError::NonPositiveQuantity);
        }
        if request.price > MAX_PRICE {
            return Err(MarketError::PriceOutOfRange {
                price: request.price,
                max: MAX_PRICE,
            });
        }
        if request.quantity > MAX_QUANTITY {
            return Err(MarketError::QuantityOutOfRange {
                quantity: request.quantity,
                max: MAX_QUANTITY,
            });
        }
        if request.timestamp < self.clock {
            return Err(MarketError::TimestampRegression {
                last: self.clock,
                got: request.timestamp,
            });
        }
        Ok(())
    }

    /// Cumulative median of every instrument that has traded, stamped with the current
    /// clock. Instruments without trades are skipped.
    pub fn medians(&self) -> Vec<MedianQuote> {
        self.ledger
            .histories()
            .iter()
            .enumerate()
            .filter_map(|(instrument, history)| {
                history.median().map(|price| MedianQuote {
                    instrument,
                    timestamp: self.clock,
                    price,
                })
            })
            .collect()
    }

    /// Closes the day: final medians (when tracked), trade count, trader accounts and the
    /// time-traveler result of every instrument.
    pub fn finish(&self) -> EndOfDay {
        let final_medians = if self.config.track_medians {
            self.medians()
        } else {
            Vec::new()
        };
        info!(
            trades = self.ledger.trades_completed(),
            orders = self.next_sequence,
            "end of day"
        );
        EndOfDay {
            final_medians,
            trades_completed: self.ledger.trades_completed(),
            traders: self.ledger.accounts().to_vec(),
            time_travelers: self
                .travelers
                .iter()
                .enumerate()
                .map(|(instrument, traveler)| TravelerReport {
                    instrument,
                    opportunity: traveler.opportunity(),
                })
                .collect(),
        }
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Timestamp of the last accepted order (0 before any).
    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn book(&self, instrument: usize) -> Option<&OrderBook> {
        self.books.get(instrument)
    }

    pub fn books(&self) -> &[OrderBook] {
        &self.books
    }

    pub fn ledger(&self) -> &TradeLedger {
        &self.ledger
    }

    pub fn traveler(&self, instrument: usize) -> Option<&TimeTraveler> {
        self.travelers.get(instrument)
    }
}
