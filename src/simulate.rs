//! Seeded synthetic order stream.
//!
//! Produces the same kind of [`OrderRequest`]s a trade-list file would, so the market cannot
//! tell the two sources apart.
//!
//! ## Model
//! - Inter-arrival gaps are drawn from `Exp(λ = arrival_rate)` and accumulated onto a
//!   clock; an order's timestamp is the floor of that clock, so timestamps never decrease
//!   and roughly `arrival_rate` orders share each timestamp.
//! - Each instrument has a mid-price that drifts by `N(0, NOISE_SIGMA)` whenever it is quoted.
//! - A quote lands within `±MAX_SPREAD` of the drifted mid, so bids and asks cross often.
//! - Sizes are `1 + Exp1 * MEAN_QTY`, heavy-tailed around `MEAN_QTY`.
//!
//! The same [`GeneratorConfig`] always yields the same stream.

use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Exp, Exp1, Normal};

use crate::{
    errors::GeneratorError,
    orders::{OrderRequest, Side},
};

const START_MID: f64 = 50.0;
const NOISE_SIGMA: f64 = 1.0;
const MAX_SPREAD: i64 = 5;
const MEAN_QTY: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub seed: u32,
    pub num_orders: u32,
    /// Mean number of orders per timestamp.
    pub arrival_rate: u32,
    pub num_traders: usize,
    pub num_instruments: usize,
}

pub struct OrderGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    arrivals: Exp<f64>,
    drift: Normal<f64>,
    mids: Vec<f64>,
    clock: f64,
    emitted: u32,
}

impl OrderGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        if config.num_traders == 0 || config.num_instruments == 0 {
            return Err(GeneratorError::EmptyMarket);
        }
        if config.arrival_rate == 0 {
            return Err(GeneratorError::ArrivalRate(config.arrival_rate));
        }
        let arrivals = Exp::new(f64::from(config.arrival_rate))
            .map_err(|e| GeneratorError::Distribution(e.to_string()))?;
        let drift = Normal::new(0.0, NOISE_SIGMA)
            .map_err(|e| GeneratorError::Distribution(e.to_string()))?;

        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(u64::from(config.seed)),
            arrivals,
            drift,
            mids: vec![START_MID; config.num_instruments],
            clock: 0.0,
            emitted: 0,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl Iterator for OrderGenerator {
    type Item = OrderRequest;

    fn next(&mut self) -> Option<OrderRequest> {
        if self.emitted >= self.config.num_orders {
            return None;
        }
        self.emitted += 1;

        self.clock += self.arrivals.sample(&mut self.rng);
        let timestamp = self.clock.floor() as u64;

        let trader = self.rng.random_range(0..self.config.num_traders);
        let instrument = self.rng.random_range(0..self.config.num_instruments);
        let side = if self.rng.random_bool(0.5) {
            Side::Buy
        } else {
            Side::Sell
        };

        let mid = (self.mids[instrument] + self.drift.sample(&mut self.rng)).max(1.0);
        self.mids[instrument] = mid;
        let offset = self.rng.random_range(-MAX_SPREAD..=MAX_SPREAD);
        let price = (mid.round() as i64 + offset).max(1) as u64;

        let raw: f64 = <Exp1 as Distribution<f64>>::sample(&Exp1, &mut self.rng);
        let quantity = 1 + (raw * MEAN_QTY) as u64;

        Some(OrderRequest {
            timestamp,
            trader,
            instrument,
            side,
            price,
            quantity,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.config.num_orders - self.emitted) as usize;
        (left, Some(left))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u32) -> GeneratorConfig {
        GeneratorConfig {
            seed,
            num_orders: 500,
            arrival_rate: 8,
            num_traders: 6,
            num_instruments: 3,
        }
    }

    #[test]
    fn same_seed_same_stream() {
        let a: Vec<_> = OrderGenerator::new(config(7)).unwrap().collect();
        let b: Vec<_> = OrderGenerator::new(config(7)).unwrap().collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 500);
    }

    #[test]
    fn different_seed_different_stream() {
        let a: Vec<_> = OrderGenerator::new(config(1)).unwrap().collect();
        let b: Vec<_> = OrderGenerator::new(config(2)).unwrap().collect();
        assert_ne!(a, b);
    }

    #[test]
    fn orders_are_valid_and_ordered() {
        let cfg = config(42);
        let orders: Vec<_> = OrderGenerator::new(cfg).unwrap().collect();
        assert!(orders.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        for o in &orders {
            assert!(o.trader < cfg.num_traders);
            assert!(o.instrument < cfg.num_instruments);
            assert!(o.price > 0);
            assert!(o.quantity > 0);
        }
    }

    #[test]
    fn size_hint_counts_down() {
        let mut generator = OrderGenerator::new(config(3)).unwrap();
        assert_eq!(generator.config(), &config(3));
        assert_eq!(generator.size_hint(), (500, Some(500)));
        generator.next();
        assert_eq!(generator.size_hint(), (499, Some(499)));
    }

    #[test]
    fn rejects_empty_market_and_zero_rate() {
        let mut cfg = config(0);
        cfg.num_traders = 0;
        assert!(matches!(
            OrderGenerator::new(cfg),
            Err(GeneratorError::EmptyMarket)
        ));

        let mut cfg = config(0);
        cfg.arrival_rate = 0;
        assert!(matches!(
            OrderGenerator::new(cfg),
            Err(GeneratorError::ArrivalRate(0))
        ));
    }
}
