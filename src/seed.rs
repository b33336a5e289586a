//! Lays down an initial ladder of resting limit orders on each configured
//! book before the server starts accepting traffic, so the first snapshot a
//! client sees isn't empty.

use tracing::info;

use crate::intake::{self, NewOrderRequest};
use crate::notifier::Notifier;
use crate::order::{OrderKind, Side};
use crate::registry::Registry;

/// Rungs on each side of the book, spaced `step` ticks apart starting one
/// `step` away from `mid`.
pub struct SeedConfig {
    pub mid_price: u64,
    pub step: u64,
    pub levels: u32,
    pub qty_per_level: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig {
            mid_price: 10_000,
            step: 5,
            levels: 5,
            qty_per_level: 10,
        }
    }
}

/// Places `config.levels` resting bids below `mid_price` and the same number
/// of resting asks above it, for every symbol the registry knows about.
pub fn seed_books(registry: &Registry, notifier: &Notifier, config: &SeedConfig) {
    for symbol in registry.list_symbols() {
        for level in 1..=config.levels as u64 {
            let bid_price = config.mid_price.saturating_sub(level * config.step);
            let ask_price = config.mid_price + level * config.step;

            for (side, price) in [(Side::Buy, bid_price), (Side::Sell, ask_price)] {
                let req = NewOrderRequest {
                    user_id: "seed".to_string(),
                    symbol: symbol.clone(),
                    side,
                    kind: OrderKind::Limit,
                    price: Some(price),
                    qty: config.qty_per_level,
                };
                if let Err(e) = intake::place_order(registry, notifier, req) {
                    tracing::warn!(symbol = %symbol, error = %e, "seed order rejected");
                }
            }
        }
        info!(symbol = %symbol, levels = config.levels, "seeded book");
    }
}
