//! Maps trading symbols to their [`OrderBook`], fixed once at startup.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::orderbook::OrderBook;

/// One [`OrderBook`] per symbol, each behind its own [`Mutex`]. The map
/// itself never changes after construction, so it needs no lock of its
/// own — only the per-symbol mutation path does.
pub struct Registry {
    books: HashMap<String, Mutex<OrderBook>>,
    symbols: Vec<String>,
    arrival_seq: AtomicU64,
}

impl Registry {
    /// Builds a registry with one empty book per symbol. `symbols` is kept
    /// in the order given, which is what `list_symbols` returns.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        let books = symbols
            .iter()
            .map(|s| (s.clone(), Mutex::new(OrderBook::new(s.clone()))))
            .collect();
        Self {
            books,
            symbols,
            arrival_seq: AtomicU64::new(0),
        }
    }

    pub fn list_symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn book(&self, symbol: &str) -> Option<&Mutex<OrderBook>> {
        self.books.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.books.contains_key(symbol)
    }

    /// Globally monotonic sequence number assigned at intake time; the
    /// tie-breaker for price-time priority.
    pub fn next_arrival_seq(&self) -> u64 {
        self.arrival_seq.fetch_add(1, Ordering::Relaxed)
    }
}
