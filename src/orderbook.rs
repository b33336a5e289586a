//! The per-symbol order book: two [`PriorityQueue`]s (bids, asks) plus a
//! bounded trade history, and the `process_order` matching algorithm.
//!
//! A single [`OrderBook`] only ever sees traffic for one symbol; the
//! [`crate::registry::Registry`] owns one per configured symbol and
//! serialises access to each with its own lock.

use std::collections::VecDeque;
use std::time::SystemTime;

use serde::Serialize;
use tracing::{trace, warn};
use uuid::Uuid;

use crate::order::{Order, OrderKind, Side, Trade};
use crate::priority_queue::PriorityQueue;

/// Trade history is capped well above the largest supported read window
/// (`get_recent_trades` defaults to 200) so long-running books don't grow
/// their trade log without bound.
const MAX_TRADE_HISTORY: usize = 4096;

fn bid_better(a: &Order, b: &Order) -> bool {
    (a.price, std::cmp::Reverse(a.arrival_seq)) > (b.price, std::cmp::Reverse(b.arrival_seq))
}

fn ask_better(a: &Order, b: &Order) -> bool {
    (std::cmp::Reverse(a.price), std::cmp::Reverse(a.arrival_seq))
        > (std::cmp::Reverse(b.price), std::cmp::Reverse(b.arrival_seq))
}

/// An aggregated, point-in-time view of a book: up to `depth` price levels
/// per side, `[price, total_qty]`, bids descending and asks ascending.
#[derive(Debug, Clone, Serialize)]
pub struct BookSnapshot {
    pub symbol: String,
    pub bids: Vec<(u64, u64)>,
    pub asks: Vec<(u64, u64)>,
}

impl BookSnapshot {
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }
}

pub struct OrderBook {
    symbol: String,
    bids: PriorityQueue<Order>,
    asks: PriorityQueue<Order>,
    trades: VecDeque<Trade>,
}

impl OrderBook {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bids: PriorityQueue::new(bid_better),
            asks: PriorityQueue::new(ask_better),
            trades: VecDeque::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Matches `order` against the opposite side, then — if it's a `Limit`
    /// with quantity left over — rests the remainder on its own side.
    ///
    /// Returns the trades produced by this order, in the order they were
    /// matched (best resting price/time first).
    pub fn process_order(&mut self, mut order: Order) -> Vec<Trade> {
        debug_assert_eq!(order.symbol, self.symbol);
        debug_assert_eq!(order.remaining, order.qty);
        debug_assert!(order.remaining > 0);

        trace!(symbol = %self.symbol, order_id = %order.id, side = ?order.side, kind = ?order.kind, "matching incoming order");

        let mut trades = Vec::new();
        let opposite = match order.side {
            Side::Buy => &mut self.asks,
            Side::Sell => &mut self.bids,
        };

        while order.remaining > 0 {
            let Some(resting) = opposite.peek_mut() else {
                break;
            };
            if resting.is_exhausted() {
                opposite.pop();
                continue;
            }

            let resting_price = resting.price.expect("resting orders are always Limit");
            let crosses = match order.kind {
                OrderKind::Market => true,
                OrderKind::Limit => {
                    let taker_price = order.price.expect("validated limit order has a price");
                    match order.side {
                        Side::Buy => taker_price >= resting_price,
                        Side::Sell => taker_price <= resting_price,
                    }
                }
            };
            if !crosses {
                break;
            }

            let qty = order.remaining.min(resting.remaining);
            let (buy_order_id, sell_order_id) = match order.side {
                Side::Buy => (order.id, resting.id),
                Side::Sell => (resting.id, order.id),
            };

            order.remaining -= qty;
            resting.remaining -= qty;

            trades.push(Trade {
                id: Uuid::new_v4(),
                symbol: self.symbol.clone(),
                buy_order_id,
                sell_order_id,
                price: resting_price,
                qty,
                ts: SystemTime::now(),
            });

            if resting.is_exhausted() {
                opposite.pop();
            }
        }

        for trade in &trades {
            self.record_trade(trade.clone());
        }

        if order.remaining > 0 && order.kind == OrderKind::Limit {
            let own_side = match order.side {
                Side::Buy => &mut self.bids,
                Side::Sell => &mut self.asks,
            };
            own_side.push(order);
        } else if order.remaining > 0 {
            warn!(symbol = %self.symbol, order_id = %order.id, remaining = order.remaining, "market order left unmatched residual; dropping");
        }

        trades
    }

    fn record_trade(&mut self, trade: Trade) {
        if self.trades.len() == MAX_TRADE_HISTORY {
            self.trades.pop_front();
        }
        self.trades.push_back(trade);
    }

    /// Aggregates up to `depth` best price levels per side without
    /// disturbing resting orders.
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        BookSnapshot {
            symbol: self.symbol.clone(),
            bids: Self::aggregate_levels(self.bids.iter_sorted(), depth),
            asks: Self::aggregate_levels(self.asks.iter_sorted(), depth),
        }
    }

    fn aggregate_levels(sorted: Vec<Order>, depth: usize) -> Vec<(u64, u64)> {
        let mut levels: Vec<(u64, u64)> = Vec::new();
        for order in sorted {
            if order.is_exhausted() {
                continue;
            }
            let price = order.price.expect("resting orders are always Limit");
            match levels.last_mut() {
                Some((p, qty)) if *p == price => *qty += order.remaining,
                _ => {
                    if levels.len() == depth {
                        break;
                    }
                    levels.push((price, order.remaining));
                }
            }
        }
        levels
    }

    /// Last `n` trades, oldest-first within the returned slice (i.e.
    /// most-recent-last).
    pub fn recent_trades(&self, n: usize) -> Vec<Trade> {
        let skip = self.trades.len().saturating_sub(n);
        self.trades.iter().skip(skip).cloned().collect()
    }
}
