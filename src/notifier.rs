//! Fan-out of order events to an unspecified set of subscribers.
//!
//! Each symbol gets its own [`broadcast`] channel. Delivery is best-effort:
//! a subscriber that lags or disconnects is dropped by `broadcast` itself
//! (its next `recv` returns `Lagged`/`Closed`), so there is no subscriber
//! set to manage by hand. Ordering per subscriber matches commit order
//! because [`crate::intake::place_order`] calls `publish` while it still
//! holds the book lock that produced the event — if `publish` ran after
//! releasing the lock, two concurrent callers could commit in one order
//! but publish in the other.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::warn;

use crate::order::{Order, Trade};
use crate::orderbook::BookSnapshot;

const CHANNEL_CAPACITY: usize = 1024;

/// Emitted after every accepted order, win or no-fill.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename = "order_event")]
pub struct OrderEvent {
    pub symbol: String,
    pub order: Order,
    pub trades: Vec<Trade>,
    pub snapshot: BookSnapshot,
}

pub struct Notifier {
    channels: HashMap<String, broadcast::Sender<OrderEvent>>,
}

impl Notifier {
    /// One channel per symbol, fixed at startup alongside the [`crate::registry::Registry`].
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let channels = symbols
            .into_iter()
            .map(|s| (s.into(), broadcast::channel(CHANNEL_CAPACITY).0))
            .collect();
        Self { channels }
    }

    pub fn subscribe(&self, symbol: &str) -> Option<broadcast::Receiver<OrderEvent>> {
        self.channels.get(symbol).map(|tx| tx.subscribe())
    }

    /// Best-effort publish. Returns without error if nobody is listening —
    /// that is the expected steady state between client connections.
    pub fn publish(&self, event: OrderEvent) {
        if let Some(tx) = self.channels.get(&event.symbol) {
            // `send` only errors when there are zero receivers; that is not
            // a failure for a best-effort fan-out.
            if tx.send(event).is_err() {
                warn!("no subscribers currently attached; event dropped");
            }
        }
    }
}
