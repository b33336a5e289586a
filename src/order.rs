//! Order and trade value types shared by every layer of the engine.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, collision-free identifier for an [`Order`] or a [`Trade`].
pub type OrderId = Uuid;
pub type TradeId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Limit,
    Market,
}

/// A live or resting order.
///
/// `remaining` is the only field the matching engine ever mutates after
/// creation; it decreases monotonically from `qty` down to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: String,
    pub symbol: String,
    pub side: Side,
    pub kind: OrderKind,
    /// Limit price. Always `Some` for `OrderKind::Limit`, ignored for `Market`.
    pub price: Option<u64>,
    pub qty: u64,
    pub remaining: u64,
    /// Monotonic intake-time sequence number; the tie-breaker for price-time
    /// priority. Not wall-clock time, which may be coarse or non-monotonic.
    pub arrival_seq: u64,
}

impl Order {
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// A single match between a resting (maker) order and an incoming (taker)
/// order. Priced at the maker's posted price, never the taker's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub symbol: String,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub price: u64,
    pub qty: u64,
    #[serde(with = "ts_millis")]
    pub ts: SystemTime,
}

/// Serializes [`SystemTime`] as milliseconds since the Unix epoch, since
/// `SystemTime` itself has no stable serde representation.
mod ts_millis {
    use std::time::{SystemTime, UNIX_EPOCH};

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &SystemTime, s: S) -> Result<S::Ok, S::Error> {
        let millis = ts
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        s.serialize_u128(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SystemTime, D::Error> {
        let millis = u128::deserialize(d)?;
        Ok(UNIX_EPOCH + std::time::Duration::from_millis(millis as u64))
    }
}
