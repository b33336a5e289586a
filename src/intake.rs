//! The facade every transport (REST, the seeder, the simulator) goes
//! through to get an order into the engine: validate, materialise an
//! [`Order`], then drive the book and notify subscribers under the same
//! lock, so the per-symbol event order subscribers observe always matches
//! commit order.

use uuid::Uuid;

use crate::errors::EngineError;
use crate::notifier::{Notifier, OrderEvent};
use crate::order::{Order, OrderKind, Side, Trade};
use crate::registry::Registry;

/// Fields the caller supplies; `id` and `arrival_seq` are assigned here.
pub struct NewOrderRequest {
    pub user_id: String,
    pub symbol: String,
    pub side: Side,
    pub kind: OrderKind,
    pub price: Option<u64>,
    pub qty: u64,
}

pub struct PlaceOrderResponse {
    pub order_id: Uuid,
    pub filled: bool,
    pub trades: Vec<Trade>,
}

/// Validates, matches, and publishes one order. `notifier.publish` runs
/// while the book lock is still held: `broadcast::Sender::send` only
/// copies the event into subscriber queues in memory, so this doesn't
/// reintroduce I/O into the critical section, and it's what makes two
/// concurrent callers for the same symbol publish in the same order they
/// committed in.
pub fn place_order(
    registry: &Registry,
    notifier: &Notifier,
    req: NewOrderRequest,
) -> Result<PlaceOrderResponse, EngineError> {
    if req.qty == 0 {
        return Err(EngineError::NonPositiveQty);
    }
    if req.kind == OrderKind::Limit && req.price.is_none_or(|p| p == 0) {
        return Err(EngineError::MissingLimitPrice);
    }
    let Some(book) = registry.book(&req.symbol) else {
        return Err(EngineError::UnknownSymbol(req.symbol));
    };

    let order = Order {
        id: Uuid::new_v4(),
        user_id: req.user_id,
        symbol: req.symbol.clone(),
        side: req.side,
        kind: req.kind,
        price: req.price,
        qty: req.qty,
        remaining: req.qty,
        arrival_seq: registry.next_arrival_seq(),
    };
    let order_id = order.id;

    let trades = {
        let mut book = book.lock().expect("order book mutex poisoned");
        let trades = book.process_order(order.clone());
        let snapshot = book.snapshot(10);
        notifier.publish(OrderEvent {
            symbol: req.symbol,
            order,
            trades: trades.clone(),
            snapshot,
        });
        trades
    };

    Ok(PlaceOrderResponse {
        order_id,
        filled: !trades.is_empty(),
        trades,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> (Registry, Notifier) {
        let symbols = ["BTC-USD"];
        (Registry::new(symbols), Notifier::new(symbols))
    }

    fn req(side: Side, kind: OrderKind, price: Option<u64>, qty: u64) -> NewOrderRequest {
        NewOrderRequest {
            user_id: "alice".into(),
            symbol: "BTC-USD".into(),
            side,
            kind,
            price,
            qty,
        }
    }

    #[test]
    fn rejects_unknown_symbol() {
        let (registry, notifier) = engine();
        let mut r = req(Side::Buy, OrderKind::Limit, Some(100), 1);
        r.symbol = "DOGE-USD".into();
        let err = place_order(&registry, &notifier, r).unwrap_err();
        assert_eq!(err, EngineError::UnknownSymbol("DOGE-USD".into()));
    }

    #[test]
    fn rejects_non_positive_qty() {
        let (registry, notifier) = engine();
        let err = place_order(&registry, &notifier, req(Side::Buy, OrderKind::Limit, Some(100), 0))
            .unwrap_err();
        assert_eq!(err, EngineError::NonPositiveQty);
    }

    #[test]
    fn rejects_limit_without_price() {
        let (registry, notifier) = engine();
        let err = place_order(&registry, &notifier, req(Side::Buy, OrderKind::Limit, None, 5))
            .unwrap_err();
        assert_eq!(err, EngineError::MissingLimitPrice);
    }

    #[test]
    fn accepts_resting_limit_order() {
        let (registry, notifier) = engine();
        let resp =
            place_order(&registry, &notifier, req(Side::Buy, OrderKind::Limit, Some(100), 5))
                .unwrap();
        assert!(!resp.filled);
        assert!(resp.trades.is_empty());
    }

    #[test]
    fn arrival_sequence_orders_two_intakes() {
        let (registry, notifier) = engine();
        place_order(&registry, &notifier, req(Side::Buy, OrderKind::Limit, Some(100), 1)).unwrap();
        let resp =
            place_order(&registry, &notifier, req(Side::Sell, OrderKind::Limit, Some(100), 1))
                .unwrap();
        assert!(resp.filled);
        assert_eq!(resp.trades[0].price, 100);
    }
}
