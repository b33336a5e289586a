//! REST + WebSocket transport around the engine. Everything here is a thin
//! adapter: validation and matching live in [`crate::intake`] and
//! [`crate::orderbook`]; this module only translates HTTP/WS in and out.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, warn};

use crate::errors::EngineError;
use crate::intake::{self, NewOrderRequest};
use crate::order::{OrderKind, Side};
use crate::orderbook::BookSnapshot;
use crate::state::AppState;

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = match &self {
            EngineError::UnknownSymbol(_) => StatusCode::NOT_FOUND,
            EngineError::NonPositiveQty | EngineError::MissingLimitPrice => {
                StatusCode::BAD_REQUEST
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Request payload for `POST /orders`.
#[derive(Debug, Deserialize)]
pub struct NewOrder {
    pub user_id: String,
    pub symbol: String,
    pub side: Side,
    pub kind: OrderKind,
    pub price: Option<u64>,
    pub qty: u64,
}

/// Response for `POST /orders`.
#[derive(Debug, Serialize)]
pub struct OrderAck {
    pub order_id: uuid::Uuid,
    pub filled: bool,
    pub trades: Vec<crate::order::Trade>,
}

fn default_depth() -> usize {
    10
}
#[derive(Deserialize)]
pub struct DepthQuery {
    #[serde(default = "default_depth")]
    depth: usize,
}

fn default_trade_window() -> usize {
    200
}
#[derive(Deserialize)]
pub struct TradesQuery {
    #[serde(default = "default_trade_window")]
    n: usize,
}

/// `GET /symbols`
pub async fn list_symbols(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.registry.list_symbols().to_vec())
}

/// `GET /book/{symbol}?depth=10`
pub async fn get_order_book(
    Path(symbol): Path<String>,
    Query(q): Query<DepthQuery>,
    State(state): State<AppState>,
) -> Result<Json<BookSnapshot>, EngineError> {
    let book = state
        .registry
        .book(&symbol)
        .ok_or_else(|| EngineError::UnknownSymbol(symbol.clone()))?;
    let snapshot = book.lock().expect("order book mutex poisoned").snapshot(q.depth);
    Ok(Json(snapshot))
}

/// `GET /trades/{symbol}?n=200`
pub async fn get_trade_log(
    Path(symbol): Path<String>,
    Query(q): Query<TradesQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<crate::order::Trade>>, EngineError> {
    let book = state
        .registry
        .book(&symbol)
        .ok_or_else(|| EngineError::UnknownSymbol(symbol.clone()))?;
    let trades = book
        .lock()
        .expect("order book mutex poisoned")
        .recent_trades(q.n);
    Ok(Json(trades))
}

/// `POST /orders`
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<NewOrder>,
) -> Result<Json<OrderAck>, EngineError> {
    let req = NewOrderRequest {
        user_id: payload.user_id,
        symbol: payload.symbol,
        side: payload.side,
        kind: payload.kind,
        price: payload.price,
        qty: payload.qty,
    };
    match intake::place_order(&state.registry, &state.notifier, req) {
        Ok(resp) => Ok(Json(OrderAck {
            order_id: resp.order_id,
            filled: resp.filled,
            trades: resp.trades,
        })),
        Err(e) => {
            warn!(error = %e, "order rejected");
            Err(e)
        }
    }
}

/// `GET /ws/{symbol}`
pub async fn ws_handler(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Response {
    if !state.registry.contains(&symbol) {
        return EngineError::UnknownSymbol(symbol).into_response();
    }
    ws.on_upgrade(move |socket| handle_socket(socket, state, symbol))
        .into_response()
}

/// Sends an initial book snapshot, then forwards every subsequent
/// [`crate::notifier::OrderEvent`] for this symbol until the client
/// disconnects or the channel falls behind.
async fn handle_socket(mut socket: WebSocket, state: AppState, symbol: String) {
    let Some(mut events) = state.notifier.subscribe(&symbol) else {
        return;
    };

    let initial = state
        .registry
        .book(&symbol)
        .map(|b| b.lock().expect("order book mutex poisoned").snapshot(10))
        .unwrap_or_else(|| BookSnapshot::empty(symbol.clone()));
    let frame = json!({ "type": "snapshot", "symbol": symbol, "snapshot": initial });
    if let Err(e) = socket.send(Message::Text(frame.to_string().into())).await {
        error!("failed to send initial snapshot: {e}");
        return;
    }

    loop {
        match events.recv().await {
            Ok(event) => {
                let text = serde_json::to_string(&event).expect("OrderEvent always serializes");
                if let Err(e) = socket.send(Message::Text(text.into())).await {
                    error!("websocket send failed: {e}");
                    break;
                }
            }
            Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "subscriber lagged; some order events were dropped");
            }
            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/orders", post(create_order))
        .route("/symbols", get(list_symbols))
        .route("/book/{symbol}", get(get_order_book))
        .route("/trades/{symbol}", get(get_trade_log))
        .route("/ws/{symbol}", get(ws_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .include_headers(false)
                        .level(tracing::Level::TRACE),
                )
                .on_response(DefaultOnResponse::new().level(tracing::Level::TRACE)),
        )
        .with_state(state)
}
