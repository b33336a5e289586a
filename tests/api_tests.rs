use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    response::Response,
};

use matchbook::{
    api::{OrderAck, router},
    state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_app() -> Router {
    let state = AppState::new(["BTC-USD", "ETH-USD"]);
    router(state)
}

async fn body_json(res: Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn typed<T: serde::de::DeserializeOwned>(res: Response) -> T {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn list_symbols_returns_configured_books() {
    let app = test_app();
    let res = app
        .oneshot(Request::builder().uri("/symbols").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let symbols: Vec<String> = typed(res).await;
    assert_eq!(symbols, vec!["BTC-USD", "ETH-USD"]);
}

#[tokio::test]
async fn unknown_symbol_on_book_returns_404() {
    let app = test_app();
    let res = app
        .oneshot(Request::builder().uri("/book/DOGE-USD").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let v = body_json(res).await;
    assert!(v["error"].as_str().unwrap().contains("unknown symbol"));
}

#[tokio::test]
async fn create_order_rejects_zero_qty() {
    let app = test_app();
    let body = json!({
        "user_id": "alice",
        "symbol": "BTC-USD",
        "side": "buy",
        "kind": "limit",
        "price": 50,
        "qty": 0
    });

    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/orders")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let v = body_json(res).await;
    assert_eq!(v["error"], "quantity must be > 0");
}

#[tokio::test]
async fn create_order_rejects_limit_without_price() {
    let app = test_app();
    let body = json!({
        "user_id": "alice",
        "symbol": "BTC-USD",
        "side": "buy",
        "kind": "limit",
        "price": null,
        "qty": 5
    });

    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/orders")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let v = body_json(res).await;
    assert_eq!(v["error"], "limit orders require a positive price");
}

#[tokio::test]
async fn limit_order_rests_and_shows_up_in_book_snapshot() {
    let app = test_app();

    let create = json!({
        "user_id": "alice",
        "symbol": "BTC-USD",
        "side": "buy",
        "kind": "limit",
        "price": 48,
        "qty": 10
    });

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/orders")
                .header("content-type", "application/json")
                .body(Body::from(create.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let ack: OrderAck = typed(res).await;
    assert!(!ack.filled);

    let res = app
        .oneshot(Request::builder().uri("/book/BTC-USD").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let snap = body_json(res).await;
    assert_eq!(snap["bids"][0][0].as_u64(), Some(48));
    assert_eq!(snap["bids"][0][1].as_u64(), Some(10));
}

#[tokio::test]
async fn crossing_orders_produce_a_trade_and_appear_in_the_trade_log() {
    let app = test_app();

    let resting_ask = json!({
        "user_id": "maker",
        "symbol": "BTC-USD",
        "side": "sell",
        "kind": "limit",
        "price": 52,
        "qty": 3
    });
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/orders")
                .header("content-type", "application/json")
                .body(Body::from(resting_ask.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let taker = json!({
        "user_id": "taker",
        "symbol": "BTC-USD",
        "side": "buy",
        "kind": "market",
        "qty": 2
    });
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/orders")
                .header("content-type", "application/json")
                .body(Body::from(taker.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let ack: OrderAck = typed(res).await;
    assert!(ack.filled);
    assert_eq!(ack.trades[0].price, 52);
    assert_eq!(ack.trades[0].qty, 2);

    let res = app
        .oneshot(Request::builder().uri("/trades/BTC-USD").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let trades: Vec<Value> = typed(res).await;
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0]["price"], 52);
}
