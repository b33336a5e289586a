use criterion::{Criterion, criterion_group, criterion_main};
use matchbook::order::{Order, OrderKind, Side};
use matchbook::orderbook::OrderBook;
use uuid::Uuid;

fn limit(side: Side, price: u64, qty: u64, arrival_seq: u64) -> Order {
    Order {
        id: Uuid::new_v4(),
        user_id: "bench".to_string(),
        symbol: "BTC-USD".to_string(),
        side,
        kind: OrderKind::Limit,
        price: Some(price),
        qty,
        remaining: qty,
        arrival_seq,
    }
}

fn market(side: Side, qty: u64, arrival_seq: u64) -> Order {
    Order {
        id: Uuid::new_v4(),
        user_id: "bench".to_string(),
        symbol: "BTC-USD".to_string(),
        side,
        kind: OrderKind::Market,
        price: None,
        qty,
        remaining: qty,
        arrival_seq,
    }
}

/// Bids occupy `1..=depth`, asks occupy `depth+1..=2*depth` — disjoint
/// ranges so none of these seed orders cross each other on the way in.
/// (A bid only crosses an ask priced at or below it; keeping every ask
/// strictly above every bid keeps the book intact after setup.)
fn setup_order_book(depth: u64, orders_per_level: u64) -> OrderBook {
    let mut ob = OrderBook::new("BTC-USD");
    let mut seq = 0u64;
    for level in 1..=depth {
        for _ in 0..orders_per_level {
            ob.process_order(limit(Side::Sell, depth + level, 1, seq));
            seq += 1;
            ob.process_order(limit(Side::Buy, level, 1, seq));
            seq += 1;
        }
    }
    ob
}

fn bench_match_order(c: &mut Criterion) {
    let depth = 100;
    let orders_per_level = 10;

    c.bench_function("match 1 market order", |b| {
        b.iter_batched(
            || setup_order_book(depth, orders_per_level),
            |mut ob| {
                ob.process_order(market(Side::Buy, depth * orders_per_level / 2, u64::MAX - 1));
            },
            criterion::BatchSize::SmallInput,
        )
    });

    c.bench_function("match 1 limit crossing order", |b| {
        b.iter_batched(
            || setup_order_book(depth, orders_per_level),
            |mut ob| {
                ob.process_order(limit(
                    Side::Sell,
                    depth / 2,
                    depth * orders_per_level,
                    u64::MAX - 1,
                ));
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_match_order);
criterion_main!(benches);
