//! Simulation harness: drives noisy order flow against a running server
//! over its HTTP API, the same way a real market-making client would.

use rand::Rng;
use rand_distr::{Distribution, Exp, Exp1, Normal};
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Clone)]
pub struct SimConfig {
    pub api_base: String,
    pub symbol: String,
    pub run_secs: Option<u64>,
    pub attack_rate_hz: f64,
    pub noise_sigma: f64,
    pub mean_qty: f64,
}

#[derive(Deserialize)]
struct Ack {
    trades: Vec<AckTrade>,
}

#[derive(Deserialize)]
struct AckTrade {
    price: u64,
    qty: u64,
}

/// Noisy limit-order simulation loop: quotes drift around a random-walk mid,
/// one side or the other chosen at random each tick, until `run_secs`
/// elapses or `cancel_token` fires.
pub async fn run_simulation(cfg: SimConfig, cancel_token: CancellationToken) -> anyhow::Result<()> {
    let client: Client = ClientBuilder::new().timeout(Duration::from_secs(5)).build()?;

    let ia = Exp::new(cfg.attack_rate_hz).expect("attack_rate_hz must be > 0");
    let drift = Normal::new(0.0, cfg.noise_sigma).expect("noise_sigma >= 0");
    let size = Exp1;

    let mut inventory: i64 = 0;
    let mut pnl: f64 = 0.0;
    let mut mid: f64 = 50.0;
    let start = Instant::now();
    let spread = 1.0_f64;

    loop {
        if let Some(max_secs) = cfg.run_secs {
            if start.elapsed().as_secs() >= max_secs {
                break;
            }
        }

        let wait_secs: f64 = ia.sample(&mut rand::rng());
        tokio::select! {
            _ = cancel_token.cancelled() => {
                info!("received shutdown; exiting simulation loop");
                break;
            }
            _ = sleep(Duration::from_secs_f64(wait_secs)) => {}
        }

        let unit: f64 = size.sample(&mut rand::rng());
        let qty = (unit * cfg.mean_qty).max(1.0).round() as u64;

        mid += drift.sample(&mut rand::rng());

        let (price, side) = if rand::rng().random_bool(0.5) {
            (mid - spread, "buy")
        } else {
            (mid + spread, "sell")
        };
        let price = price.max(1.0).round() as u64;

        match client
            .post(format!("{}/orders", cfg.api_base))
            .json(&json!({
                "user_id": "simulator",
                "symbol": cfg.symbol,
                "side": side,
                "kind": "limit",
                "price": price,
                "qty": qty,
            }))
            .send()
            .await
        {
            Ok(resp) => {
                if let Err(e) = resp.error_for_status_ref() {
                    warn!(error = %e, "order post returned non-success");
                    continue;
                }
                match resp.json::<Ack>().await {
                    Ok(ack) => {
                        for t in ack.trades {
                            let px = t.price as f64;
                            let q = t.qty as f64;
                            if side == "buy" {
                                inventory -= q as i64;
                                pnl += px * q;
                            } else {
                                inventory += q as i64;
                                pnl -= px * q;
                            }
                        }
                        info!(
                            elapsed = format_args!("{:.1}s", start.elapsed().as_secs_f64()),
                            side,
                            qty,
                            price,
                            mid = format_args!("{:.2}", mid),
                            inventory,
                            pnl = format_args!("{:.2}", pnl),
                            "sim tick"
                        );
                    }
                    Err(e) => warn!(error = %e, "failed to parse order ack"),
                }
            }
            Err(e) => {
                warn!(error = %e, "HTTP request failed");
                continue;
            }
        }
    }

    info!(inventory, pnl = format_args!("{:.2}", pnl), "simulation done");
    Ok(())
}
