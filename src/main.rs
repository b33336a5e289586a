use clap::{Parser, Subcommand};
use matchbook::seed::{SeedConfig, seed_books};
use matchbook::simulate::{self, SimConfig};
use matchbook::state::AppState;
use matchbook::utils::shutdown_token;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "engine-cli")]
#[command(
    author = "Andrew Odiit",
    version = "0.1",
    about = "A demo of a limit-order-book-engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn default_symbols() -> String {
    "BTC-USD,ETH-USD".to_string()
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP/WS server only.
    Server {
        #[arg(long, default_value_t = 3000)]
        port: u16,
        #[arg(long, default_value_t = default_symbols())]
        symbols: String,
        #[arg(long, default_value_t = false)]
        no_seed: bool,
    },
    /// Run the server plus a noisy order-flow simulator against it.
    Simulate {
        #[arg(long, default_value_t = 3000)]
        port: u16,
        #[arg(long, default_value_t = default_symbols())]
        symbols: String,
        #[arg(long, default_value_t = 0)]
        secs: u64,
        #[arg(long, default_value_t = 5.0)]
        attack_rate_hz: f64,
        #[arg(long, default_value_t = 0.1)]
        noise_sigma: f64,
        #[arg(long, default_value_t = 3.0)]
        mean_qty: f64,
    },
}

async fn wait_for_server(api_base: &str) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    loop {
        match client.get(format!("{api_base}/symbols")).send().await {
            Ok(resp) if resp.status().is_success() => break,
            _ => tokio::time::sleep(Duration::from_millis(25)).await,
        }
    }
    Ok(())
}

fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let token = shutdown_token();
    let cli = Cli::parse();

    match cli.command {
        Commands::Server {
            port,
            symbols,
            no_seed,
        } => {
            let state = AppState::new(parse_symbols(&symbols));
            if !no_seed {
                seed_books(&state.registry, &state.notifier, &SeedConfig::default());
            }
            run_server(port, state, token).await?;
        }
        Commands::Simulate {
            port,
            symbols,
            secs,
            attack_rate_hz,
            noise_sigma,
            mean_qty,
        } => {
            let symbols = parse_symbols(&symbols);
            let state = AppState::new(symbols.clone());
            seed_books(&state.registry, &state.notifier, &SeedConfig::default());

            let server_token = token.clone();
            let mut handlers = tokio::task::JoinSet::new();
            let listener = TcpListener::bind(format!("0.0.0.0:{port}")).await?;
            let app = matchbook::api::router(state);
            handlers.spawn(async move {
                tracing::info!(port, "HTTP/WS server listening");
                axum::serve(listener, app)
                    .with_graceful_shutdown(server_token.cancelled_owned())
                    .await
                    .unwrap();
            });

            let api_base = format!("http://127.0.0.1:{port}");
            wait_for_server(&api_base).await?;

            for symbol in symbols {
                let sim_token = token.clone();
                let cfg = SimConfig {
                    api_base: api_base.clone(),
                    symbol,
                    run_secs: if secs == 0 { None } else { Some(secs) },
                    attack_rate_hz,
                    noise_sigma,
                    mean_qty,
                };
                handlers.spawn(async move {
                    if let Err(e) = simulate::run_simulation(cfg, sim_token).await {
                        tracing::error!(error = %e, "simulation exited with an error");
                    }
                });
            }

            handlers.join_all().await;
        }
    }
    Ok(())
}

async fn run_server(port: u16, state: AppState, token: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
    let listener = TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    let app = matchbook::api::router(state);
    tracing::info!(port, "HTTP/WS server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(token.cancelled_owned())
        .await?;
    Ok(())
}
