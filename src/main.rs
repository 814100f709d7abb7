//! Swap Quoter - HTTP service
//!
//! Run with: cargo run
//!
//! Serves quote and wallet endpoints. The RPC connection is only built when
//! the first request needs it, so the server starts without credentials.

use color_eyre::eyre::Result;
use console::style;
use tracing::{info, warn, error};

use swap_quoter::api::{self, AppState};
use swap_quoter::wallets::WalletStore;
use swap_quoter::{init_tracing, ChainAccess, Config, QuoteResolver};

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" 🦄 SWAP QUOTER - Uniswap V3 Quote Simulator").cyan().bold()
    );
    println!(
        "{}",
        style("    Direct pools | WETH fallback | USD pricing").cyan()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing("swap_quoter=info")?;

    print_banner();

    let config = Config::from_env();

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        error!("Please check your .env file");
        return Err(e);
    }

    config.print_summary();
    println!();

    if !config.has_credentials() {
        warn!("No INFURA_API_KEY or RPC_URL set - quote requests will fail until one is configured");
    }

    let addr = config.listen_socket()?;
    let wallets = WalletStore::open(&config.wallets_file);
    let resolver = QuoteResolver::new(ChainAccess::new(config));
    let app = api::router(AppState::new(resolver, wallets));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    println!(
        "{} Listening on {}",
        style("✓").green(),
        style(format!("http://{}", addr)).cyan()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
