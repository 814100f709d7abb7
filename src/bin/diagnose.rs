//! Diagnostic tool - Check configuration and RPC connectivity
//!
//! Run with: cargo run --bin diagnose

use swap_quoter::simulator::{ChainReader, RpcChain};
use swap_quoter::tokens::USDC;
use swap_quoter::Config;

#[tokio::main]
async fn main() {
    println!("🔍 SWAP QUOTER DIAGNOSTIC CHECK\n");

    let config = Config::from_env();

    println!("═══════════════════════════════════════════════════");
    println!("                  CONFIGURATION                     ");
    println!("═══════════════════════════════════════════════════\n");

    let checks = [
        ("ETHEREUM_NETWORK", "mainnet", "Infura network name"),
        ("LISTEN_ADDR", "127.0.0.1:3000", "HTTP bind address"),
        ("WALLETS_FILE", "./wallets/wallets.json", "Wallet store location"),
    ];

    for (key, default, desc) in checks {
        let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
        let marker = if std::env::var(key).is_err() { "(default)" } else { "(from .env)" };
        println!("  {}: {} {}", key, value, marker);
        println!("    └─ {}\n", desc);
    }

    println!("  INFURA_API_KEY: {}", if config.infura_api_key.is_some() { "✅ Set" } else { "❌ Not set" });
    println!("  RPC_URL:        {}", if config.rpc_url.is_some() { "✅ Set (overrides Infura)" } else { "not set" });
    println!("  Endpoint:       {}", config.endpoint_display());

    if let Err(e) = config.validate() {
        println!("\n  ⚠️  Validation failed: {}", e);
    }

    println!("\n═══════════════════════════════════════════════════");
    println!("                   CONNECTIVITY                     ");
    println!("═══════════════════════════════════════════════════\n");

    let endpoint = match config.endpoint_url() {
        Ok(url) => url,
        Err(e) => {
            println!("  ❌ {}", e);
            println!("     Set INFURA_API_KEY (or RPC_URL) in your .env file.");
            println!("\n❌ Diagnostic incomplete\n");
            return;
        }
    };

    let chain = match RpcChain::connect(&endpoint) {
        Ok(chain) => chain,
        Err(e) => {
            println!("  ❌ {}", e);
            println!("\n❌ Diagnostic incomplete\n");
            return;
        }
    };

    match chain.block_number().await {
        Ok(block) => println!("  ✅ Connected, latest block: {}", block),
        Err(e) => println!("  ❌ eth_blockNumber failed: {}", e),
    }

    match chain.decimals(USDC).await {
        Ok(d) => println!("  ✅ USDC decimals() = {} (eth_call works)", d),
        Err(e) => println!("  ❌ USDC decimals() failed: {}", e),
    }

    println!("\n✅ Diagnostic complete!\n");
}
