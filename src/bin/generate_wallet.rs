//! Wallet Generation Utility
//!
//! Run with: cargo run --bin generate-wallet -- <name>
//!
//! Creates a new named wallet in the configured wallet store (WALLETS_FILE),
//! the same store the HTTP API serves.

use clap::Parser;
use color_eyre::eyre::Result;

use swap_quoter::wallets::WalletStore;
use swap_quoter::{init_tracing, Config};

#[derive(Debug, Parser)]
#[command(name = "generate-wallet", about = "Create a named wallet in the local store")]
struct Args {
    /// Wallet name
    name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing("swap_quoter=warn")?;

    let args = Args::parse();
    let config = Config::from_env();
    let store = WalletStore::open(&config.wallets_file);

    let wallet = store.create(&args.name).await?;

    println!();
    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║          SWAP QUOTER WALLET GENERATOR                      ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();
    println!("🔑 NEW WALLET \"{}\"", args.name);
    println!();
    println!("   Address:     {}", wallet.address);
    println!("   Private Key: {}", wallet.private_key);
    println!("   Mnemonic:    {}", wallet.mnemonic);
    println!();
    if store.is_using_memory().await {
        println!("⚠️  Could not write {} - this wallet was NOT saved.", config.wallets_file);
    } else {
        println!("   Saved to:    {}", store.path().display());
    }
    println!();
    println!("⚠️  SECURITY WARNINGS:");
    println!();
    println!("   1. NEVER share your private key or mnemonic with anyone");
    println!("   2. NEVER commit the wallets file to git");
    println!("   3. These are demo wallets - do not fund them with real value");
    println!();

    Ok(())
}
