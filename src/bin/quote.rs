//! One-shot quote from the terminal
//!
//! Run with: cargo run --bin quote -- WETH USDC 1.5 --fee 3000
//!
//! Tokens can be registry symbols (WETH, USDC, DAI, ...) or addresses.

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use console::style;

use swap_quoter::simulator::{usd_value, ChainReader, QuoteRequest};
use swap_quoter::tokens::{self, FeeTier, DEFAULT_DECIMALS};
use swap_quoter::{init_tracing, ChainAccess, Config, QuoteResolver};

#[derive(Debug, Parser)]
#[command(name = "quote", about = "Simulate a Uniswap V3 swap quote")]
struct Args {
    /// Input token (symbol or address)
    token_in: String,

    /// Output token (symbol or address)
    token_out: String,

    /// Amount of the input token, e.g. 1.5
    amount: String,

    /// Pool fee tier: 500, 3000 or 10000
    #[arg(long, default_value_t = FeeTier::default())]
    fee: FeeTier,

    /// Input token decimals (looked up on-chain when omitted)
    #[arg(long)]
    decimals: Option<u8>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing("swap_quoter=warn")?;

    let args = Args::parse();

    let token_in = tokens::resolve_token(&args.token_in)
        .ok_or_else(|| eyre!("Unknown token: {}", args.token_in))?;
    let token_out = tokens::resolve_token(&args.token_out)
        .ok_or_else(|| eyre!("Unknown token: {}", args.token_out))?;

    let access = ChainAccess::new(Config::from_env());
    let chain = access.connection().await?;

    let decimals_in = match args.decimals.or_else(|| tokens::known_decimals(&token_in)) {
        Some(d) => d,
        None => chain.decimals(token_in).await.unwrap_or(DEFAULT_DECIMALS),
    };
    let decimals_out = match tokens::known_decimals(&token_out) {
        Some(d) => d,
        None => chain.decimals(token_out).await.unwrap_or(DEFAULT_DECIMALS),
    };

    let resolver = QuoteResolver::new(access);
    let result = resolver
        .resolve(&QuoteRequest {
            token_in,
            token_out,
            fee_tier: args.fee,
            amount_in: args.amount.clone(),
            decimals_in,
        })
        .await?;

    let (price_in, price_out) = futures::join!(
        resolver.usd_price(token_in, decimals_in),
        resolver.usd_price(token_out, decimals_out),
    );

    let usd = |v: Option<f64>| match v {
        Some(v) => format!("${:.2}", v),
        None => "unknown".to_string(),
    };

    println!();
    println!(
        "{} {} {} → {} {}",
        style("✓").green(),
        args.amount,
        style(&args.token_in).cyan(),
        style(&result.amount_out).green().bold(),
        style(&args.token_out).cyan()
    );
    println!("   Fee tier:  {} ({})", args.fee, args.fee.label());
    println!("   Route:     {:?}", result.route);
    println!("   Value in:  {}", usd(usd_value(&args.amount, price_in)));
    println!("   Value out: {}", usd(usd_value(&result.amount_out, price_out)));
    println!();

    Ok(())
}
