//! Swap Quoter - simulated Uniswap V3 quotes and local wallets
//!
//! - `simulator`: chain access, quote resolution (direct + WETH fallback), USD pricing
//! - `wallets`: key pair generation and the JSON wallet store
//! - `api`: axum routes over both

pub mod api;
pub mod config;
pub mod error;
pub mod simulator;
pub mod tokens;
pub mod wallets;

pub use config::Config;
pub use error::{ChainError, QuoteError};
pub use simulator::{ChainAccess, QuoteResolver, QuoteResult, Route};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the fmt subscriber; `RUST_LOG` overrides the default level.
pub fn init_tracing(default_directive: &str) -> eyre::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_directive.parse()?),
        )
        .init();
    Ok(())
}
