//! Swap quote simulation
//!
//! Responsible for:
//! - Holding the shared read-only chain connection
//! - Simulated Uniswap V3 quotes (direct, then via WETH)
//! - USD pricing against USDC

pub mod provider;
pub mod quoter;
pub mod units;

#[cfg(test)]
pub(crate) mod mock;

pub use provider::{ChainAccess, ChainReader, RpcChain, QUOTER};
pub use quoter::{usd_value, QuoteRequest, QuoteResolver, QuoteResult, Route, FALLBACK_FEE_TIER};
pub use units::{check_amount, format_units, parse_units};
