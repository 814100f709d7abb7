//! Token registry and Uniswap V3 fee tiers
//!
//! The common mainnet tokens the UI offers, plus the two reference assets
//! quote resolution depends on:
//! - WETH: intermediate hop when no direct pool exists
//! - USDC: unit of account for USD prices

use alloy_primitives::{address, Address};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Wrapped Ether (mainnet)
pub const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

/// WETH always has 18 decimals
pub const WETH_DECIMALS: u8 = 18;

/// USD Coin (mainnet)
pub const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

pub const USDC_DECIMALS: u8 = 6;

/// Decimals assumed when neither the registry nor the chain knows better
pub const DEFAULT_DECIMALS: u8 = 18;

/// A token we know about without asking the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub symbol: &'static str,
    pub address: Address,
    pub decimals: u8,
}

// ============================================
// COMMON TOKENS
// ============================================

pub fn common_tokens() -> Vec<Token> {
    vec![
        Token {
            symbol: "WETH",
            address: WETH,
            decimals: WETH_DECIMALS,
        },
        Token {
            symbol: "USDC",
            address: USDC,
            decimals: USDC_DECIMALS,
        },
        Token {
            symbol: "USDT",
            address: address!("dAC17F958D2ee523a2206206994597C13D831ec7"),
            decimals: 6,
        },
        Token {
            symbol: "DAI",
            address: address!("6B175474E89094C44Da98b954EedeAC495271d0F"),
            decimals: 18,
        },
        Token {
            symbol: "WBTC",
            address: address!("2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599"),
            decimals: 8,
        },
        Token {
            symbol: "UNI",
            address: address!("1f9840a85d5aF5bf1D1762F925BDADdC4201F984"),
            decimals: 18,
        },
        Token {
            symbol: "LINK",
            address: address!("514910771AF9Ca656af840dff83E8264EcF986CA"),
            decimals: 18,
        },
        Token {
            symbol: "AAVE",
            address: address!("7Fc66500c84A76Ad7e9c93437bFc5Ac33E2DDaE9"),
            decimals: 18,
        },
    ]
}

/// Get token by address
pub fn get_token(address: &Address) -> Option<Token> {
    common_tokens().into_iter().find(|t| t.address == *address)
}

/// Get token by symbol (case-insensitive)
pub fn get_token_by_symbol(symbol: &str) -> Option<Token> {
    common_tokens()
        .into_iter()
        .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
}

/// Registry decimals for a token, if it is a common one
pub fn known_decimals(address: &Address) -> Option<u8> {
    get_token(address).map(|t| t.decimals)
}

/// Resolve a CLI/API token argument: either a symbol from the registry or
/// a hex address.
pub fn resolve_token(input: &str) -> Option<Address> {
    if let Some(token) = get_token_by_symbol(input) {
        return Some(token.address);
    }
    Address::from_str(input.trim()).ok()
}

// ============================================
// FEE TIERS
// ============================================

/// Uniswap V3 pool fee, in hundredths of a basis point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FeeTier {
    /// 0.05%
    Low,
    /// 0.3%, the most common tier
    #[default]
    Medium,
    /// 1%
    High,
}

impl FeeTier {
    pub const ALL: [FeeTier; 3] = [FeeTier::Low, FeeTier::Medium, FeeTier::High];

    pub fn as_u32(self) -> u32 {
        match self {
            FeeTier::Low => 500,
            FeeTier::Medium => 3000,
            FeeTier::High => 10000,
        }
    }

    pub fn from_u32(fee: u32) -> Option<Self> {
        match fee {
            500 => Some(FeeTier::Low),
            3000 => Some(FeeTier::Medium),
            10000 => Some(FeeTier::High),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FeeTier::Low => "0.05%",
            FeeTier::Medium => "0.3%",
            FeeTier::High => "1%",
        }
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

impl FromStr for FeeTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fee: u32 = s
            .trim()
            .parse()
            .map_err(|_| format!("fee tier must be a number, got {:?}", s))?;
        FeeTier::from_u32(fee)
            .ok_or_else(|| format!("unsupported fee tier {} (expected 500, 3000 or 10000)", fee))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_assets_in_registry() {
        assert_eq!(known_decimals(&WETH), Some(18));
        assert_eq!(known_decimals(&USDC), Some(6));
        assert_eq!(get_token(&USDC).map(|t| t.symbol), Some("USDC"));
    }

    #[test]
    fn test_resolve_token_by_symbol_or_address() {
        assert_eq!(resolve_token("weth"), Some(WETH));
        assert_eq!(
            resolve_token("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
            Some(USDC)
        );
        assert_eq!(resolve_token("NOTATOKEN"), None);
    }

    #[test]
    fn test_unknown_token_has_no_decimals() {
        let unknown = Address::repeat_byte(0x42);
        assert_eq!(known_decimals(&unknown), None);
    }

    #[test]
    fn test_fee_tier_parse() {
        assert_eq!("500".parse::<FeeTier>(), Ok(FeeTier::Low));
        assert_eq!(" 3000 ".parse::<FeeTier>(), Ok(FeeTier::Medium));
        assert_eq!("10000".parse::<FeeTier>(), Ok(FeeTier::High));
        assert!("100".parse::<FeeTier>().is_err());
        assert!("abc".parse::<FeeTier>().is_err());
        assert_eq!(FeeTier::default().as_u32(), 3000);
    }

    #[test]
    fn test_fee_tier_labels() {
        let labels: Vec<_> = FeeTier::ALL.iter().map(|f| f.label()).collect();
        assert_eq!(labels, vec!["0.05%", "0.3%", "1%"]);
        assert_eq!(FeeTier::Medium.to_string(), "3000");
    }
}
