//! Quote Resolution - Uniswap V3 Quoter with WETH fallback
//!
//! Resolution order for a quote:
//! 1. Direct single-pool quote at the caller's fee tier
//! 2. Two hops through WETH (tokenIn -> WETH -> tokenOut), both at 0.3%
//!
//! USD prices are quotes of one whole token into USDC.
//!
//! Nothing is cached: every quote and every price re-issues its chain calls.

use alloy_primitives::{Address, U256};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::provider::{ChainAccess, ChainReader};
use super::units::{format_units, parse_units};
use crate::error::QuoteError;
use crate::tokens::{FeeTier, USDC, WETH, WETH_DECIMALS};

/// Fee tier used for both WETH hops, whatever the caller asked for
pub const FALLBACK_FEE_TIER: FeeTier = FeeTier::Medium;

/// Fee tier for USD price lookups
pub const PRICE_FEE_TIER: FeeTier = FeeTier::Medium;

/// Which path produced a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Route {
    Direct,
    WethFallback,
}

/// Inputs of a single quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub token_in: Address,
    pub token_out: Address,
    pub fee_tier: FeeTier,
    /// Human decimal string, e.g. "1.5"
    pub amount_in: String,
    pub decimals_in: u8,
}

impl QuoteRequest {
    /// Price query: one whole `token` quoted into USDC at 0.3%
    pub fn price_query(token: Address, decimals: u8) -> Self {
        Self {
            token_in: token,
            token_out: USDC,
            fee_tier: PRICE_FEE_TIER,
            amount_in: "1".to_string(),
            decimals_in: decimals,
        }
    }
}

/// Outcome of a successful quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteResult {
    /// Human decimal string at the output token's decimals
    pub amount_out: String,
    pub route: Route,
}

/// Resolves quotes and USD prices against a shared chain connection
#[derive(Clone)]
pub struct QuoteResolver {
    chain: ChainAccess,
}

impl QuoteResolver {
    pub fn new(chain: ChainAccess) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &ChainAccess {
        &self.chain
    }

    /// Expected output amount for `amount_in` of `token_in`, as a decimal string
    pub async fn quote(
        &self,
        token_in: Address,
        token_out: Address,
        fee_tier: FeeTier,
        amount_in: &str,
        decimals_in: u8,
    ) -> Result<String, QuoteError> {
        let request = QuoteRequest {
            token_in,
            token_out,
            fee_tier,
            amount_in: amount_in.to_string(),
            decimals_in,
        };
        self.resolve(&request).await.map(|r| r.amount_out)
    }

    /// Same as `quote` but also reports which route was taken
    pub async fn resolve(&self, request: &QuoteRequest) -> Result<QuoteResult, QuoteError> {
        let amount = parse_units(&request.amount_in, request.decimals_in)?;
        if amount.is_zero() {
            return Err(QuoteError::invalid_amount(
                &request.amount_in,
                "amount must be greater than zero",
            ));
        }

        let chain = self.chain.connection().await?;

        let direct_err = match quote_single(
            chain.as_ref(),
            request.token_in,
            request.token_out,
            request.fee_tier.as_u32(),
            amount,
        )
        .await
        {
            Ok(amount_out) => {
                info!(
                    "Quote: {} of token {} → {} of token {}",
                    request.amount_in, request.token_in, amount_out, request.token_out
                );
                return Ok(QuoteResult {
                    amount_out,
                    route: Route::Direct,
                });
            }
            Err(e) => e,
        };

        warn!("Direct quote failed, trying fallback through WETH: {}", direct_err);

        match quote_via_weth(chain.as_ref(), request.token_in, request.token_out, amount).await {
            Ok(amount_out) => {
                info!(
                    "Quote via WETH: {} of token {} → {} of token {}",
                    request.amount_in, request.token_in, amount_out, request.token_out
                );
                Ok(QuoteResult {
                    amount_out,
                    route: Route::WethFallback,
                })
            }
            Err(fallback_err) => {
                error!("Fallback quote also failed: {}", fallback_err);
                Err(QuoteError::NoRoute {
                    token_in: request.token_in.to_string(),
                    token_out: request.token_out.to_string(),
                    direct: message(&direct_err),
                    fallback: message(&fallback_err),
                })
            }
        }
    }

    /// USD price of one whole `token`, or `None` when it cannot be priced.
    ///
    /// USDC is pegged at exactly 1.0 without touching the chain. Never
    /// returns an error: lookup failures are logged and become `None`.
    pub async fn usd_price(&self, token: Address, decimals: u8) -> Option<f64> {
        if token == USDC {
            return Some(1.0);
        }

        let query = QuoteRequest::price_query(token, decimals);
        let priced = match self.resolve(&query).await {
            Ok(result) => result.amount_out.parse::<f64>().map_err(|e| e.to_string()),
            Err(e) => Err(message(&e)),
        };

        match priced {
            Ok(price) => Some(price),
            Err(reason) => {
                let err = QuoteError::PriceUnavailable {
                    token: token.to_string(),
                    reason,
                };
                warn!("{}", err);
                None
            }
        }
    }
}

/// USD value of a decimal `amount` at `price`, if both are known
pub fn usd_value(amount: &str, price: Option<f64>) -> Option<f64> {
    let amount: f64 = amount.trim().parse().ok()?;
    Some(amount * price?)
}

/// One pool quote, formatted at the output token's decimals
async fn quote_single(
    chain: &dyn ChainReader,
    token_in: Address,
    token_out: Address,
    fee: u32,
    amount_in: U256,
) -> Result<String, QuoteError> {
    debug!("Quoting {} -> {} fee {} amount {}", token_in, token_out, fee, amount_in);

    let amount_out = chain
        .quote_exact_input_single(token_in, token_out, fee, amount_in)
        .await?;
    let decimals_out = chain.decimals(token_out).await?;

    Ok(format_units(amount_out, decimals_out))
}

/// tokenIn -> WETH -> tokenOut, hop 1 output feeding hop 2 input
async fn quote_via_weth(
    chain: &dyn ChainReader,
    token_in: Address,
    token_out: Address,
    amount_in: U256,
) -> Result<String, QuoteError> {
    let fee = FALLBACK_FEE_TIER.as_u32();

    let weth_out = quote_single(chain, token_in, WETH, fee, amount_in).await?;
    let weth_amount = parse_units(&weth_out, WETH_DECIMALS)?;

    quote_single(chain, WETH, token_out, fee, weth_amount).await
}

/// Underlying message without the error-kind prefix
fn message(err: &QuoteError) -> String {
    match err {
        QuoteError::QuoteUnavailable(msg) | QuoteError::Configuration(msg) => msg.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::simulator::mock::MockChain;
    use alloy_primitives::address;
    use std::sync::Arc;

    const DAI: Address = address!("6B175474E89094C44Da98b954EedeAC495271d0F");
    const LINK: Address = address!("514910771AF9Ca656af840dff83E8264EcF986CA");

    fn resolver(mock: MockChain) -> (QuoteResolver, Arc<MockChain>) {
        let mock = Arc::new(mock);
        let access = ChainAccess::with_connection(Config::default(), mock.clone());
        (QuoteResolver::new(access), mock)
    }

    /// 1 WETH = 2500 USDC, 1 LINK = 0.005 WETH, DAI has no WETH pool
    fn market() -> MockChain {
        MockChain::new()
            .with_decimals(WETH, 18)
            .with_decimals(USDC, 6)
            .with_decimals(DAI, 18)
            .with_decimals(LINK, 18)
            // 1e18 wei -> 2500e6 units
            .with_pool(WETH, USDC, 3000, 2_500, 1_000_000_000_000)
            .with_pool(LINK, WETH, 3000, 5, 1_000)
    }

    #[tokio::test]
    async fn test_direct_quote_weth_to_usdc() {
        let (resolver, mock) = resolver(market());

        let result = resolver
            .resolve(&QuoteRequest {
                token_in: WETH,
                token_out: USDC,
                fee_tier: FeeTier::Medium,
                amount_in: "1".to_string(),
                decimals_in: 18,
            })
            .await
            .unwrap();

        assert_eq!(result.amount_out, "2500.0");
        assert_eq!(result.route, Route::Direct);
        // Direct path only: no fallback hops issued
        assert_eq!(mock.quote_call_count(), 1);
    }

    #[tokio::test]
    async fn test_direct_quote_uses_requested_fee_and_no_price_limit_amount() {
        let (resolver, mock) = resolver(market().with_pool(WETH, USDC, 500, 2_501, 1_000_000_000_000));

        let out = resolver.quote(WETH, USDC, FeeTier::Low, "2", 18).await.unwrap();
        assert_eq!(out, "5002.0");

        let calls = mock.quote_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].fee, 500);
        assert_eq!(calls[0].amount_in, U256::from(2_000_000_000_000_000_000u128));
    }

    #[tokio::test]
    async fn test_fallback_composes_both_hops() {
        let (resolver, mock) = resolver(market());

        // LINK -> USDC has no direct pool at 1%
        let result = resolver
            .resolve(&QuoteRequest {
                token_in: LINK,
                token_out: USDC,
                fee_tier: FeeTier::High,
                amount_in: "10".to_string(),
                decimals_in: 18,
            })
            .await
            .unwrap();

        // 10 LINK -> 0.05 WETH -> 125 USDC
        assert_eq!(result.route, Route::WethFallback);
        assert_eq!(result.amount_out, "125.0");

        let calls = mock.quote_calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].fee, 10000);
        // Both hops use 0.3% regardless of the requested tier
        assert_eq!((calls[1].token_in, calls[1].token_out, calls[1].fee), (LINK, WETH, 3000));
        assert_eq!((calls[2].token_in, calls[2].token_out, calls[2].fee), (WETH, USDC, 3000));
        // Hop 2 input is exactly hop 1 output
        assert_eq!(calls[2].amount_in, U256::from(50_000_000_000_000_000u128));
    }

    #[tokio::test]
    async fn test_no_route_when_fallback_hop_missing() {
        let (resolver, _) = resolver(market());

        let err = resolver
            .quote(DAI, USDC, FeeTier::Medium, "1", 18)
            .await
            .unwrap_err();

        match err {
            QuoteError::NoRoute { direct, fallback, .. } => {
                assert!(direct.contains("execution reverted"));
                assert!(fallback.contains("execution reverted"));
            }
            other => panic!("expected NoRoute, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_route_when_second_hop_missing() {
        let (resolver, mock) = resolver(market());

        // LINK -> WETH exists, WETH -> DAI does not
        let err = resolver.quote(LINK, DAI, FeeTier::Medium, "1", 18).await.unwrap_err();
        assert!(matches!(err, QuoteError::NoRoute { .. }));
        assert_eq!(mock.quote_call_count(), 3);
    }

    #[tokio::test]
    async fn test_missing_output_decimals_triggers_fallback() {
        let mock = MockChain::new()
            .with_decimals(WETH, 18)
            .with_pool(WETH, USDC, 3000, 2_500, 1_000_000_000_000);
        let (resolver, _) = resolver(mock);

        // Direct call succeeds but decimals() on USDC fails; fallback
        // WETH -> WETH has no pool either
        let err = resolver.quote(WETH, USDC, FeeTier::Medium, "1", 18).await.unwrap_err();
        assert!(matches!(err, QuoteError::NoRoute { .. }));
    }

    #[tokio::test]
    async fn test_zero_amount_rejected_before_chain_calls() {
        let (resolver, mock) = resolver(market());

        let err = resolver.quote(WETH, USDC, FeeTier::Medium, "0", 18).await.unwrap_err();
        assert!(matches!(err, QuoteError::InvalidAmount { .. }));
        assert_eq!(mock.quote_call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_amount_rejected_before_chain_calls() {
        let (resolver, mock) = resolver(market());

        for bad in ["-1", "abc", "1.0000001"] {
            let err = resolver.quote(WETH, USDC, FeeTier::Medium, bad, 6).await.unwrap_err();
            assert!(matches!(err, QuoteError::InvalidAmount { .. }), "{}", bad);
        }
        assert_eq!(mock.quote_call_count(), 0);
    }

    #[tokio::test]
    async fn test_quote_is_idempotent_on_fixed_state() {
        let (resolver, _) = resolver(market());

        let first = resolver.quote(LINK, USDC, FeeTier::Medium, "3.5", 18).await.unwrap();
        let second = resolver.quote(LINK, USDC, FeeTier::Medium, "3.5", 18).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_credentials_surface_as_configuration_error() {
        let config = Config {
            infura_api_key: None,
            rpc_url: None,
            ..Config::default()
        };
        let resolver = QuoteResolver::new(ChainAccess::new(config));

        let err = resolver.quote(WETH, USDC, FeeTier::Medium, "1", 18).await.unwrap_err();
        assert!(matches!(err, QuoteError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_usd_price_of_usdc_is_one_without_chain_calls() {
        let (resolver, mock) = resolver(MockChain::new());

        for decimals in [0u8, 6, 18, 255] {
            assert_eq!(resolver.usd_price(USDC, decimals).await, Some(1.0));
        }
        assert_eq!(mock.quote_call_count(), 0);
    }

    #[tokio::test]
    async fn test_usd_price_direct_and_via_weth() {
        let (resolver, _) = resolver(market());

        assert_eq!(resolver.usd_price(WETH, 18).await, Some(2500.0));
        // LINK has no USDC pool: 1 LINK -> 0.005 WETH -> 12.5 USDC
        assert_eq!(resolver.usd_price(LINK, 18).await, Some(12.5));
    }

    #[tokio::test]
    async fn test_usd_price_failure_is_none() {
        let (resolver, _) = resolver(market());
        assert_eq!(resolver.usd_price(DAI, 18).await, None);

        let unconfigured = QuoteResolver::new(ChainAccess::new(Config {
            infura_api_key: None,
            rpc_url: None,
            ..Config::default()
        }));
        assert_eq!(unconfigured.usd_price(WETH, 18).await, None);
    }

    #[test]
    fn test_usd_value() {
        assert_eq!(usd_value("2", Some(2500.0)), Some(5000.0));
        assert_eq!(usd_value("2", None), None);
        assert_eq!(usd_value("nope", Some(1.0)), None);
    }

    #[test]
    fn test_price_query_shape() {
        let q = QuoteRequest::price_query(LINK, 18);
        assert_eq!(q.token_out, USDC);
        assert_eq!(q.fee_tier, FeeTier::Medium);
        assert_eq!(q.amount_in, "1");
    }

    #[test]
    fn test_route_serializes_screaming_snake() {
        assert_eq!(serde_json::to_string(&Route::WethFallback).unwrap(), "\"WETH_FALLBACK\"");
        assert_eq!(serde_json::to_string(&Route::Direct).unwrap(), "\"DIRECT\"");
    }
}
