//! Error types for quote resolution and chain access
//!
//! Transport faults are `ChainError`. They never leave the simulator module
//! as-is: the resolver translates them into `QuoteError` kinds.

use thiserror::Error;

/// Failure of a single read-only chain call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    /// eth_call / eth_getBalance failed or reverted
    #[error("eth_call failed: {0}")]
    Call(String),

    /// Call succeeded but the return data did not match the ABI
    #[error("failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },
}

/// Errors surfaced by the Quote Resolution component
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuoteError {
    /// Endpoint credential missing or unusable. Fatal, never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Amount is not a positive decimal at the token's precision
    #[error("invalid amount {amount:?}: {reason}")]
    InvalidAmount { amount: String, reason: String },

    /// Direct single-pool quote failed (usually: no pool for pair/fee)
    #[error("direct quote unavailable: {0}")]
    QuoteUnavailable(String),

    /// Direct quote and WETH fallback both failed
    #[error("could not get quote for {token_in} to {token_out}: {direct} (fallback: {fallback})")]
    NoRoute {
        token_in: String,
        token_out: String,
        direct: String,
        fallback: String,
    },

    /// USD price lookup failed. Recovered locally, see `QuoteResolver::usd_price`.
    #[error("price unavailable for {token}: {reason}")]
    PriceUnavailable { token: String, reason: String },
}

impl QuoteError {
    pub(crate) fn invalid_amount(amount: &str, reason: impl Into<String>) -> Self {
        QuoteError::InvalidAmount {
            amount: amount.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by caller input or pool availability,
    /// as opposed to server-side misconfiguration.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, QuoteError::Configuration(_))
    }
}

impl From<ChainError> for QuoteError {
    fn from(e: ChainError) -> Self {
        QuoteError::QuoteUnavailable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_route_message_keeps_both_causes() {
        let err = QuoteError::NoRoute {
            token_in: "0xaa".to_string(),
            token_out: "0xbb".to_string(),
            direct: "pool missing".to_string(),
            fallback: "weth leg missing".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("pool missing"));
        assert!(msg.contains("weth leg missing"));
    }

    #[test]
    fn test_configuration_is_not_client_error() {
        assert!(!QuoteError::Configuration("x".into()).is_client_error());
        assert!(QuoteError::invalid_amount("-1", "negative").is_client_error());
    }

    #[test]
    fn test_chain_error_becomes_quote_unavailable() {
        let err: QuoteError = ChainError::Call("reverted".into()).into();
        assert_eq!(
            err,
            QuoteError::QuoteUnavailable("eth_call failed: reverted".into())
        );
    }
}
