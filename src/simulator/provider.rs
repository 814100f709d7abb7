//! Chain Access Provider
//!
//! One read-only HTTP connection per composition root, built on first use
//! and shared by every request afterwards. There is no reconnect logic: a
//! dead endpoint shows up as a failed call, not as a provider fault.

use alloy_primitives::{address, aliases::U24, Address, U160, U256};
use alloy_network::TransactionBuilder;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{ChainError, QuoteError};

// ============================================
// SOLIDITY INTERFACES
// ============================================

sol! {
    /// Uniswap V3 Quoter (v1) interface
    #[derive(Debug)]
    interface IQuoter {
        function quoteExactInputSingle(
            address tokenIn,
            address tokenOut,
            uint24 fee,
            uint256 amountIn,
            uint160 sqrtPriceLimitX96
        ) external returns (uint256 amountOut);
    }

    /// ERC-20 metadata
    #[derive(Debug)]
    interface IERC20Metadata {
        function decimals() external view returns (uint8);
    }
}

/// Official Uniswap V3 Quoter address on mainnet
pub const QUOTER: Address = address!("b27308f9F90D607463bb33eA1BeBb41C27CE5AB6");

/// Read-only view of the chain that quote resolution needs.
///
/// Every method is a single round-trip with no timeout and no retry.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Simulated `quoteExactInputSingle` with no price limit
    async fn quote_exact_input_single(
        &self,
        token_in: Address,
        token_out: Address,
        fee: u32,
        amount_in: U256,
    ) -> Result<U256, ChainError>;

    /// ERC-20 `decimals()`
    async fn decimals(&self, token: Address) -> Result<u8, ChainError>;

    /// Native balance in wei
    async fn balance(&self, account: Address) -> Result<U256, ChainError>;
}

/// `ChainReader` over an alloy HTTP provider
pub struct RpcChain {
    provider: DynProvider,
    endpoint: String,
}

impl RpcChain {
    /// Build the provider for `endpoint`. Does not touch the network.
    pub fn connect(endpoint: &str) -> Result<Self, QuoteError> {
        let url = endpoint
            .parse()
            .map_err(|e| QuoteError::Configuration(format!("invalid RPC endpoint: {}", e)))?;

        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self {
            provider,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Latest block number, used by `diagnose` to probe the endpoint
    pub async fn block_number(&self) -> Result<u64, ChainError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ChainError::Call(e.to_string()))
    }

    async fn call_contract(&self, to: Address, calldata: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_input(calldata);

        let result = self
            .provider
            .call(tx)
            .await
            .map_err(|e| ChainError::Call(e.to_string()))?;

        Ok(result.to_vec())
    }
}

#[async_trait]
impl ChainReader for RpcChain {
    async fn quote_exact_input_single(
        &self,
        token_in: Address,
        token_out: Address,
        fee: u32,
        amount_in: U256,
    ) -> Result<U256, ChainError> {
        debug!("eth_call quoteExactInputSingle {} -> {} fee {} amount {}", token_in, token_out, fee, amount_in);

        let calldata = IQuoter::quoteExactInputSingleCall {
            tokenIn: token_in,
            tokenOut: token_out,
            fee: U24::from(fee),
            amountIn: amount_in,
            sqrtPriceLimitX96: U160::ZERO,
        }
        .abi_encode();

        let output = self.call_contract(QUOTER, calldata).await?;

        IQuoter::quoteExactInputSingleCall::abi_decode_returns(&output).map_err(|e| ChainError::Decode {
            what: "quoter output",
            reason: e.to_string(),
        })
    }

    async fn decimals(&self, token: Address) -> Result<u8, ChainError> {
        let calldata = IERC20Metadata::decimalsCall {}.abi_encode();
        let output = self.call_contract(token, calldata).await?;

        IERC20Metadata::decimalsCall::abi_decode_returns(&output).map_err(|e| ChainError::Decode {
            what: "decimals",
            reason: e.to_string(),
        })
    }

    async fn balance(&self, account: Address) -> Result<U256, ChainError> {
        self.provider
            .get_balance(account)
            .await
            .map_err(|e| ChainError::Call(e.to_string()))
    }
}

/// Lazily-built shared connection, owned by whoever composes the app.
///
/// Cloning shares the same underlying cell, so every clone hands out the
/// same connection once it exists.
#[derive(Clone)]
pub struct ChainAccess {
    config: Arc<Config>,
    connection: Arc<OnceCell<Arc<dyn ChainReader>>>,
}

impl ChainAccess {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            connection: Arc::new(OnceCell::new()),
        }
    }

    /// Wrap an existing connection (test doubles, custom transports)
    pub fn with_connection(config: Config, connection: Arc<dyn ChainReader>) -> Self {
        Self {
            config: Arc::new(config),
            connection: Arc::new(OnceCell::new_with(Some(connection))),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the shared connection, building it on first use.
    ///
    /// Fails with `QuoteError::Configuration` when no endpoint credential is
    /// configured. A failed build is not cached, so fixing the environment
    /// and retrying works.
    pub async fn connection(&self) -> Result<Arc<dyn ChainReader>, QuoteError> {
        let conn = self
            .connection
            .get_or_try_init(|| async {
                let endpoint = self.config.endpoint_url()?;
                let chain = RpcChain::connect(&endpoint)?;
                info!("JSON-RPC provider initialized for {}", self.config.network);
                Ok::<Arc<dyn ChainReader>, QuoteError>(Arc::new(chain))
            })
            .await?;

        Ok(Arc::clone(conn))
    }

    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }
}
