//! In-memory chain for tests: fixed pools, fixed decimals, recorded calls.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::provider::ChainReader;
use crate::error::ChainError;

/// One recorded `quoteExactInputSingle` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteCall {
    pub token_in: Address,
    pub token_out: Address,
    pub fee: u32,
    pub amount_in: U256,
}

/// Pool priced as `amount_out = amount_in * numerator / denominator`
#[derive(Debug, Clone, Copy)]
struct Rate {
    numerator: U256,
    denominator: U256,
}

#[derive(Default)]
pub struct MockChain {
    pools: HashMap<(Address, Address, u32), Rate>,
    decimals: HashMap<Address, u8>,
    balances: HashMap<Address, U256>,
    calls: Mutex<Vec<QuoteCall>>,
    decimals_calls: Mutex<Vec<Address>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a one-directional pool
    pub fn with_pool(
        mut self,
        token_in: Address,
        token_out: Address,
        fee: u32,
        numerator: u128,
        denominator: u128,
    ) -> Self {
        self.pools.insert(
            (token_in, token_out, fee),
            Rate {
                numerator: U256::from(numerator),
                denominator: U256::from(denominator),
            },
        );
        self
    }

    pub fn with_decimals(mut self, token: Address, decimals: u8) -> Self {
        self.decimals.insert(token, decimals);
        self
    }

    pub fn with_balance(mut self, account: Address, wei: U256) -> Self {
        self.balances.insert(account, wei);
        self
    }

    pub fn quote_calls(&self) -> Vec<QuoteCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn quote_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Tokens `decimals()` was asked for, in call order
    pub fn decimals_calls(&self) -> Vec<Address> {
        self.decimals_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn quote_exact_input_single(
        &self,
        token_in: Address,
        token_out: Address,
        fee: u32,
        amount_in: U256,
    ) -> Result<U256, ChainError> {
        self.calls.lock().unwrap().push(QuoteCall {
            token_in,
            token_out,
            fee,
            amount_in,
        });

        let rate = self
            .pools
            .get(&(token_in, token_out, fee))
            .ok_or_else(|| ChainError::Call("execution reverted".to_string()))?;

        Ok(amount_in * rate.numerator / rate.denominator)
    }

    async fn decimals(&self, token: Address) -> Result<u8, ChainError> {
        self.decimals_calls.lock().unwrap().push(token);
        self.decimals
            .get(&token)
            .copied()
            .ok_or_else(|| ChainError::Call(format!("no decimals() on {}", token)))
    }

    async fn balance(&self, account: Address) -> Result<U256, ChainError> {
        Ok(self.balances.get(&account).copied().unwrap_or(U256::ZERO))
    }
}
