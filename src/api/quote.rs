//! POST /api/swap/quote

use alloy_primitives::Address;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, warn};

use super::{ApiError, AppState};
use crate::simulator::{check_amount, usd_value, ChainReader, QuoteRequest, Route};
use crate::tokens::{known_decimals, FeeTier, DEFAULT_DECIMALS};

/// Request body. Every field arrives as a string; `fee` also accepts a number.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBody {
    pub token_in: Option<String>,
    pub token_out: Option<String>,
    pub fee: Option<Value>,
    pub amount_in: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub success: bool,
    pub amount_in: String,
    pub amount_out: String,
    pub amount_in_usd: Option<f64>,
    pub amount_out_usd: Option<f64>,
    pub token_in_usd_price: Option<f64>,
    pub token_out_usd_price: Option<f64>,
    pub token_in: String,
    pub token_out: String,
    pub fee: String,
    pub decimals_in: u8,
    pub decimals_out: u8,
    pub route: Route,
}

pub async fn quote(
    State(state): State<AppState>,
    body: Result<Json<QuoteBody>, JsonRejection>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))?;

    let (token_in_raw, token_out_raw, fee_raw, amount_in) = match (
        non_empty(body.token_in),
        non_empty(body.token_out),
        fee_text(body.fee),
        non_empty(body.amount_in),
    ) {
        (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
        _ => return Err(ApiError::bad_request("Missing required parameters")),
    };

    let token_in = parse_address("tokenIn", &token_in_raw)?;
    let token_out = parse_address("tokenOut", &token_out_raw)?;
    let fee_tier = FeeTier::from_str(&fee_raw).map_err(ApiError::bad_request)?;
    check_amount(&amount_in)
        .map_err(|e| ApiError::bad_request(format!("Failed to get quote: {}", e)))?;

    let chain = state
        .resolver
        .chain()
        .connection()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let decimals_in = match known_decimals(&token_in) {
        Some(d) => d,
        None => chain_decimals(chain.as_ref(), token_in)
            .await
            .unwrap_or(DEFAULT_DECIMALS),
    };

    let request = QuoteRequest {
        token_in,
        token_out,
        fee_tier,
        amount_in: amount_in.clone(),
        decimals_in,
    };

    let result = state.resolver.resolve(&request).await.map_err(|e| {
        let message = format!("Failed to get quote: {}", e);
        if e.is_client_error() {
            ApiError::bad_request(message)
        } else {
            ApiError::internal(message)
        }
    })?;

    let decimals_out = match chain_decimals(chain.as_ref(), token_out).await {
        Some(d) => d,
        None => known_decimals(&token_out).unwrap_or(DEFAULT_DECIMALS),
    };

    let (token_in_usd_price, token_out_usd_price) = futures::join!(
        state.resolver.usd_price(token_in, decimals_in),
        state.resolver.usd_price(token_out, decimals_out),
    );

    Ok(Json(QuoteResponse {
        success: true,
        amount_in_usd: usd_value(&amount_in, token_in_usd_price),
        amount_out_usd: usd_value(&result.amount_out, token_out_usd_price),
        amount_in,
        amount_out: result.amount_out,
        token_in_usd_price,
        token_out_usd_price,
        token_in: token_in_raw,
        token_out: token_out_raw,
        fee: fee_raw,
        decimals_in,
        decimals_out,
        route: result.route,
    }))
}

async fn chain_decimals(chain: &dyn ChainReader, token: Address) -> Option<u8> {
    match chain.decimals(token).await {
        Ok(d) => Some(d),
        Err(e) => {
            warn!("Error fetching token decimals for {}: {}", token, e);
            None
        }
    }
}

fn parse_address(field: &str, raw: &str) -> Result<Address, ApiError> {
    Address::from_str(raw).map_err(|e| {
        debug!("Rejecting {} {:?}: {}", field, raw, e);
        ApiError::bad_request(format!("Invalid {} address: {}", field, raw))
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn fee_text(fee: Option<Value>) -> Option<String> {
    match fee? {
        Value::String(s) => non_empty(Some(s)),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
