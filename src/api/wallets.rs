//! /api/wallets and /api/wallets/:name

use alloy_primitives::Address;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::error;

use super::{ApiError, AppState};
use crate::simulator::format_units;
use crate::wallets::{NewWallet, WalletSummary};

#[derive(Debug, Deserialize)]
pub struct CreateBody {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WalletList {
    pub success: bool,
    pub wallets: Vec<WalletSummary>,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub success: bool,
    pub wallet: NewWallet,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletDetails {
    pub name: String,
    pub address: String,
    /// ETH, decimal string
    pub balance: String,
    pub private_key: String,
    pub mnemonic: String,
    pub created_at: String,
}

pub async fn list(State(state): State<AppState>) -> Json<WalletList> {
    Json(WalletList {
        success: true,
        wallets: state.wallets.list().await,
    })
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateBody>, JsonRejection>,
) -> Result<Json<Created>, ApiError> {
    let name = body
        .ok()
        .and_then(|Json(b)| b.name)
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Wallet name is required"))?;

    let wallet = state.wallets.create(&name).await?;

    Ok(Json(Created {
        success: true,
        wallet,
    }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let record = state.wallets.get(&name).await?;

    let address = Address::from_str(&record.address)
        .map_err(|e| ApiError::internal(format!("Stored address is invalid: {}", e)))?;

    let chain = state
        .resolver
        .chain()
        .connection()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let balance = chain.balance(address).await.map_err(|e| {
        error!("Error getting wallet balance for {}: {}", name, e);
        ApiError::internal(e.to_string())
    })?;

    let details = WalletDetails {
        name,
        address: record.address,
        balance: format_units(balance, 18),
        private_key: record.private_key,
        mnemonic: record.mnemonic,
        created_at: record.created_at,
    };

    Ok(Json(json!({ "success": true, "wallet": details })))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.wallets.delete(&name).await?;
    Ok(Json(json!({ "success": true })))
}
