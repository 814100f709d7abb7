//! HTTP API
//!
//! Thin request/response mapping over the quote resolver and the wallet
//! store. Every response carries `success`; failures add `error`.

mod quote;
mod wallets;

use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::simulator::QuoteResolver;
use crate::wallets::{WalletError, WalletStore};

pub use quote::{QuoteBody, QuoteResponse};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub resolver: QuoteResolver,
    pub wallets: Arc<WalletStore>,
}

impl AppState {
    pub fn new(resolver: QuoteResolver, wallets: WalletStore) -> Self {
        Self {
            resolver,
            wallets: Arc::new(wallets),
        }
    }
}

/// Build the full router
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/swap/quote", post(quote::quote))
        .route("/wallets", get(wallets::list).post(wallets::create))
        .route("/wallets/:name", get(wallets::get).delete(wallets::delete))
        .layer(cors_layer());

    Router::new()
        .nest("/api", api)
        .route("/quote", post(quote::quote))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for `/api/*`: any origin, the usual methods and headers
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// `{ success: false, error }` with a status code
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "success": false, "error": self.message })),
        )
            .into_response()
    }
}

impl From<WalletError> for ApiError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::NotFound(_) => ApiError::not_found("Wallet not found"),
            WalletError::AlreadyExists(_) | WalletError::InvalidName(_) => {
                ApiError::bad_request(e.to_string())
            }
            WalletError::KeyGeneration(_) => ApiError::internal(e.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::Config;
    use crate::simulator::mock::MockChain;
    use crate::simulator::ChainAccess;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    pub fn app_with(mock: MockChain) -> Router {
        app_with_shared(Arc::new(mock))
    }

    /// Same as `app_with`, keeping a handle on the mock for call assertions
    pub fn app_with_shared(mock: Arc<MockChain>) -> Router {
        let access = ChainAccess::with_connection(Config::default(), mock);
        router(AppState::new(QuoteResolver::new(access), WalletStore::in_memory()))
    }

    pub fn unconfigured_app() -> Router {
        let access = ChainAccess::new(Config::default());
        router(AppState::new(QuoteResolver::new(access), WalletStore::in_memory()))
    }

    pub async fn send(
        app: Router,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}
