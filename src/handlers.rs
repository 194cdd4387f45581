//! HTTP endpoints serving the storefront catalog as JSON.
//!
//! Everything here is read-only and derived from static tables: the product
//! listing, the accepted chains, their tokens, and the fixed quote for a
//! token. Payments never go through this server; the buyer's wallet sends
//! them directly on-chain.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use kitpay_types::chain::{ChainId, ChainIdFormatError};
use kitpay_types::networks::{known_chains, token_by_symbol, tokens_for};
use serde::Serialize;
use tracing::instrument;

use crate::checkout::Quote;
use crate::storefront::{ManualPayment, PRODUCT, ProductListing, manual_payment};

pub fn routes() -> Router {
    Router::new()
        .route("/", get(get_root))
        .route("/product", get(get_product))
        .route("/chains", get(get_chains))
        .route("/chains/{chain_id}/tokens", get(get_chain_tokens))
        .route("/chains/{chain_id}/quote/{symbol}", get(get_quote))
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid chain id: {0}")]
    InvalidChainId(#[from] ChainIdFormatError),
    #[error("Token {symbol} is not accepted on chain {chain_id}")]
    UnknownToken { chain_id: ChainId, symbol: String },
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match self {
            CatalogError::InvalidChainId(_) => StatusCode::BAD_REQUEST,
            CatalogError::UnknownToken { .. } => StatusCode::NOT_FOUND,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub product: &'static ProductListing,
    pub manual_payment: ManualPayment,
}

/// `GET /`: A greeting naming the service.
#[instrument(skip_all)]
pub async fn get_root() -> impl IntoResponse {
    let pkg_name = env!("CARGO_PKG_NAME");
    (StatusCode::OK, format!("Hello from {pkg_name}!"))
}

/// `GET /product`: Product listing and manual payment instructions.
#[instrument(skip_all)]
pub async fn get_product() -> impl IntoResponse {
    Json(ProductPage {
        product: &PRODUCT,
        manual_payment: manual_payment(),
    })
}

/// `GET /chains`: Accepted chains in selector order.
#[instrument(skip_all)]
pub async fn get_chains() -> impl IntoResponse {
    Json(known_chains())
}

/// `GET /chains/{chain_id}/tokens`: Tokens accepted on a chain, native first.
///
/// An unknown but well-formed chain id yields an empty list.
#[instrument(skip_all)]
pub async fn get_chain_tokens(
    Path(chain_id): Path<String>,
) -> Result<impl IntoResponse, CatalogError> {
    let chain_id: ChainId = chain_id.parse()?;
    Ok(Json(tokens_for(chain_id)))
}

/// `GET /chains/{chain_id}/quote/{symbol}`: The fixed amount to pay in a token.
#[instrument(skip_all)]
pub async fn get_quote(
    Path((chain_id, symbol)): Path<(String, String)>,
) -> Result<impl IntoResponse, CatalogError> {
    let chain_id: ChainId = chain_id.parse()?;
    let token = token_by_symbol(chain_id, &symbol)
        .ok_or(CatalogError::UnknownToken { chain_id, symbol })?;
    Ok(Json(Quote::new(chain_id, token)))
}
