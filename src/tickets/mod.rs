//! Ticketing (work-order) API client.
//!
//! Direct HTTP via reqwest: an OAuth-style token exchange (`auth`) followed
//! by status-filtered, optionally paginated work-order queries (`client`).
//! Nothing here panics past the boundary; callers get `TicketApiError` and
//! the service layer degrades to an empty result set plus a message.

pub mod auth;
pub mod client;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum TicketApiError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Token exchange failed: {0}")]
    TokenRejected(String),
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unexpected response shape: {0}")]
    InvalidResponse(String),
}

/// Bearer token from the token endpoint. Exchanged fresh for every paged
/// query, so there is no expiry bookkeeping to carry.
#[derive(Debug, Clone)]
pub struct BearerToken {
    pub access_token: String,
}

/// One work order as returned by the ticketing API. Field aliases absorb the
/// naming drift observed across API versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    #[serde(alias = "workOrderId")]
    pub id: String,
    #[serde(default, alias = "workOrderNumber")]
    pub number: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, alias = "summary")]
    pub description: String,
    #[serde(default, alias = "locationName")]
    pub facility: String,
    #[serde(default, alias = "createdDate")]
    pub created_at: Option<String>,
}
