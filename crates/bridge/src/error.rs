// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Message returned when an entity-scoped operation has no `id`.
pub const MISSING_ENTITY_ID: &str = "missing id (entity)";

/// Failure of a single dispatched request.
///
/// The display string is what callers see in the `message` field, so remote
/// failures display their inner error unchanged.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("missing id (entity)")]
    MissingEntityId,
    #[error(transparent)]
    Remote(#[from] anyhow::Error),
    #[error("request cancelled")]
    Cancelled,
    #[error("request timed out")]
    TimedOut,
    #[error("{0}")]
    Encoding(String),
}

impl DispatchError {
    /// Every failure maps to 400 under the current policy.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MissingEntityId => 400,
            Self::Remote(_) => 400,
            Self::Cancelled => 400,
            Self::TimedOut => 400,
            Self::Encoding(_) => 400,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingEntityId => "MISSING_ENTITY_ID",
            Self::Remote(_) => "REMOTE_ERROR",
            Self::Cancelled => "CANCELLED",
            Self::TimedOut => "TIMED_OUT",
            Self::Encoding(_) => "ENCODING_ERROR",
        }
    }

    pub fn to_error_body(&self) -> ErrorResponse {
        ErrorResponse { message: self.to_string() }
    }

    pub fn to_http_response(&self) -> (StatusCode, Json<ErrorResponse>) {
        let status = StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::BAD_REQUEST);
        (status, Json(self.to_error_body()))
    }
}

/// JSON body written for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Structured failure reported by the remote service.
///
/// Displays only the remote message so operators see the upstream text
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RemoteError {
    /// Remote error code, e.g. `InvalidClientTokenId`.
    pub code: Option<String>,
    pub message: String,
    /// HTTP status of the remote response.
    pub status: u16,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
