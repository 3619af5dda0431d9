use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shardgate_core::CodecError;

use crate::http::HttpError;

/// Why the routing tables could not be brought up. Once stored, the router
/// answers every request with this error until the process is replaced.
#[derive(Debug, thiserror::Error)]
pub enum RouterInitError {
    #[error("environment variable {name} is not set")]
    MissingVariable { name: &'static str },
    #[error("failed to decode {table} table: {source}")]
    Decode {
        table: &'static str,
        #[source]
        source: CodecError,
    },
    #[error("batch {batch} has an invalid endpoint '{url}': {message}")]
    InvalidEndpoint {
        batch: usize,
        url: String,
        message: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("request path has no operation segment")]
    MissingKey,
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),
    #[error("operation '{operation_id}' maps to batch {batch}, which has no endpoint")]
    NoEndpoint { operation_id: String, batch: usize },
    #[error("router configuration error: {0}")]
    Config(String),
    #[error("request body could not be read: {0}")]
    Body(String),
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
    #[error("downstream request failed: {0}")]
    Downstream(#[from] HttpError),
}

impl RouteError {
    pub fn status(&self) -> StatusCode {
        match self {
            RouteError::MissingKey
            | RouteError::UnknownOperation(_)
            | RouteError::NoEndpoint { .. } => StatusCode::NOT_FOUND,
            RouteError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RouteError::Body(_) => StatusCode::BAD_REQUEST,
            RouteError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RouteError::Downstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
