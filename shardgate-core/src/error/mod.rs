use thiserror::Error;

use crate::model::HttpMethod;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Structural problems in the API description. Always fatal.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("api description must be an object")]
    NotAnObject,
    #[error("`paths` must be an object")]
    PathsNotAnObject,
    #[error("path item '{path}' must be an object")]
    PathItemNotAnObject { path: String },
    #[error("{method} {path}: missing operationId")]
    MissingOperationId { path: String, method: HttpMethod },
    #[error("{method} {path}: operationId must be a string")]
    OperationIdNotAString { path: String, method: HttpMethod },
    #[error("duplicate operationId '{operation_id}' at {method} {path} (first declared at {first_method} {first_path})")]
    DuplicateOperationId {
        operation_id: String,
        path: String,
        method: HttpMethod,
        first_path: String,
        first_method: HttpMethod,
    },
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid GraphQL schema: {0}")]
    Sdl(String),
    #[error("invalid introspection result: {0}")]
    Introspection(String),
    #[error("failed to parse introspection JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("max batch size must be at least 1")]
    ZeroBatchSize,
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to serialize mapping table: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to compress mapping table: {0}")]
    Compress(#[source] std::io::Error),
    #[error("mapping payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("failed to decompress mapping payload: {0}")]
    Decompress(#[source] std::io::Error),
    #[error("failed to deserialize mapping table: {0}")]
    Deserialize(#[source] serde_json::Error),
}
