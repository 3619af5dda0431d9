use std::path::PathBuf;

use shardgate_core::{BatchError, CodecError, IndexError, ParseError, SchemaError};

use crate::config::ConfigError;
use crate::provision::ProvisionError;
use crate::templates::TemplateStoreError;

/// Anything that aborts a build. Per-operation problems are diagnostics,
/// not errors, unless strict template mode turns them into one.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("api description: {0}")]
    Parse(#[from] ParseError),
    #[error("api description: {0}")]
    Index(#[from] IndexError),
    #[error("schema: {0}")]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    Templates(#[from] TemplateStoreError),
    #[error("no transformation templates for operation '{operation_id}'")]
    MissingTemplate { operation_id: String },
    #[error("failed to provision batch {batch}: {source}")]
    Provision {
        batch: usize,
        #[source]
        source: ProvisionError,
    },
    #[error("operation '{operation_id}' assigned to batch {batch} was already assigned to batch {previous}")]
    DuplicateAssignment {
        operation_id: String,
        batch: usize,
        previous: usize,
    },
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("background task failed: {0}")]
    Task(String),
}
