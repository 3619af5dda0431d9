pub mod batches;
pub mod build;
pub mod decode;
pub mod serve;

use shardgate_build::{BuildError, DeploymentManifest, TemplateStoreError};
use shardgate_core::CompressedPayload;

use crate::exit_codes;
use crate::PayloadArgs;

/// Bad input is a validation failure; I/O, provisioning and codec trouble
/// are runtime errors.
pub fn build_error_code(err: &BuildError) -> i32 {
    match err {
        BuildError::Config(_)
        | BuildError::Parse(_)
        | BuildError::Index(_)
        | BuildError::Schema(_)
        | BuildError::Batch(_)
        | BuildError::Templates(TemplateStoreError::Parse { .. })
        | BuildError::MissingTemplate { .. }
        | BuildError::DuplicateAssignment { .. } => exit_codes::VALIDATION_FAILED,
        BuildError::Read { .. }
        | BuildError::Templates(TemplateStoreError::Read { .. })
        | BuildError::Provision { .. }
        | BuildError::Codec(_)
        | BuildError::Task(_) => exit_codes::RUNTIME_ERROR,
    }
}

pub fn load_payload(args: &PayloadArgs) -> Result<CompressedPayload, String> {
    if let Some(path) = &args.manifest {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        let manifest: DeploymentManifest = serde_json::from_str(&content)
            .map_err(|e| format!("{} is not a deployment manifest: {e}", path.display()))?;
        return Ok(manifest.payload);
    }
    match (&args.operation_map, &args.endpoint_map) {
        (Some(operations), Some(endpoints)) => Ok(CompressedPayload {
            operations: operations.clone(),
            endpoints: endpoints.clone(),
        }),
        _ => Err(format!(
            "both {} and {} are required (or --manifest)",
            shardgate_core::OPERATION_MAP_ENV,
            shardgate_core::ENDPOINT_MAP_ENV
        )),
    }
}
