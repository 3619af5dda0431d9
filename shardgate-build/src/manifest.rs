use std::collections::BTreeMap;
use std::path::PathBuf;

use shardgate_core::{
    CompressedPayload, Diagnostic, DiagnosticSeverity, MappingTables, ENDPOINT_MAP_ENV,
    OPERATION_MAP_ENV,
};

use crate::integration::MaterializedBatch;

/// Everything a deployment needs: the backend, each batch surface, the
/// public router entry and its configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DeploymentManifest {
    pub project: ProjectInfo,
    pub backend: BackendInfo,
    pub max_resources_per_stack: usize,
    pub operation_count: usize,
    pub batches: Vec<MaterializedBatch>,
    pub router: RouterEntry,
    pub tables: MappingTables,
    pub payload: CompressedPayload,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BackendInfo {
    pub name: String,
    pub schema_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub query_type: Option<String>,
    pub mutation_type: Option<String>,
}

/// The single public surface that fronts every batch.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RouterEntry {
    pub name: String,
    pub routes: Vec<String>,
    pub environment: BTreeMap<String, String>,
}

impl RouterEntry {
    pub fn new(project: &str, payload: &CompressedPayload) -> Self {
        let environment = [
            (OPERATION_MAP_ENV.to_string(), payload.operations.clone()),
            (ENDPOINT_MAP_ENV.to_string(), payload.endpoints.clone()),
        ]
        .into_iter()
        .collect();
        Self {
            name: format!("{project}-router"),
            routes: vec!["ANY /".to_string(), "ANY /{proxy+}".to_string()],
            environment,
        }
    }

    pub fn payload(&self) -> Option<CompressedPayload> {
        Some(CompressedPayload {
            operations: self.environment.get(OPERATION_MAP_ENV)?.clone(),
            endpoints: self.environment.get(ENDPOINT_MAP_ENV)?.clone(),
        })
    }
}

impl DeploymentManifest {
    pub fn provisioned_batches(&self) -> impl Iterator<Item = &MaterializedBatch> {
        self.batches.iter().filter(|b| b.base_url.is_some())
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
            .count()
    }

    /// Operations that were indexed but never made it onto a surface.
    pub fn unrouted_operations(&self) -> usize {
        self.operation_count.saturating_sub(self.tables.operations.len())
    }
}
