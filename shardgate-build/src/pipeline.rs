use std::path::Path;
use std::sync::Arc;

use shardgate_core::{
    encode_table, index_operations, parse_description_str, partition, CompressedPayload,
    DocumentFormat, MappingTables, OperationClassifier, OverrideTranslator, SchemaFormat,
    SchemaIndex,
};

use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::integration::{IntegrationBuilder, IntegrationOptions};
use crate::manifest::{BackendInfo, DeploymentManifest, ProjectInfo, RouterEntry};
use crate::provision::{FrontDoorProvisioner, TemplateProvisioner};
use crate::templates::TemplateStore;

/// Inputs loaded once before any batch is processed.
pub struct BuildInputs {
    pub description: serde_json::Value,
    pub schema: SchemaIndex,
    pub templates: TemplateStore,
}

impl BuildInputs {
    pub fn load(config: &BuildConfig) -> Result<Self, BuildError> {
        let description_src = read(&config.description_path)?;
        let description = parse_description_str(&description_src, DocumentFormat::Auto)?.document;

        let schema_src = read(&config.schema_path)?;
        let schema = SchemaIndex::parse(&schema_src, SchemaFormat::Auto)?;

        let templates = match &config.templates_path {
            Some(path) => TemplateStore::load(path)?,
            None => TemplateStore::default(),
        };

        Ok(Self {
            description,
            schema,
            templates,
        })
    }
}

fn read(path: &Path) -> Result<String, BuildError> {
    std::fs::read_to_string(path).map_err(|source| BuildError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub struct BuildPipeline {
    config: BuildConfig,
    provisioner: Arc<dyn FrontDoorProvisioner>,
}

impl BuildPipeline {
    pub fn new(config: BuildConfig) -> Self {
        let provisioner = Arc::new(TemplateProvisioner::new(config.endpoint_template.clone()));
        Self {
            config,
            provisioner,
        }
    }

    pub fn with_provisioner(mut self, provisioner: Arc<dyn FrontDoorProvisioner>) -> Self {
        self.provisioner = provisioner;
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub async fn run_from_files(&self) -> Result<DeploymentManifest, BuildError> {
        self.config.validate()?;
        let inputs = BuildInputs::load(&self.config)?;
        self.run(inputs).await
    }

    pub async fn run(&self, inputs: BuildInputs) -> Result<DeploymentManifest, BuildError> {
        self.config.validate()?;
        let config = &self.config;

        let indexed = index_operations(&inputs.description)?;
        let operation_count = indexed.len();
        tracing::info!(operations = operation_count, "indexed api description");

        let translator = OverrideTranslator::new(config.field_names.clone());
        let classifier = OperationClassifier::new(&inputs.schema).with_translator(&translator);
        let (descriptors, mut diagnostics) = classifier.classify_all(indexed);

        let batches = partition(descriptors, config.max_resources_per_stack)?;
        tracing::info!(
            batches = batches.len(),
            max_resources_per_stack = config.max_resources_per_stack,
            "partitioned operations"
        );

        let builder = IntegrationBuilder::new(
            &inputs.templates,
            IntegrationOptions {
                strict_templates: config.strict_templates,
                resolver_dir: config.resolver_dir.clone(),
                backend_url: config.backend.url.clone(),
                query_type: inputs.schema.query_type().map(str::to_string),
                mutation_type: inputs.schema.mutation_type().map(str::to_string),
            },
        );

        let mut tables = MappingTables::default();
        let mut materialized = Vec::with_capacity(batches.len());
        for batch in &batches {
            let name = config.surface_name(batch.index);
            let built = builder
                .materialize(
                    batch,
                    name,
                    self.provisioner.as_ref(),
                    &mut tables,
                    &mut diagnostics,
                )
                .await?;
            materialized.push(built);
        }

        let payload = compress(&tables).await?;
        tracing::info!(
            routed_operations = tables.operations.len(),
            endpoints = tables.endpoints.len(),
            operation_payload_bytes = payload.operations.len(),
            endpoint_payload_bytes = payload.endpoints.len(),
            "compressed routing tables"
        );

        Ok(DeploymentManifest {
            project: ProjectInfo {
                name: config.project.name.clone(),
                description: config.project.description.clone(),
            },
            backend: BackendInfo {
                name: config.backend_name(),
                schema_path: config.schema_path.clone(),
                url: config.backend.url.clone(),
                query_type: inputs.schema.query_type().map(str::to_string),
                mutation_type: inputs.schema.mutation_type().map(str::to_string),
            },
            max_resources_per_stack: config.max_resources_per_stack,
            operation_count,
            batches: materialized,
            router: RouterEntry::new(&config.project.name, &payload),
            tables,
            payload,
            diagnostics,
        })
    }
}

/// Compresses both tables on the blocking pool; both must finish before the
/// router configuration exists.
async fn compress(tables: &MappingTables) -> Result<CompressedPayload, BuildError> {
    let operations = tables.operations.clone();
    let endpoints = tables.endpoints.clone();

    let ops_task = tokio::task::spawn_blocking(move || encode_table(&operations));
    let endpoints_task = tokio::task::spawn_blocking(move || encode_table(&endpoints));
    let (ops, endpoints) = tokio::try_join!(ops_task, endpoints_task)
        .map_err(|e| BuildError::Task(e.to_string()))?;

    Ok(CompressedPayload {
        operations: ops?,
        endpoints: endpoints?,
    })
}
