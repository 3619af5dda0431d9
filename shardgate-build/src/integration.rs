use std::path::PathBuf;

use shardgate_core::{Batch, Diagnostic, HttpMethod, MappingTables, OperationDescriptor, OperationRole};

use crate::error::BuildError;
use crate::provision::FrontDoorProvisioner;
use crate::templates::TemplateStore;

/// Header carried from the caller through the front door to the backend.
pub const API_KEY_HEADER: &str = "x-api-key";

/// One route on a batch surface: `{http_method} /{path_part}`. The path
/// part is the operation id, the same key the router dispatches on.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrontDoorResource {
    pub operation_id: String,
    pub path_part: String,
    pub http_method: HttpMethod,
    /// Path of the operation in the API description.
    pub description_path: String,
    pub integration: BackendIntegration,
    /// Previously built resource of the same batch. Build ordering only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<String>,
}

/// Non-proxy POST to the backend's single entry point, rewritten by the
/// operation's template pair.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackendIntegration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub http_method: HttpMethod,
    pub role: OperationRole,
    pub field_name: String,
    pub content_type: String,
    pub request_template: String,
    pub response_template: String,
    pub forwarded_headers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResolverBinding {
    pub operation_id: String,
    pub type_name: String,
    pub field_name: String,
    pub source_dir: PathBuf,
}

/// Ordered construction list for one batch.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BatchSurface {
    pub index: usize,
    pub name: String,
    pub resources: Vec<FrontDoorResource>,
    pub resolvers: Vec<ResolverBinding>,
}

impl BatchSurface {
    pub fn operation_ids(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(|r| r.operation_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaterializedBatch {
    pub surface: BatchSurface,
    /// `None` when every operation of the batch was skipped.
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct IntegrationOptions {
    pub strict_templates: bool,
    pub resolver_dir: Option<PathBuf>,
    pub backend_url: Option<String>,
    /// Root type names of the backend schema; `Query` / `Mutation` when unset.
    pub query_type: Option<String>,
    pub mutation_type: Option<String>,
}

impl IntegrationOptions {
    fn root_type_name(&self, role: OperationRole) -> String {
        let configured = match role {
            OperationRole::Query => self.query_type.as_deref(),
            OperationRole::Mutation => self.mutation_type.as_deref(),
        };
        configured.unwrap_or(role.type_name()).to_string()
    }
}

pub struct IntegrationBuilder<'a> {
    templates: &'a TemplateStore,
    options: IntegrationOptions,
}

impl<'a> IntegrationBuilder<'a> {
    pub fn new(templates: &'a TemplateStore, options: IntegrationOptions) -> Self {
        Self { templates, options }
    }

    /// Walks the batch in order and lays out its resources. Operations with
    /// a blank field name or without templates are skipped with a warning;
    /// strict template mode turns a missing template into an error.
    pub fn plan_surface(
        &self,
        batch: &Batch,
        name: String,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<BatchSurface, BuildError> {
        let mut resources: Vec<FrontDoorResource> = Vec::with_capacity(batch.operations.len());
        let mut resolvers = Vec::new();

        for op in &batch.operations {
            if !op.has_field_name() {
                tracing::warn!(operation_id = %op.operation_id, batch = batch.index, "blank field name, skipping operation");
                diagnostics.push(Diagnostic::warning(
                    &op.operation_id,
                    format!("invalid field name for operation '{}'; skipped", op.operation_id),
                ));
                continue;
            }

            if let Some(binding) = self.resolver_binding(op) {
                resolvers.push(binding);
            }

            let Some(pair) = self.templates.get(&op.operation_id) else {
                if self.options.strict_templates {
                    return Err(BuildError::MissingTemplate {
                        operation_id: op.operation_id.clone(),
                    });
                }
                tracing::warn!(operation_id = %op.operation_id, batch = batch.index, "no templates, skipping operation");
                diagnostics.push(Diagnostic::warning(
                    &op.operation_id,
                    format!("templates for operation '{}' not found; skipped", op.operation_id),
                ));
                continue;
            };

            let depends_on = resources.last().map(|prev| prev.operation_id.clone());
            resources.push(FrontDoorResource {
                operation_id: op.operation_id.clone(),
                path_part: op.operation_id.clone(),
                http_method: op.http_method,
                description_path: op.path.clone(),
                integration: BackendIntegration {
                    target: self.options.backend_url.clone(),
                    http_method: HttpMethod::Post,
                    role: op.role,
                    field_name: op.field_name.clone(),
                    content_type: "application/json".to_string(),
                    request_template: pair.request_vtl.clone(),
                    response_template: pair.response_vtl.clone(),
                    forwarded_headers: vec![API_KEY_HEADER.to_string()],
                },
                depends_on,
            });
        }

        Ok(BatchSurface {
            index: batch.index,
            name,
            resources,
            resolvers,
        })
    }

    /// Plans the batch, provisions it if anything survived planning, and
    /// records its routing fragments. Nothing is recorded for a batch that
    /// was not provisioned.
    pub async fn materialize(
        &self,
        batch: &Batch,
        name: String,
        provisioner: &dyn FrontDoorProvisioner,
        tables: &mut MappingTables,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<MaterializedBatch, BuildError> {
        let surface = self.plan_surface(batch, name, diagnostics)?;

        if surface.resources.is_empty() {
            tracing::warn!(batch = surface.index, surface = %surface.name, "every operation skipped, batch not provisioned");
            return Ok(MaterializedBatch {
                surface,
                base_url: None,
            });
        }

        let base_url = provisioner
            .provision(&surface)
            .await
            .map_err(|source| BuildError::Provision {
                batch: surface.index,
                source,
            })?;

        for operation_id in surface.operation_ids() {
            if let Some(previous) = tables.operations.insert(operation_id, surface.index) {
                return Err(BuildError::DuplicateAssignment {
                    operation_id: operation_id.to_string(),
                    batch: surface.index,
                    previous,
                });
            }
        }
        tables.endpoints.insert(surface.index, base_url.clone());

        tracing::info!(
            batch = surface.index,
            surface = %surface.name,
            resources = surface.resources.len(),
            base_url = %base_url,
            "batch provisioned"
        );

        Ok(MaterializedBatch {
            surface,
            base_url: Some(base_url),
        })
    }

    fn resolver_binding(&self, op: &OperationDescriptor) -> Option<ResolverBinding> {
        let source_dir = self.options.resolver_dir.as_ref()?.join(&op.operation_id);
        if !source_dir.is_dir() {
            return None;
        }
        Some(ResolverBinding {
            operation_id: op.operation_id.clone(),
            type_name: self.options.root_type_name(op.role),
            field_name: op.field_name.clone(),
            source_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::templates::TemplatePair;

    fn op(id: &str, field: &str) -> OperationDescriptor {
        OperationDescriptor {
            operation_id: id.to_string(),
            path: format!("/{id}"),
            http_method: HttpMethod::Get,
            field_name: field.to_string(),
            role: OperationRole::Query,
        }
    }

    fn store(ids: &[&str]) -> TemplateStore {
        let pairs: BTreeMap<_, _> = ids
            .iter()
            .map(|id| {
                (
                    id.to_string(),
                    TemplatePair {
                        request_vtl: format!("req:{id}"),
                        response_vtl: format!("res:{id}"),
                    },
                )
            })
            .collect();
        TemplateStore::from_pairs(pairs)
    }

    #[test]
    fn resources_chain_in_batch_order() {
        let templates = store(&["a", "b", "c"]);
        let builder = IntegrationBuilder::new(&templates, IntegrationOptions::default());
        let batch = Batch {
            index: 0,
            operations: vec![op("a", "a"), op("b", "b"), op("c", "c")],
        };
        let mut diags = Vec::new();
        let surface = builder.plan_surface(&batch, "p-batch0".into(), &mut diags).unwrap();

        let deps: Vec<_> = surface.resources.iter().map(|r| r.depends_on.as_deref()).collect();
        assert_eq!(deps, vec![None, Some("a"), Some("b")]);
        assert_eq!(surface.resources[1].integration.request_template, "req:b");
        assert_eq!(surface.resources[1].integration.http_method, HttpMethod::Post);
        assert_eq!(surface.resources[1].integration.forwarded_headers, vec!["x-api-key"]);
        assert!(diags.is_empty());
    }

    #[test]
    fn skipped_operations_do_not_break_the_chain() {
        let templates = store(&["a", "blank", "c"]);
        let builder = IntegrationBuilder::new(&templates, IntegrationOptions::default());
        let batch = Batch {
            index: 2,
            operations: vec![op("a", "a"), op("blank", "  "), op("noTemplate", "noTemplate"), op("c", "c")],
        };
        let mut diags = Vec::new();
        let surface = builder.plan_surface(&batch, "p-batch2".into(), &mut diags).unwrap();

        let ids: Vec<_> = surface.operation_ids().collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(surface.resources[1].depends_on.as_deref(), Some("a"));
        let flagged: Vec<_> = diags.iter().filter_map(|d| d.operation_id.as_deref()).collect();
        assert_eq!(flagged, vec!["blank", "noTemplate"]);
    }

    #[test]
    fn strict_mode_rejects_missing_templates() {
        let templates = store(&["a"]);
        let builder = IntegrationBuilder::new(
            &templates,
            IntegrationOptions {
                strict_templates: true,
                ..Default::default()
            },
        );
        let batch = Batch {
            index: 0,
            operations: vec![op("a", "a"), op("b", "b")],
        };
        let err = builder
            .plan_surface(&batch, "p-batch0".into(), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, BuildError::MissingTemplate { operation_id } if operation_id == "b"));
    }

    #[test]
    fn resolver_bindings_follow_existing_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();
        let templates = store(&[]);
        let builder = IntegrationBuilder::new(
            &templates,
            IntegrationOptions {
                resolver_dir: Some(dir.path().to_path_buf()),
                ..Default::default()
            },
        );
        let mut mutation = op("b", "b");
        mutation.role = OperationRole::Mutation;
        std::fs::create_dir(dir.path().join("b")).unwrap();
        let batch = Batch {
            index: 0,
            operations: vec![op("a", "a"), mutation, op("c", "c")],
        };
        let surface = builder
            .plan_surface(&batch, "p-batch0".into(), &mut Vec::new())
            .unwrap();

        // templates are missing, yet resolvers are still bound
        assert!(surface.resources.is_empty());
        let bound: Vec<_> = surface
            .resolvers
            .iter()
            .map(|r| (r.operation_id.as_str(), r.type_name.as_str()))
            .collect();
        assert_eq!(bound, vec![("a", "Query"), ("b", "Mutation")]);
    }

    #[test]
    fn resolver_bindings_use_the_schema_root_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("poke")).unwrap();
        std::fs::create_dir(dir.path().join("peek")).unwrap();
        let templates = store(&[]);
        let builder = IntegrationBuilder::new(
            &templates,
            IntegrationOptions {
                resolver_dir: Some(dir.path().to_path_buf()),
                query_type: Some("RootQuery".to_string()),
                mutation_type: Some("RootMutation".to_string()),
                ..Default::default()
            },
        );
        let mut poke = op("poke", "poke");
        poke.role = OperationRole::Mutation;
        let batch = Batch {
            index: 0,
            operations: vec![op("peek", "peek"), poke],
        };
        let surface = builder
            .plan_surface(&batch, "p-batch0".into(), &mut Vec::new())
            .unwrap();

        let bound: Vec<_> = surface
            .resolvers
            .iter()
            .map(|r| (r.operation_id.as_str(), r.type_name.as_str()))
            .collect();
        assert_eq!(bound, vec![("peek", "RootQuery"), ("poke", "RootMutation")]);
    }

    #[test]
    fn resources_are_mounted_at_the_operation_id() {
        let templates = store(&["addUser"]);
        let builder = IntegrationBuilder::new(&templates, IntegrationOptions::default());
        let mut add = op("addUser", "createUser");
        add.role = OperationRole::Mutation;
        let batch = Batch {
            index: 0,
            operations: vec![add],
        };
        let surface = builder
            .plan_surface(&batch, "p-batch0".into(), &mut Vec::new())
            .unwrap();

        let resource = &surface.resources[0];
        assert_eq!(resource.path_part, "addUser");
        assert_eq!(resource.integration.field_name, "createUser");
    }
}
