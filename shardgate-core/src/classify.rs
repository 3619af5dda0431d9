use std::collections::BTreeMap;

use crate::model::{Diagnostic, IndexedOperation, OperationDescriptor, OperationRole};
use crate::schema::SchemaIndex;

/// Maps an `operationId` to the backend field that serves it.
pub trait FieldNameTranslator: Send + Sync {
    fn translate(&self, operation_id: &str) -> String;
}

/// The default: field name == operation id.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl FieldNameTranslator for IdentityTranslator {
    fn translate(&self, operation_id: &str) -> String {
        operation_id.to_string()
    }
}

/// Identity translation with per-operation overrides.
#[derive(Debug, Clone, Default)]
pub struct OverrideTranslator {
    overrides: BTreeMap<String, String>,
}

impl OverrideTranslator {
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }
}

impl FieldNameTranslator for OverrideTranslator {
    fn translate(&self, operation_id: &str) -> String {
        self.overrides
            .get(operation_id)
            .cloned()
            .unwrap_or_else(|| operation_id.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Classification {
    pub field_name: String,
    pub role: OperationRole,
    /// Set when the field was not found on either root type.
    pub diagnostic: Option<Diagnostic>,
}

pub struct OperationClassifier<'a> {
    schema: &'a SchemaIndex,
    translator: &'a dyn FieldNameTranslator,
}

impl<'a> OperationClassifier<'a> {
    pub fn new(schema: &'a SchemaIndex) -> Self {
        Self {
            schema,
            translator: &IdentityTranslator,
        }
    }

    pub fn with_translator(mut self, translator: &'a dyn FieldNameTranslator) -> Self {
        self.translator = translator;
        self
    }

    /// Query fields win over mutation fields. A field on neither root type
    /// defaults to `Query` with a warning; this never fails.
    pub fn classify(&self, operation_id: &str) -> Classification {
        let field_name = self.translator.translate(operation_id);

        if self.schema.has_query_field(&field_name) {
            return Classification {
                field_name,
                role: OperationRole::Query,
                diagnostic: None,
            };
        }
        if self.schema.has_mutation_field(&field_name) {
            return Classification {
                field_name,
                role: OperationRole::Mutation,
                diagnostic: None,
            };
        }

        // Blank names are reported once, by the integration builder.
        let diagnostic = if field_name.trim().is_empty() {
            None
        } else {
            tracing::warn!(
                operation_id,
                field_name = %field_name,
                "field not found on query or mutation type, defaulting to Query"
            );
            Some(Diagnostic::warning(
                operation_id,
                format!("field '{field_name}' not found in schema; defaulting to Query"),
            ))
        };

        Classification {
            field_name,
            role: OperationRole::Query,
            diagnostic,
        }
    }

    pub fn classify_all(
        &self,
        operations: Vec<IndexedOperation>,
    ) -> (Vec<OperationDescriptor>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let descriptors = operations
            .into_iter()
            .map(|op| {
                let c = self.classify(&op.operation_id);
                if let Some(d) = c.diagnostic {
                    diagnostics.push(d);
                }
                OperationDescriptor {
                    operation_id: op.operation_id,
                    path: op.path,
                    http_method: op.http_method,
                    field_name: c.field_name,
                    role: c.role,
                }
            })
            .collect();
        (descriptors, diagnostics)
    }
}
