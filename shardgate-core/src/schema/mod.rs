mod introspection;
mod sdl;

use std::collections::BTreeSet;

use crate::error::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// GraphQL schema definition language.
    Sdl,
    /// Result of a GraphQL introspection query, as JSON.
    Introspection,
    Auto,
}

/// Field-name sets of the backend's query and mutation root types.
///
/// Built once per build and never mutated; every classification reads from
/// the same index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaIndex {
    query_type: Option<String>,
    mutation_type: Option<String>,
    query_fields: BTreeSet<String>,
    mutation_fields: BTreeSet<String>,
}

impl SchemaIndex {
    pub fn parse(source: &str, format: SchemaFormat) -> Result<Self, SchemaError> {
        match format {
            SchemaFormat::Sdl => sdl::index_sdl(source),
            SchemaFormat::Introspection => introspection::index_introspection_str(source),
            SchemaFormat::Auto => {
                if source.trim_start().starts_with('{') {
                    introspection::index_introspection_str(source)
                } else {
                    sdl::index_sdl(source)
                }
            }
        }
    }

    pub fn from_introspection(value: &serde_json::Value) -> Result<Self, SchemaError> {
        introspection::index_introspection(value)
    }

    /// Builds an index directly from root field names, using the default
    /// `Query` / `Mutation` root type names.
    pub fn from_fields<Q, M>(query_fields: Q, mutation_fields: M) -> Self
    where
        Q: IntoIterator,
        Q::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            query_type: Some("Query".to_string()),
            mutation_type: Some("Mutation".to_string()),
            query_fields: query_fields.into_iter().map(Into::into).collect(),
            mutation_fields: mutation_fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_query_field(&self, name: &str) -> bool {
        self.query_fields.contains(name)
    }

    pub fn has_mutation_field(&self, name: &str) -> bool {
        self.mutation_fields.contains(name)
    }

    pub fn query_type(&self) -> Option<&str> {
        self.query_type.as_deref()
    }

    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    pub fn query_fields(&self) -> impl Iterator<Item = &str> {
        self.query_fields.iter().map(String::as_str)
    }

    pub fn mutation_fields(&self) -> impl Iterator<Item = &str> {
        self.mutation_fields.iter().map(String::as_str)
    }
}
