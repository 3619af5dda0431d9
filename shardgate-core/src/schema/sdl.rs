use std::collections::BTreeSet;

use apollo_compiler::ast::OperationType;
use apollo_compiler::Schema;

use crate::error::SchemaError;
use crate::schema::SchemaIndex;

pub(crate) fn index_sdl(source: &str) -> Result<SchemaIndex, SchemaError> {
    let schema = Schema::parse(source, "schema.graphql")
        .map_err(|with_errors| SchemaError::Sdl(with_errors.errors.to_string()))?;

    let query_type = schema
        .root_operation(OperationType::Query)
        .map(|name| name.to_string());
    let mutation_type = schema
        .root_operation(OperationType::Mutation)
        .map(|name| name.to_string());

    let query_fields = object_fields(&schema, query_type.as_deref());
    let mutation_fields = object_fields(&schema, mutation_type.as_deref());

    Ok(SchemaIndex {
        query_type,
        mutation_type,
        query_fields,
        mutation_fields,
    })
}

fn object_fields(schema: &Schema, type_name: Option<&str>) -> BTreeSet<String> {
    let Some(object) = type_name.and_then(|name| schema.get_object(name)) else {
        return BTreeSet::new();
    };
    object
        .fields
        .keys()
        .map(|name| name.as_str().to_string())
        .collect()
}
