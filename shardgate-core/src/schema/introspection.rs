use std::collections::BTreeSet;

use crate::error::SchemaError;
use crate::schema::SchemaIndex;

pub(crate) fn index_introspection_str(source: &str) -> Result<SchemaIndex, SchemaError> {
    let value: serde_json::Value = serde_json::from_str(source)?;
    index_introspection(&value)
}

/// Accepts either a full response (`{"data": {"__schema": ...}}`) or the
/// bare `{"__schema": ...}` object.
pub(crate) fn index_introspection(value: &serde_json::Value) -> Result<SchemaIndex, SchemaError> {
    let schema = value
        .pointer("/data/__schema")
        .or_else(|| value.get("__schema"))
        .ok_or_else(|| SchemaError::Introspection("missing `__schema`".to_string()))?;

    let types = schema
        .get("types")
        .and_then(|v| v.as_array())
        .ok_or_else(|| SchemaError::Introspection("`__schema.types` must be an array".to_string()))?;

    let query_type = root_name(schema, "queryType").or_else(|| Some("Query".to_string()));
    let mutation_type = match schema.get("mutationType") {
        // Explicit null means the schema has no mutations.
        Some(serde_json::Value::Null) => None,
        Some(_) => root_name(schema, "mutationType"),
        None => Some("Mutation".to_string()),
    };

    let query_fields = type_fields(types, query_type.as_deref());
    let mutation_fields = type_fields(types, mutation_type.as_deref());

    Ok(SchemaIndex {
        query_type,
        mutation_type,
        query_fields,
        mutation_fields,
    })
}

fn root_name(schema: &serde_json::Value, key: &str) -> Option<String> {
    schema
        .get(key)
        .and_then(|v| v.get("name"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn type_fields(types: &[serde_json::Value], type_name: Option<&str>) -> BTreeSet<String> {
    let Some(type_name) = type_name else {
        return BTreeSet::new();
    };
    types
        .iter()
        .find(|t| t.get("name").and_then(|v| v.as_str()) == Some(type_name))
        .and_then(|t| t.get("fields"))
        .and_then(|v| v.as_array())
        .map(|fields| {
            fields
                .iter()
                .filter_map(|f| f.get("name").and_then(|v| v.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_full_introspection_response() {
        let value = json!({
            "data": {
                "__schema": {
                    "queryType": { "name": "Query" },
                    "mutationType": { "name": "Mutation" },
                    "types": [
                        { "kind": "OBJECT", "name": "Query", "fields": [{ "name": "getUser", "args": [] }] },
                        { "kind": "OBJECT", "name": "Mutation", "fields": [{ "name": "createUser", "args": [] }] },
                        { "kind": "SCALAR", "name": "String", "fields": null }
                    ]
                }
            }
        });
        let index = index_introspection(&value).unwrap();
        assert!(index.has_query_field("getUser"));
        assert!(index.has_mutation_field("createUser"));
    }

    #[test]
    fn null_mutation_type_means_no_mutations() {
        let value = json!({
            "__schema": {
                "queryType": { "name": "Q" },
                "mutationType": null,
                "types": [
                    { "name": "Q", "fields": [{ "name": "ping" }] },
                    { "name": "Mutation", "fields": [{ "name": "ignored" }] }
                ]
            }
        });
        let index = index_introspection(&value).unwrap();
        assert_eq!(index.query_type(), Some("Q"));
        assert!(index.has_query_field("ping"));
        assert!(!index.has_mutation_field("ignored"));
    }

    #[test]
    fn missing_schema_is_an_error() {
        let err = index_introspection(&json!({ "data": {} })).unwrap_err();
        assert!(matches!(err, SchemaError::Introspection(_)));
    }
}
