use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Parses a path-item key. Case-insensitive; returns `None` for keys that
    /// are not operations (`parameters`, `summary`, ...).
    pub fn from_key(key: &str) -> Option<Self> {
        let method = match key.to_ascii_lowercase().as_str() {
            "get" => Self::Get,
            "put" => Self::Put,
            "post" => Self::Post,
            "delete" => Self::Delete,
            "options" => Self::Options,
            "head" => Self::Head,
            "patch" => Self::Patch,
            "trace" => Self::Trace,
            _ => return None,
        };
        Some(method)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which root type of the backend schema serves an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OperationRole {
    Query,
    Mutation,
}

impl OperationRole {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
        }
    }
}

impl fmt::Display for OperationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// One `(path, method, operationId)` triple as it appears in the description.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IndexedOperation {
    pub path: String,
    pub http_method: HttpMethod,
    pub operation_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OperationDescriptor {
    pub operation_id: String,
    pub path: String,
    pub http_method: HttpMethod,
    pub field_name: String,
    pub role: OperationRole,
}

impl OperationDescriptor {
    pub fn has_field_name(&self) -> bool {
        !self.field_name.trim().is_empty()
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
}

impl Diagnostic {
    pub fn warning(operation_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            message: message.into(),
            operation_id: Some(operation_id.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// `operationId -> batch index`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct OperationBatchMap(BTreeMap<String, usize>);

impl OperationBatchMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous assignment if the operation was already mapped.
    pub fn insert(&mut self, operation_id: impl Into<String>, batch: usize) -> Option<usize> {
        self.0.insert(operation_id.into(), batch)
    }

    pub fn batch_for(&self, operation_id: &str) -> Option<usize> {
        self.0.get(operation_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, usize)> for OperationBatchMap {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// `batch index -> base URL`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct BatchEndpointMap(BTreeMap<usize, String>);

impl BatchEndpointMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, batch: usize, base_url: impl Into<String>) -> Option<String> {
        self.0.insert(batch, base_url.into())
    }

    pub fn endpoint_for(&self, batch: usize) -> Option<&str> {
        self.0.get(&batch).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl FromIterator<(usize, String)> for BatchEndpointMap {
    fn from_iter<I: IntoIterator<Item = (usize, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Both routing tables, as aggregated at build time and decoded by the router.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MappingTables {
    pub operations: OperationBatchMap,
    pub endpoints: BatchEndpointMap,
}

impl MappingTables {
    /// Resolves an operation id straight to its batch and base URL.
    pub fn endpoint_for_operation(&self, operation_id: &str) -> Option<(usize, &str)> {
        let batch = self.operations.batch_for(operation_id)?;
        let url = self.endpoints.endpoint_for(batch)?;
        Some((batch, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_keys_are_case_insensitive() {
        assert_eq!(HttpMethod::from_key("GET"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_key("Patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::from_key("parameters"), None);
    }

    #[test]
    fn endpoint_lookup_needs_both_tables() {
        let mut tables = MappingTables::default();
        tables.operations.insert("getUser", 0);
        tables.operations.insert("orphan", 3);
        tables.endpoints.insert(0, "https://batch0.example");

        assert_eq!(
            tables.endpoint_for_operation("getUser"),
            Some((0, "https://batch0.example"))
        );
        assert_eq!(tables.endpoint_for_operation("orphan"), None);
        assert_eq!(tables.endpoint_for_operation("missing"), None);
    }

    #[test]
    fn endpoint_map_serializes_with_string_keys() {
        let map: BatchEndpointMap = [(0, "https://a".to_string())].into_iter().collect();
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"0":"https://a"}"#);
    }
}
