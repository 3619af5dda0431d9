use std::collections::HashMap;

use crate::error::IndexError;
use crate::model::{HttpMethod, IndexedOperation};

/// Walks `paths` in document order (paths, then methods within a path) and
/// returns one entry per operation.
///
/// Path-item keys that are not HTTP methods and method entries that are not
/// objects are ignored. Everything else that does not match the expected
/// shape is a structural error.
pub fn index_operations(doc: &serde_json::Value) -> Result<Vec<IndexedOperation>, IndexError> {
    let root = doc.as_object().ok_or(IndexError::NotAnObject)?;
    let paths = match root.get("paths") {
        None | Some(serde_json::Value::Null) => return Ok(Vec::new()),
        Some(v) => v.as_object().ok_or(IndexError::PathsNotAnObject)?,
    };

    let mut out = Vec::new();
    let mut seen: HashMap<String, (String, HttpMethod)> = HashMap::new();

    for (path, item) in paths {
        let item = item.as_object().ok_or_else(|| IndexError::PathItemNotAnObject {
            path: path.clone(),
        })?;

        for (key, op) in item {
            let Some(method) = HttpMethod::from_key(key) else {
                continue;
            };
            let Some(op) = op.as_object() else {
                continue;
            };

            let operation_id = match op.get("operationId") {
                None | Some(serde_json::Value::Null) => {
                    return Err(IndexError::MissingOperationId {
                        path: path.clone(),
                        method,
                    })
                }
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(_) => {
                    return Err(IndexError::OperationIdNotAString {
                        path: path.clone(),
                        method,
                    })
                }
            };

            if let Some((first_path, first_method)) = seen.get(&operation_id) {
                return Err(IndexError::DuplicateOperationId {
                    operation_id,
                    path: path.clone(),
                    method,
                    first_path: first_path.clone(),
                    first_method: *first_method,
                });
            }
            seen.insert(operation_id.clone(), (path.clone(), method));

            out.push(IndexedOperation {
                path: path.clone(),
                http_method: method,
                operation_id,
            });
        }
    }

    Ok(out)
}
