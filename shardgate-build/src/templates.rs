use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Request/response rewriting rules for one operation. Opaque to the build.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TemplatePair {
    pub request_vtl: String,
    pub response_vtl: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateStoreError {
    #[error("failed to read templates {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("templates {path} must map operationId to {{request_vtl, response_vtl}}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Template pairs keyed by operation id.
///
/// Loaded once before any batch is processed and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    pairs: BTreeMap<String, TemplatePair>,
}

impl TemplateStore {
    pub fn from_pairs(pairs: BTreeMap<String, TemplatePair>) -> Self {
        Self { pairs }
    }

    /// A missing file is an empty store (every operation will be skipped or,
    /// in strict mode, rejected); a file that exists but does not parse is fatal.
    pub fn load(path: &Path) -> Result<Self, TemplateStoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "template store not found, continuing without templates");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(TemplateStoreError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let pairs = serde_json::from_str(&content).map_err(|source| TemplateStoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { pairs };
        tracing::debug!(path = %path.display(), templates = store.len(), "loaded template store");
        Ok(store)
    }

    pub fn get(&self, operation_id: &str) -> Option<&TemplatePair> {
        self.pairs.get(operation_id)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
