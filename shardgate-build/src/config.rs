use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use shardgate_core::DEFAULT_MAX_RESOURCES_PER_STACK;

pub const DEFAULT_ENDPOINT_TEMPLATE: &str = "https://{surface}.gateway.invalid/prod";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config {path} is neither valid JSON nor valid YAML: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Project-level build settings. Loaded from a JSON or YAML file; every
/// field can be overridden from the command line.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub project: ProjectConfig,
    /// API description (OpenAPI-style `paths`), JSON or YAML.
    pub description_path: PathBuf,
    /// Backend schema, SDL or introspection JSON.
    pub schema_path: PathBuf,
    /// `{operationId: {request_vtl, response_vtl}}`.
    pub templates_path: Option<PathBuf>,
    /// Directory holding one sub-directory of resolver code per operation id.
    pub resolver_dir: Option<PathBuf>,
    pub max_resources_per_stack: usize,
    /// Fail the build when an operation has no template pair.
    pub strict_templates: bool,
    /// Base URL pattern for batch surfaces; `{surface}` and `{batch}` are substituted.
    pub endpoint_template: String,
    pub backend: BackendConfig,
    /// operationId -> backend field name, for ids that do not match the schema.
    pub field_names: BTreeMap<String, String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            description_path: PathBuf::from("openapi.json"),
            schema_path: PathBuf::from("schema.graphql"),
            templates_path: None,
            resolver_dir: None,
            max_resources_per_stack: DEFAULT_MAX_RESOURCES_PER_STACK,
            strict_templates: false,
            endpoint_template: DEFAULT_ENDPOINT_TEMPLATE.to_string(),
            backend: BackendConfig::default(),
            field_names: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub description: Option<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "shardgate".to_string(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Name of the GraphQL backend; defaults to `{project}-graphql`.
    pub name: Option<String>,
    /// Single entry point every front-door resource forwards to.
    pub url: Option<String>,
}

impl BuildConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse_str(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        config.resolve_relative_to(path.parent().unwrap_or_else(|| Path::new(".")));
        Ok(config)
    }

    pub fn parse_str(content: &str) -> Result<Self, String> {
        if content.trim_start().starts_with('{') {
            serde_json::from_str(content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(content).map_err(|e| e.to_string())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_resources_per_stack == 0 {
            return Err(ConfigError::Invalid(
                "max_resources_per_stack must be at least 1".to_string(),
            ));
        }
        if self.project.name.trim().is_empty() {
            return Err(ConfigError::Invalid("project.name must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn backend_name(&self) -> String {
        self.backend
            .name
            .clone()
            .unwrap_or_else(|| format!("{}-graphql", self.project.name))
    }

    pub fn surface_name(&self, batch: usize) -> String {
        format!("{}-batch{batch}", self.project.name)
    }

    // Paths in a config file are relative to the file, not the working dir.
    fn resolve_relative_to(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        join(&mut self.description_path);
        join(&mut self.schema_path);
        if let Some(p) = self.templates_path.as_mut() {
            join(p);
        }
        if let Some(p) = self.resolver_dir.as_mut() {
            join(p);
        }
    }
}
