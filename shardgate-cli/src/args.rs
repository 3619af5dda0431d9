use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;
use shardgate_build::{BuildConfig, ConfigError};

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// Project file plus per-field overrides. Flags win over the file.
#[derive(Debug, Args, Clone)]
pub struct BuildArgs {
    /// Project file (JSON or YAML).
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub project: Option<String>,
    /// API description (JSON or YAML).
    #[arg(long)]
    pub description: Option<PathBuf>,
    /// Backend schema (SDL or introspection JSON).
    #[arg(long)]
    pub schema: Option<PathBuf>,
    #[arg(long)]
    pub templates: Option<PathBuf>,
    #[arg(long)]
    pub resolver_dir: Option<PathBuf>,
    #[arg(long, env = "SHARDGATE_MAX_RESOURCES")]
    pub max_resources: Option<usize>,
    #[arg(long)]
    pub strict_templates: bool,
    #[arg(long)]
    pub endpoint_template: Option<String>,
    #[arg(long)]
    pub backend_url: Option<String>,
}

impl BuildArgs {
    pub fn resolve(&self) -> Result<BuildConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => BuildConfig::load(path)?,
            None => BuildConfig::default(),
        };
        if let Some(name) = &self.project {
            config.project.name = name.clone();
        }
        if let Some(path) = &self.description {
            config.description_path = path.clone();
        }
        if let Some(path) = &self.schema {
            config.schema_path = path.clone();
        }
        if let Some(path) = &self.templates {
            config.templates_path = Some(path.clone());
        }
        if let Some(path) = &self.resolver_dir {
            config.resolver_dir = Some(path.clone());
        }
        if let Some(max) = self.max_resources {
            config.max_resources_per_stack = max;
        }
        if self.strict_templates {
            config.strict_templates = true;
        }
        if let Some(template) = &self.endpoint_template {
            config.endpoint_template = template.clone();
        }
        if let Some(url) = &self.backend_url {
            config.backend.url = Some(url.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

/// Compressed tables, from flags, the environment, or a built manifest.
#[derive(Debug, Args, Clone)]
pub struct PayloadArgs {
    /// Manifest written by `shardgate build --out`.
    #[arg(long, conflicts_with_all = ["operation_map", "endpoint_map"])]
    pub manifest: Option<PathBuf>,
    #[arg(long, env = "SHARDGATE_OPERATION_MAP", hide_env_values = true)]
    pub operation_map: Option<String>,
    #[arg(long, env = "SHARDGATE_ENDPOINT_MAP", hide_env_values = true)]
    pub endpoint_map: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,
    /// Downstream request timeout in milliseconds.
    #[arg(long, default_value_t = 29_000)]
    pub timeout: u64,
    #[arg(long, default_value_t = shardgate_router::DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}
