#![forbid(unsafe_code)]

//! Materializes batched operations into front-door surfaces and assembles
//! the deployment manifest, including the router's compressed tables.

pub mod config;
pub mod error;
pub mod integration;
pub mod manifest;
pub mod pipeline;
pub mod provision;
pub mod templates;

pub use crate::config::{BackendConfig, BuildConfig, ConfigError, ProjectConfig};
pub use crate::error::BuildError;
pub use crate::integration::{
    BackendIntegration, BatchSurface, FrontDoorResource, IntegrationBuilder, IntegrationOptions,
    MaterializedBatch, ResolverBinding, API_KEY_HEADER,
};
pub use crate::manifest::{BackendInfo, DeploymentManifest, ProjectInfo, RouterEntry};
pub use crate::pipeline::{BuildInputs, BuildPipeline};
pub use crate::provision::{FrontDoorProvisioner, ProvisionError, TemplateProvisioner};
pub use crate::templates::{TemplatePair, TemplateStore, TemplateStoreError};
