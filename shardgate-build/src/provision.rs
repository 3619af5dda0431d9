use async_trait::async_trait;

use crate::integration::BatchSurface;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProvisionError {
    #[error("invalid endpoint URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
    #[error("{0}")]
    Other(String),
}

/// Materializes one batch surface and reports the base URL it is served at.
///
/// Creating the underlying infrastructure is outside this crate; the build
/// only needs the resulting URL to finish the routing tables.
#[async_trait]
pub trait FrontDoorProvisioner: Send + Sync {
    async fn provision(&self, surface: &BatchSurface) -> Result<String, ProvisionError>;
}

/// Derives each surface's base URL from a pattern such as
/// `https://{surface}.execute-api.example.com/prod`.
#[derive(Debug, Clone)]
pub struct TemplateProvisioner {
    template: String,
}

impl TemplateProvisioner {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, surface: &BatchSurface) -> Result<String, ProvisionError> {
        let rendered = self
            .template
            .replace("{surface}", &surface.name)
            .replace("{batch}", &surface.index.to_string());
        let parsed = url::Url::parse(&rendered).map_err(|e| ProvisionError::InvalidUrl {
            url: rendered.clone(),
            message: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ProvisionError::InvalidUrl {
                url: rendered,
                message: "not a base URL".to_string(),
            });
        }
        Ok(rendered)
    }
}

#[async_trait]
impl FrontDoorProvisioner for TemplateProvisioner {
    async fn provision(&self, surface: &BatchSurface) -> Result<String, ProvisionError> {
        self.render(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(index: usize) -> BatchSurface {
        BatchSurface {
            index,
            name: format!("tickets-batch{index}"),
            resources: Vec::new(),
            resolvers: Vec::new(),
        }
    }

    #[test]
    fn substitutes_placeholders() {
        let p = TemplateProvisioner::new("https://{surface}.example.com/b{batch}");
        assert_eq!(
            p.render(&surface(4)).unwrap(),
            "https://tickets-batch4.example.com/b4"
        );
    }

    #[test]
    fn rejects_non_urls() {
        let p = TemplateProvisioner::new("{surface}");
        assert!(matches!(
            p.render(&surface(0)),
            Err(ProvisionError::InvalidUrl { .. })
        ));
        let p = TemplateProvisioner::new("mailto:{surface}@example.com");
        assert!(p.render(&surface(0)).is_err());
    }
}
