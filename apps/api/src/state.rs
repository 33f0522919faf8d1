use std::sync::Arc;

use crate::config::Config;
use crate::docgen::{DocumentMerger, PdfOutput};
use crate::templates::TemplateCatalog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub templates: TemplateCatalog,
    /// Pluggable merge backend. Production: `PdfServicesClient`.
    pub merger: Arc<dyn DocumentMerger>,
    pub output: PdfOutput,
}

impl AppState {
    pub fn new(config: &Config, merger: Arc<dyn DocumentMerger>) -> Self {
        Self {
            templates: TemplateCatalog::new(config.templates_dir.clone()),
            merger,
            output: PdfOutput::new(config.output_dir.clone()),
        }
    }
}
