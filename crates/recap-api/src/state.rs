//! Application state shared across request handlers.

use std::sync::Arc;

use handlebars::Handlebars;

use recap_core::{AppError, Config};
use recap_db::MediaRepository;
use recap_vision::MediaAnalyzer;

use crate::ingest::IngestService;

pub struct AppState {
    pub config: Config,
    pub repository: MediaRepository,
    pub ingest: IngestService,
    pub templates: Handlebars<'static>,
}

impl AppState {
    pub fn new(
        config: Config,
        repository: MediaRepository,
        analyzer: Arc<dyn MediaAnalyzer>,
    ) -> Result<Self, AppError> {
        let ingest = IngestService::from_config(&config, repository.clone(), analyzer);
        let templates = build_templates()
            .map_err(|e| AppError::Internal(format!("template registration failed: {}", e)))?;

        Ok(Self {
            config,
            repository,
            ingest,
            templates,
        })
    }
}

fn build_templates() -> Result<Handlebars<'static>, handlebars::TemplateError> {
    let mut templates = Handlebars::new();
    templates.register_template_string("index", include_str!("../templates/index.hbs"))?;
    templates.register_template_string("results", include_str!("../templates/results.hbs"))?;
    Ok(templates)
}
