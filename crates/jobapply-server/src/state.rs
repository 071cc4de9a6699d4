use jobapply_common::config::Config;
use std::sync::Arc;
use tera::Tera;

/// Read-only state shared with every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn new(config: Arc<Config>, templates: Tera) -> Self {
        Self {
            config,
            templates: Arc::new(templates),
        }
    }
}
