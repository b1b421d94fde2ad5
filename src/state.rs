use crate::common::gate::GenerationGate;
use crate::config::settings::AppConfig;
use crate::infrastructure::pipeline::VideoPipeline;
use std::sync::Arc;

/// Process context built once at startup and shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub pipeline: Arc<dyn VideoPipeline>,
    pub gate: GenerationGate,
}

impl AppState {
    pub fn new(config: AppConfig, pipeline: Arc<dyn VideoPipeline>) -> Self {
        Self {
            config,
            pipeline,
            gate: GenerationGate::new(),
        }
    }
}
