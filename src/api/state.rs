//! Application state shared across handlers

use std::sync::Arc;

use crate::domain::pipeline::WorkflowPipeline;

/// Shared state: the pipeline plus wiring facts the health surface reports
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<WorkflowPipeline>,
    /// Whether the generator provider has credentials configured; checked
    /// at wiring time so readiness does not spend generator tokens
    pub generator_configured: bool,
}

impl AppState {
    pub fn new(pipeline: Arc<WorkflowPipeline>, generator_configured: bool) -> Self {
        Self {
            pipeline,
            generator_configured,
        }
    }
}
