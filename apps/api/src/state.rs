use std::sync::Arc;

use crate::advising::engine::Recommender;
use crate::advising::prerequisites::PrerequisiteGraph;
use crate::config::Config;
use crate::transcript::parser::CourseRecordParser;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub graph: Arc<PrerequisiteGraph>,
    pub parser: Arc<CourseRecordParser>,
    /// Pluggable recommendation rules. Default: PrerequisiteRecommender.
    pub recommender: Arc<dyn Recommender>,
}
