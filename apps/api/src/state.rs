use std::sync::Arc;

use crate::config::Config;
use crate::generation::rewriter::ExperienceRewriter;
use crate::render::DocumentAssembler;
use crate::submissions::SubmissionLog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable rewriter. Default: GeminiRewriter.
    pub rewriter: Arc<dyn ExperienceRewriter>,
    /// `None` when no database is configured.
    pub submissions: Option<SubmissionLog>,
    pub assembler: Arc<DocumentAssembler>,
    pub config: Config,
}
