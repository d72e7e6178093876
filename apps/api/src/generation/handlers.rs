//! Axum route handlers for the Resume API.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::errors::AppError;
use crate::generation::generator::{
    generate_draft, render_draft, DraftHandle, GenerateRequest, RenderRequest,
};
use crate::render::{ATTACHMENT_DISPOSITION, MIME_TYPE};
use crate::state::AppState;

/// POST /api/v1/resumes/generate
///
/// Validates input, logs the submission in the background, and returns the
/// AI-rewritten experience inside a `DraftHandle`.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<DraftHandle>, AppError> {
    let handle = generate_draft(
        state.rewriter.as_ref(),
        state.submissions.as_ref(),
        state.config.gemini_api_key.as_deref(),
        request,
    )
    .await?;

    Ok(Json(handle))
}

/// POST /api/v1/resumes/render
///
/// Renders a (possibly edited) draft and returns it as a `Resume.pdf` download.
pub async fn handle_render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    let assembler = state.assembler.clone();
    let document = tokio::task::spawn_blocking(move || render_draft(&assembler, &request))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Render task failed: {e}")))??;

    Ok((
        [
            (header::CONTENT_TYPE, MIME_TYPE),
            (header::CONTENT_DISPOSITION, ATTACHMENT_DISPOSITION),
        ],
        document.bytes,
    )
        .into_response())
}
