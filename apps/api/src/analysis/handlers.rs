//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::assemble::{build_parts, FormInputs};
use crate::analysis::{catalogue, AnalysisDescriptor, AnalysisKind};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub analysis: AnalysisKind,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub cover_letter_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: AnalysisKind,
    pub title: &'static str,
    pub text: String,
    pub model: String,
}

/// GET /api/v1/analyses
pub async fn handle_list_analyses() -> Json<Vec<AnalysisDescriptor>> {
    Json(catalogue())
}

/// POST /api/v1/sessions/:id/analyses
///
/// Makes exactly one model call. The session is read, never modified.
pub async fn handle_run_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let session = state.sessions.snapshot(id).await?;

    let parts = build_parts(
        request.analysis,
        &session,
        FormInputs {
            job_description: &request.job_description,
            cover_letter_text: &request.cover_letter_text,
        },
    )?;

    info!(
        session_id = %id,
        analysis = ?request.analysis,
        images = parts.iter().filter(|p| p.is_image()).count(),
        "{}",
        request.analysis.progress_message()
    );

    let text = state.llm.generate(&parts).await?;

    Ok(Json(AnalysisResponse {
        analysis: request.analysis,
        title: request.analysis.title(),
        text,
        model: state.llm.model_name().to_string(),
    }))
}
