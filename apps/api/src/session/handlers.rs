use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::documents::cover_letter::{self, detect_format, CoverLetter};
use crate::errors::AppError;
use crate::session::{ResumeDocument, SessionStatus};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const COVER_LETTER_FIELD: &str = "cover_letter";

#[derive(Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Serialize)]
pub struct ResumeUploadResponse {
    pub file_name: String,
    pub page_count: usize,
    pub message: String,
}

#[derive(Serialize)]
pub struct CoverLetterUploadResponse {
    pub file_name: String,
    /// "text" or "pages"
    pub kind: &'static str,
    pub message: String,
}

/// A single file pulled out of a multipart body.
struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

/// Reads the named file field; other fields are skipped.
async fn read_file_field(multipart: &mut Multipart, name: &str) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(name) {
            continue;
        }
        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let bytes = field.bytes().await?;
        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }
    Err(AppError::MissingInput("No file uploaded".to_string()))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session = state.sessions.create().await;
    info!(session_id = %session.id, "Session created");
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.id,
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionStatus>, AppError> {
    Ok(Json(state.sessions.snapshot(id).await?.status()))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/resume
///
/// Renders every page of the uploaded PDF. The session only changes when
/// rendering succeeds; a failed upload keeps the previous resume.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    // Fail fast on unknown sessions before doing any rendering work.
    state.sessions.snapshot(id).await?;

    let upload = read_file_field(&mut multipart, RESUME_FIELD).await?;
    let file_name = upload.file_name.unwrap_or_else(|| "resume.pdf".to_string());

    let pages = state.rasterizer.render(upload.bytes).await?;
    let page_count = pages.len();

    state
        .sessions
        .update(id, |session| {
            session.resume = Some(ResumeDocument {
                file_name: file_name.clone(),
                pages,
            })
        })
        .await?;

    info!(session_id = %id, page_count, "Resume uploaded");
    Ok(Json(ResumeUploadResponse {
        file_name,
        page_count,
        message: "Resume Uploaded Successfully!".to_string(),
    }))
}

/// DELETE /api/v1/sessions/:id/resume
pub async fn handle_clear_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.update(id, |s| s.resume = None).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/cover-letter
pub async fn handle_upload_cover_letter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<CoverLetterUploadResponse>, AppError> {
    state.sessions.snapshot(id).await?;

    let upload = read_file_field(&mut multipart, COVER_LETTER_FIELD).await?;
    let format = detect_format(upload.file_name.as_deref(), upload.content_type.as_deref())
        .ok_or_else(|| {
            AppError::Validation(cover_letter::CoverLetterError::UnsupportedType.to_string())
        })?;
    let file_name = upload
        .file_name
        .unwrap_or_else(|| "cover_letter".to_string());

    let letter = cover_letter::ingest(
        file_name.clone(),
        format,
        upload.bytes,
        state.rasterizer.as_ref(),
    )
    .await?;

    let (kind, message) = match &letter {
        CoverLetter::Text { .. } => ("text", "Cover Letter Uploaded Successfully!".to_string()),
        CoverLetter::Pages { pages, .. } => (
            "pages",
            format!(
                "PDF cover letter has no selectable text. The model will read its {} page image(s). \
                 For best results, paste the text or upload a .txt file.",
                pages.len()
            ),
        ),
    };

    state
        .sessions
        .update(id, |session| session.cover_letter = Some(letter))
        .await?;

    info!(session_id = %id, kind, "Cover letter uploaded");
    Ok(Json(CoverLetterUploadResponse {
        file_name,
        kind,
        message,
    }))
}

/// DELETE /api/v1/sessions/:id/cover-letter
pub async fn handle_clear_cover_letter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.update(id, |s| s.cover_letter = None).await?;
    Ok(StatusCode::NO_CONTENT)
}
