pub mod health;
pub mod ui;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(ui::index_handler))
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyses", get(analysis::handle_list_analyses))
        // Session API
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/resume",
            put(session::handle_upload_resume).delete(session::handle_clear_resume),
        )
        .route(
            "/api/v1/sessions/:id/cover-letter",
            put(session::handle_upload_cover_letter).delete(session::handle_clear_cover_letter),
        )
        // Analysis API
        .route(
            "/api/v1/sessions/:id/analyses",
            post(analysis::handle_run_analysis),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
