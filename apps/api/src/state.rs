use std::sync::Arc;

use crate::config::Config;
use crate::documents::PdfRasterizer;
use crate::llm_client::GenerativeModel;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Gemini in production; swapped for a stub in router tests.
    pub llm: Arc<dyn GenerativeModel>,
    pub rasterizer: Arc<dyn PdfRasterizer>,
    pub config: Config,
}
