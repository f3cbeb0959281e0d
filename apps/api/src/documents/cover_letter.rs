//! Cover-letter uploads. Plain text is kept as-is; PDFs are reduced to their
//! text layer when they have one and rasterized otherwise, so the model can
//! still read scanned letters from the page images.

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

use super::{ensure_pdf, PageImage, PdfRasterizer, RenderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverLetterFormat {
    Pdf,
    Text,
}

/// Stored cover letter.
#[derive(Debug, Clone, PartialEq)]
pub enum CoverLetter {
    Text { file_name: String, text: String },
    Pages { file_name: String, pages: Vec<PageImage> },
}

impl CoverLetter {
    pub fn file_name(&self) -> &str {
        match self {
            CoverLetter::Text { file_name, .. } | CoverLetter::Pages { file_name, .. } => file_name,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            CoverLetter::Text { text, .. } => Some(text),
            CoverLetter::Pages { .. } => None,
        }
    }

    pub fn pages(&self) -> &[PageImage] {
        match self {
            CoverLetter::Text { .. } => &[],
            CoverLetter::Pages { pages, .. } => pages,
        }
    }
}

#[derive(Debug, Error)]
pub enum CoverLetterError {
    #[error("Cover letter must be a PDF or plain text (.txt) file")]
    UnsupportedType,

    #[error("Text cover letter is not valid UTF-8")]
    NotUtf8,

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Decides the format from the declared content type, falling back to the
/// file extension when the browser sends a generic type.
pub fn detect_format(file_name: Option<&str>, content_type: Option<&str>) -> Option<CoverLetterFormat> {
    let content_type = content_type
        .map(|c| c.split(';').next().unwrap_or(c).trim().to_ascii_lowercase());
    match content_type.as_deref() {
        Some("application/pdf") => return Some(CoverLetterFormat::Pdf),
        Some("text/plain") => return Some(CoverLetterFormat::Text),
        _ => {}
    }

    let extension = file_name
        .and_then(|n| n.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => Some(CoverLetterFormat::Pdf),
        Some("txt") => Some(CoverLetterFormat::Text),
        _ => None,
    }
}

/// Turns an uploaded file into a stored cover letter.
pub async fn ingest(
    file_name: String,
    format: CoverLetterFormat,
    bytes: Bytes,
    rasterizer: &dyn PdfRasterizer,
) -> Result<CoverLetter, CoverLetterError> {
    if bytes.is_empty() {
        return Err(RenderError::Empty.into());
    }

    match format {
        CoverLetterFormat::Text => {
            let text = String::from_utf8(bytes.to_vec()).map_err(|_| CoverLetterError::NotUtf8)?;
            Ok(CoverLetter::Text { file_name, text })
        }
        CoverLetterFormat::Pdf => {
            ensure_pdf(&bytes)?;
            if let Some(text) = extract_pdf_text(bytes.clone()).await {
                info!("Extracted {} chars of text from cover letter PDF", text.len());
                return Ok(CoverLetter::Text { file_name, text });
            }
            let pages = rasterizer.render(bytes).await?;
            info!(
                "Cover letter PDF has no text layer; kept {} page image(s)",
                pages.len()
            );
            Ok(CoverLetter::Pages { file_name, pages })
        }
    }
}

/// Returns `None` when the PDF has no usable text layer or the extractor fails.
async fn extract_pdf_text(bytes: Bytes) -> Option<String> {
    let result = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| e.to_string())
    })
    .await;

    let text = match result {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("PDF text extraction failed: {e}");
            return None;
        }
        Err(e) => {
            warn!("PDF text extraction aborted: {e}");
            return None;
        }
    };

    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
