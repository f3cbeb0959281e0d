//! Uploaded documents: PDF rasterization into page images and cover-letter
//! classification. Nothing here interprets document content.

pub mod cover_letter;
pub mod rasterize;
#[cfg(test)]
pub(crate) mod test_pdf;

use bytes::Bytes;
use thiserror::Error;

use crate::llm_client::ContentPart;

pub use rasterize::{PdfRasterizer, PdftoppmRasterizer};

pub const JPEG_MIME: &str = "image/jpeg";
const PDF_MAGIC: &[u8] = b"%PDF-";

/// One rendered page, JPEG-encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    pub mime_type: &'static str,
    pub data: Bytes,
}

impl PageImage {
    pub fn jpeg(data: impl Into<Bytes>) -> Self {
        Self {
            mime_type: JPEG_MIME,
            data: data.into(),
        }
    }
}

impl From<&PageImage> for ContentPart {
    fn from(page: &PageImage) -> Self {
        ContentPart::InlineData {
            mime_type: page.mime_type.to_string(),
            data: page.data.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No file uploaded")]
    Empty,

    #[error("file is not a PDF document")]
    NotPdf,

    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("the document produced no pages")]
    NoPages,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejects empty uploads and anything without the `%PDF-` header.
/// Leading whitespace before the header is tolerated, as PDF readers do.
pub fn ensure_pdf(bytes: &[u8]) -> Result<(), RenderError> {
    if bytes.is_empty() {
        return Err(RenderError::Empty);
    }
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    if bytes[start..].starts_with(PDF_MAGIC) {
        Ok(())
    } else {
        Err(RenderError::NotPdf)
    }
}
