use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::process::Command;
use tracing::{debug, info};

use super::{ensure_pdf, PageImage, RenderError};

const OUTPUT_PREFIX: &str = "page";

/// Converts a PDF into one image per page, in page order.
///
/// Carried in `AppState` as `Arc<dyn PdfRasterizer>`.
#[async_trait]
pub trait PdfRasterizer: Send + Sync {
    async fn render(&self, pdf: Bytes) -> Result<Vec<PageImage>, RenderError>;
}

/// Rasterizes with poppler's `pdftoppm`, writing JPEG pages into a
/// temporary directory that is removed when rendering finishes.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    program: String,
    dpi: u32,
}

impl PdftoppmRasterizer {
    pub fn new(program: impl Into<String>, dpi: u32) -> Self {
        Self {
            program: program.into(),
            dpi,
        }
    }
}

#[async_trait]
impl PdfRasterizer for PdftoppmRasterizer {
    async fn render(&self, pdf: Bytes) -> Result<Vec<PageImage>, RenderError> {
        ensure_pdf(&pdf)?;

        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("input.pdf");
        tokio::fs::write(&input, &pdf).await?;
        let output_root = workdir.path().join(OUTPUT_PREFIX);

        debug!(
            "Running {} at {} dpi on {} bytes",
            self.program,
            self.dpi,
            pdf.len()
        );

        let output = Command::new(&self.program)
            .arg("-jpeg")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(&input)
            .arg(&output_root)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RenderError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let files = collect_page_files(workdir.path()).await?;
        if files.is_empty() {
            return Err(RenderError::NoPages);
        }

        let mut pages = Vec::with_capacity(files.len());
        for (_, path) in files {
            pages.push(PageImage::jpeg(tokio::fs::read(&path).await?));
        }

        info!("Rendered PDF into {} page image(s)", pages.len());
        Ok(pages)
    }
}

/// Finds `page-N.jpg` files and orders them by page number. pdftoppm pads
/// the number to the width of the page count, so names alone don't sort.
async fn collect_page_files(dir: &Path) -> Result<Vec<(u32, PathBuf)>, RenderError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if let Some(number) = page_number(&path) {
            files.push((number, path));
        }
    }

    files.sort_by_key(|(number, _)| *number);
    Ok(files)
}

fn page_number(path: &Path) -> Option<u32> {
    if path.extension()?.to_str()? != "jpg" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let (prefix, number) = stem.rsplit_once('-')?;
    if prefix != OUTPUT_PREFIX {
        return None;
    }
    number.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::test_pdf;

    #[test]
    fn test_page_number_parses_padded_names() {
        assert_eq!(page_number(Path::new("/tmp/x/page-1.jpg")), Some(1));
        assert_eq!(page_number(Path::new("/tmp/x/page-012.jpg")), Some(12));
        assert_eq!(page_number(Path::new("/tmp/x/input.pdf")), None);
        assert_eq!(page_number(Path::new("/tmp/x/other-1.jpg")), None);
    }

    #[tokio::test]
    async fn test_collect_orders_by_page_number() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["page-10.jpg", "page-2.jpg", "page-1.jpg", "input.pdf"] {
            std::fs::write(dir.path().join(name), name).unwrap();
        }
        let files = collect_page_files(dir.path()).await.unwrap();
        let numbers: Vec<u32> = files.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![1, 2, 10]);
    }

    #[tokio::test]
    async fn test_rejects_non_pdf_before_spawning() {
        let rasterizer = PdftoppmRasterizer::new("definitely-not-a-real-binary", 72);
        let err = rasterizer
            .render(Bytes::from_static(b"plain text"))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::NotPdf));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let rasterizer = PdftoppmRasterizer::new("definitely-not-a-real-binary", 72);
        let err = rasterizer.render(Bytes::from(test_pdf::blank(1))).await.unwrap_err();
        assert!(matches!(err, RenderError::Spawn { .. }));
    }

    #[tokio::test]
    #[ignore = "needs poppler's pdftoppm on PATH; run with --ignored"]
    async fn test_renders_one_image_per_page() {
        let rasterizer = PdftoppmRasterizer::new("pdftoppm", 36);
        let pages = rasterizer.render(Bytes::from(test_pdf::blank(3))).await.unwrap();
        assert_eq!(pages.len(), 3);
        for page in &pages {
            assert_eq!(page.mime_type, "image/jpeg");
            assert!(page.data.starts_with(&[0xff, 0xd8]), "not a JPEG");
        }
    }
}
