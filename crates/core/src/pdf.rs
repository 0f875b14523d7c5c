//! First-page PDF rasterization.
//!
//! The display only shows images, so every uploaded PDF gets a PNG preview
//! of its first page. Rendering is delegated to poppler's `pdftoppm`.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;

/// Default rasterizer binary.
pub const DEFAULT_PROGRAM: &str = "pdftoppm";

/// Default wall-clock limit for one conversion.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Error type for PDF rasterization.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("PDF file not found: {0}")]
    SourceNotFound(String),

    #[error("failed to start rasterizer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("rasterizer failed (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("rasterizer timed out after {0:?}")]
    Timeout(Duration),

    #[error("converted image not found for prefix '{0}'")]
    OutputMissing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders the first page of a PDF to a PNG file.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    /// Render page 1 of `pdf_path` to `output_path` and return that path.
    async fn rasterize_first_page(
        &self,
        pdf_path: &Path,
        output_path: &Path,
    ) -> Result<PathBuf, PdfError>;
}

/// [`PageRasterizer`] backed by poppler's `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PopplerRasterizer {
    program: String,
    timeout: Duration,
}

impl Default for PopplerRasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, DEFAULT_TIMEOUT)
    }
}

impl PopplerRasterizer {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl PageRasterizer for PopplerRasterizer {
    async fn rasterize_first_page(
        &self,
        pdf_path: &Path,
        output_path: &Path,
    ) -> Result<PathBuf, PdfError> {
        if !tokio::fs::try_exists(pdf_path).await.unwrap_or(false) {
            return Err(PdfError::SourceNotFound(
                pdf_path.to_string_lossy().to_string(),
            ));
        }

        let out_dir = output_path.parent().unwrap_or(Path::new("."));
        let prefix = output_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "page".to_string());
        tokio::fs::create_dir_all(out_dir).await?;

        // `pdftoppm` appends the page number to the prefix itself
        // (`<prefix>-1.png` or `<prefix>-01.png` depending on page count).
        let child = tokio::process::Command::new(&self.program)
            .args(["-png", "-f", "1", "-l", "1"])
            .arg(pdf_path)
            .arg(out_dir.join(&prefix))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| PdfError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // On timeout the future owning `child` is dropped, which kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| PdfError::Timeout(self.timeout))??;

        if !output.status.success() {
            return Err(PdfError::ExecutionFailed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let produced = locate_output(out_dir, &prefix, output_path).await?;
        if produced != output_path {
            tokio::fs::rename(&produced, output_path).await?;
        }

        tracing::debug!(
            pdf = %pdf_path.display(),
            output = %output_path.display(),
            "Rasterized first PDF page"
        );
        Ok(output_path.to_path_buf())
    }
}

/// Find the PNG the rasterizer produced for `prefix` inside `dir`.
async fn locate_output(dir: &Path, prefix: &str, canonical: &Path) -> Result<PathBuf, PdfError> {
    let mut candidates = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        if is_page_output(&name, prefix) {
            candidates.push(entry.path());
        }
    }
    candidates.sort();

    // Prefer freshly produced page files over a canonical file left behind.
    candidates
        .iter()
        .find(|p| p.as_path() != canonical)
        .or_else(|| candidates.first())
        .cloned()
        .ok_or_else(|| PdfError::OutputMissing(prefix.to_string()))
}

/// Whether `name` is `<prefix>.png` or `<prefix>-<digits>.png`.
fn is_page_output(name: &str, prefix: &str) -> bool {
    let Some(rest) = name
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(".png"))
    else {
        return false;
    };
    match rest.strip_prefix('-') {
        Some(page) => !page.is_empty() && page.chars().all(|c| c.is_ascii_digit()),
        None => rest.is_empty(),
    }
}

/// Name of the preview generated for a stored upload: `<stem>_page1.png`.
pub fn converted_filename(stored_filename: &str) -> String {
    let stem = Path::new(stored_filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| stored_filename.to_string());
    format!("{stem}_page1.png")
}
