//! Document exporters
//!
//! Word-compatible `.doc` (HTML with Office namespaces), PDF through an
//! external HTML rasteriser, and print through the host browser.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

use super::render::{escape_html, RenderedDocument};
use crate::config::ExportConfig;
use crate::core::lesson::LessonPlanRequest;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("PDF tool not found: {0}")]
    PdfToolMissing(String),

    #[error("PDF tool failed ({status}): {stderr}")]
    PdfToolFailed { status: String, stderr: String },

    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Page geometry in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSetup {
    pub width_mm: u32,
    pub height_mm: u32,
    pub margin_mm: u32,
}

impl PageSetup {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            width_mm: config.page_width_mm,
            height_mm: config.page_height_mm,
            margin_mm: config.margin_mm,
        }
    }

    fn css_rule(&self) -> String {
        format!(
            "@page {{ size: {}mm {}mm; margin: {}mm; }}",
            self.width_mm, self.height_mm, self.margin_mm
        )
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Word,
    Pdf,
    Print,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Word => "doc",
            Self::Pdf => "pdf",
            Self::Print => "html",
        }
    }
}

/// `RPM_2025_<subject>_<material>.<ext>` with whitespace runs in the material
/// collapsed to `_` and path separators removed.
pub fn export_filename(subject: &str, material: &str, format: ExportFormat) -> String {
    let material = material.split_whitespace().collect::<Vec<_>>().join("_");
    let name = format!("RPM_2025_{}_{}", subject.trim(), material);
    let safe: String = name
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '\0'))
        .collect();
    format!("{}.{}", safe, format.extension())
}

const PRINT_CSS: &str = "\
body { font-family: 'Times New Roman', serif; font-size: 10pt; line-height: 1.15; }
table { border-collapse: collapse; width: 100%; border: 1pt solid black; margin-bottom: 10pt; }
td, th { border: 1pt solid black; padding: 4pt; vertical-align: top; text-align: justify; font-size: 10pt; }
.doc-title { text-align: center; text-decoration: underline; text-transform: uppercase; }
.table-header-pink { background-color: #fce4ec; font-weight: bold; text-align: center; }
.label { width: 33%; font-weight: bold; background-color: #f9fafb; }
.meeting-header { text-align: center; font-weight: bold; background-color: #e2e8f0; }
.step-type { font-style: italic; font-weight: normal; font-size: 9pt; }
.subsection { border-bottom: 2pt solid black; text-transform: uppercase; }
.borderless, .borderless td { border: none; }
.caption { font-size: 8pt; font-style: italic; }
.signature { text-align: center; width: 50%; }
.signature p { margin: 0; }
.signature-space { height: 60pt; }
.signer { font-weight: bold; text-decoration: underline; text-transform: uppercase; }
.part-header { text-align: center; border-bottom: 3pt double black; }
.question { font-weight: bold; }
.option-key { width: 20pt; font-weight: bold; }
.answer-grid td { text-align: center; width: 20%; }
.font-bold { font-weight: bold; }
.whitespace-pre-line { white-space: pre-line; }
.page-break { page-break-before: always; }
";

/// Word-compatible document: UTF-8 BOM followed by Office-namespaced HTML.
pub fn word_document(doc: &RenderedDocument, page: &PageSetup) -> Vec<u8> {
    let html = format!(
        "<html xmlns:o='urn:schemas-microsoft-com:office:office' xmlns:w='urn:schemas-microsoft-com:office:word' xmlns='http://www.w3.org/TR/REC-html40'>\n\
         <head>\n<meta charset='utf-8'>\n<title>{title}</title>\n<style>\n{page}\n{css}</style>\n</head>\n\
         <body>\n{body}</body>\n</html>\n",
        title = escape_html(&doc.title),
        page = page.css_rule(),
        css = PRINT_CSS,
        body = doc.body_html,
    );
    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + html.len());
    bytes.extend_from_slice(UTF8_BOM);
    bytes.extend_from_slice(html.as_bytes());
    bytes
}

/// Standalone HTML page. With `auto_print` the browser print dialog opens on load.
pub fn standalone_page(doc: &RenderedDocument, page: &PageSetup, auto_print: bool) -> String {
    let script = if auto_print {
        "<script>window.addEventListener('load', function () { window.print(); });</script>\n"
    } else {
        ""
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"id\">\n<head>\n<meta charset=\"UTF-8\">\n<title>{title}</title>\n<style>\n{page}\n{css}</style>\n{script}</head>\n<body>\n<div id=\"rpm-print-area\">\n{body}</div>\n</body>\n</html>\n",
        title = escape_html(&doc.title),
        page = page.css_rule(),
        css = PRINT_CSS,
        script = script,
        body = doc.body_html,
    )
}

// ============================================================================
// PDF
// ============================================================================

/// HTML to PDF conversion.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_pdf(&self, html_path: &Path, output: &Path, page: &PageSetup) -> Result<()>;

    /// Whether the conversion tool can run on this host.
    fn is_available(&self) -> bool {
        true
    }
}

/// `wkhtmltopdf` (or a compatible CLI) located on `PATH`.
pub struct WkhtmltopdfRenderer {
    command: String,
}

impl WkhtmltopdfRenderer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn args(html_path: &Path, output: &Path, page: &PageSetup) -> Vec<String> {
        let margin = format!("{}mm", page.margin_mm);
        vec![
            "--quiet".to_string(),
            "--encoding".to_string(),
            "utf-8".to_string(),
            "--enable-local-file-access".to_string(),
            "--page-width".to_string(),
            format!("{}mm", page.width_mm),
            "--page-height".to_string(),
            format!("{}mm", page.height_mm),
            "--margin-top".to_string(),
            margin.clone(),
            "--margin-bottom".to_string(),
            margin.clone(),
            "--margin-left".to_string(),
            margin.clone(),
            "--margin-right".to_string(),
            margin,
            html_path.display().to_string(),
            output.display().to_string(),
        ]
    }
}

#[async_trait]
impl PdfRenderer for WkhtmltopdfRenderer {
    fn is_available(&self) -> bool {
        which::which(&self.command).is_ok()
    }

    async fn render_pdf(&self, html_path: &Path, output: &Path, page: &PageSetup) -> Result<()> {
        let binary = which::which(&self.command)
            .map_err(|_| ExportError::PdfToolMissing(self.command.clone()))?;

        let result = Command::new(binary)
            .args(Self::args(html_path, output, page))
            .output()
            .await?;

        if !result.status.success() {
            return Err(ExportError::PdfToolFailed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Exporter
// ============================================================================

type Opener = Arc<dyn Fn(&Path) -> io::Result<()> + Send + Sync>;

/// Writes exports into one output directory.
pub struct Exporter {
    output_dir: PathBuf,
    page: PageSetup,
    pdf: Arc<dyn PdfRenderer>,
    opener: Opener,
}

impl Exporter {
    pub fn new(output_dir: PathBuf, page: PageSetup, pdf: Arc<dyn PdfRenderer>) -> Self {
        Self {
            output_dir,
            page,
            pdf,
            opener: Arc::new(|path: &Path| open::that(path)),
        }
    }

    pub fn from_config(output_dir: PathBuf, config: &ExportConfig) -> Self {
        Self::new(
            output_dir,
            PageSetup::from_config(config),
            Arc::new(WkhtmltopdfRenderer::new(config.pdf_command.clone())),
        )
    }

    /// Replace how files are handed to the host (browser, viewer).
    pub fn with_opener(mut self, opener: impl Fn(&Path) -> io::Result<()> + Send + Sync + 'static) -> Self {
        self.opener = Arc::new(opener);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn pdf_available(&self) -> bool {
        self.pdf.is_available()
    }

    async fn target(&self, request: &LessonPlanRequest, format: ExportFormat) -> io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        Ok(self
            .output_dir
            .join(export_filename(&request.subject, &request.material, format)))
    }

    pub async fn export_word(&self, request: &LessonPlanRequest, doc: &RenderedDocument) -> Result<PathBuf> {
        let path = self.target(request, ExportFormat::Word).await?;
        tokio::fs::write(&path, word_document(doc, &self.page)).await?;
        log::info!("Exported Word document to {}", path.display());
        Ok(path)
    }

    pub async fn export_pdf(&self, request: &LessonPlanRequest, doc: &RenderedDocument) -> Result<PathBuf> {
        let path = self.target(request, ExportFormat::Pdf).await?;
        let staging = path.with_extension("pdf-source.html");
        tokio::fs::write(&staging, standalone_page(doc, &self.page, false)).await?;

        let result = self.pdf.render_pdf(&staging, &path, &self.page).await;
        if let Err(e) = tokio::fs::remove_file(&staging).await {
            log::debug!("Could not remove {}: {e}", staging.display());
        }
        result?;

        log::info!("Exported PDF to {}", path.display());
        Ok(path)
    }

    /// Write a self-printing page and open it in the host browser.
    pub async fn print(&self, request: &LessonPlanRequest, doc: &RenderedDocument) -> Result<PathBuf> {
        let path = self.target(request, ExportFormat::Print).await?;
        tokio::fs::write(&path, standalone_page(doc, &self.page, true)).await?;
        (self.opener)(&path).map_err(|source| ExportError::Open {
            path: path.clone(),
            source,
        })?;
        log::info!("Opened print view {}", path.display());
        Ok(path)
    }
}
