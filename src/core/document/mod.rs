//! Document rendering and export

pub mod export;
pub mod render;

pub use export::{
    export_filename, standalone_page, word_document, ExportError, ExportFormat, Exporter,
    PageSetup, PdfRenderer, WkhtmltopdfRenderer,
};
pub use render::{escape_html, format_date_id, DocumentRenderer, RenderedDocument};
