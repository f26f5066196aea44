/// Generator RPM - AI-assisted lesson plan builder (TUI Edition)
///
/// Core library providing the lesson-plan form state, Gemini-backed content
/// generation, curriculum autosuggestion, and printable document export for
/// elementary-school teachers working with Kurikulum Merdeka.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
