//! Colour theme for the lesson-plan TUI.
//!
//! Forest green and saffron on a slate background, all RGB truecolor.
//! Views import from here instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

// ── Primary palette ─────────────────────────────────────────────────────────

/// Forest green: focused borders, active rows.
pub const PRIMARY: Color = Color::Rgb(0x2E, 0x7D, 0x32);
/// Light green: hints and secondary focus.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x66, 0xBB, 0x6A);

// ── Accent ──────────────────────────────────────────────────────────────────

/// Saffron: titles and the generate button.
pub const ACCENT: Color = Color::Rgb(0xF9, 0xA8, 0x25);

// ── Backgrounds ─────────────────────────────────────────────────────────────

pub const BG_BASE: Color = Color::Rgb(0x1B, 0x1F, 0x24);

// ── Text ────────────────────────────────────────────────────────────────────

pub const TEXT: Color = Color::Rgb(0xE8, 0xE6, 0xE3);
/// Secondary labels.
pub const TEXT_MUTED: Color = Color::Rgb(0x8A, 0x8F, 0x98);
/// Placeholders, disabled rows.
pub const TEXT_DIM: Color = Color::Rgb(0x55, 0x5B, 0x63);

// ── Semantic ────────────────────────────────────────────────────────────────

pub const ERROR: Color = Color::Rgb(0xE5, 0x39, 0x35);
pub const SUCCESS: Color = Color::Rgb(0x43, 0xA0, 0x47);
pub const WARNING: Color = Color::Rgb(0xFB, 0x8C, 0x00);
pub const INFO: Color = Color::Rgb(0x1E, 0x88, 0xE5);

// ── Domain ──────────────────────────────────────────────────────────────────

/// Text filled in by the curriculum prefill.
pub const SUGGESTED: Color = Color::Rgb(0x80, 0xCB, 0xC4);

// ── Style helpers ───────────────────────────────────────────────────────────

pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Section header style.
pub fn heading() -> Style {
    Style::default().fg(PRIMARY_LIGHT).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Row under the cursor.
pub fn highlight() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key hint style (e.g., "g:buat").
pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Edit mode badge.
pub fn insert_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(PRIMARY_LIGHT)
        .add_modifier(Modifier::BOLD)
}

/// A selected pedagogy or dimension chip.
pub fn chip_on() -> Style {
    Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD)
}

// ── Block builders ──────────────────────────────────────────────────────────

pub fn block_focused(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_focused())
}

pub fn block_default(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_default())
}

/// Focused or default block depending on `focused`.
pub fn pane_block(title: &str, focused: bool) -> Block<'_> {
    if focused {
        block_focused(title)
    } else {
        block_default(title)
    }
}
