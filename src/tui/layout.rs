//! Root layout: form pane, preview pane, status bar.

use ratatui::layout::{Constraint, Layout, Rect};

use super::events::Pane;

/// Below this terminal width only the focused pane is shown.
pub const SINGLE_PANE_THRESHOLD: u16 = 100;
/// Share of the width given to the form when both panes are visible.
pub const FORM_PERCENT: u16 = 45;

/// Computed layout regions for a single frame.
pub struct AppLayout {
    /// Form pane (None when hidden on a narrow terminal).
    pub form: Option<Rect>,
    /// Preview pane (None when hidden on a narrow terminal).
    pub preview: Option<Rect>,
    /// Status bar (bottom row).
    pub status: Rect,
}

impl AppLayout {
    pub fn compute(area: Rect, focus: Pane) -> Self {
        let rows = Layout::vertical([
            Constraint::Min(1),    // Panes
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        let content = rows[0];
        let status = rows[1];

        if area.width < SINGLE_PANE_THRESHOLD {
            return match focus {
                Pane::Form => AppLayout {
                    form: Some(content),
                    preview: None,
                    status,
                },
                Pane::Preview => AppLayout {
                    form: None,
                    preview: Some(content),
                    status,
                },
            };
        }

        let cols = Layout::horizontal([
            Constraint::Percentage(FORM_PERCENT),
            Constraint::Percentage(100 - FORM_PERCENT),
        ])
        .split(content);

        AppLayout {
            form: Some(cols[0]),
            preview: Some(cols[1]),
            status,
        }
    }
}
