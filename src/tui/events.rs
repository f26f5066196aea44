use std::path::PathBuf;

use crate::core::document::ExportFormat;
use crate::core::lesson::SubmitOutcome;

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for the spinner and notification TTLs.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A resolved action to execute.
    Action(Action),
    /// A background `submit` returned.
    GenerationFinished(SubmitOutcome),
    /// A background export returned; the error is already user-facing text.
    ExportFinished {
        format: ExportFormat,
        result: Result<PathBuf, String>,
    },
    /// Notification to display to the user.
    Notification(Notification),
    /// Request to quit the application.
    Quit,
}

/// High-level actions dispatched by the input mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    PaneNext,
    PanePrev,

    // Lesson plan
    Generate,
    Export(ExportFormat),

    // Modals
    ShowHelp,
    CloseHelp,
    /// Drop notifications and the generation error
    Dismiss,

    // Application
    Quit,
}

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Form,
    Preview,
}

impl Pane {
    pub const ALL: [Pane; 2] = [Pane::Form, Pane::Preview];

    pub fn label(self) -> &'static str {
        match self {
            Pane::Form => "Formulir",
            Pane::Preview => "Pratinjau",
        }
    }

    pub fn next(self) -> Pane {
        let idx = Pane::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Pane::ALL[(idx + 1) % Pane::ALL.len()]
    }

    pub fn prev(self) -> Pane {
        let idx = Pane::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Pane::ALL[(idx + Pane::ALL.len() - 1) % Pane::ALL.len()]
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}
