//! Terminal front end: a two-pane form and preview driven by an Elm-style loop.

pub mod app;
pub mod events;
pub mod layout;
pub mod theme;
pub mod views;
pub mod widgets;

pub use app::AppState;
