//! Common Test Utilities
//!
//! Shared fixtures (`fixtures`) and hand-written stand-ins for the AI
//! gateway and the PDF rasteriser (`stubs`).

pub mod fixtures;
pub mod stubs;

pub use fixtures::*;
pub use stubs::*;
