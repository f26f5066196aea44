//! Crate-level tests
//!
//! - `common`: fixtures and stub implementations shared by unit and integration tests
//! - `integration`: multi-module flows (HTTP backend, form lifecycle, export)
//! - `property`: proptest invariants

pub(crate) mod common;
mod integration;
mod property;
