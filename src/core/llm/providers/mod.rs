//! Generative backend implementations

pub mod google;

pub use google::GoogleProvider;
