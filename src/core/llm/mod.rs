//! Generative Model Client Module
//!
//! Thin layer over the remote generative model service:
//!
//! - `provider`: the `GenerativeBackend` trait the rest of the crate depends on
//! - `types`: request/response value types shared by all backends
//! - `error`: transport and protocol errors
//! - `providers`: concrete backends (Google Generative Language API)

pub mod error;
pub mod provider;
pub mod providers;
pub mod types;

pub use error::{LLMError, Result};
pub use provider::GenerativeBackend;
pub use providers::GoogleProvider;
pub use types::{ImageData, ImageRequest, StructuredRequest};

#[cfg(test)]
pub use provider::MockGenerativeBackend;
