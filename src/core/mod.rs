pub mod credentials;
pub mod document;
pub mod lesson;
pub mod llm;
pub mod logging;
