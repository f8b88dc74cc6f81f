//! icd-lookup - ICD specific-code lookup
//!
//! Builds an in-memory index of ICD code documents for selected years and
//! answers "which specific codes belong to this code" queries.

pub mod codes;
pub mod config;
pub mod error;
pub mod service;
pub mod source;

// Re-export commonly used types
pub use codes::{CodeDocument, SpecificCode, normalize};
pub use config::Config;
pub use error::LookupError;
pub use service::CodeLookupService;
pub use source::{CodeSource, JsonSnapshot, MongoSource};
