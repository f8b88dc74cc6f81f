//! ICD code model
//!
//! This module holds the pieces that do not touch the database: the code
//! normalizer, the document types read from a source, and the in-memory
//! index built from them.
//!
//! # Usage
//!
//! ```rust
//! use icd_lookup::codes::{CodeDocument, CodeIndex, SpecificCode, normalize};
//! use std::collections::BTreeSet;
//!
//! let docs = vec![CodeDocument::new(
//!     "2024_E0800",
//!     vec![SpecificCode::Plain("E08.00".to_string())],
//! )];
//! let years = BTreeSet::from([2024]);
//! let index = CodeIndex::build(docs, &years);
//!
//! assert_eq!(normalize("e08 00"), "E08.00");
//! assert!(index.get("E08.00").is_some());
//! ```

mod index;
mod normalize;
mod types;

pub use index::{BuildStats, Classification, CodeIndex, IndexedDocument, classify};
pub use normalize::normalize;
pub use types::{CodeDocument, SpecificCode};
