use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Cannot reach data source at '{uri}': {source}")]
    Unreachable {
        uri: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("Collection scan failed: {0}")]
    Query(#[from] mongodb::error::Error),

    #[error("Failed to read snapshot {}: {source}", path.display())]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse snapshot {}: {source}", path.display())]
    SnapshotParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("ICD code '{raw}' (normalized: '{normalized}') not found in the database")]
    CodeNotFound { raw: String, normalized: String },
}
