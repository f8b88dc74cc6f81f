//! Where code documents come from
//!
//! The live source is a MongoDB collection. A JSON snapshot of the same
//! collection (`mongoexport` output, either a JSON array or one document per
//! line) works offline, and a plain `Vec<CodeDocument>` is a source too.

use mongodb::bson::{Bson, Document, doc};
use mongodb::sync::Client;
use serde_json::Value;
use std::{fs, path::PathBuf};
use tracing::{debug, info};

use crate::codes::CodeDocument;
use crate::config::Config;
use crate::error::LookupError;

/// A full scan of documents carrying `specific_codes`
pub trait CodeSource {
    fn scan(&self) -> Result<Vec<CodeDocument>, LookupError>;

    /// Short human readable description, used in log lines
    fn describe(&self) -> String;
}

impl CodeSource for Vec<CodeDocument> {
    fn scan(&self) -> Result<Vec<CodeDocument>, LookupError> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory documents", self.len())
    }
}

#[derive(Debug, Clone)]
pub struct MongoSource {
    pub uri: String,
    pub db_name: String,
    pub collection_name: String,
}

impl MongoSource {
    pub fn new(
        uri: impl Into<String>,
        db_name: impl Into<String>,
        collection_name: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            db_name: db_name.into(),
            collection_name: collection_name.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.mongo_uri.clone(),
            config.db_name.clone(),
            config.collection_name.clone(),
        )
    }

    fn unreachable(&self, source: mongodb::error::Error) -> LookupError {
        LookupError::Unreachable {
            uri: self.uri.clone(),
            source,
        }
    }
}

impl CodeSource for MongoSource {
    /// Connects, pings, scans, and drops the client before returning.
    /// Documents come back sorted by `_id` so index build is deterministic.
    fn scan(&self) -> Result<Vec<CodeDocument>, LookupError> {
        let client = Client::with_uri_str(&self.uri).map_err(|e| self.unreachable(e))?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .run()
            .map_err(|e| self.unreachable(e))?;

        debug!(uri = %self.uri, "connected");

        let collection = client
            .database(&self.db_name)
            .collection::<Document>(&self.collection_name);

        let cursor = collection
            .find(doc! { "specific_codes": { "$exists": true } })
            .projection(doc! { "_id": 1, "specific_codes": 1 })
            .sort(doc! { "_id": 1 })
            .run()?;

        let mut documents = Vec::new();
        for raw in cursor {
            if let Some(document) = document_from_bson(raw?) {
                documents.push(document);
            }
        }

        info!(
            source = %self.describe(),
            documents = documents.len(),
            "collection scanned"
        );

        Ok(documents)
    }

    fn describe(&self) -> String {
        format!("{}/{}.{}", self.uri, self.db_name, self.collection_name)
    }
}

/// Convert a raw collection document. Non-string `_id` values (ObjectId and
/// friends) come through as their extended JSON text.
fn document_from_bson(raw: Document) -> Option<CodeDocument> {
    CodeDocument::from_json(&Bson::Document(raw).into_relaxed_extjson())
}

/// A JSON export of the collection on disk
#[derive(Debug, Clone)]
pub struct JsonSnapshot {
    pub path: PathBuf,
}

impl JsonSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse(&self, content: &str) -> Result<Vec<Value>, LookupError> {
        let parse_err = |source: serde_json::Error| LookupError::SnapshotParse {
            path: self.path.clone(),
            source,
        };

        if content.trim_start().starts_with('[') {
            return serde_json::from_str(content).map_err(parse_err);
        }

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(parse_err))
            .collect()
    }
}

impl CodeSource for JsonSnapshot {
    fn scan(&self) -> Result<Vec<CodeDocument>, LookupError> {
        let content = fs::read_to_string(&self.path).map_err(|source| LookupError::SnapshotRead {
            path: self.path.clone(),
            source,
        })?;

        let documents: Vec<CodeDocument> = self
            .parse(&content)?
            .iter()
            .filter_map(CodeDocument::from_json)
            .collect();

        info!(
            source = %self.describe(),
            documents = documents.len(),
            "snapshot loaded"
        );

        Ok(documents)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
