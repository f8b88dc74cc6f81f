use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::codes::{BuildStats, CodeIndex, normalize};
use crate::config::Config;
use crate::error::LookupError;
use crate::source::{CodeSource, JsonSnapshot, MongoSource};

/// Specific-code lookup over an index built once at construction
#[derive(Debug)]
pub struct CodeLookupService {
    index: CodeIndex,
    years: BTreeSet<i32>,
}

impl CodeLookupService {
    /// Build from the configured source: the JSON snapshot when one is set,
    /// MongoDB otherwise. Fails fast when the source cannot be reached.
    pub fn connect(config: &Config) -> Result<Self, LookupError> {
        let years: BTreeSet<i32> = config.years.iter().copied().collect();

        match &config.snapshot {
            Some(path) => Self::from_source(&JsonSnapshot::new(path), years),
            None => Self::from_source(&MongoSource::from_config(config), years),
        }
    }

    pub fn from_source(source: &dyn CodeSource, years: BTreeSet<i32>) -> Result<Self, LookupError> {
        if years.is_empty() {
            warn!("no years selected, the index will be empty");
        }

        let documents = source.scan()?;
        let index = CodeIndex::build(documents, &years);

        info!(
            source = %source.describe(),
            ?years,
            codes = index.len(),
            "lookup service ready"
        );

        Ok(Self { index, years })
    }

    pub fn normalize(&self, raw: &str) -> String {
        normalize(raw)
    }

    /// Specific codes for `raw`, or `CodeNotFound` naming both the raw and
    /// normalized forms.
    pub fn find(&self, raw: &str) -> Result<BTreeSet<String>, LookupError> {
        let normalized = normalize(raw);

        match self.index.get(&normalized) {
            Some(document) => Ok(document.codes()),
            None => Err(LookupError::CodeNotFound {
                raw: raw.to_string(),
                normalized,
            }),
        }
    }

    /// Like [`find`](Self::find), but a miss is logged and yields an empty set
    pub fn lookup(&self, raw: &str) -> BTreeSet<String> {
        self.find(raw).unwrap_or_else(|e| {
            warn!("{}", e);
            BTreeSet::new()
        })
    }

    pub fn index(&self) -> &CodeIndex {
        &self.index
    }

    pub fn stats(&self) -> &BuildStats {
        self.index.stats()
    }

    pub fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{CodeDocument, SpecificCode};

    fn set(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    fn service(years: &[i32]) -> CodeLookupService {
        let docs = vec![
            CodeDocument::new("2022_A01", vec![SpecificCode::Plain("X0".to_string())]),
            CodeDocument::new("2023_A02", vec![SpecificCode::Plain("X3".to_string())]),
            CodeDocument::new(
                "2024_A03",
                vec![
                    SpecificCode::Plain("X1".to_string()),
                    SpecificCode::Object {
                        code: Some("X2".to_string()),
                    },
                    SpecificCode::Object { code: None },
                ],
            ),
            CodeDocument::new(
                "2024_E0800",
                vec![SpecificCode::Plain("E08.00".to_string())],
            ),
        ];
        CodeLookupService::from_source(&docs, years.iter().copied().collect()).unwrap()
    }

    #[test]
    fn test_lookup_union_of_shapes() {
        let service = service(&[2024]);
        assert_eq!(service.lookup("A03"), set(&["X1", "X2"]));
    }

    #[test]
    fn test_lookup_normalizes_input() {
        let service = service(&[2024]);
        assert_eq!(service.lookup("e08 00"), set(&["E08.00"]));
        assert_eq!(service.lookup("E08.00"), set(&["E08.00"]));
    }

    #[test]
    fn test_years_filter() {
        let service = service(&[2023, 2024]);
        assert_eq!(service.index().codes(), vec!["A02", "A03", "E08.00"]);
        assert!(service.lookup("A01").is_empty());
    }

    #[test]
    fn test_miss_returns_empty_set() {
        let service = service(&[2024]);
        assert!(service.lookup("Z99.9").is_empty());

        let diagnostic = service.find("z 999").unwrap_err().to_string();
        assert!(diagnostic.contains("'z 999'"), "got {}", diagnostic);
        assert!(diagnostic.contains("'Z99.9'"), "got {}", diagnostic);
    }

    #[test]
    fn test_find_reports_both_forms() {
        let service = service(&[2024]);
        match service.find("z999") {
            Err(LookupError::CodeNotFound { raw, normalized }) => {
                assert_eq!(raw, "z999");
                assert_eq!(normalized, "Z99.9");
            }
            other => panic!("expected CodeNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_years() {
        let service = service(&[]);
        assert!(service.index().is_empty());
        assert_eq!(service.stats().year_not_selected, 4);
    }

    #[test]
    fn test_source_error_propagates() {
        let snapshot = JsonSnapshot::new("/nonexistent/snapshot.json");
        let result = CodeLookupService::from_source(&snapshot, BTreeSet::from([2024]));
        assert!(matches!(result, Err(LookupError::SnapshotRead { .. })));
    }

    #[test]
    fn test_connect_uses_snapshot() {
        let config = Config {
            snapshot: Some("/nonexistent/snapshot.json".into()),
            ..Config::default()
        };
        assert!(matches!(
            CodeLookupService::connect(&config),
            Err(LookupError::SnapshotRead { .. })
        ));
    }

    #[test]
    fn test_service_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CodeLookupService>();
    }
}
