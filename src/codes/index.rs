use std::collections::{BTreeSet, HashMap, hash_map::Entry};
use tracing::{debug, info};

use super::normalize::normalize;
use super::types::{CodeDocument, SpecificCode};

/// What index build decided for a single document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Included { year: i32, code: String },
    SkippedMalformedId,
    SkippedUnparsableYear,
    SkippedYearNotSelected { year: i32 },
}

/// Classify a `"<year>_<code>"` identifier against the selected years.
/// The returned code is already normalized.
pub fn classify(id: &str, years: &BTreeSet<i32>) -> Classification {
    let Some((year, code)) = id.split_once('_') else {
        return Classification::SkippedMalformedId;
    };

    let Ok(year) = year.trim().parse::<i32>() else {
        return Classification::SkippedUnparsableYear;
    };

    if !years.contains(&year) {
        return Classification::SkippedYearNotSelected { year };
    }

    Classification::Included {
        year,
        code: normalize(code),
    }
}

/// Counters collected while building the index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub scanned: usize,
    pub included: usize,
    pub malformed_id: usize,
    pub unparsable_year: usize,
    pub year_not_selected: usize,
    /// Entries overwritten by a later document for the same code
    pub replaced: usize,
    /// Documents ignored because the code already had a later year
    pub superseded: usize,
}

impl BuildStats {
    fn record(&mut self, classification: &Classification) {
        self.scanned += 1;
        match classification {
            Classification::Included { .. } => self.included += 1,
            Classification::SkippedMalformedId => self.malformed_id += 1,
            Classification::SkippedUnparsableYear => self.unparsable_year += 1,
            Classification::SkippedYearNotSelected { .. } => self.year_not_selected += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.malformed_id + self.unparsable_year + self.year_not_selected
    }
}

/// The document an index entry points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedDocument {
    pub year: i32,
    pub id: String,
    pub specific_codes: Vec<SpecificCode>,
}

impl IndexedDocument {
    /// Distinct specific codes of this document. Object elements without a
    /// `code` are left out.
    pub fn codes(&self) -> BTreeSet<String> {
        self.specific_codes
            .iter()
            .filter_map(SpecificCode::code)
            .map(str::to_string)
            .collect()
    }
}

/// Normalized code -> document, built once and never mutated afterwards
#[derive(Debug, Default)]
pub struct CodeIndex {
    entries: HashMap<String, IndexedDocument>,
    stats: BuildStats,
}

impl CodeIndex {
    /// Build an index from documents in scan order.
    ///
    /// When two documents normalize to the same code, the later year wins;
    /// within the same year the later-scanned document wins.
    pub fn build<I>(documents: I, years: &BTreeSet<i32>) -> Self
    where
        I: IntoIterator<Item = CodeDocument>,
    {
        let mut entries: HashMap<String, IndexedDocument> = HashMap::new();
        let mut stats = BuildStats::default();

        for doc in documents {
            let classification = classify(&doc.id, years);
            stats.record(&classification);

            let (year, code) = match classification {
                Classification::Included { year, code } => (year, code),
                skipped => {
                    debug!(id = %doc.id, ?skipped, "skipping document");
                    continue;
                }
            };

            let indexed = IndexedDocument {
                year,
                id: doc.id,
                specific_codes: doc.specific_codes,
            };

            match entries.entry(code) {
                Entry::Vacant(slot) => {
                    slot.insert(indexed);
                }
                Entry::Occupied(mut slot) => {
                    if slot.get().year > year {
                        debug!(
                            code = %slot.key(),
                            kept = %slot.get().id,
                            ignored = %indexed.id,
                            "code already indexed from a later year"
                        );
                        stats.superseded += 1;
                    } else {
                        debug!(
                            code = %slot.key(),
                            previous = %slot.get().id,
                            current = %indexed.id,
                            "replacing index entry"
                        );
                        stats.replaced += 1;
                        slot.insert(indexed);
                    }
                }
            }
        }

        info!(
            codes = entries.len(),
            scanned = stats.scanned,
            skipped = stats.skipped(),
            "code index built"
        );

        CodeIndex { entries, stats }
    }

    /// Lookup by already-normalized code
    pub fn get(&self, normalized: &str) -> Option<&IndexedDocument> {
        self.entries.get(normalized)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// All indexed codes, sorted
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}
