//! Entered-versus-extracted comparison table of a KvK verification.

use ctn_domain::grid::GridRow;
use ctn_kernel::domain::models::{KvkFields, KvkVerification};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Match,
    Mismatch,
    /// One side has no value.
    Missing,
    /// Extraction has not finished.
    Pending,
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Match => "Match",
            Self::Mismatch => "Mismatch",
            Self::Missing => "Missing",
            Self::Pending => "Pending",
        })
    }
}

ctn_domain::grid_cell_display!(RowStatus);

#[derive(Debug, Clone, PartialEq, Eq, GridRow)]
#[grid(id = "key")]
pub struct ComparisonRow {
    pub key: String,
    #[grid(label = "Field")]
    pub label: String,
    #[grid(label = "Entered")]
    pub entered: Option<String>,
    #[grid(label = "Extracted")]
    pub extracted: Option<String>,
    #[grid(label = "Result")]
    pub status: RowStatus,
}

fn canonical(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn row_status(key: &str, entered: Option<&str>, extracted: Option<&KvkFields>, flagged: &[String]) -> RowStatus {
    let Some(extracted) = extracted else {
        return RowStatus::Pending;
    };
    if flagged.iter().any(|k| k == key) {
        return RowStatus::Mismatch;
    }
    match (entered, extracted.get(key)) {
        (Some(a), Some(b)) if canonical(a) == canonical(b) => RowStatus::Match,
        (Some(_), Some(_)) => RowStatus::Mismatch,
        _ => RowStatus::Missing,
    }
}

/// One row per KvK field (number, company name, legal form, city). Keys the backend flagged
/// are always mismatches; other rows compare whitespace- and case-insensitively.
#[must_use]
pub fn comparison(verification: &KvkVerification) -> Vec<ComparisonRow> {
    let extracted = verification.extracted.as_ref();
    KvkFields::FIELDS
        .iter()
        .map(|(key, label)| {
            let entered = verification.entered.get(key);
            ComparisonRow {
                key: (*key).to_owned(),
                label: (*label).to_owned(),
                entered: entered.map(str::to_owned),
                extracted: extracted.and_then(|e| e.get(key)).map(str::to_owned),
                status: row_status(key, entered, extracted, &verification.mismatches),
            }
        })
        .collect()
}
