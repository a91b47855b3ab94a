// src/expansions/types.rs

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Rotation year: the last year a set stays legal in Standard.
pub type Year = i32;

/// Curated fallback table, used when no `expansions.json` is available.
static BUILTIN_EXPANSIONS: &[(Year, &[&str])] = &[
    (2027, &["WOE", "LCI", "MKM", "OTJ", "BIG", "BLB", "DSK"]),
    (2028, &["DFT", "TDM", "FIN", "EOE", "SPM", "TLA"]),
    (2029, &["ECL"]),
    (2030, &["FDN"]),
];

/// On-disk shape of `expansions.json`: `{ "<year>": ["<code>", ...] }`.
///
/// Keys are kept in ascending year order, which is also the order used when
/// inverting into an [`ExpansionYears`] table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearCodes(pub BTreeMap<Year, Vec<String>>);

impl YearCodes {
    /// Keep only years strictly after `year`.
    pub fn after(self, year: Year) -> Self {
        YearCodes(self.0.into_iter().filter(|(y, _)| *y > year).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Total number of codes across all years.
    pub fn code_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// Expansion code → rotation year lookup consumed by the row mapper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionYears {
    by_code: HashMap<String, Year>,
}

impl ExpansionYears {
    pub fn new() -> Self {
        Self::default()
    }

    /// The hand-maintained table shipped with the crate.
    pub fn builtin() -> Self {
        BUILTIN_EXPANSIONS
            .iter()
            .flat_map(|(year, codes)| codes.iter().map(move |c| (c.to_string(), *year)))
            .collect()
    }

    /// Invert a year → codes document. A code listed under several years
    /// ends up with the last one visited (ascending year order).
    pub fn from_year_codes(doc: &YearCodes) -> Self {
        let mut out = Self::new();
        for (year, codes) in &doc.0 {
            for code in codes {
                if let Some(prev) = out.insert(code.clone(), *year) {
                    if prev != *year {
                        warn!(code = %code, prev, year, "expansion listed under several years");
                    }
                }
            }
        }
        out
    }

    /// Insert a mapping, returning the year previously stored for `code`.
    pub fn insert(&mut self, code: String, year: Year) -> Option<Year> {
        self.by_code.insert(code, year)
    }

    /// Exact-match lookup; codes are not trimmed or case-folded.
    pub fn year_of(&self, code: &str) -> Option<Year> {
        self.by_code.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl FromIterator<(String, Year)> for ExpansionYears {
    fn from_iter<I: IntoIterator<Item = (String, Year)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (code, year) in iter {
            out.insert(code, year);
        }
        out
    }
}
