// src/process/filter.rs

use csv::ByteRecord;
use serde::{Deserialize, Serialize};
use std::str;

use crate::expansions::{ExpansionYears, Year};

/// Card name column in the wide card dump (0-indexed).
pub const NAME_COLUMN: usize = 49;
/// Expansion code column in the wide card dump (0-indexed).
pub const CODE_COLUMN: usize = 66;

/// Positions of the two columns the mapper reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub name: usize,
    pub code: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            name: NAME_COLUMN,
            code: CODE_COLUMN,
        }
    }
}

impl ColumnLayout {
    /// Fewest fields a record needs before either column can be read.
    pub fn min_fields(&self) -> usize {
        self.name.max(self.code) + 1
    }
}

/// A card name resolved to the rotation year of one of its printings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardYear {
    pub name: String,
    pub year: Year,
}

impl CardYear {
    pub fn new(name: impl Into<String>, year: Year) -> Self {
        Self {
            name: name.into(),
            year,
        }
    }
}

/// Map one data record to a `(name, year)` pair, or `None` to reject it.
///
/// Rejected: records with fewer than `layout.min_fields()` fields, codes
/// missing from `years`, and names that are blank after trimming. A column that is not valid UTF-8 counts as missing.
/// No other field is looked at.
pub fn map_record(
    record: &ByteRecord,
    layout: ColumnLayout,
    years: &ExpansionYears,
) -> Option<CardYear> {
    if record.len() < layout.min_fields() {
        return None;
    }

    let code = field(record, layout.code)?;
    let year = years.year_of(code)?;

    let name = field(record, layout.name)?.trim();
    if name.is_empty() {
        return None;
    }

    Some(CardYear::new(name, year))
}

fn field(record: &ByteRecord, idx: usize) -> Option<&str> {
    record.get(idx).and_then(|raw| str::from_utf8(raw).ok())
}
