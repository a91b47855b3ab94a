// src/process/dedupe.rs

use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder};
use std::{
    collections::BTreeMap,
    fs,
    io::{Cursor, Read},
    path::Path,
    str,
};
use tracing::{debug, instrument};

use super::{filter::CardYear, serialize::write_card_lines, utils::write_atomically};
use crate::expansions::Year;

/// Latest rotation year seen per card name, kept in byte order of the name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaxYearTable {
    by_name: BTreeMap<String, Year>,
}

impl MaxYearTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one pair in. Returns `true` if the table changed; a year equal to
    /// the stored one leaves it as is.
    pub fn observe(&mut self, name: &str, year: Year) -> bool {
        match self.by_name.get_mut(name) {
            Some(stored) if year > *stored => {
                *stored = year;
                true
            }
            Some(_) => false,
            None => {
                self.by_name.insert(name.to_string(), year);
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Year> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Entries in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Year)> + '_ {
        self.by_name.iter().map(|(n, y)| (n.as_str(), *y))
    }
}

impl Extend<CardYear> for MaxYearTable {
    fn extend<I: IntoIterator<Item = CardYear>>(&mut self, iter: I) {
        for pair in iter {
            self.observe(&pair.name, pair.year);
        }
    }
}

impl FromIterator<CardYear> for MaxYearTable {
    fn from_iter<I: IntoIterator<Item = CardYear>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

/// Parse a serialized `"name",year` row. Rows with fewer than two fields, a
/// blank name or a year that is not an integer yield `None`.
pub fn parse_card_row(record: &ByteRecord) -> Option<CardYear> {
    if record.len() < 2 {
        return None;
    }
    let name = str::from_utf8(record.get(0)?).ok()?.trim();
    if name.is_empty() {
        return None;
    }
    let year = str::from_utf8(record.get(1)?).ok()?.trim().parse::<Year>().ok()?;
    Some(CardYear::new(name, year))
}

/// Fold a whole serialized card table into a [`MaxYearTable`].
pub fn read_card_table<R: Read>(reader: R) -> Result<MaxYearTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut table = MaxYearTable::new();
    let mut record = ByteRecord::new();
    let mut idx = 0usize;
    while rdr
        .read_byte_record(&mut record)
        .with_context(|| format!("CSV parse error at record {}", idx))?
    {
        if let Some(pair) = parse_card_row(&record) {
            table.observe(&pair.name, pair.year);
        }
        idx += 1;
    }
    Ok(table)
}

/// Write the table in ascending name order to `path`, replacing it atomically.
pub fn write_card_table(path: &Path, table: &MaxYearTable) -> Result<usize> {
    write_atomically(path, |w| {
        write_card_lines(w, table.iter()).with_context(|| format!("writing {:?}", path))
    })
}

/// Normalize a card table file in place: one line per name holding its
/// maximum year, sorted by name.
///
/// The file is read completely before the replacement is written.
#[instrument(level = "info", skip(path), fields(path = %path.display()))]
pub fn dedupe_file(path: &Path) -> Result<usize> {
    let bytes = fs::read(path).with_context(|| format!("reading {:?}", path))?;
    let table =
        read_card_table(Cursor::new(bytes)).with_context(|| format!("parsing {:?}", path))?;
    let written = write_card_table(path, &table)?;
    debug!(unique = written, "deduplicated");
    Ok(written)
}
