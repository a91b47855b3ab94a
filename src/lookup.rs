// src/lookup.rs

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::{collections::HashMap, fs, path::Path};
use tracing::{debug, instrument};

use crate::{expansions::Year, process::MaxYearTable};

/// Trim and collapse runs of whitespace to a single space.
pub fn normalize_card_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Every key a card can be found under: its normalized full name plus,
/// for split and double-faced cards, each `//`-separated half.
pub fn lookup_keys(name: &str) -> Vec<String> {
    let full = normalize_card_name(name);
    if full.is_empty() {
        return Vec::new();
    }

    let mut keys = vec![full.clone()];
    for part in full.split("//").map(normalize_card_name) {
        if !part.is_empty() && !keys.contains(&part) {
            keys.push(part);
        }
    }
    keys
}

/// Card name → rotation year index over a written card table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardIndex {
    by_key: HashMap<String, Year>,
}

impl CardIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` under all its keys; the later year wins on collision.
    pub fn insert(&mut self, name: &str, year: Year) {
        for key in lookup_keys(name) {
            let slot = self.by_key.entry(key).or_insert(year);
            if year > *slot {
                *slot = year;
            }
        }
    }

    pub fn from_table(table: &MaxYearTable) -> Self {
        let mut index = Self::new();
        for (name, year) in table.iter() {
            index.insert(name, year);
        }
        index
    }

    /// Parse card table text. Blank lines and `#` comments are skipped, as
    /// are rows without two non-empty cells or with a non-integer year.
    pub fn from_csv_text(text: &str) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let mut index = Self::new();
        let mut record = StringRecord::new();
        let mut idx = 0usize;
        while rdr
            .read_record(&mut record)
            .with_context(|| format!("CSV parse error at record {}", idx))?
        {
            idx += 1;
            let (Some(name), Some(year)) = (record.get(0), record.get(1)) else {
                continue;
            };
            if name.is_empty() || year.is_empty() {
                continue;
            }
            if let Ok(year) = year.parse::<Year>() {
                index.insert(name, year);
            }
        }
        Ok(index)
    }

    /// Load a card table file.
    #[instrument(level = "debug", skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
        let index = Self::from_csv_text(&text).with_context(|| format!("parsing {:?}", path))?;
        debug!(keys = index.len(), "loaded card index");
        Ok(index)
    }

    /// Year for a card as typed by a user or scraped from a deck list.
    pub fn year_of(&self, name: &str) -> Option<Year> {
        self.by_key.get(&normalize_card_name(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::CardYear;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_card_name("  Lightning \t  Bolt\n"), "Lightning Bolt");
        assert_eq!(normalize_card_name("   "), "");
    }

    #[test]
    fn test_split_card_keys() {
        assert_eq!(
            lookup_keys(" Fire  //  Ice "),
            vec!["Fire // Ice", "Fire", "Ice"]
        );
        assert_eq!(lookup_keys("Bolt"), vec!["Bolt"]);
        assert_eq!(lookup_keys("Half // "), vec!["Half //", "Half"]);
        assert!(lookup_keys("  ").is_empty());
    }

    #[test]
    fn test_index_from_text() -> Result<()> {
        let text = "# generated\r\n\
                    \"Fire // Ice\",2027\r\n\
                    \r\n\
                    \"Ice\",2029\n\
                    \"Bolt\",not-a-year\n\
                    \"Only name\"\n\
                    \"\",2030\n\
                    \"Zap\" , 2028 \n";
        let index = CardIndex::from_csv_text(text)?;

        assert_eq!(index.year_of("Fire // Ice"), Some(2027));
        assert_eq!(index.year_of("Fire"), Some(2027));
        // standalone printing of the half is later
        assert_eq!(index.year_of("Ice"), Some(2029));
        assert_eq!(index.year_of("  Zap "), Some(2028));
        assert_eq!(index.year_of("Bolt"), None);
        assert_eq!(index.year_of("Only name"), None);
        Ok(())
    }

    #[test]
    fn test_index_from_table() {
        let table: MaxYearTable = vec![
            CardYear::new("Wear // Tear", 2028),
            CardYear::new("Tear", 2027),
        ]
        .into_iter()
        .collect();
        let index = CardIndex::from_table(&table);
        assert_eq!(index.year_of("Tear"), Some(2028));
        assert_eq!(index.year_of("Wear"), Some(2028));
        assert_eq!(index.year_of("Wear  //  Tear"), Some(2028));
        assert_eq!(index.len(), 3);
    }
}
