// src/expansions/store.rs

use anyhow::{Context, Result};
use std::{fs::File, io::BufReader, path::Path};
use tracing::{debug, instrument};

use super::types::{ExpansionYears, YearCodes};
use crate::process::utils::write_atomically;

/// Read `expansions.json` as written by [`write_year_codes`].
pub fn read_year_codes(path: &Path) -> Result<YearCodes> {
    let f = File::open(path).with_context(|| format!("opening {:?}", path))?;
    serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parsing {:?}", path))
}

/// Load `expansions.json` and invert it into a code → year table.
#[instrument(level = "debug", skip(path), fields(path = %path.display()))]
pub fn load_expansion_years(path: &Path) -> Result<ExpansionYears> {
    let doc = read_year_codes(path)?;
    let years = ExpansionYears::from_year_codes(&doc);
    debug!(years = doc.len(), codes = years.len(), "loaded expansion table");
    Ok(years)
}

/// Pretty-print the document (years ascending, trailing newline) and swap it
/// into place atomically.
pub fn write_year_codes(path: &Path, doc: &YearCodes) -> Result<()> {
    write_atomically(path, |w| {
        serde_json::to_writer_pretty(&mut *w, doc)
            .with_context(|| format!("serializing JSON for {:?}", path))?;
        w.write_all(b"\n")?;
        Ok(())
    })
}
