// src/expansions/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::{fmt, fs, path::Path};
use tracing::{info, instrument};
use url::Url;

use crate::fetch;

pub mod parse;
pub mod store;
pub mod types;

pub use parse::parse_legal_rows;
pub use store::{load_expansion_years, read_year_codes, write_year_codes};
pub use types::{ExpansionYears, Year, YearCodes};

/// The overview page listed no rotation year after the current one.
///
/// Usually means the markup changed, or the page was served without its
/// client-side rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoFutureExpansions {
    pub current_year: Year,
}

impl fmt::Display for NoFutureExpansions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no expansion years above {} found (markup changed or no future data?)",
            self.current_year
        )
    }
}

impl std::error::Error for NoFutureExpansions {}

/// Parse a page and keep only the years still ahead of `current_year`.
pub fn future_expansions(html: &str, current_year: Year) -> Result<YearCodes> {
    let future = parse_legal_rows(html).after(current_year);
    if future.is_empty() {
        return Err(NoFutureExpansions { current_year }.into());
    }
    Ok(future)
}

/// Where the overview page comes from.
#[derive(Debug, Clone)]
pub enum PageSource<'a> {
    /// Fetch it over HTTP.
    Remote(&'a Url),
    /// A page saved to disk, e.g. from a browser after rendering.
    Saved(&'a Path),
}

impl fmt::Display for PageSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSource::Remote(url) => write!(f, "{}", url),
            PageSource::Saved(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch (or read) the overview page, extract future rotation years and
/// write them to `out`. Nothing is written when no future year is found.
#[instrument(level = "info", skip(client, source, out), fields(source = %source, out = %out.display()))]
pub async fn refresh(
    client: &Client,
    source: PageSource<'_>,
    out: &Path,
    current_year: Year,
) -> Result<YearCodes> {
    let html = match source {
        PageSource::Remote(url) => fetch::fetch_text(client, url).await?,
        PageSource::Saved(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?
        }
    };

    let doc = future_expansions(&html, current_year)?;
    write_year_codes(out, &doc)?;
    info!(
        years = doc.len(),
        codes = doc.code_count(),
        "wrote {}",
        out.display()
    );
    Ok(doc)
}
