// src/expansions/parse.rs

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, trace};

use super::types::{Year, YearCodes};

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.row").expect("CSS selector for rows should be valid"));

static CODE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div[aria-controls^="accordion-collapse-"]"#)
        .expect("CSS selector for set accordions should be valid")
});

static YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("year regex should compile"));

const LEGAL_UNTIL: &str = "Legal until";

/// Extract the `year → [codes]` table from the rendered Standard overview page.
///
/// A row counts when its text mentions "Legal until"; the first four-digit
/// year in that text is the rotation year, and the set codes are the suffixes
/// of its `aria-controls="accordion-collapse-<code>"` attributes.
pub fn parse_legal_rows(html: &str) -> YearCodes {
    let doc = Html::parse_document(html);
    let mut out = YearCodes::default();

    for row in doc.select(&ROW_SELECTOR) {
        let text = element_text(&row);
        if !text.contains(LEGAL_UNTIL) {
            continue;
        }

        let Some(year) = YEAR_RE
            .find(&text)
            .and_then(|m| m.as_str().parse::<Year>().ok())
        else {
            trace!(%text, "legal row without a year");
            continue;
        };

        let codes = row_codes(&row);
        if codes.is_empty() {
            continue;
        }
        debug!(year, codes = ?codes, "legal row");
        out.0.insert(year, codes);
    }

    out
}

/// Codes in document order, upper-cased, without duplicates.
fn row_codes(row: &ElementRef<'_>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut codes = Vec::new();
    for item in row.select(&CODE_SELECTOR) {
        let attr = item.value().attr("aria-controls").unwrap_or("");
        let code = attr.rsplit('-').next().unwrap_or("").trim().to_uppercase();
        if !code.is_empty() && seen.insert(code.clone()) {
            codes.push(code);
        }
    }
    codes
}

/// Text nodes, each trimmed, blanks dropped, joined by a single space.
fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
  <div class="row">
    <h3>Legal until</h3><span>Q1 2027</span>
    <div aria-controls="accordion-collapse-woe">Wilds of Eldraine</div>
    <div aria-controls="accordion-collapse-lci">The Lost Caverns of Ixalan</div>
    <div aria-controls="accordion-collapse-woe">Wilds of Eldraine (again)</div>
  </div>
  <div class="row">
    <p>Legal until 2028</p>
    <div aria-controls="accordion-collapse-dft">Aetherdrift</div>
  </div>
  <div class="row">
    <p>Rotated out in 2024</p>
    <div aria-controls="accordion-collapse-mom">March of the Machine</div>
  </div>
  <div class="row">
    <p>Legal until further notice</p>
    <div aria-controls="accordion-collapse-fdn">Foundations</div>
  </div>
  <div class="row">
    <p>Legal until 2031</p>
  </div>
</body></html>
"#;

    #[test]
    fn test_parse_legal_rows() {
        let parsed = parse_legal_rows(PAGE);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.0[&2027], vec!["WOE".to_string(), "LCI".to_string()]);
        assert_eq!(parsed.0[&2028], vec!["DFT".to_string()]);
    }

    #[test]
    fn test_later_row_with_same_year_replaces_earlier() {
        let html = r#"
<div class="row">Legal until 2027<div aria-controls="accordion-collapse-aaa"></div></div>
<div class="row">Legal until 2027<div aria-controls="accordion-collapse-bbb"></div></div>
"#;
        let parsed = parse_legal_rows(html);
        assert_eq!(parsed.0[&2027], vec!["BBB".to_string()]);
    }

    #[test]
    fn test_empty_page() {
        assert!(parse_legal_rows("<html></html>").is_empty());
    }

    #[test]
    fn test_element_text_joins_trimmed_nodes() {
        let frag = Html::parse_fragment("<div>  Legal <b> until </b>\n 2027 </div>");
        let sel = Selector::parse("div").unwrap();
        let div = frag.select(&sel).next().unwrap();
        assert_eq!(element_text(&div), "Legal until 2027");
    }
}
