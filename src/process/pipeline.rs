// src/process/pipeline.rs

use anyhow::{Context, Result};
use csv::{ByteRecord, ReaderBuilder};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
    time::Instant,
};
use tracing::{debug, info, instrument};

use super::{
    dedupe::dedupe_file,
    filter::{map_record, ColumnLayout},
    serialize::write_card_line,
    utils::parent_dir,
};
use crate::expansions::ExpansionYears;

const WRITE_BUFFER_BYTES: usize = 1024 * 1024;

/// Counters for one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Data records read, header excluded.
    pub records_read: u64,
    /// Records that resolved to a `(name, year)` pair.
    pub pairs_emitted: u64,
    /// Lines in the final, deduplicated output.
    pub unique_cards: usize,
}

/// Stream every accepted `(name, year)` pair of the wide dump to `out`.
///
/// The first record is the header and is dropped unread. Output is not
/// deduplicated. Returns `(records_read, pairs_emitted)`.
pub fn extract_pairs<R: Read, W: Write>(
    input: R,
    mut out: W,
    layout: ColumnLayout,
    years: &ExpansionYears,
) -> Result<(u64, u64)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // rows in the dump do not all carry the same field count
        .from_reader(input);

    let mut record = ByteRecord::new();

    // header
    if !rdr
        .read_byte_record(&mut record)
        .context("CSV parse error in header")?
    {
        return Ok((0, 0));
    }

    let mut read = 0u64;
    let mut emitted = 0u64;
    while rdr
        .read_byte_record(&mut record)
        .with_context(|| format!("CSV parse error at record {}", read + 1))?
    {
        read += 1;
        if let Some(pair) = map_record(&record, layout, years) {
            write_card_line(&mut out, &pair.name, pair.year)
                .with_context(|| format!("writing pair for record {}", read))?;
            emitted += 1;
        }
    }
    out.flush().context("flushing pairs")?;
    Ok((read, emitted))
}

/// Build the card table: filter and map the wide dump at `input` into
/// `output`, then rewrite `output` deduplicated and sorted.
#[instrument(level = "info", skip(input, output, years), fields(input = %input.display(), output = %output.display()))]
pub fn build_card_data(
    input: &Path,
    output: &Path,
    layout: ColumnLayout,
    years: &ExpansionYears,
) -> Result<PipelineSummary> {
    let start = Instant::now();

    // 1) open input and output
    let fin = File::open(input).with_context(|| format!("opening {:?}", input))?;
    let out_dir = parent_dir(output);
    fs::create_dir_all(out_dir).with_context(|| format!("creating {:?}", out_dir))?;
    let fout = File::create(output).with_context(|| format!("creating {:?}", output))?;

    // 2) stream accepted pairs
    let (records_read, pairs_emitted) = extract_pairs(
        BufReader::new(fin),
        BufWriter::with_capacity(WRITE_BUFFER_BYTES, fout),
        layout,
        years,
    )
    .with_context(|| format!("extracting cards from {:?}", input))?;
    debug!(records_read, pairs_emitted, elapsed = ?start.elapsed(), "extracted pairs");

    // 3) collapse to one line per card
    let unique_cards = dedupe_file(output)?;

    let summary = PipelineSummary {
        records_read,
        pairs_emitted,
        unique_cards,
    };
    info!(
        records_read,
        pairs_emitted,
        unique_cards,
        elapsed = ?start.elapsed(),
        "card data written"
    );
    Ok(summary)
}
