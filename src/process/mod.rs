// src/process/mod.rs
//
// Wide card dump → `"name",year` card table.
//
// filter     one record → optional (name, year)
// dedupe     max year per name, in-place re-dedupe of a written table
// serialize  the `"name",year` line format
// pipeline   file-to-file run wiring the three together

pub mod dedupe;
pub mod filter;
pub mod pipeline;
pub mod serialize;
pub mod utils;

pub use dedupe::{dedupe_file, read_card_table, MaxYearTable};
pub use filter::{map_record, CardYear, ColumnLayout};
pub use pipeline::{build_card_data, extract_pairs, PipelineSummary};
