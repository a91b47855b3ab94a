// src/cli.rs

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use card_age::config::Settings;

#[derive(Parser)]
#[command(
    name = "card_age",
    version,
    about = "Build the card name → Standard rotation year table",
    long_about = "Build the card name → Standard rotation year table.\n\n\
                  `expansions` refreshes the set → year table from the Standard overview page,\n\
                  `cards` turns the wide card dump into a deduplicated `\"name\",year` CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// YAML settings file; flags and environment variables override it.
    #[arg(long, value_name = "PATH", env = "CARD_AGE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace). Without it `RUST_LOG` applies.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch the Standard overview page and write the expansion → year table.
    Expansions(ExpansionsArgs),
    /// Extract the deduplicated card → year table from the wide card dump.
    Cards(CardsArgs),
    /// Deduplicate and sort an existing card table in place.
    Dedupe(DedupeArgs),
    /// Print the rotation year of the given card names.
    Lookup(LookupArgs),
    /// `expansions` followed by `cards`.
    Update(UpdateArgs),
}

#[derive(Args)]
pub struct ExpansionsArgs {
    /// Page to scrape.
    #[arg(long, value_name = "URL", env = "CARD_AGE_SOURCE_URL")]
    pub url: Option<String>,

    /// Parse a saved copy of the page instead of fetching it. Takes
    /// precedence over --url.
    #[arg(long, value_name = "PATH")]
    pub html: Option<PathBuf>,

    /// Where to write the expansion table.
    #[arg(long, value_name = "PATH", env = "CARD_AGE_EXPANSIONS")]
    pub out: Option<PathBuf>,
}

impl ExpansionsArgs {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(url) = &self.url {
            settings.source_url = url.clone();
        }
        if let Some(out) = &self.out {
            settings.expansions = out.clone();
        }
    }
}

#[derive(Args)]
pub struct CardsArgs {
    /// Wide card dump to read.
    #[arg(long, value_name = "PATH", env = "CARD_AGE_INPUT")]
    pub input: Option<PathBuf>,

    /// Card table to write.
    #[arg(long, value_name = "PATH", env = "CARD_AGE_OUTPUT")]
    pub out: Option<PathBuf>,

    /// Expansion table to resolve codes with.
    #[arg(long, value_name = "PATH", env = "CARD_AGE_EXPANSIONS")]
    pub expansions: Option<PathBuf>,

    /// Use the built-in expansion table; --expansions is ignored.
    #[arg(long)]
    pub builtin: bool,

    /// Column of the card name (0-indexed).
    #[arg(long, value_name = "N")]
    pub name_column: Option<usize>,

    /// Column of the expansion code (0-indexed).
    #[arg(long, value_name = "N")]
    pub code_column: Option<usize>,
}

impl CardsArgs {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(input) = &self.input {
            settings.input = input.clone();
        }
        if let Some(out) = &self.out {
            settings.output = out.clone();
        }
        if let Some(expansions) = &self.expansions {
            settings.expansions = expansions.clone();
        }
        if let Some(n) = self.name_column {
            settings.columns.name = n;
        }
        if let Some(n) = self.code_column {
            settings.columns.code = n;
        }
    }
}

#[derive(Args)]
pub struct DedupeArgs {
    /// Card table to rewrite; defaults to the configured output.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct LookupArgs {
    /// Card table to search.
    #[arg(long, value_name = "PATH", env = "CARD_AGE_OUTPUT")]
    pub cards: Option<PathBuf>,

    /// Card names to look up.
    #[arg(value_name = "NAME", required = true)]
    pub names: Vec<String>,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Page to scrape.
    #[arg(long, value_name = "URL", env = "CARD_AGE_SOURCE_URL")]
    pub url: Option<String>,

    /// Parse a saved copy of the page instead of fetching it.
    #[arg(long, value_name = "PATH")]
    pub html: Option<PathBuf>,

    /// Expansion table written by the first step and read by the second.
    #[arg(long, value_name = "PATH", env = "CARD_AGE_EXPANSIONS")]
    pub expansions: Option<PathBuf>,

    /// Wide card dump to read.
    #[arg(long, value_name = "PATH", env = "CARD_AGE_INPUT")]
    pub input: Option<PathBuf>,

    /// Card table to write.
    #[arg(long, value_name = "PATH", env = "CARD_AGE_OUTPUT")]
    pub out: Option<PathBuf>,
}

impl UpdateArgs {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(url) = &self.url {
            settings.source_url = url.clone();
        }
        if let Some(expansions) = &self.expansions {
            settings.expansions = expansions.clone();
        }
        if let Some(input) = &self.input {
            settings.input = input.clone();
        }
        if let Some(out) = &self.out {
            settings.output = out.clone();
        }
    }
}
