use anyhow::{bail, Context, Result};
use card_age::{
    config::Settings,
    expansions::{self, ExpansionYears, NoFutureExpansions, PageSource, Year},
    fetch,
    lookup::CardIndex,
    process::{self, PipelineSummary},
};
use chrono::{Datelike, Local};
use clap::Parser;
use std::{path::Path, process::ExitCode};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

mod cli;

use crate::cli::{Cli, Command, LogFormat};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    init_logging(cli.verbose, cli.log_format);
    info!("startup");

    // ─── 2) run the requested step ───────────────────────────────────
    match run(cli).await {
        Ok(()) => {
            info!("all done");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("ERROR: {:#}", err);
            exit_code_for(&err)
        }
    }
}

fn init_logging(verbose: u8, format: LogFormat) {
    let env = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("info,card_age=debug"),
        _ => EnvFilter::new("debug,card_age=trace"),
    };
    let builder = fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// 2 when the expansions page had nothing ahead of the current year,
/// 1 for every other failure.
fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    if err.downcast_ref::<NoFutureExpansions>().is_some() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Expansions(args) => {
            args.apply(&mut settings);
            refresh_expansions(&settings, args.html.as_deref()).await?;
        }
        Command::Cards(args) => {
            args.apply(&mut settings);
            let years = if args.builtin {
                ExpansionYears::builtin()
            } else {
                expansions::load_expansion_years(&settings.expansions)?
            };
            build_cards(&settings, years).await?;
        }
        Command::Dedupe(args) => {
            let path = args.path.unwrap_or(settings.output);
            let unique = process::dedupe_file(&path)?;
            println!("Wrote {} cards to {}", unique, path.display());
        }
        Command::Lookup(args) => {
            let path = args.cards.unwrap_or(settings.output);
            let index = CardIndex::load(&path)?;
            for name in &args.names {
                match index.year_of(name) {
                    Some(year) => println!("{},{}", name, year),
                    None => println!("{},-", name),
                }
            }
        }
        Command::Update(args) => {
            args.apply(&mut settings);
            let doc = refresh_expansions(&settings, args.html.as_deref()).await?;
            build_cards(&settings, ExpansionYears::from_year_codes(&doc)).await?;
        }
    }

    Ok(())
}

async fn refresh_expansions(
    settings: &Settings,
    html: Option<&Path>,
) -> Result<expansions::YearCodes> {
    let current_year: Year = Local::now().year();
    let client = fetch::build_client()?;
    let url;
    let source = match html {
        Some(path) => PageSource::Saved(path),
        None => {
            url = settings.source_url()?;
            PageSource::Remote(&url)
        }
    };

    let doc = expansions::refresh(&client, source, &settings.expansions, current_year).await?;
    println!(
        "Wrote {} entries to {}",
        doc.len(),
        settings.expansions.display()
    );
    Ok(doc)
}

async fn build_cards(settings: &Settings, years: ExpansionYears) -> Result<PipelineSummary> {
    if years.is_empty() {
        bail!("expansion table has no codes; nothing can be resolved");
    }
    if settings.columns.name == settings.columns.code {
        warn!(column = settings.columns.name, "name and code share a column");
    }

    // the pipeline is blocking file I/O; keep it off the async workers
    let input = settings.input.clone();
    let output = settings.output.clone();
    let layout = settings.columns;
    let summary = tokio::task::spawn_blocking(move || {
        process::build_card_data(&input, &output, layout, &years)
    })
    .await
    .context("card extraction task panicked")??;

    println!(
        "Wrote {} cards to {}",
        summary.unique_cards,
        settings.output.display()
    );
    Ok(summary)
}
