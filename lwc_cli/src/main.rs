//! Generates the waste collection JSON document and the per street iCalendar files.
//!
//! The table is read from `scripts/calendrierdechet.csv`, the outputs go to
//! `public/waste_collection.json` and `public/ics/`. Set `RUST_LOG` to change the log level.

use anyhow::Result;
use clap::Parser;
use lwc_core::pipeline::{self, Paths};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

static DEFAULT_LOG_FILTER: &str = "info";

/// Generate the waste collection JSON document and one iCalendar file per street.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Arguments {}

fn main() {
    Arguments::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();
    if let Err(err) = run() {
        error!("An error occurred: {err:?}");
    }
}

fn run() -> Result<()> {
    let paths = Paths::default();
    let summary = pipeline::run(&paths)?;
    info!(
        "Wrote {} calendar files to {}",
        summary.calendar_files,
        paths.calendar_dir.display()
    );
    Ok(())
}
