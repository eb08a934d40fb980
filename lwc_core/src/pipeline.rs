//! The whole batch run: read the table, group it, synthesize the calendars and write
//! everything out.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::PathBuf,
};

use anyhow::Result;
use tracing::{info, warn};

use crate::{
    calendar::{self, CalendarFile, Stamp},
    emitter,
    error::ReadError,
    hierarchy::{Hierarchy, HierarchyBuilder},
    reader,
};

static INPUT: &str = "scripts/calendrierdechet.csv";
static JSON_OUTPUT: &str = "public/waste_collection.json";
static CALENDAR_DIR: &str = "public/ics";

/// Where the table is read from and the outputs are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub input: PathBuf,
    pub json_output: PathBuf,
    pub calendar_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            input: PathBuf::from(INPUT),
            json_output: PathBuf::from(JSON_OUTPUT),
            calendar_dir: PathBuf::from(CALENDAR_DIR),
        }
    }
}

/// Everything derived from one table.
#[derive(Debug, Clone)]
pub struct Output {
    pub hierarchy: Hierarchy,
    pub calendars: Vec<CalendarFile>,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub communes: usize,
    pub streets: usize,
    pub events: usize,
    pub skipped_rows: usize,
    pub calendar_files: usize,
}

/// Transform a table into the commune tree and its calendar files, without touching the disk.
///
/// Rows that cannot be used are logged and skipped.
pub fn transform<R: Read>(source: R, stamp: &Stamp) -> Result<Output> {
    let records = reader::read(source)?;
    let mut builder = HierarchyBuilder::new();
    let mut skipped_rows = 0;
    for row in records {
        match row {
            Ok(record) => builder.push(record),
            Err(err) if err.is_fatal() => return Err(err.into()),
            Err(err) => {
                warn!("Skipping row due to error: {err}");
                skipped_rows += 1;
            }
        }
    }
    let hierarchy = builder.finish();
    let calendars = hierarchy
        .streets()
        .map(|(area, _, street)| calendar::synthesize(&area.name, street, stamp))
        .collect();
    Ok(Output {
        hierarchy,
        calendars,
        skipped_rows,
    })
}

/// Run the batch.
///
/// Nothing is written unless the whole table could be read.
pub fn run(paths: &Paths) -> Result<Summary> {
    let file = File::open(&paths.input).map_err(|source| ReadError::Open {
        path: paths.input.clone(),
        source,
    })?;
    let output = transform(BufReader::new(file), &Stamp::now())?;
    let calendar_files = emitter::write_calendars(&paths.calendar_dir, &output.calendars)?;
    emitter::write_json(&paths.json_output, &output.hierarchy)?;
    let summary = Summary {
        communes: output.hierarchy.areas().len(),
        streets: output.hierarchy.street_count(),
        events: output.hierarchy.event_count(),
        skipped_rows: output.skipped_rows,
        calendar_files,
    };
    info!("Successfully processed {} communes.", summary.communes);
    info!(
        "{} streets, {} collections, {} skipped rows",
        summary.streets, summary.events, summary.skipped_rows
    );
    info!("Output saved to {}", paths.json_output.display());
    Ok(summary)
}
