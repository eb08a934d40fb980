//! This reader parses the semicolon separated collection table into collection records.

use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use tracing::info;

use crate::{
    error::{ReadError, RowError},
    model::{CollectionEvent, CollectionRecord, SubLocalityKey},
};

static DELIMITER: u8 = b';';
static QUOTE: u8 = b'"';
static DATE_FORMAT: &str = "%d/%m/%Y";
static BYTE_ORDER_MARK: char = '\u{feff}';

static COLUMN_DATE: &str = "Date";
static COLUMN_COLLECTION_TYPE: &str = "Type de collecte";
static COLUMN_COMMUNE: &str = "Commune";
static COLUMN_LOCALITY: &str = "Localité";
static COLUMN_STREET: &str = "Rue";

/// Where the required columns are in the header.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    collection_type: usize,
    commune: usize,
    locality: usize,
    street: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, ReadError> {
        let position = |column: &'static str| {
            headers
                .iter()
                .position(|header| header == column)
                .ok_or_else(|| ReadError::MissingColumn {
                    column,
                    found: headers.iter().map(String::from).collect(),
                })
        };
        Ok(Self {
            date: position(COLUMN_DATE)?,
            collection_type: position(COLUMN_COLLECTION_TYPE)?,
            commune: position(COLUMN_COMMUNE)?,
            locality: position(COLUMN_LOCALITY)?,
            street: position(COLUMN_STREET)?,
        })
    }
}

/// One row of the table as found in the file.
///
/// Fields missing at the end of a short row are empty.
#[derive(Debug)]
struct RawRow<'a> {
    date: &'a str,
    collection_type: &'a str,
    commune: &'a str,
    locality: &'a str,
    street: &'a str,
}

impl<'a> RawRow<'a> {
    fn new(record: &'a StringRecord, columns: &Columns) -> Self {
        let field = move |index: usize| record.get(index).unwrap_or("");
        Self {
            date: field(columns.date),
            collection_type: field(columns.collection_type),
            commune: field(columns.commune),
            locality: field(columns.locality),
            street: field(columns.street),
        }
    }

    fn into_record(self, row: u64) -> Result<CollectionRecord, RowError> {
        let area = self.commune.trim();
        if area.is_empty() {
            return Err(RowError::MissingCommune { row });
        }
        let date_field = self.date.trim();
        let date = NaiveDate::parse_from_str(date_field, DATE_FORMAT).map_err(|source| {
            RowError::InvalidDate {
                row,
                value: String::from(date_field),
                source,
            }
        })?;
        Ok(CollectionRecord {
            area: String::from(area),
            sub_locality: SubLocalityKey::from_field(self.locality),
            street: String::from(self.street.trim()),
            event: CollectionEvent::new(date, self.collection_type.trim()),
        })
    }
}

/// The rows of the table, parsed lazily.
pub struct Records<R> {
    headers: StringRecord,
    columns: Columns,
    rows: StringRecordsIntoIter<R>,
}

impl<R> Records<R> {
    /// The normalized header names.
    pub fn headers(&self) -> Vec<&str> {
        self.headers.iter().collect()
    }
}

impl<R: Read> Iterator for Records<R> {
    type Item = Result<CollectionRecord, RowError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(
            row.map_err(RowError::from)
                .and_then(|record| parse_record(&record, &self.columns)),
        )
    }
}

/// Start reading a table.
///
/// Fails when the header row cannot be read or lacks one of the required columns.
pub fn read<R: Read>(source: R) -> Result<Records<R>, ReadError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .quote(QUOTE)
        .flexible(true)
        .from_reader(source);
    let headers: StringRecord = reader.headers()?.iter().map(normalize_header).collect();
    info!("Detected columns: {:?}", headers.iter().collect::<Vec<_>>());
    let columns = Columns::locate(&headers)?;
    Ok(Records {
        headers,
        columns,
        rows: reader.into_records(),
    })
}

fn normalize_header(header: &str) -> &str {
    header.trim_matches(|c: char| c.is_whitespace() || c == QUOTE as char || c == BYTE_ORDER_MARK)
}

/// Rows are numbered by record, the header being record 0, so quoted line breaks and
/// CRLF line endings do not shift the number.
fn parse_record(record: &StringRecord, columns: &Columns) -> Result<CollectionRecord, RowError> {
    let row = record.position().map_or(0, csv::Position::record);
    RawRow::new(record, columns).into_record(row)
}
