//! This synthesizer turns the collection events of one street into an iCalendar file.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use ical::{
    generator::{Emitter, IcalCalendar, IcalCalendarBuilder, IcalEvent, Property},
    ical_param, ical_property,
};
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::model::{CollectionEvent, Street, SubLocalityKey};

static PROD_ID: [&str; 3] = ["Waste Collection", "Luxembourg", "FR"];
static FORMAT: &str = "%Y%m%d";
static STAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";
static UID_DOMAIN: &str = "waste-calendar";
static NO_LOCALITY: &str = "no-loc";
static ALL_STREETS: &str = "Toutes les rues";

pub static EXTENSION: &str = ".ics";

static SLUG_SEPARATOR: OnceLock<Regex> = OnceLock::new();

/// The generation time written into every event of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp(String);

impl Stamp {
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<DateTime<Utc>> for Stamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.format(STAMP_FORMAT).to_string())
    }
}

/// A synthesized calendar, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarFile {
    pub filename: String,
    pub content: String,
}

/// Synthesize the calendar file of a street of `commune`.
pub fn synthesize(commune: &str, street: &Street, stamp: &Stamp) -> CalendarFile {
    let calendar = get_calendar(commune, street, stamp);
    CalendarFile {
        filename: street.calendar_filename.clone(),
        content: with_crlf(&calendar.generate()),
    }
}

/// iCalendar lines end with CRLF, the generator only writes LF.
fn with_crlf(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\r\n")
}

/// Build the calendar with one all-day event per collection.
fn get_calendar(commune: &str, street: &Street, stamp: &Stamp) -> IcalCalendar {
    let label = street_label(&street.name);
    let mut calendar = IcalCalendarBuilder::version("2.0")
        .gregorian()
        .prodid(prod_id())
        .build();
    calendar.properties.extend([
        ical_property!("METHOD", "PUBLISH"),
        ical_property!("X-WR-CALNAME", format!("Collectes {commune} - {label}")),
    ]);
    for event in &street.events {
        calendar.events.push(get_event(commune, label, event, stamp));
    }
    calendar
}

fn get_event(commune: &str, label: &str, event: &CollectionEvent, stamp: &Stamp) -> IcalEvent {
    let mut ical_event = IcalEvent::new();
    ical_event.properties.extend([
        ical_property!(
            "DTSTART",
            event.date().format(FORMAT).to_string(),
            ical_param!("VALUE", "DATE")
        ),
        ical_property!("DTSTAMP", stamp.as_str()),
        ical_property!(
            "UID",
            uid(label, commune, event.date(), event.collection_type())
        ),
        ical_property!("SUMMARY", format!("Collecte {}", event.collection_type())),
        ical_property!("STATUS", "CONFIRMED"),
        ical_property!("TRANSP", "TRANSPARENT"),
    ]);
    ical_event
}

fn prod_id() -> String {
    format!("-//{}", PROD_ID.join("//"))
}

/// The street as shown to people, an empty street covering the whole locality.
pub fn street_label(street: &str) -> &str {
    if street.is_empty() {
        ALL_STREETS
    } else {
        street
    }
}

/// Get a unique id for a collection at a specific street.
///
/// Changing this function is a breaking change!  
/// Calendar clients recognize known events by this id across refreshes.
pub fn uid(street_label: &str, commune: &str, date: NaiveDate, collection_type: &str) -> String {
    let digest = Sha256::new()
        .chain_update(street_label)
        .chain_update(commune)
        .chain_update(date.to_string())
        .chain_update(collection_type)
        .finalize();
    format!("{}@{UID_DOMAIN}", hex::encode(&digest[..16]))
}

/// Lowercase `text` and collapse everything outside `[a-z0-9]` into single hyphens.
pub fn slugify(text: &str) -> String {
    let separator = SLUG_SEPARATOR
        .get_or_init(|| Regex::new("[^a-z0-9]+").expect("the slug pattern is valid"));
    separator
        .replace_all(&text.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Get the calendar filename of a street.
///
/// The commune and locality are part of the name, so equal street names in different places
/// do not clash.
pub fn filename(commune: &str, sub_locality: &SubLocalityKey, street: &str) -> String {
    let locality = sub_locality
        .name()
        .map_or_else(|| String::from(NO_LOCALITY), slugify);
    format!(
        "{}_{locality}_{}{EXTENSION}",
        slugify(commune),
        slugify(street)
    )
}
