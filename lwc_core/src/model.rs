//! The collection data, from a single parsed row up to the finished commune tree.
//!
//! The tree types serialize to the JSON document served to the browsing client.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::weekday::weekday_name;

/// One scheduled waste collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionEvent {
    #[serde(rename = "date_iso")]
    date: NaiveDate,
    #[serde(rename = "jour_semaine")]
    weekday_name: &'static str,
    #[serde(rename = "type")]
    collection_type: String,
}

impl CollectionEvent {
    pub fn new(date: NaiveDate, collection_type: impl Into<String>) -> Self {
        Self {
            date,
            weekday_name: weekday_name(date),
            collection_type: collection_type.into(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn weekday_name(&self) -> &'static str {
        self.weekday_name
    }

    pub fn collection_type(&self) -> &str {
        &self.collection_type
    }
}

/// The locality inside a commune.
///
/// Rows without a locality share the [`SubLocalityKey::None`] key, which sorts before every
/// named locality and serializes to `null`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubLocalityKey {
    None,
    Named(String),
}

impl SubLocalityKey {
    /// Normalize a raw locality field, blank values meaning no locality.
    pub fn from_field(value: &str) -> Self {
        match value.trim() {
            "" => Self::None,
            name => Self::Named(String::from(name)),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Named(name) => Some(name.as_str()),
        }
    }
}

impl Serialize for SubLocalityKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.name().serialize(serializer)
    }
}

/// A normalized input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRecord {
    pub area: String,
    pub sub_locality: SubLocalityKey,
    /// An empty street applies to all streets of its locality.
    pub street: String,
    pub event: CollectionEvent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    #[serde(rename = "commune")]
    pub name: String,
    #[serde(rename = "localities")]
    pub sub_localities: Vec<SubLocality>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubLocality {
    pub name: SubLocalityKey,
    pub streets: Vec<Street>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Street {
    pub name: String,
    #[serde(rename = "ics_filename")]
    pub calendar_filename: String,
    /// Sorted by date, rows of the same date in input order.
    #[serde(rename = "collectes")]
    pub events: Vec<CollectionEvent>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;

    use crate::model::{CollectionEvent, SubLocalityKey};

    #[test]
    fn test_sub_locality_key_from_field() {
        assert_eq!(SubLocalityKey::from_field(""), SubLocalityKey::None);
        assert_eq!(SubLocalityKey::from_field(" \t "), SubLocalityKey::None);
        assert_eq!(
            SubLocalityKey::from_field(" Helfenterbruck "),
            SubLocalityKey::Named(String::from("Helfenterbruck"))
        );
    }

    #[test]
    fn test_sub_locality_key_order() {
        let mut keys = vec![
            SubLocalityKey::Named(String::from("Bourmicht")),
            SubLocalityKey::Named(String::from("")),
            SubLocalityKey::None,
            SubLocalityKey::Named(String::from("Abweiler")),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                SubLocalityKey::None,
                SubLocalityKey::Named(String::from("")),
                SubLocalityKey::Named(String::from("Abweiler")),
                SubLocalityKey::Named(String::from("Bourmicht")),
            ]
        );
    }

    #[test]
    fn test_serialize_event() {
        let event = CollectionEvent::new(NaiveDate::from_str("2024-12-25").unwrap(), "Papier");
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"date_iso":"2024-12-25","jour_semaine":"Mercredi","type":"Papier"}"#
        );
        assert_eq!(serde_json::to_string(&SubLocalityKey::None).unwrap(), "null");
    }
}
