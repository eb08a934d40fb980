//! Grouping of collection records into communes, localities and streets.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashSet},
};

use tracing::warn;

use crate::{
    calendar,
    model::{Area, CollectionEvent, CollectionRecord, Street, SubLocality, SubLocalityKey},
};

type Streets = BTreeMap<StreetKey, Vec<CollectionEvent>>;
type SubLocalities = BTreeMap<SubLocalityKey, Streets>;

/// A street name ordered case-insensitively, falling back to the exact name.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StreetKey(String);

impl Ord for StreetKey {
    fn cmp(&self, other: &Self) -> Ordering {
        lowercase(&self.0)
            .cmp(lowercase(&other.0))
            .then_with(|| self.0.cmp(&other.0))
    }
}

fn lowercase(name: &str) -> impl Iterator<Item = char> + '_ {
    name.chars().flat_map(char::to_lowercase)
}

impl PartialOrd for StreetKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Accumulates records until [`HierarchyBuilder::finish`] sorts them into a [`Hierarchy`].
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    areas: BTreeMap<String, SubLocalities>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: CollectionRecord) {
        self.areas
            .entry(record.area)
            .or_default()
            .entry(record.sub_locality)
            .or_default()
            .entry(StreetKey(record.street))
            .or_default()
            .push(record.event);
    }

    /// Sort the events of every street by date and assign the calendar filenames.
    ///
    /// Events on the same date keep their input order.
    pub fn finish(self) -> Hierarchy {
        let mut filenames = HashSet::new();
        let areas = self
            .areas
            .into_iter()
            .map(|(area, sub_localities)| {
                let sub_localities = sub_localities
                    .into_iter()
                    .map(|(sub_locality, streets)| {
                        let streets = streets
                            .into_iter()
                            .map(|(StreetKey(street), mut events)| {
                                events.sort_by_key(CollectionEvent::date);
                                let calendar_filename = unique_filename(
                                    &mut filenames,
                                    calendar::filename(&area, &sub_locality, &street),
                                );
                                Street {
                                    name: street,
                                    calendar_filename,
                                    events,
                                }
                            })
                            .collect();
                        SubLocality {
                            name: sub_locality,
                            streets,
                        }
                    })
                    .collect();
                Area {
                    name: area,
                    sub_localities,
                }
            })
            .collect();
        Hierarchy { areas }
    }
}

impl Extend<CollectionRecord> for HierarchyBuilder {
    fn extend<T: IntoIterator<Item = CollectionRecord>>(&mut self, iter: T) {
        for record in iter {
            self.push(record);
        }
    }
}

impl FromIterator<CollectionRecord> for HierarchyBuilder {
    fn from_iter<T: IntoIterator<Item = CollectionRecord>>(iter: T) -> Self {
        let mut builder = Self::new();
        builder.extend(iter);
        builder
    }
}

/// Different names can share a slug, e.g. `Rue A` and `rue a`.
/// Later streets get a numbered filename in that case.
fn unique_filename(taken: &mut HashSet<String>, filename: String) -> String {
    if taken.insert(filename.clone()) {
        return filename;
    }
    let stem = filename.strip_suffix(calendar::EXTENSION).unwrap_or(&filename);
    let unique = (2..)
        .map(|counter| format!("{stem}-{counter}{}", calendar::EXTENSION))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_default();
    warn!("Calendar filename {filename} is taken, using {unique}");
    taken.insert(unique.clone());
    unique
}

/// The finished, sorted commune tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hierarchy {
    areas: Vec<Area>,
}

impl Hierarchy {
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Every street together with its commune and locality, in output order.
    pub fn streets(&self) -> impl Iterator<Item = (&Area, &SubLocality, &Street)> + '_ {
        self.areas.iter().flat_map(|area| {
            area.sub_localities.iter().flat_map(move |sub_locality| {
                sub_locality
                    .streets
                    .iter()
                    .map(move |street| (area, sub_locality, street))
            })
        })
    }

    pub fn street_count(&self) -> usize {
        self.streets().count()
    }

    pub fn event_count(&self) -> usize {
        self.streets().map(|(_, _, street)| street.events.len()).sum()
    }
}
