//! Writes the commune tree as JSON and the calendar files to disk.

use std::{
    fs::{create_dir_all, write, File},
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use tracing::debug;

use crate::{calendar::CalendarFile, hierarchy::Hierarchy};

/// Render the commune tree with two spaces of indentation, keeping non-ASCII characters as is.
pub fn render_json(hierarchy: &Hierarchy) -> Result<String> {
    Ok(serde_json::to_string_pretty(hierarchy.areas())?)
}

/// Write the commune tree to `path`, replacing any previous file.
pub fn write_json(path: &Path, hierarchy: &Hierarchy) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, hierarchy.areas())?;
    writer.flush()?;
    Ok(())
}

/// Write every calendar file into `dir`, creating it if needed.
///
/// Returns the number of files written.
pub fn write_calendars(dir: &Path, calendars: &[CalendarFile]) -> Result<usize> {
    create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    for calendar in calendars {
        let path = dir.join(&calendar.filename);
        write(&path, &calendar.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!("Wrote {}", path.display());
    }
    Ok(calendars.len())
}

#[cfg(test)]
mod tests {
    use std::{
        fs::{read_to_string, File},
        io::BufReader,
        str::FromStr,
    };

    use chrono::NaiveDate;
    use ical::IcalParser;

    use crate::{
        calendar::{synthesize, Stamp},
        emitter::{render_json, write_calendars, write_json},
        hierarchy::{Hierarchy, HierarchyBuilder},
        model::{CollectionEvent, CollectionRecord, SubLocalityKey},
    };

    fn get_test_hierarchy() -> Hierarchy {
        let mut builder = HierarchyBuilder::new();
        builder.push(CollectionRecord {
            area: String::from("Kayl"),
            sub_locality: SubLocalityKey::Named(String::from("Tétange")),
            street: String::from("Rue de l'Église"),
            event: CollectionEvent::new(NaiveDate::from_str("2025-01-06").unwrap(), "Déchets ménagers"),
        });
        builder.finish()
    }

    #[test]
    fn test_render_json_keeps_non_ascii() {
        let json = render_json(&get_test_hierarchy()).unwrap();
        assert!(json.contains(r#""name": "Tétange""#));
        assert!(json.contains(r#""type": "Déchets ménagers""#));
        assert!(json.contains("\n  {\n    \"commune\": \"Kayl\",\n"));
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public").join("waste_collection.json");
        let hierarchy = get_test_hierarchy();
        write_json(&path, &hierarchy).unwrap();
        assert_eq!(read_to_string(&path).unwrap(), render_json(&hierarchy).unwrap());
        write_json(&path, &hierarchy).unwrap();
        assert_eq!(read_to_string(&path).unwrap(), render_json(&hierarchy).unwrap());
    }

    /// Test whether written calendars can be read back by a calendar parser.
    #[test]
    fn test_write_calendars() {
        let dir = tempfile::tempdir().unwrap();
        let calendar_dir = dir.path().join("ics");
        let hierarchy = get_test_hierarchy();
        let calendars: Vec<_> = hierarchy
            .streets()
            .map(|(area, _, street)| synthesize(&area.name, street, &Stamp::now()))
            .collect();
        let written = write_calendars(&calendar_dir, &calendars).unwrap();
        assert_eq!(written, 1);
        let path = calendar_dir.join("kayl_t-tange_rue-de-l-glise.ics");
        let content = read_to_string(&path).unwrap();
        assert!(content.ends_with("\r\n"));
        assert!(!content.replace("\r\n", "").contains(['\r', '\n']));
        let parser = IcalParser::new(BufReader::new(File::open(path).unwrap()));
        let parsed: Vec<_> = parser.map(Result::unwrap).collect();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].events.len(), 1);
    }
}
