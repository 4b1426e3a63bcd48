//! Seed-file loading.
//!
//! The built-in timetable can be replaced by a JSON file (an array of
//! train records) named in the application config. Domain state is
//! still in-memory only; the file is read once at startup.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use tracing::info;

use super::CatalogStore;
use crate::models::TrainRecord;

/// Load a catalog from a JSON seed file.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<CatalogStore> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let records: Vec<TrainRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse catalog {}", path.display()))?;
    info!(path = %path.display(), trains = records.len(), "catalog loaded from seed file");
    Ok(CatalogStore::from_records(records))
}

/// Write a catalog out as a JSON seed file, creating parent directories.
///
/// Round-trips with [`load_catalog`]; handy for exporting the built-in
/// seed as a starting point for a custom timetable.
pub fn dump_catalog(store: &CatalogStore, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let serialized =
        serde_json::to_vec_pretty(store.list()).context("failed to serialize catalog")?;
    fs::write(path, serialized).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn seed_file_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("catalog.json");

        let store = CatalogStore::seeded();
        dump_catalog(&store, &path)?;

        let loaded = load_catalog(&path)?;
        assert_eq!(loaded.list(), store.list());
        Ok(())
    }

    #[test]
    fn load_small_hand_written_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"[{
                "number": 12951,
                "name": "Rajdhani Express",
                "source": "Mumbai Central",
                "destination": "New Delhi",
                "start_time": "16:35",
                "reach_time": "08:35",
                "total_seats": 1200,
                "balance": 1200
            }]"#,
        )?;

        let store = load_catalog(&path)?;
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].start_time.to_string(), "16:35");
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_catalog(dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn malformed_time_in_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"[{
                "number": 1,
                "name": "X",
                "source": "A",
                "destination": "B",
                "start_time": "25:99",
                "reach_time": "08:35",
                "total_seats": 10,
                "balance": 10
            }]"#,
        )
        .unwrap();
        assert!(load_catalog(&path).is_err());
    }
}
