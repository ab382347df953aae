use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("unexpected columns in {path}: expected {expected:?}, found {found:?}")]
    SchemaMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// A record type persisted as one CSV file with a fixed, ordered header row.
///
/// `COLUMNS` must list the serialized fields in declaration order.
pub trait Table: Serialize + DeserializeOwned {
    const FILE_NAME: &'static str;
    const COLUMNS: &'static [&'static str];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Harvester {
    pub id: u32,
    pub name: String,
}

impl Table for Harvester {
    const FILE_NAME: &'static str = "harvesters.csv";
    const COLUMNS: &'static [&'static str] = &["id", "name"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestEntry {
    pub name: String,
    pub id: u32,
    pub date: String,
    pub day: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity_kg: Decimal,
    pub sacks: u32,
}

impl Table for HarvestEntry {
    const FILE_NAME: &'static str = "rose_harvest.csv";
    const COLUMNS: &'static [&'static str] = &["name", "id", "date", "day", "quantity_kg", "sacks"];
}

/// Reads and rewrites whole tables under a single directory.
#[derive(Debug, Clone)]
pub struct Store {
    tables_dir: PathBuf,
}

impl Store {
    pub fn new(tables_dir: impl Into<PathBuf>) -> Store {
        Store {
            tables_dir: tables_dir.into(),
        }
    }

    pub fn path<T: Table>(&self) -> PathBuf {
        self.tables_dir.join(T::FILE_NAME)
    }

    pub fn exists<T: Table>(&self) -> bool {
        self.path::<T>().is_file()
    }

    /// Missing files load as an empty table.
    pub fn load<T: Table>(&self) -> Result<Vec<T>, StoreError> {
        let path = self.path::<T>();
        if !path.is_file() {
            debug!("table missing, starting empty, path={}", path.display());
            return Ok(Vec::new());
        }

        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(&path)?;

        let headers = csv_reader.headers()?;
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        check_columns::<T>(&path, headers)?;

        let rows = csv_reader.deserialize::<T>().collect::<Result<Vec<_>, _>>()?;
        debug!("loaded table, path={}, rows={}", path.display(), rows.len());

        Ok(rows)
    }

    /// Replaces the whole file. The header row is always written, even for an empty table.
    pub fn save<T: Table>(&self, rows: &[T]) -> Result<(), StoreError> {
        let path = self.path::<T>();
        ensure_parent(&path)?;

        let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_path(&path)?;
        csv_writer.write_record(T::COLUMNS)?;
        for row in rows {
            csv_writer.serialize(row)?;
        }

        csv_writer.flush()?;
        debug!("saved table, path={}, rows={}", path.display(), rows.len());

        Ok(())
    }
}

fn check_columns<T: Table>(path: &Path, headers: &csv::StringRecord) -> Result<(), StoreError> {
    if headers.iter().eq(T::COLUMNS.iter().copied()) {
        return Ok(());
    }

    Err(StoreError::SchemaMismatch {
        path: path.to_path_buf(),
        expected: T::COLUMNS.iter().map(|c| c.to_string()).collect(),
        found: headers.iter().map(String::from).collect(),
    })
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    use super::*;

    fn entry(name: &str, id: u32, date: &str, quantity_kg: Decimal, sacks: u32) -> HarvestEntry {
        HarvestEntry {
            name: name.to_string(),
            id,
            date: date.to_string(),
            day: "Thursday".to_string(),
            quantity_kg,
            sacks,
        }
    }

    #[test]
    fn test_load_missing_table_is_empty() -> Result<()> {
        let dir = TempDir::new()?;
        let store = Store::new(dir.path().join("tables"));

        assert_eq!(store.exists::<Harvester>(), false);
        assert!(store.load::<Harvester>()?.is_empty());
        assert!(store.load::<HarvestEntry>()?.is_empty());

        Ok(())
    }

    #[test]
    fn test_save_creates_directory_and_round_trips() -> Result<()> {
        let dir = TempDir::new()?;
        let store = Store::new(dir.path().join("nested").join("tables"));
        let rows = vec![
            entry("Ivan", 1, "01-05-25", dec!(60.0), 3),
            entry("Peter O'Neil", 2, "01-05-25", dec!(40.25), 2),
        ];

        store.save(&rows)?;

        assert_eq!(store.exists::<HarvestEntry>(), true);
        assert_eq!(store.load::<HarvestEntry>()?, rows);

        let text = fs::read_to_string(store.path::<HarvestEntry>())?;
        assert_eq!(text.lines().next(), Some("name,id,date,day,quantity_kg,sacks"));
        assert_eq!(text.lines().nth(1), Some("Ivan,1,01-05-25,Thursday,60.0,3"));

        Ok(())
    }

    #[test]
    fn test_save_empty_table_keeps_header() -> Result<()> {
        let dir = TempDir::new()?;
        let store = Store::new(dir.path());

        store.save::<Harvester>(&[])?;

        assert_eq!(fs::read_to_string(store.path::<Harvester>())?, "id,name\n");
        assert!(store.load::<Harvester>()?.is_empty());

        Ok(())
    }

    #[test]
    fn test_save_replaces_previous_contents() -> Result<()> {
        let dir = TempDir::new()?;
        let store = Store::new(dir.path());

        store.save(&[Harvester { id: 1, name: "Ivan".into() }, Harvester { id: 2, name: "John".into() }])?;
        store.save(&[Harvester { id: 7, name: "Legolas".into() }])?;

        assert_eq!(store.load::<Harvester>()?, vec![Harvester { id: 7, name: "Legolas".into() }]);

        Ok(())
    }

    #[test]
    fn test_load_zero_byte_file_is_empty() -> Result<()> {
        let dir = TempDir::new()?;
        let store = Store::new(dir.path());
        fs::write(store.path::<HarvestEntry>(), "")?;

        assert!(store.load::<HarvestEntry>()?.is_empty());

        Ok(())
    }

    #[test]
    fn test_load_rejects_unexpected_columns() -> Result<()> {
        let dir = TempDir::new()?;
        let store = Store::new(dir.path());
        fs::write(store.path::<Harvester>(), "name,id\nIvan,1\n")?;

        match store.load::<Harvester>() {
            Err(StoreError::SchemaMismatch { found, .. }) => assert_eq!(found, vec!["name", "id"]),
            other => anyhow::bail!("expected a schema mismatch, got {:?}", other),
        }

        Ok(())
    }

    #[test]
    fn test_load_reads_whole_number_quantities() -> Result<()> {
        let dir = TempDir::new()?;
        let store = Store::new(dir.path());
        fs::write(
            store.path::<HarvestEntry>(),
            "name,id,date,day,quantity_kg,sacks\nIvan, 1 ,01-05-25,Thursday,60,3\n",
        )?;

        assert_eq!(store.load::<HarvestEntry>()?, vec![entry("Ivan", 1, "01-05-25", dec!(60), 3)]);

        Ok(())
    }

    #[test]
    fn test_quantities_round_trip_exactly() -> Result<()> {
        let dir = TempDir::new()?;
        let store = Store::new(dir.path());
        let rows = vec![
            entry("Ivan", 1, "01-05-25", dec!(12.3456789012345678), 1),
            entry("Ivan", 1, "01-05-25", dec!(0.1000000000000000055), 1),
            entry("Ivan", 1, "01-05-25", dec!(20000000000000000000), 1),
            entry("Ivan", 1, "01-05-25", dec!(40.50), 1),
        ];

        store.save(&rows)?;
        let loaded = store.load::<HarvestEntry>()?;

        assert_eq!(loaded, rows);
        let written: Vec<String> = loaded.iter().map(|e| e.quantity_kg.to_string()).collect();
        assert_eq!(written, vec!["12.3456789012345678", "0.1000000000000000055", "20000000000000000000", "40.50"]);

        Ok(())
    }
}
