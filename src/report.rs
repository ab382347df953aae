use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use prettytable::{format, row, Cell, Row, Table};

use crate::data::HarvestEntry;

/// A borderless table, columns separated by padding only.
pub fn clean_table() -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table
}

/// The ledger as shown by the "show harvest table" menu option.
pub fn ledger_table(entries: &[HarvestEntry]) -> String {
    let mut table = clean_table();
    table.set_titles(row!["", "name", r->"id", r->"date", "day", r->"quantity_kg", r->"sacks"]);

    for (index, entry) in entries.iter().enumerate() {
        let cells = vec![
            Cell::new(&index.to_string()).style_spec("r"),
            Cell::new(&entry.name),
            Cell::new(&entry.id.to_string()).style_spec("r"),
            Cell::new(&entry.date).style_spec("r"),
            Cell::new(&entry.day),
            Cell::new(&entry.quantity_kg.to_string()).style_spec("r"),
            Cell::new(&entry.sacks.to_string()).style_spec("r"),
        ];
        table.add_row(Row::new(cells));
    }

    table.to_string().trim_end().to_string()
}

/// Writes `contents` to `dir/file_name`, creating `dir` when needed.
pub fn write_report(dir: &Path, file_name: &str, contents: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let path = dir.join(file_name);
    fs::write(&path, contents)?;
    info!("report written, path={}", path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    use super::*;

    fn words(table: &str) -> Vec<Vec<&str>> {
        table.lines().map(|line| line.split_whitespace().collect()).collect()
    }

    #[test]
    fn test_ledger_table_lists_every_entry() {
        let entries = vec![HarvestEntry {
            name: "Ivan".into(),
            id: 1,
            date: "01-05-25".into(),
            day: "Thursday".into(),
            quantity_kg: dec!(60.0),
            sacks: 3,
        }];

        assert_eq!(
            words(&ledger_table(&entries)),
            vec![
                vec!["name", "id", "date", "day", "quantity_kg", "sacks"],
                vec!["0", "Ivan", "1", "01-05-25", "Thursday", "60.0", "3"],
            ]
        );
    }

    #[test]
    fn test_ledger_table_right_aligns_numbers() {
        let entries: Vec<HarvestEntry> = [("Ivan", dec!(5.5)), ("Legolas", dec!(120.25))]
            .iter()
            .enumerate()
            .map(|(i, (name, quantity_kg))| HarvestEntry {
                name: name.to_string(),
                id: i as u32 + 1,
                date: "01-05-25".into(),
                day: "Thursday".into(),
                quantity_kg: *quantity_kg,
                sacks: 2,
            })
            .collect();

        let table = ledger_table(&entries);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        let end_of = |line: &str, cell: &str| line.find(cell).map(|at| at + cell.len());
        assert_eq!(end_of(lines[1], "5.5"), end_of(lines[2], "120.25"));
        assert_eq!(lines[1].find("Ivan"), lines[2].find("Legolas"));
    }

    #[test]
    fn test_write_report_creates_directory() -> Result<()> {
        let dir = TempDir::new()?;
        let reports = dir.path().join("summaries");

        let path = write_report(&reports, "summary_01-05-25.txt", "hello\n")?;

        assert_eq!(path, reports.join("summary_01-05-25.txt"));
        assert_eq!(fs::read_to_string(path)?, "hello\n");

        Ok(())
    }
}
