use std::path::{Path, PathBuf};

const TABLES_DIR: &str = "tables";
const REPORTS_DIR: &str = "summaries";

/// Where the tables and summary reports live, plus the few knobs the menu needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub tables_dir: PathBuf,
    pub reports_dir: PathBuf,
    /// Persist the entries accepted so far when the entry loop hits a malformed number.
    pub keep_entries_on_input_error: bool,
}

impl Settings {
    pub fn rooted_at(root: &Path) -> Settings {
        Settings {
            tables_dir: root.join(TABLES_DIR),
            reports_dir: root.join(REPORTS_DIR),
            keep_entries_on_input_error: false,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            tables_dir: PathBuf::from(TABLES_DIR),
            reports_dir: PathBuf::from(REPORTS_DIR),
            keep_entries_on_input_error: false,
        }
    }
}
