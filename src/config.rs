//! Export settings resolved from the environment.

pub const DEFAULT_SHEET_NAME: &str = "TruMedia";
pub const DEFAULT_EXPORT_FILE: &str = "players_stats.xlsx";
pub const DEFAULT_LOG_FILE: &str = "logs/decision_grader.log";

pub const SHEET_NAME_VAR: &str = "DECISION_SHEET_NAME";
pub const EXPORT_FILE_VAR: &str = "DECISION_EXPORT_FILE";
pub const LOG_FILE_VAR: &str = "LOG_FILE_PATH";

/// Names used for the rendered workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub sheet_name: String,
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            file_name: DEFAULT_EXPORT_FILE.to_string(),
        }
    }
}

impl ExportConfig {
    /// Reads `DECISION_SHEET_NAME` and `DECISION_EXPORT_FILE`, falling back
    /// to the defaults for unset or blank values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            sheet_name: read(SHEET_NAME_VAR, DEFAULT_SHEET_NAME),
            file_name: read(EXPORT_FILE_VAR, DEFAULT_EXPORT_FILE),
        }
    }

    /// Replaces the sheet name when one is given on the command line.
    pub fn with_sheet_name(mut self, sheet_name: Option<String>) -> Self {
        if let Some(sheet_name) = sheet_name {
            self.sheet_name = sheet_name;
        }
        self
    }
}

/// Log file location from `LOG_FILE_PATH`.
pub fn log_file_path() -> String {
    std::env::var(LOG_FILE_VAR).unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string())
}
