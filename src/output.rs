//! Output persistence and run summaries.
//!
//! Supports pretty-printing, JSON serialization, per-batter CSV, and writing
//! the rendered workbook to disk.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::analyzers::types::{BatterScore, ScoreReport};
use csv::WriterBuilder;
use std::fs;
use std::path::Path;

/// Logs a run summary using Rust's debug pretty-print format.
pub fn print_pretty(report: &ScoreReport) {
    debug!("{:#?}", report);
}

/// Logs a run summary as pretty-printed JSON.
pub fn print_json(report: &ScoreReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes one CSV row per batter, replacing any existing file.
pub fn write_scores_csv(path: &str, batters: &[BatterScore]) -> Result<()> {
    debug!(path, batters = batters.len(), "Writing score CSV");

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open {path}"))?;

    for batter in batters {
        writer.serialize(batter)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes a rendered document, creating parent directories as needed.
pub fn write_document(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("failed writing workbook to {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "Workbook written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::env;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn report() -> ScoreReport {
        ScoreReport {
            generated_at: Utc::now(),
            pitch_events: 2,
            roster_rows: 1,
            matched: 1,
            unmatched: 0,
            batters: vec![BatterScore::new("Smith, John", 0.25)],
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&report());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&report()).unwrap();
    }

    #[test]
    fn test_report_json_uses_column_names() {
        let json = serde_json::to_value(report()).unwrap();
        let batter = &json["batters"][0];
        assert_eq!(batter["Batter"], "Smith, John");
        assert_eq!(batter["NormalizedName"], "John Smith");
        assert_eq!(batter["decisionScore"], 0.25);
        assert_eq!(batter["Grade"], "C+");
    }

    #[test]
    fn test_write_scores_csv() {
        let path = temp_path("decision_grader_test_scores.csv");
        let _ = fs::remove_file(&path);

        let batters = vec![
            BatterScore::new("Smith, John", 0.25),
            BatterScore::new("Doe, Jane", -2.0),
        ];
        write_scores_csv(&path, &batters).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Batter,NormalizedName,decisionScore,Grade");
        assert_eq!(lines[1], "\"Smith, John\",John Smith,0.25,C+");
        assert_eq!(lines[2], "\"Doe, Jane\",Jane Doe,-2.0,C-");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_document_creates_parent_dirs() {
        let dir = temp_path("decision_grader_test_out");
        let _ = fs::remove_dir_all(&dir);
        let path = Path::new(&dir).join("nested").join("players_stats.xlsx");

        write_document(&path, b"PK").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"PK");
        fs::remove_dir_all(&dir).unwrap();
    }
}
