use chrono::Utc;
use tracing::{error, info};

use crate::analyzers::merge::{MergedTable, build_score_index, merge_scores};
use crate::analyzers::scoring::calculate_batter_scores;
use crate::analyzers::types::{BatterScore, ScoreReport};
use crate::config::ExportConfig;
use crate::error::Result;
use crate::export::render_workbook;
use crate::ingest::load_and_filter_pitches;
use crate::parser::{Source, parse_table};

/// MIME type of the rendered workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Graded batters from one or more pitch files.
#[derive(Debug, Clone)]
pub struct ScoredPitches {
    pub pitch_events: usize,
    pub batters: Vec<BatterScore>,
}

/// Roster enriched with scores, plus the run summary.
#[derive(Debug)]
pub struct MergeOutcome {
    pub table: MergedTable,
    pub report: ScoreReport,
}

/// A finished workbook ready to be offered as a download.
#[derive(Debug)]
pub struct ExportDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    pub report: ScoreReport,
}

/// Ingests pitch files and grades every batter seen.
pub fn score_pitch_files(pitch_files: &[Source]) -> Result<ScoredPitches> {
    let log = load_and_filter_pitches(pitch_files)?;
    let batters = calculate_batter_scores(&log.events).into_batter_scores();

    info!(
        pitch_events = log.len(),
        batters = batters.len(),
        "Scored batters"
    );

    Ok(ScoredPitches {
        pitch_events: log.len(),
        batters,
    })
}

/// Scores the pitch files and merges the result into the roster.
pub fn build_merged_table(pitch_files: &[Source], roster: &Source) -> Result<MergeOutcome> {
    let scored = score_pitch_files(pitch_files)?;
    let index = build_score_index(&scored.batters);

    let roster_table = parse_table(roster)?;
    let table = merge_scores(&roster_table, &roster.name, &index)?;

    let report = ScoreReport {
        generated_at: Utc::now(),
        pitch_events: scored.pitch_events,
        roster_rows: table.len(),
        matched: table.matched(),
        unmatched: table.len() - table.matched(),
        batters: scored.batters,
    };

    Ok(MergeOutcome { table, report })
}

/// Runs one full export: ingest, score, grade, merge, render.
///
/// Holds no state between calls. Any stage failure is logged and returned;
/// no document is produced in that case.
#[tracing::instrument(skip_all, fields(pitch_files = pitch_files.len(), roster = %roster.name))]
pub fn handle_upload(
    pitch_files: &[Source],
    roster: &Source,
    config: &ExportConfig,
) -> Result<ExportDocument> {
    let result = build_merged_table(pitch_files, roster).and_then(|outcome| {
        let bytes = render_workbook(&outcome.table, &config.sheet_name)?;
        Ok(ExportDocument {
            file_name: config.file_name.clone(),
            content_type: XLSX_CONTENT_TYPE,
            bytes,
            report: outcome.report,
        })
    });

    match &result {
        Ok(document) => info!(
            file_name = %document.file_name,
            bytes = document.bytes.len(),
            matched = document.report.matched,
            unmatched = document.report.unmatched,
            "Export complete"
        ),
        Err(e) => error!(error = %e, "Export failed"),
    }

    result
}
