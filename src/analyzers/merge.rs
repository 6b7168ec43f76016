//! Joins batter scores onto the roster table by full player name.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, info};

use crate::analyzers::types::{BatterScore, Grade};
use crate::error::{PipelineError, Result};
use crate::parser::Table;

pub const PLAYER_FULL_NAME: &str = "playerFullName";
pub const PLAYER_FIRST_NAME: &str = "playerFirstName";
pub const GRADE_COLUMN: &str = "Grade";
pub const SCORE_COLUMN: &str = "decisionScore";

/// Roster columns that the merge always regenerates.
const REPLACED_COLUMNS: [&str; 3] = [GRADE_COLUMN, SCORE_COLUMN, "NormalizedName"];

/// Grade and score attached to a matched roster row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEntry {
    pub grade: Grade,
    pub decision_score: f64,
}

/// Maps normalized batter names to their scores.
///
/// When two raw names normalize to the same key, the later one wins.
pub fn build_score_index(batters: &[BatterScore]) -> HashMap<String, ScoreEntry> {
    let mut index = HashMap::with_capacity(batters.len());
    for batter in batters {
        let previous = index.insert(
            batter.normalized_name.clone(),
            ScoreEntry {
                grade: batter.grade,
                decision_score: batter.decision_score,
            },
        );
        if previous.is_some() {
            debug!(name = %batter.normalized_name, raw = %batter.batter, "Duplicate normalized name, keeping latest");
        }
    }
    index
}

/// A roster row with its (possibly missing) score.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRow {
    pub values: Vec<Option<String>>,
    pub score: Option<ScoreEntry>,
}

impl PlayerRow {
    pub fn grade(&self) -> Option<Grade> {
        self.score.map(|s| s.grade)
    }

    pub fn decision_score(&self) -> Option<f64> {
        self.score.map(|s| s.decision_score)
    }
}

/// Roster rows enriched with `Grade` and `decisionScore`, sorted by score.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable {
    /// Roster headers, without the inserted columns.
    pub roster_headers: Vec<String>,
    pub rows: Vec<PlayerRow>,
    insert_at: usize,
}

impl MergedTable {
    /// Output column of `Grade`.
    pub fn grade_column(&self) -> usize {
        self.insert_at
    }

    /// Output column of `decisionScore`.
    pub fn score_column(&self) -> usize {
        self.insert_at + 1
    }

    /// Output column for the roster column at `roster_idx`.
    pub fn output_column(&self, roster_idx: usize) -> usize {
        if roster_idx < self.insert_at {
            roster_idx
        } else {
            roster_idx + 2
        }
    }

    /// Full output header row.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = self.roster_headers.iter().map(String::as_str).collect();
        columns.insert(self.insert_at, SCORE_COLUMN);
        columns.insert(self.insert_at, GRADE_COLUMN);
        columns
    }

    /// Value of a named roster column in `row`.
    pub fn value<'a>(&self, row: &'a PlayerRow, column: &str) -> Option<&'a str> {
        let idx = self.roster_headers.iter().position(|h| h == column)?;
        row.values.get(idx).and_then(|v| v.as_deref())
    }

    pub fn matched(&self) -> usize {
        self.rows.iter().filter(|r| r.score.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Attaches scores to every roster row and sorts by `decisionScore`
/// descending.
///
/// `playerFullName` is trimmed and matched exactly against the index. The
/// new columns sit right after `playerFirstName`. Rows without a score sort
/// after every scored row; ties keep roster order.
///
/// # Errors
///
/// Fails if the roster lacks `playerFullName` or `playerFirstName`.
pub fn merge_scores(
    roster: &Table,
    source_name: &str,
    index: &HashMap<String, ScoreEntry>,
) -> Result<MergedTable> {
    let missing = |column| PipelineError::MissingColumn {
        source_name: source_name.to_string(),
        column,
    };
    let full_name_idx = roster
        .column_index(PLAYER_FULL_NAME)
        .ok_or_else(|| missing(PLAYER_FULL_NAME))?;
    if roster.column_index(PLAYER_FIRST_NAME).is_none() {
        return Err(missing(PLAYER_FIRST_NAME));
    }

    let kept: Vec<usize> = (0..roster.headers.len())
        .filter(|&i| !REPLACED_COLUMNS.contains(&roster.headers[i].as_str()))
        .collect();
    let roster_headers: Vec<String> = kept.iter().map(|&i| roster.headers[i].clone()).collect();
    let insert_at = roster_headers
        .iter()
        .position(|h| h == PLAYER_FIRST_NAME)
        .map(|i| i + 1)
        .ok_or_else(|| missing(PLAYER_FIRST_NAME))?;

    let mut rows: Vec<PlayerRow> = roster
        .rows
        .iter()
        .map(|row| {
            let score = row
                .get(full_name_idx)
                .and_then(|v| v.as_deref())
                .and_then(|name| index.get(name.trim()).copied());
            PlayerRow {
                values: kept.iter().map(|&i| row.get(i).cloned().flatten()).collect(),
                score,
            }
        })
        .collect();

    rows.sort_by(|a, b| by_score_descending(a.decision_score(), b.decision_score()));

    let merged = MergedTable {
        roster_headers,
        rows,
        insert_at,
    };

    info!(
        roster_rows = merged.len(),
        matched = merged.matched(),
        "Merged scores into roster"
    );

    Ok(merged)
}

fn by_score_descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
