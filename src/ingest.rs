//! Pitch-tracking ingestion.
//!
//! Reads one or more pitch-event CSV files, keeps the recognised columns,
//! drops rows without a batter and concatenates the survivors in input order.

use tracing::{debug, info, warn};

use crate::analyzers::types::{KorBb, PitchCall, PitchEvent, PlayResult};
use crate::error::{PipelineError, Result};
use crate::parser::{Source, Table, parse_table};

pub const BATTER: &str = "Batter";
pub const PLATE_LOC_HEIGHT: &str = "PlateLocHeight";
pub const PLATE_LOC_SIDE: &str = "PlateLocSide";
pub const PITCH_CALL: &str = "PitchCall";
pub const KOR_BB: &str = "KorBB";
pub const PLAY_RESULT: &str = "PlayResult";

/// Recognised pitch columns, in output order.
pub const PITCH_COLUMNS: [&str; 6] = [
    BATTER,
    PLATE_LOC_HEIGHT,
    PLATE_LOC_SIDE,
    PITCH_CALL,
    KOR_BB,
    PLAY_RESULT,
];

/// Concatenated pitch events plus the recognised columns that were present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PitchLog {
    pub columns: Vec<&'static str>,
    pub events: Vec<PitchEvent>,
}

impl PitchLog {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Column positions of the recognised fields within one file.
struct ColumnMap {
    batter: usize,
    height: Option<usize>,
    side: Option<usize>,
    pitch_call: Option<usize>,
    kor_bb: Option<usize>,
    play_result: Option<usize>,
}

impl ColumnMap {
    fn resolve(source: &Source, table: &Table) -> Result<Self> {
        let batter = table
            .column_index(BATTER)
            .ok_or_else(|| PipelineError::MissingColumn {
                source_name: source.name.clone(),
                column: BATTER,
            })?;

        Ok(Self {
            batter,
            height: table.column_index(PLATE_LOC_HEIGHT),
            side: table.column_index(PLATE_LOC_SIDE),
            pitch_call: table.column_index(PITCH_CALL),
            kor_bb: table.column_index(KOR_BB),
            play_result: table.column_index(PLAY_RESULT),
        })
    }

    fn present(&self) -> Vec<&'static str> {
        let optional = [
            (PLATE_LOC_HEIGHT, self.height),
            (PLATE_LOC_SIDE, self.side),
            (PITCH_CALL, self.pitch_call),
            (KOR_BB, self.kor_bb),
            (PLAY_RESULT, self.play_result),
        ];
        std::iter::once(BATTER)
            .chain(optional.into_iter().filter_map(|(name, idx)| idx.map(|_| name)))
            .collect()
    }
}

/// Loads a single pitch file and returns its rows that name a batter.
///
/// Header names are whitespace-trimmed before matching. Extra columns are
/// ignored.
///
/// Plate locations are validated on every kept row, including rows whose
/// pitch call never consults the zone. This is stricter than checking only
/// at the zone comparison: a malformed location anywhere rejects the file.
///
/// # Errors
///
/// Fails when the file cannot be parsed, lacks a `Batter` column, or holds a
/// non-numeric plate location.
pub fn load_pitch_file(source: &Source) -> Result<PitchLog> {
    let mut table = parse_table(source)?;
    for header in &mut table.headers {
        *header = header.trim().to_string();
    }

    let columns = ColumnMap::resolve(source, &table)?;
    let mut events = Vec::with_capacity(table.len());

    for (idx, row) in table.rows.iter().enumerate() {
        let Some(batter) = cell(row, Some(columns.batter)) else {
            continue;
        };
        // header is line 1
        let line = idx as u64 + 2;

        events.push(PitchEvent {
            batter: batter.to_string(),
            plate_loc_height: number(source, line, PLATE_LOC_HEIGHT, cell(row, columns.height))?,
            plate_loc_side: number(source, line, PLATE_LOC_SIDE, cell(row, columns.side))?,
            pitch_call: cell(row, columns.pitch_call).map(PitchCall::from),
            kor_bb: cell(row, columns.kor_bb).map(KorBb::from),
            play_result: cell(row, columns.play_result).map(PlayResult::from),
        });
    }

    debug!(
        source = %source.name,
        rows = table.len(),
        kept = events.len(),
        "Filtered pitch file"
    );

    Ok(PitchLog {
        columns: columns.present(),
        events,
    })
}

/// Loads every pitch file in order and concatenates their events.
///
/// Files with no batter rows are skipped. When nothing survives, the result
/// is empty but still lists the full recognised column set.
///
/// # Errors
///
/// The first file that fails to load aborts the whole operation.
pub fn load_and_filter_pitches(sources: &[Source]) -> Result<PitchLog> {
    let mut columns: Vec<&'static str> = Vec::new();
    let mut events = Vec::new();
    let mut retained_files = 0usize;

    for source in sources {
        let log = load_pitch_file(source)?;
        // every kept row has a batter, so an all-missing table is an empty one
        if log.is_empty() {
            warn!(source = %source.name, "Pitch file has no batter rows, skipping");
            continue;
        }

        retained_files += 1;
        for column in log.columns {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        events.extend(log.events);
    }

    if retained_files == 0 {
        info!(files = sources.len(), "No pitch rows retained");
        return Ok(PitchLog {
            columns: PITCH_COLUMNS.to_vec(),
            events,
        });
    }

    columns.sort_by_key(|c| PITCH_COLUMNS.iter().position(|p| p == c));

    info!(
        files = sources.len(),
        retained_files,
        events = events.len(),
        "Loaded pitch events"
    );

    Ok(PitchLog { columns, events })
}

fn cell(row: &[Option<String>], idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| row.get(i)).and_then(|v| v.as_deref())
}

fn number(
    source: &Source,
    line: u64,
    column: &'static str,
    raw: Option<&str>,
) -> Result<Option<f64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    raw.trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| PipelineError::InvalidNumber {
            source_name: source.name.clone(),
            line,
            column,
            value: raw.to_string(),
        })
}
