//! CSV decoder for uploaded tables.
//!
//! Produces a loosely-typed [`Table`] of header names and optional cell
//! strings; typed interpretation happens in the ingest and merge stages.

use std::borrow::Cow;
use std::io::Read;

use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use tracing::debug;

use crate::error::{PipelineError, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Field values read as missing, matching the NA tokens spreadsheet exports
/// and dataframe tools commonly write.
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// An uploaded file: a display name plus its raw bytes.
#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Source {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Header row plus data rows; `None` marks a missing cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Position of the first header equal to `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Returns true when a raw field counts as a missing value.
pub fn is_missing(raw: &str) -> bool {
    NA_TOKENS.contains(&raw)
}

/// Decodes a CSV [`Source`] (optionally gzip-compressed) into a [`Table`].
///
/// Short records are padded with missing cells. Blank lines are skipped.
///
/// # Errors
///
/// Fails on undecodable input, on a file with no header row, and on any
/// record carrying more fields than the header.
pub fn parse_table(source: &Source) -> Result<Table> {
    let bytes = decompress(source)?;
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| parse_error(source, e))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() {
        return Err(PipelineError::EmptyInput(source.name.clone()));
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| parse_error(source, e))?;
        if record.len() > headers.len() {
            return Err(PipelineError::RaggedRow {
                source_name: source.name.clone(),
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                expected: headers.len(),
                found: record.len(),
            });
        }

        let mut row: Vec<Option<String>> = record
            .iter()
            .map(|field| (!is_missing(field)).then(|| field.to_string()))
            .collect();
        row.resize(headers.len(), None);
        rows.push(row);
    }

    debug!(
        source = %source.name,
        columns = headers.len(),
        rows = rows.len(),
        "Parsed table"
    );

    Ok(Table { headers, rows })
}

fn decompress(source: &Source) -> Result<Cow<'_, [u8]>> {
    if !source.bytes.starts_with(&GZIP_MAGIC) {
        return Ok(Cow::Borrowed(&source.bytes));
    }

    let mut out = Vec::new();
    GzDecoder::new(source.bytes.as_slice())
        .read_to_end(&mut out)
        .map_err(|e| PipelineError::Decompress {
            source_name: source.name.clone(),
            source: e,
        })?;
    debug!(source = %source.name, inflated = out.len(), "Decompressed gzip input");
    Ok(Cow::Owned(out))
}

fn parse_error(source: &Source, e: csv::Error) -> PipelineError {
    PipelineError::Parse {
        source_name: source.name.clone(),
        source: e,
    }
}
