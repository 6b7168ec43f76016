//! Spreadsheet rendering of the merged roster.
//!
//! One sheet: bold header, roster columns typed as numbers when the whole
//! column is numeric, a red-yellow-green scale over `decisionScore`, and a
//! grey fill on the `Grade`/`decisionScore` cells of unscored rows.

use rust_xlsxwriter::{
    Color, ConditionalFormat3ColorScale, ConditionalFormatType, Format, FormatAlign,
    FormatBorder, Workbook, Worksheet,
};
use tracing::debug;

use crate::analyzers::merge::MergedTable;
use crate::error::Result;

pub const SCALE_MIN_COLOR: u32 = 0xF8696B;
pub const SCALE_MID_COLOR: u32 = 0xFFEB84;
pub const SCALE_MAX_COLOR: u32 = 0x63BE7B;
pub const MISSING_SCORE_FILL: u32 = 0xD3D3D3;

/// Renders `table` as an in-memory `.xlsx` document.
///
/// # Errors
///
/// Returns [`PipelineError::Workbook`](crate::error::PipelineError::Workbook)
/// for an invalid sheet name or any writer failure.
pub fn render_workbook(table: &MergedTable, sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name)?;
    write_sheet(sheet, table)?;

    let bytes = workbook.save_to_buffer()?;
    debug!(sheet_name, rows = table.len(), bytes = bytes.len(), "Rendered workbook");
    Ok(bytes)
}

fn write_sheet(sheet: &mut Worksheet, table: &MergedTable) -> Result<()> {
    let header = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);
    let missing = Format::new().set_background_color(Color::RGB(MISSING_SCORE_FILL));

    for (col, name) in table.columns().iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    let numeric: Vec<bool> = (0..table.roster_headers.len())
        .map(|idx| is_numeric_column(table, idx))
        .collect();
    let grade_col = table.grade_column() as u16;
    let score_col = table.score_column() as u16;

    for (i, row) in table.rows.iter().enumerate() {
        let r = i as u32 + 1;

        for (idx, value) in row.values.iter().enumerate() {
            let Some(value) = value else { continue };
            let c = table.output_column(idx) as u16;
            match as_number(value).filter(|_| numeric[idx]) {
                Some(n) => sheet.write_number(r, c, n)?,
                None => sheet.write_string(r, c, value)?,
            };
        }

        match row.score {
            Some(entry) => {
                sheet.write_string(r, grade_col, entry.grade.as_str())?;
                sheet.write_number(r, score_col, entry.decision_score)?;
            }
            None => {
                sheet.write_blank(r, grade_col, &missing)?;
                sheet.write_blank(r, score_col, &missing)?;
            }
        }
    }

    if !table.is_empty() {
        let scale = ConditionalFormat3ColorScale::new()
            .set_minimum(ConditionalFormatType::Lowest, 0)
            .set_midpoint(ConditionalFormatType::Percentile, 50)
            .set_maximum(ConditionalFormatType::Highest, 0)
            .set_minimum_color(Color::RGB(SCALE_MIN_COLOR))
            .set_midpoint_color(Color::RGB(SCALE_MID_COLOR))
            .set_maximum_color(Color::RGB(SCALE_MAX_COLOR));
        sheet.add_conditional_format(1, score_col, table.len() as u32, score_col, &scale)?;
    }

    Ok(())
}

/// A roster column is numeric when every present value parses as a finite number.
fn is_numeric_column(table: &MergedTable, idx: usize) -> bool {
    table
        .rows
        .iter()
        .filter_map(|row| row.values.get(idx).and_then(|v| v.as_deref()))
        .all(|v| as_number(v).is_some())
}

fn as_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::merge::{build_score_index, merge_scores};
    use crate::analyzers::types::BatterScore;
    use crate::parser::Table;
    use std::io::{Cursor, Read};

    fn merged(rows: &[[&str; 3]]) -> MergedTable {
        let roster = Table {
            headers: vec![
                "playerFirstName".to_string(),
                "playerFullName".to_string(),
                "PA".to_string(),
            ],
            rows: rows
                .iter()
                .map(|r| r.iter().map(|v| (!v.is_empty()).then(|| v.to_string())).collect())
                .collect(),
        };
        let index = build_score_index(&[
            BatterScore::new("Smith, John", 0.25),
            BatterScore::new("Doe, Jane", -2.0),
        ]);
        merge_scores(&roster, "roster.csv", &index).unwrap()
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut xml = String::new();
        part.read_to_string(&mut xml).unwrap();
        xml
    }

    fn attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
        let key = format!(" {name}=\"");
        let start = tag.find(&key)? + key.len();
        let len = tag[start..].find('"')?;
        Some(&tag[start..start + len])
    }

    /// Style index of the cell at `cell_ref`, if it carries one.
    fn cell_style<'a>(sheet_xml: &'a str, cell_ref: &str) -> Option<&'a str> {
        let start = sheet_xml.find(&format!("<c r=\"{cell_ref}\""))?;
        let end = start + sheet_xml[start..].find('>')?;
        attr(&sheet_xml[start..end], "s")
    }

    /// Pattern-fill XML referenced by cell style `style`.
    fn style_fill(styles_xml: &str, style: usize) -> String {
        let xfs_start = styles_xml.find("<cellXfs").unwrap();
        let xfs_end = xfs_start + styles_xml[xfs_start..].find("</cellXfs>").unwrap();
        let xf = styles_xml[xfs_start..xfs_end].split("<xf ").nth(style + 1).unwrap();
        let fill_id: usize = attr(&format!(" {xf}"), "fillId").unwrap().parse().unwrap();

        let fills_start = styles_xml.find("<fills").unwrap();
        let fills_end = fills_start + styles_xml[fills_start..].find("</fills>").unwrap();
        styles_xml[fills_start..fills_end]
            .split("<fill>")
            .nth(fill_id + 1)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_score_column_gets_color_scale() {
        let table = merged(&[
            ["Bob", "Bob Lee", "3"],
            ["John", "John Smith", "12"],
            ["Jane", "Jane Doe", "7"],
        ]);
        let bytes = render_workbook(&table, "TruMedia").unwrap();
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");

        assert!(sheet.contains(r#"<conditionalFormatting sqref="C2:C4">"#));
        assert!(sheet.contains(r#"<cfvo type="min""#));
        assert!(sheet.contains(r#"<cfvo type="percentile" val="50""#));
        assert!(sheet.contains(r#"<cfvo type="max""#));
        let min = sheet.find("FFF8696B").unwrap();
        let mid = sheet.find("FFFFEB84").unwrap();
        let max = sheet.find("FF63BE7B").unwrap();
        assert!(min < mid && mid < max);
    }

    #[test]
    fn test_unscored_row_is_filled_grey() {
        let table = merged(&[
            ["Bob", "Bob Lee", "3"],
            ["John", "John Smith", "12"],
            ["Jane", "Jane Doe", "7"],
        ]);
        let bytes = render_workbook(&table, "TruMedia").unwrap();
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        let styles = read_part(&bytes, "xl/styles.xml");

        // Bob Lee has no score and sorts to row 4
        let grade_style = cell_style(&sheet, "B4").unwrap();
        assert_eq!(cell_style(&sheet, "C4"), Some(grade_style));

        let fill = style_fill(&styles, grade_style.parse().unwrap());
        assert!(fill.contains(r#"patternType="solid""#));
        assert!(fill.contains(r#"rgb="FFD3D3D3""#));

        for scored in ["B2", "C2", "B3", "C3"] {
            assert_ne!(cell_style(&sheet, scored), Some(grade_style), "{scored}");
        }
    }

    #[test]
    fn test_empty_roster_has_no_color_scale() {
        let table = merged(&[]);
        let bytes = render_workbook(&table, "TruMedia").unwrap();
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(!sheet.contains("conditionalFormatting"));
        assert!(!sheet.contains("colorScale"));
    }

    #[test]
    fn test_render_produces_xlsx_zip() {
        let table = merged(&[["John", "John Smith", "12"], ["Bob", "Bob Lee", ""]]);
        let bytes = render_workbook(&table, "TruMedia").unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_render_empty_roster() {
        let table = merged(&[]);
        let bytes = render_workbook(&table, "TruMedia").unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_invalid_sheet_name_fails() {
        let table = merged(&[["John", "John Smith", "12"]]);
        assert!(render_workbook(&table, "bad[name]").is_err());
    }

    #[test]
    fn test_numeric_column_detection() {
        let table = merged(&[["John", "John Smith", "12"], ["Bob", "Bob Lee", " 3.5"]]);
        assert!(!is_numeric_column(&table, 0));
        assert!(is_numeric_column(&table, 2));

        let mixed = merged(&[["John", "John Smith", "12"], ["Bob", "Bob Lee", "n/a?"]]);
        assert!(!is_numeric_column(&mixed, 2));
    }

    #[test]
    fn test_non_finite_values_stay_text() {
        assert_eq!(as_number("inf"), None);
        assert_eq!(as_number("-0.5"), Some(-0.5));
    }
}
