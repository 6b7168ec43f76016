use decision_grader::analyzers::analyzer::{
    XLSX_CONTENT_TYPE, build_merged_table, handle_upload, score_pitch_files,
};
use decision_grader::analyzers::merge::{MergedTable, PLAYER_FULL_NAME};
use decision_grader::analyzers::types::Grade;
use decision_grader::config::ExportConfig;
use decision_grader::error::PipelineError;
use decision_grader::parser::Source;

fn fixture(name: &str, bytes: &[u8]) -> Source {
    Source::new(name, bytes.to_vec())
}

fn game1() -> Source {
    fixture("game1.csv", include_bytes!("fixtures/game1.csv"))
}

fn game2() -> Source {
    fixture("game2.csv", include_bytes!("fixtures/game2.csv"))
}

fn header_only() -> Source {
    fixture("header_only.csv", include_bytes!("fixtures/header_only.csv"))
}

fn roster() -> Source {
    fixture("roster.csv", include_bytes!("fixtures/roster.csv"))
}

fn roster_full() -> Source {
    fixture("roster_full.csv", include_bytes!("fixtures/roster_full.csv"))
}

fn full_names(table: &MergedTable) -> Vec<Option<&str>> {
    table
        .rows
        .iter()
        .map(|r| table.value(r, PLAYER_FULL_NAME))
        .collect()
}

#[test]
fn test_two_batters_one_unmatched_player() {
    let outcome = build_merged_table(&[game1(), header_only()], &roster()).unwrap();
    let table = &outcome.table;

    assert_eq!(table.len(), 3);
    assert_eq!(
        full_names(table),
        vec![Some("John Smith"), Some(" Jane Doe "), Some("Bob Lee")]
    );

    assert_eq!(table.rows[0].grade(), Some(Grade::CPlus));
    assert_eq!(table.rows[0].decision_score(), Some(0.25));
    assert_eq!(table.rows[1].grade(), Some(Grade::CMinus));
    assert_eq!(table.rows[1].decision_score(), Some(-2.0));
    assert_eq!(table.rows[2].score, None);

    assert_eq!(
        table.columns(),
        vec![
            "playerId",
            "playerFirstName",
            "Grade",
            "decisionScore",
            "playerLastName",
            "playerFullName",
            "PA"
        ]
    );

    assert_eq!(outcome.report.pitch_events, 2);
    assert_eq!(outcome.report.matched, 2);
    assert_eq!(outcome.report.unmatched, 1);
}

#[test]
fn test_multi_file_scoring() {
    let scored = score_pitch_files(&[game1(), game2()]).unwrap();
    let lookup = |raw: &str| {
        scored
            .batters
            .iter()
            .find(|b| b.batter == raw)
            .map(|b| (b.decision_score, b.grade, b.normalized_name.as_str()))
    };

    assert_eq!(scored.pitch_events, 7);
    assert_eq!(scored.batters.len(), 4);
    assert_eq!(lookup("Lee, Bob"), Some((3.0, Grade::APlus, "Bob Lee")));
    assert_eq!(lookup("O'Brien, Pat"), Some((-1.25, Grade::CMinus, "Pat O'Brien")));
    assert_eq!(lookup("Smith, John"), Some((0.25, Grade::CPlus, "John Smith")));
}

#[test]
fn test_full_roster_sorted_by_score() {
    let outcome = build_merged_table(&[game1(), game2()], &roster_full()).unwrap();
    assert_eq!(
        full_names(&outcome.table),
        vec![
            Some("Bob Lee"),
            Some("John Smith"),
            Some("Pat O'Brien"),
            Some("Ann Ray")
        ]
    );
    assert_eq!(outcome.table.rows[3].score, None);
}

#[test]
fn test_rerun_is_deterministic() {
    let first = build_merged_table(&[game1(), game2()], &roster_full()).unwrap();
    let second = build_merged_table(&[game1(), game2()], &roster_full()).unwrap();

    assert_eq!(first.table, second.table);
    assert_eq!(first.report.batters, second.report.batters);
}

#[test]
fn test_empty_pitch_input_merges_all_missing() {
    let outcome = build_merged_table(&[header_only()], &roster()).unwrap();
    assert_eq!(outcome.table.len(), 3);
    assert_eq!(outcome.table.matched(), 0);
    assert!(outcome.report.batters.is_empty());
}

#[test]
fn test_handle_upload_returns_workbook() {
    let document = handle_upload(&[game1(), game2()], &roster_full(), &ExportConfig::default()).unwrap();

    assert_eq!(document.file_name, "players_stats.xlsx");
    assert_eq!(document.content_type, XLSX_CONTENT_TYPE);
    assert!(document.bytes.starts_with(b"PK"));
    assert_eq!(document.report.roster_rows, 4);
}

#[test]
fn test_missing_roster_column_aborts() {
    let roster = Source::new("roster.csv", "playerFullName\nJohn Smith\n");
    let err = handle_upload(&[game1()], &roster, &ExportConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::MissingColumn { column: "playerFirstName", .. }));
}

#[test]
fn test_malformed_pitch_file_aborts() {
    let bad = Source::new("bad.csv", "Batter,PitchCall\n\"Smith, John\",BallCalled,extra\n");
    let err = handle_upload(&[game1(), bad], &roster(), &ExportConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::RaggedRow { .. }));
}
