//! Data types shared by the scoring and merge stages.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::analyzers::grade::grade;
use crate::analyzers::names::normalize_name;

/// Outcome of a single pitch as recorded in the `PitchCall` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PitchCall {
    BallCalled,
    StrikeCalled,
    StrikeSwinging,
    Other(String),
}

impl From<&str> for PitchCall {
    fn from(label: &str) -> Self {
        match label {
            "BallCalled" => PitchCall::BallCalled,
            "StrikeCalled" => PitchCall::StrikeCalled,
            "StrikeSwinging" => PitchCall::StrikeSwinging,
            other => PitchCall::Other(other.to_string()),
        }
    }
}

/// Plate-appearance-ending strikeout or walk marker (`KorBB` column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KorBb {
    Strikeout,
    Other(String),
}

impl From<&str> for KorBb {
    fn from(label: &str) -> Self {
        match label {
            "Strikeout" => KorBb::Strikeout,
            other => KorBb::Other(other.to_string()),
        }
    }
}

/// Ball-in-play outcome (`PlayResult` column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayResult {
    HomeRun,
    Other(String),
}

impl From<&str> for PlayResult {
    fn from(label: &str) -> Self {
        match label {
            "HomeRun" => PlayResult::HomeRun,
            other => PlayResult::Other(other.to_string()),
        }
    }
}

/// One row of pitch-tracking data. Every event carries a batter name.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchEvent {
    pub batter: String,
    pub plate_loc_height: Option<f64>,
    pub plate_loc_side: Option<f64>,
    pub pitch_call: Option<PitchCall>,
    pub kor_bb: Option<KorBb>,
    pub play_result: Option<PlayResult>,
}

impl PitchEvent {
    pub fn is_strikeout(&self) -> bool {
        matches!(self.kor_bb, Some(KorBb::Strikeout))
    }

    pub fn is_home_run(&self) -> bool {
        matches!(self.play_result, Some(PlayResult::HomeRun))
    }
}

#[cfg(test)]
impl PitchEvent {
    /// An event with only the batter set.
    pub(crate) fn new(batter: impl Into<String>) -> Self {
        Self {
            batter: batter.into(),
            plate_loc_height: None,
            plate_loc_side: None,
            pitch_call: None,
            kor_bb: None,
            play_result: None,
        }
    }

    pub(crate) fn with_pitch_call(mut self, call: &str) -> Self {
        self.pitch_call = Some(PitchCall::from(call));
        self
    }

    pub(crate) fn with_kor_bb(mut self, value: &str) -> Self {
        self.kor_bb = Some(KorBb::from(value));
        self
    }

    pub(crate) fn with_play_result(mut self, value: &str) -> Self {
        self.play_result = Some(PlayResult::from(value));
        self
    }

    pub(crate) fn with_location(mut self, height: f64, side: f64) -> Self {
        self.plate_loc_height = Some(height);
        self.plate_loc_side = Some(side);
        self
    }
}

/// Ordered letter grade, worst (`CMinus`) to best (`APlus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::CMinus => "C-",
            Grade::C => "C",
            Grade::CPlus => "C+",
            Grade::BMinus => "B-",
            Grade::B => "B",
            Grade::BPlus => "B+",
            Grade::AMinus => "A-",
            Grade::A => "A",
            Grade::APlus => "A+",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final score for one distinct raw batter name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatterScore {
    #[serde(rename = "Batter")]
    pub batter: String,
    #[serde(rename = "NormalizedName")]
    pub normalized_name: String,
    #[serde(rename = "decisionScore")]
    pub decision_score: f64,
    #[serde(rename = "Grade")]
    pub grade: Grade,
}

impl BatterScore {
    /// Derives the join key and grade from a finished score.
    pub fn new(batter: impl Into<String>, decision_score: f64) -> Self {
        let batter = batter.into();
        Self {
            normalized_name: normalize_name(&batter),
            grade: grade(decision_score),
            batter,
            decision_score,
        }
    }
}

/// Per-run summary logged after an export.
#[derive(Debug, Serialize)]
pub struct ScoreReport {
    pub generated_at: DateTime<Utc>,
    pub pitch_events: usize,
    pub roster_rows: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub batters: Vec<BatterScore>,
}
