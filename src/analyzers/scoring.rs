use crate::analyzers::types::{BatterScore, PitchCall, PitchEvent};
use std::collections::HashMap;

pub const BALL_TAKEN: f64 = 0.25;
pub const CALLED_STRIKEOUT: f64 = -2.0;
pub const SWINGING_STRIKEOUT: f64 = -1.5;
pub const CHASE: f64 = -1.0;
pub const HOME_RUN: f64 = 4.0;

/// Rectangular reference strike zone, in feet. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub bottom: f64,
    pub top: f64,
    pub left: f64,
    pub right: f64,
}

impl Zone {
    pub fn contains(&self, height: f64, side: f64) -> bool {
        (self.bottom..=self.top).contains(&height) && (self.left..=self.right).contains(&side)
    }
}

pub const STRIKE_ZONE: Zone = Zone {
    bottom: 1.5,
    top: 3.6,
    left: -0.75,
    right: 0.75,
};

/// Score contribution of a single pitch.
///
/// The pitch-call clauses are exclusive and checked in order; the home-run
/// bonus is added on top of whichever clause fired.
pub fn pitch_value(event: &PitchEvent) -> f64 {
    let call_value = match &event.pitch_call {
        Some(PitchCall::BallCalled) => BALL_TAKEN,
        Some(PitchCall::StrikeCalled) if event.is_strikeout() => CALLED_STRIKEOUT,
        Some(PitchCall::StrikeSwinging) => {
            if event.is_strikeout() {
                SWINGING_STRIKEOUT
            } else {
                match (event.plate_loc_height, event.plate_loc_side) {
                    (Some(height), Some(side)) if !STRIKE_ZONE.contains(height, side) => CHASE,
                    _ => 0.0,
                }
            }
        }
        _ => 0.0,
    };

    let bonus = if event.is_home_run() { HOME_RUN } else { 0.0 };

    call_value + bonus
}

/// Running decision scores keyed by raw batter name, in first-appearance order.
#[derive(Debug, Clone, Default)]
pub struct DecisionScores {
    order: Vec<String>,
    totals: HashMap<String, f64>,
}

impl DecisionScores {
    /// Adds `value` to the batter's total, starting from zero on first sight.
    pub fn add(&mut self, batter: &str, value: f64) {
        if !self.totals.contains_key(batter) {
            self.order.push(batter.to_string());
        }
        *self.totals.entry(batter.to_string()).or_insert(0.0) += value;
    }

    pub fn get(&self, batter: &str) -> Option<f64> {
        self.totals.get(batter).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(batter, score)` pairs in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.order
            .iter()
            .map(|name| (name.as_str(), self.totals.get(name).copied().unwrap_or_default()))
    }

    /// Grades every batter and derives its join key.
    pub fn into_batter_scores(self) -> Vec<BatterScore> {
        self.iter()
            .map(|(batter, score)| BatterScore::new(batter, score))
            .collect()
    }
}

/// Folds every pitch event into its batter's running score.
pub fn calculate_batter_scores(events: &[PitchEvent]) -> DecisionScores {
    let mut scores = DecisionScores::default();
    for event in events {
        scores.add(&event.batter, pitch_value(event));
    }
    scores
}
