use crate::analyzers::types::Grade;

/// Converts a decision score into a letter grade.
///
/// Each bracket is closed below and open above.
///
/// | Range          | Grade |
/// |----------------|-------|
/// | >= 3.0         | A+    |
/// | [2.5, 3.0)     | A     |
/// | [2.0, 2.5)     | A-    |
/// | [1.5, 2.0)     | B+    |
/// | [1.0, 1.5)     | B     |
/// | [0.5, 1.0)     | B-    |
/// | [0.0, 0.5)     | C+    |
/// | [-0.5, 0.0)    | C     |
/// | < -0.5         | C-    |
pub fn grade(score: f64) -> Grade {
    match score {
        s if s < -0.5 => Grade::CMinus,
        s if s < 0.0 => Grade::C,
        s if s < 0.5 => Grade::CPlus,
        s if s < 1.0 => Grade::BMinus,
        s if s < 1.5 => Grade::B,
        s if s < 2.0 => Grade::BPlus,
        s if s < 2.5 => Grade::AMinus,
        s if s < 3.0 => Grade::A,
        _ => Grade::APlus,
    }
}
