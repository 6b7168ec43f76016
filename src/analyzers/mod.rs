//! Plate-discipline scoring and roster reconciliation.
//!
//! Pitch events are folded into per-batter decision scores, graded, keyed by
//! normalized name, and joined onto the roster table.

pub mod analyzer;
pub mod grade;
pub mod merge;
pub mod names;
pub mod scoring;
pub mod types;
