//! Error type for chart analysis failures.

use crate::models::{PatternKind, SegmentKind};

/// Why a chart could not be scored.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The chart has no notes at all.
    EmptyChart,
    /// Too little material to score: fewer than two notes, or no pattern
    /// survived classification.
    InsufficientData { notes: usize, patterns: usize },
    /// A candidate buffer holds a segment its pattern kind forbids.
    /// This is a classifier bug, never a property of the chart.
    CompositionViolation {
        pattern: PatternKind,
        segment: SegmentKind,
    },
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::EmptyChart => write!(f, "Chart has no notes"),
            AnalysisError::InsufficientData { notes, patterns } => write!(
                f,
                "Insufficient data: {} notes produced {} patterns",
                notes, patterns
            ),
            AnalysisError::CompositionViolation { pattern, segment } => {
                write!(f, "{} has a: {}!!", pattern, segment)
            }
        }
    }
}

impl std::error::Error for AnalysisError {}
