//! Pattern analysis: notes to segments to patterns.

pub mod candidates;
pub mod classifier;
pub mod merger;
pub mod segmentation;

pub use candidates::Candidate;
pub use classifier::PatternClassifier;
pub use merger::merge_patterns;
pub use segmentation::{SegmentBuilder, analyse_segments};

use crate::config::PatternConfig;
use crate::error::AnalysisError;
use crate::models::{Pattern, Segment};

/// Classifies `segments` and merges the result.
pub fn identify_patterns(
    segments: &[Segment],
    config: &PatternConfig,
    sample_rate: u32,
) -> Result<Vec<Pattern>, AnalysisError> {
    let raw = PatternClassifier::new(config, sample_rate).classify(segments)?;
    let merged = merge_patterns(raw);
    log::debug!(
        "Merged patterns ({}): {}",
        merged.len(),
        classifier::summarize(&merged)
    );
    Ok(merged)
}
