//! Difficulty calculation module.
//!
//! Combines two views of a chart:
//!
//! - the **base difficulty**, a top-weighted average of the note density
//!   moving average;
//! - the **weighting**, a top-weighted average of the per-pattern scores.
//!
//! The final difficulty is their product. The whole calculation is pure and
//! owns all of its state, so charts can be scored on any number of threads.

pub mod curves;
pub mod density;
pub mod scorer;
pub mod variation;

pub use density::weighted_average_of_values;
pub use scorer::{DifficultyScorer, PatternScore};

use crate::analysis::{analyse_segments, identify_patterns};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::models::Chart;
use serde::Serialize;
use std::io::{self, Write};

/// The score triple of one chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyScore {
    /// Pattern aggregate.
    pub weighting: f64,
    /// Density aggregate.
    pub difficulty: f64,
    /// `weighting * difficulty`.
    pub weighted_difficulty: f64,
}

/// Everything computed for one chart.
#[derive(Debug, Clone)]
pub struct ChartReport {
    pub score: DifficultyScore,
    pub patterns: Vec<PatternScore>,
    /// Moving average of notes per window, one entry per window.
    pub moving_average: Vec<f64>,
    /// Segments scored with the fallback multiplier.
    pub unrecognized_segments: usize,
}

impl ChartReport {
    /// Writes the moving average, one value per line.
    pub fn write_moving_average<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for value in &self.moving_average {
            writeln!(out, "{}", value)?;
        }
        Ok(())
    }
}

/// Calculates the difficulty of `chart`.
pub fn calculate_difficulty(
    chart: &Chart,
    config: &AnalysisConfig,
) -> Result<ChartReport, AnalysisError> {
    if chart.is_empty() {
        return Err(AnalysisError::EmptyChart);
    }
    let note_count = chart.notes.len();
    let insufficient = |patterns| AnalysisError::InsufficientData {
        notes: note_count,
        patterns,
    };
    if note_count < 2 {
        return Err(insufficient(0));
    }

    let sections = density::create_sections(
        &chart.notes,
        config.density.window_secs,
        chart.sample_rate,
    );
    let moving_average = density::moving_average(&sections, config.density.moving_avg_window);
    let difficulty = weighted_average_of_values(&moving_average, &config.density.aggregation)
        .ok_or_else(|| insufficient(0))?;

    let segments = analyse_segments(&chart.notes, &config.segments, chart.sample_rate);
    let patterns = identify_patterns(&segments, &config.patterns, chart.sample_rate)?;
    if patterns.is_empty() {
        return Err(insufficient(0));
    }

    let pattern_scores = DifficultyScorer::new(config).score_patterns(&patterns);
    let values: Vec<f64> = pattern_scores.iter().map(|s| s.score).collect();
    let weighting = weighted_average_of_values(&values, &config.scoring.pattern_aggregation)
        .ok_or_else(|| insufficient(patterns.len()))?;

    let unrecognized_segments = pattern_scores.iter().map(|s| s.unrecognized_segments).sum();
    if unrecognized_segments > 0 {
        log::warn!(
            "{}: {} segments had no multiplier",
            chart.title,
            unrecognized_segments
        );
    }

    let score = DifficultyScore {
        weighting,
        difficulty,
        weighted_difficulty: weighting * difficulty,
    };
    log::info!(
        "Final Weighting: {:<10.5}| Base Difficulty: {:<10.5}| Weighted Difficulty: {:<10.5}",
        score.weighting,
        score.difficulty,
        score.weighted_difficulty
    );

    Ok(ChartReport {
        score,
        patterns: pattern_scores,
        moving_average,
        unrecognized_segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lane, Note, PatternKind};

    const DELTA: u64 = 4410;

    fn chart(notes: Vec<Note>) -> Chart {
        Chart::with_default_rate("test", notes)
    }

    #[test]
    fn test_empty_chart_is_rejected() {
        let err = calculate_difficulty(&chart(vec![]), &AnalysisConfig::default()).unwrap_err();
        assert_eq!(err, AnalysisError::EmptyChart);
    }

    #[test]
    fn test_single_note_is_insufficient() {
        let err = calculate_difficulty(&chart(vec![Note::new(Lane::Left, 0)]), &AnalysisConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InsufficientData {
                notes: 1,
                patterns: 0
            }
        );
    }

    #[test]
    fn test_circles_chart() {
        let notes = vec![
            Note::new(Lane::Left, 0),
            Note::new(Lane::Left, DELTA),
            Note::new(Lane::Right, 2 * DELTA),
            Note::new(Lane::Right, 3 * DELTA),
        ];
        let report = calculate_difficulty(&chart(notes), &AnalysisConfig::default()).unwrap();

        assert_eq!(report.patterns.len(), 1);
        assert_eq!(report.patterns[0].kind, PatternKind::EvenCircles);
        // All four notes land in the first one-second window.
        assert_eq!(report.moving_average, vec![4.0]);
        assert!((report.score.difficulty - 4.0).abs() < 1e-9);
        assert!((report.score.weighting - report.patterns[0].score).abs() < 1e-9);
        assert!(
            (report.score.weighted_difficulty - report.score.weighting * report.score.difficulty)
                .abs()
                < 1e-12
        );
    }

    #[test]
    fn test_mixed_chart_scores_every_pattern() {
        let mut notes = Vec::new();
        let mut t = 0;
        // Alternating stream, a pause, then stacks.
        for i in 0..12 {
            let lane = if i % 2 == 0 { Lane::Left } else { Lane::Right };
            notes.push(Note::new(lane, t));
            t += DELTA;
        }
        t += 2 * 44100;
        for height in [2, 3, 2, 4] {
            for _ in 0..height {
                notes.push(Note::new(Lane::Left, t));
                t += DELTA / 2;
            }
            t += DELTA;
        }

        let report = calculate_difficulty(&chart(notes), &AnalysisConfig::default()).unwrap();
        assert!(!report.patterns.is_empty());
        assert!(report.score.weighting.is_finite() && report.score.weighting > 0.0);
        assert!(report.score.difficulty > 0.0);
        assert_eq!(report.unrecognized_segments, 0);
    }

    #[test]
    fn test_simultaneous_notes_are_reported_unrecognized() {
        let notes = vec![
            Note::new(Lane::Left, 0),
            Note::new(Lane::Right, 0),
            Note::new(Lane::Left, DELTA),
        ];
        let report = calculate_difficulty(&chart(notes), &AnalysisConfig::default()).unwrap();
        assert_eq!(report.patterns.len(), 1);
        assert_eq!(report.patterns[0].kind, PatternKind::Other);
        assert_eq!(report.patterns[0].unrecognized_segments, 1);
        assert_eq!(report.unrecognized_segments, 1);
        assert!(report.score.weighting.is_finite());
    }

    #[test]
    fn test_moving_average_dump() {
        let report = ChartReport {
            score: DifficultyScore {
                weighting: 1.0,
                difficulty: 2.0,
                weighted_difficulty: 2.0,
            },
            patterns: Vec::new(),
            moving_average: vec![1.0, 2.5],
            unrecognized_segments: 0,
        };
        let mut out = Vec::new();
        report.write_moving_average(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\n2.5\n");
    }
}
