//! Per-pattern difficulty scores.
//!
//! A pattern's score blends its variation (entropy) with a speed multiplier
//! read off its kind's curve. Runs of patterns not broken by an interval
//! ("chunks") are then scaled by how many notes they hold.

use super::density::weighted_average_of_values;
use super::variation::variation_score;
use crate::config::{AnalysisConfig, CurveConfig, ScoringConfig};
use crate::models::{Pattern, PatternKind, Segment, SegmentKind};
use std::collections::BTreeSet;

/// Score of one finalized pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternScore {
    pub kind: PatternKind,
    /// Final score, chunk multiplier included.
    pub score: f64,
    pub variation: f64,
    pub multiplier: f64,
    /// Stream-length multiplier of the pattern's chunk (1.0 when none applied).
    pub length_multiplier: f64,
    pub has_interval: bool,
    pub total_notes: usize,
    /// Segments whose kind has no multiplier and fell back to 1.0.
    pub unrecognized_segments: usize,
}

pub struct DifficultyScorer<'a> {
    scoring: &'a ScoringConfig,
    curves: &'a CurveConfig,
}

impl<'a> DifficultyScorer<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self {
            scoring: &config.scoring,
            curves: &config.curves,
        }
    }

    /// Scores every non-empty pattern and applies chunk multipliers.
    pub fn score_patterns(&self, patterns: &[Pattern]) -> Vec<PatternScore> {
        let mut scores = Vec::with_capacity(patterns.len());
        let mut chunk: Vec<(&Pattern, PatternScore)> = Vec::new();

        for pattern in patterns.iter().filter(|p| !p.is_empty()) {
            let score = self.score_pattern(pattern);
            if score.has_interval {
                self.close_chunk(&mut chunk, &mut scores);
                scores.push(score);
            } else {
                chunk.push((pattern, score));
            }
        }
        self.close_chunk(&mut chunk, &mut scores);
        scores
    }

    /// Scores one pattern, without any chunk multiplier.
    pub fn score_pattern(&self, pattern: &Pattern) -> PatternScore {
        let variation = variation_score(pattern, &self.scoring.interval_debuffs);
        let (multiplier, unrecognized_segments) = self.pattern_multiplier(pattern);
        let (variation_weighting, pattern_weighting) = self.weights(pattern.kind);
        let score = variation_weighting * variation + pattern_weighting * multiplier;

        log::debug!(
            "{}: variation {:.4} | multiplier {:.4} | score {:.4}",
            pattern,
            variation,
            multiplier,
            score
        );

        PatternScore {
            kind: pattern.kind,
            score,
            variation,
            multiplier,
            length_multiplier: 1.0,
            has_interval: pattern.has_interval_segment(),
            total_notes: pattern.total_notes(),
            unrecognized_segments,
        }
    }

    fn weights(&self, kind: PatternKind) -> (f64, f64) {
        match kind {
            PatternKind::VaryingStacks | PatternKind::NothingButTheory => (
                self.scoring.stack_variation_weighting,
                self.scoring.stack_pattern_weighting,
            ),
            _ => (
                self.scoring.variation_weighting,
                self.scoring.pattern_weighting,
            ),
        }
    }

    /// Speed multiplier of `pattern`, plus the number of segments that had
    /// to fall back to 1.0.
    fn pattern_multiplier(&self, pattern: &Pattern) -> (f64, usize) {
        let nps = pattern
            .segments
            .first()
            .map(Segment::notes_per_second)
            .unwrap_or(0.0);

        match pattern.kind {
            PatternKind::EvenCircles => (self.curves.even_circles.ease_in_out(nps), 0),
            PatternKind::SkewedCircles => (self.curves.skewed_circles.ease_in_out(nps), 0),
            PatternKind::VaryingStacks => (self.curves.varying_stacks.smoothstep(nps), 0),
            PatternKind::NothingButTheory => (self.curves.nothing_but_theory.smoothstep(nps), 0),
            PatternKind::SlowStretch => (1.0, 0),
            PatternKind::Other => self.other_multiplier(&pattern.segments),
        }
    }

    /// Other patterns have no shape of their own, so their multiplier is a
    /// top-weighted average of what each segment would be worth alone.
    fn other_multiplier(&self, segments: &[Segment]) -> (f64, usize) {
        let mut unrecognized = 0;
        let multipliers: Vec<f64> = segments
            .iter()
            .map(|segment| {
                self.segment_multiplier(segment).unwrap_or_else(|| {
                    log::warn!(
                        "No multiplier for segment {} at sample {:?}, using 1.0",
                        segment.kind,
                        segment.start_time()
                    );
                    unrecognized += 1;
                    1.0
                })
            })
            .collect();

        let multiplier =
            weighted_average_of_values(&multipliers, &self.scoring.other_aggregation).unwrap_or(1.0);
        (multiplier, unrecognized)
    }

    fn segment_multiplier(&self, segment: &Segment) -> Option<f64> {
        let nps = segment.notes_per_second();
        let constants = &self.scoring.other_multipliers;
        let multiplier = match segment.kind {
            SegmentKind::Switch => constants.switch,
            SegmentKind::ZigZag => self.curves.zig_zag.ease_in(nps),
            SegmentKind::TwoStack => self.curves.two_stack.smoothstep(nps),
            SegmentKind::ThreeStack => self.curves.three_stack.smoothstep(nps),
            SegmentKind::FourStack => self.curves.four_stack.smoothstep(nps),
            SegmentKind::SingleStream => self.curves.single_stream.smoothstep(nps),
            SegmentKind::ShortInterval => constants.short_interval,
            SegmentKind::MedInterval => constants.med_interval,
            SegmentKind::LongInterval => constants.long_interval,
            SegmentKind::Other => return None,
        };
        Some(multiplier)
    }

    /// Flushes a chunk into `scores`. Chunks of more than two patterns are
    /// scaled by the stream-length curve over their distinct notes.
    fn close_chunk(&self, chunk: &mut Vec<(&Pattern, PatternScore)>, scores: &mut Vec<PatternScore>) {
        if chunk.len() > 2 {
            let notes: BTreeSet<u64> = chunk
                .iter()
                .flat_map(|(pattern, _)| pattern.note_times())
                .collect();
            let multiplier = self.curves.stream_length.smoothstep(notes.len() as f64);
            log::debug!(
                "Chunk of {} patterns ({} notes): x{:.4}",
                chunk.len(),
                notes.len(),
                multiplier
            );
            for (_, score) in chunk.iter_mut() {
                score.score *= multiplier;
                score.length_multiplier = multiplier;
            }
        }
        scores.extend(chunk.drain(..).map(|(_, score)| score));
    }
}
