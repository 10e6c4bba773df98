//! Groups segments into raw patterns.
//!
//! Every segment is offered to the five candidates in priority order, with
//! the Other bucket collecting everything alongside. The first candidate
//! that refuses a segment while holding a complete pattern wins: its buffer
//! is flushed and every buffer is re-seeded from the current hinge.

use super::candidates::Candidate;
use crate::config::PatternConfig;
use crate::error::AnalysisError;
use crate::models::{Pattern, PatternKind, Segment};

pub struct PatternClassifier {
    candidates: Vec<Candidate>,
    other: Candidate,
    patterns: Vec<Pattern>,
}

impl PatternClassifier {
    pub fn new(config: &PatternConfig, sample_rate: u32) -> Self {
        let tolerance = config.tolerance_samples(sample_rate);
        Self {
            candidates: PatternKind::CANDIDATES
                .iter()
                .map(|&kind| Candidate::new(kind, tolerance))
                .collect(),
            other: Candidate::new(PatternKind::Other, tolerance),
            patterns: Vec::new(),
        }
    }

    /// Runs the classifier over `segments` and returns the raw patterns,
    /// before merging.
    pub fn classify(mut self, segments: &[Segment]) -> Result<Vec<Pattern>, AnalysisError> {
        for (i, segment) in segments.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| &segments[p]);
            self.offer(prev, segment)?;
        }
        self.finish()?;

        log::debug!(
            "Raw patterns ({}): {}",
            self.patterns.len(),
            summarize(&self.patterns)
        );
        Ok(self.patterns)
    }

    fn offer(&mut self, prev: Option<&Segment>, cur: &Segment) -> Result<(), AnalysisError> {
        let mut added = false;
        let mut reset = false;

        for i in 0..self.candidates.len() {
            let candidate = &mut self.candidates[i];
            if candidate.check(cur) {
                added = true;
                continue;
            }
            if !candidate.is_empty() {
                candidate.deactivate();
            }
            if candidate.is_appendable()? {
                added = true;
                self.flush(i);
                self.reset_all(prev, cur);
                reset = true;
                break;
            }
        }

        if !reset {
            self.other.check(cur);
        }

        if !added {
            if !self.other.is_empty() {
                self.patterns.push(self.other.to_pattern());
            }
            self.reset_all(prev, cur);
        }
        Ok(())
    }

    /// Finalizes candidate `index`. Other segments ahead of the candidate's
    /// first segment are emitted first as their own pattern.
    fn flush(&mut self, index: usize) {
        let pattern = self.candidates[index].take_pattern();
        let other = self.other.segments();
        let stragglers = pattern
            .segments
            .first()
            .and_then(|first| other.iter().position(|s| s == first))
            .unwrap_or_else(|| other.len().saturating_sub(pattern.segments.len()));
        if stragglers > 0 {
            self.patterns.push(Pattern::new(
                PatternKind::Other,
                other[..stragglers].to_vec(),
            ));
        }
        self.patterns.push(pattern);
    }

    fn reset_all(&mut self, prev: Option<&Segment>, cur: &Segment) {
        for candidate in &mut self.candidates {
            candidate.reset(prev, cur);
        }
        self.other.reset(prev, cur);
    }

    fn finish(&mut self) -> Result<(), AnalysisError> {
        for i in 0..self.candidates.len() {
            if self.candidates[i].is_appendable()? {
                self.flush(i);
                return Ok(());
            }
        }

        if self.other.is_empty() {
            return Ok(());
        }
        let lone_interval = self.other.len() == 1 && self.other.segments()[0].is_interval();
        if self.patterns.is_empty() || !lone_interval {
            let pattern = self.other.take_pattern();
            self.patterns.push(pattern);
        }
        Ok(())
    }
}

/// One-line `Kind (segments)` listing for debug logs.
pub fn summarize(patterns: &[Pattern]) -> String {
    patterns
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::candidates::test_support::*;
    use crate::models::{DEFAULT_SAMPLE_RATE, SegmentKind};

    fn classify(segments: &[Segment]) -> Vec<Pattern> {
        PatternClassifier::new(&PatternConfig::default(), DEFAULT_SAMPLE_RATE)
            .classify(segments)
            .unwrap()
    }

    fn kinds(patterns: &[Pattern]) -> Vec<PatternKind> {
        patterns.iter().map(|p| p.kind).collect()
    }

    #[test]
    fn test_no_segments_no_patterns() {
        assert!(classify(&[]).is_empty());
    }

    #[test]
    fn test_steady_circles() {
        let segments = vec![
            seg(SegmentKind::TwoStack, 0.0, 0.1, 2),
            seg(SegmentKind::Switch, 0.1, 0.1, 2),
            seg(SegmentKind::TwoStack, 0.2, 0.1, 2),
        ];
        let patterns = classify(&segments);
        assert_eq!(kinds(&patterns), vec![PatternKind::EvenCircles]);
        assert_eq!(patterns[0].segments, segments);
    }

    #[test]
    fn test_two_intervals_make_a_slow_stretch() {
        let segments = vec![
            seg(SegmentKind::ShortInterval, 0.0, 0.3, 2),
            seg(SegmentKind::MedInterval, 0.3, 0.6, 2),
        ];
        let patterns = classify(&segments);
        assert_eq!(kinds(&patterns), vec![PatternKind::SlowStretch]);
        assert_eq!(patterns[0].segments.len(), 2);
    }

    #[test]
    fn test_back_to_back_stacks() {
        let segments = vec![
            seg(SegmentKind::TwoStack, 0.0, 0.1, 2),
            seg(SegmentKind::ThreeStack, 0.1, 0.06, 3),
        ];
        assert_eq!(kinds(&classify(&segments)), vec![PatternKind::VaryingStacks]);
    }

    #[test]
    fn test_flush_on_refusal_reseeds_from_hinge() {
        // Three stacks, then a long zig zag nobody wants.
        let segments = vec![
            seg(SegmentKind::TwoStack, 0.0, 0.1, 2),
            seg(SegmentKind::ThreeStack, 0.1, 0.1, 3),
            seg(SegmentKind::TwoStack, 0.3, 0.1, 2),
            seg(SegmentKind::ZigZag, 0.4, 0.1, 6),
        ];
        let patterns = classify(&segments);
        assert_eq!(patterns[0].kind, PatternKind::VaryingStacks);
        assert_eq!(patterns[0].segments.len(), 3);
        // Other was re-seeded with the hinge and the zig zag.
        let last = patterns.last().unwrap();
        assert_eq!(last.kind, PatternKind::Other);
        assert_eq!(last.segments, segments[2..].to_vec());
    }

    #[test]
    fn test_stragglers_are_split_off() {
        // Even Circles keeps the switch alive, but only the stacks complete.
        let segments = vec![
            seg(SegmentKind::Switch, 0.0, 0.1, 2),
            seg(SegmentKind::TwoStack, 0.1, 0.1, 2),
            seg(SegmentKind::ThreeStack, 0.2, 0.06, 3),
        ];
        let patterns = classify(&segments);
        assert_eq!(
            kinds(&patterns),
            vec![PatternKind::Other, PatternKind::VaryingStacks]
        );
        assert_eq!(patterns[0].segments, segments[..1].to_vec());
        assert_eq!(patterns[1].segments, segments[1..].to_vec());
    }

    #[test]
    fn test_zig_zag_between_intervals_stays_other() {
        let segments = vec![
            seg(SegmentKind::ShortInterval, 0.0, 0.25, 2),
            seg(SegmentKind::ZigZag, 0.25, 0.1, 5),
            seg(SegmentKind::ShortInterval, 0.65, 0.25, 2),
        ];
        let patterns = classify(&segments);
        // The intervals are not consecutive, so no Slow Stretch, and no
        // pattern re-emits the first interval on its own.
        assert_eq!(kinds(&patterns), vec![PatternKind::Other, PatternKind::Other]);
        assert_eq!(patterns[0].segments, segments[..2].to_vec());
        assert_eq!(patterns[1].segments, segments);
    }

    #[test]
    fn test_stragglers_follow_the_candidate_start() {
        // Skewed Circles holds the zig zag alive, then the closing interval
        // joins Even Circles before Other sees it.
        let segments = vec![
            seg(SegmentKind::ZigZag, 0.0, 0.1, 3),
            seg(SegmentKind::TwoStack, 0.2, 0.1, 2),
            seg(SegmentKind::Switch, 0.3, 0.1, 2),
            seg(SegmentKind::TwoStack, 0.4, 0.1, 2),
            seg(SegmentKind::LongInterval, 0.5, 1.5, 2),
        ];
        let patterns = classify(&segments);
        assert_eq!(patterns[0].kind, PatternKind::Other);
        assert_eq!(patterns[0].segments, segments[..1].to_vec());
        assert_eq!(patterns[1].kind, PatternKind::EvenCircles);
        assert_eq!(patterns[1].segments, segments[1..].to_vec());
    }

    #[test]
    fn test_trailing_lone_interval_is_dropped() {
        let segments = vec![
            seg(SegmentKind::TwoStack, 0.0, 0.1, 2),
            seg(SegmentKind::Switch, 0.1, 0.1, 2),
            seg(SegmentKind::TwoStack, 0.2, 0.1, 2),
            seg(SegmentKind::LongInterval, 0.3, 1.5, 2),
        ];
        let patterns = classify(&segments);
        assert!(patterns
            .iter()
            .all(|p| !(p.kind == PatternKind::Other && p.segments.len() == 1)));
        assert_eq!(patterns[0].kind, PatternKind::EvenCircles);
    }

    #[test]
    fn test_lone_interval_kept_when_it_is_everything() {
        let segments = vec![seg(SegmentKind::LongInterval, 0.0, 1.5, 2)];
        let patterns = classify(&segments);
        assert_eq!(kinds(&patterns), vec![PatternKind::Other]);
        assert_eq!(patterns[0].segments.len(), 1);
    }
}
