//! Turns an ordered note list into an ordered segment list.
//!
//! Each consecutive pair of notes is classified by its speed and lanes.
//! Consecutive pairs with the same classification and a gap within tolerance
//! of the segment's first gap extend the running segment; anything else
//! finalizes it and starts a new one that shares the hinge note.

use crate::config::SegmentConfig;
use crate::models::{Note, Segment, SegmentKind};

/// Builds segments from notes using the configured speed thresholds.
#[derive(Debug, Clone)]
pub struct SegmentBuilder<'a> {
    config: &'a SegmentConfig,
    sample_rate: u32,
    tolerance: f64,
}

impl<'a> SegmentBuilder<'a> {
    pub fn new(config: &'a SegmentConfig, sample_rate: u32) -> Self {
        Self {
            config,
            sample_rate,
            tolerance: config.tolerance_samples(sample_rate),
        }
    }

    /// Classifies the pair `(prev, note)` separated by `time_difference` samples.
    pub fn classify_pair(&self, prev: &Note, note: &Note, time_difference: u64) -> SegmentKind {
        if time_difference == 0 {
            return SegmentKind::Other;
        }
        let nps = self.sample_rate as f64 / time_difference as f64;

        if nps >= self.config.short_interval_nps {
            if note.lane != prev.lane {
                SegmentKind::ZigZag
            } else {
                SegmentKind::SingleStream
            }
        } else if nps < self.config.long_interval_nps {
            SegmentKind::LongInterval
        } else if nps < self.config.med_interval_nps {
            SegmentKind::MedInterval
        } else if nps < self.config.short_interval_nps {
            SegmentKind::ShortInterval
        } else {
            SegmentKind::Other
        }
    }

    /// Segments `notes`, which must be sorted by `sample_time`.
    pub fn build(&self, notes: &[Note]) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut current: Option<Segment> = None;

        for pair in notes.windows(2) {
            let (prev, note) = (pair[0], pair[1]);
            let time_difference = prev.distance_to(&note);
            let kind = self.classify_pair(&prev, &note, time_difference);

            if let Some(segment) = current.as_mut() {
                if segment.kind == kind && self.extends(segment, time_difference) {
                    segment.notes.push(note);
                    continue;
                }
            }

            if let Some(done) = current.take() {
                finalize(&mut segments, done);
            }
            current = Some(Segment::with_time_difference(
                kind,
                vec![prev, note],
                time_difference,
                self.sample_rate,
            ));
        }

        if let Some(done) = current {
            finalize(&mut segments, done);
        }

        log::debug!("Built {} segments from {} notes", segments.len(), notes.len());
        segments
    }

    fn extends(&self, segment: &Segment, time_difference: u64) -> bool {
        let base = segment.notes[0].distance_to(&segment.notes[1]);
        (time_difference as f64 - base as f64).abs() <= self.tolerance
    }
}

/// Appends a finished segment, applying the rename rules. Incomplete
/// segments are dropped.
fn finalize(segments: &mut Vec<Segment>, mut segment: Segment) {
    if segment.is_interval() || segment.kind == SegmentKind::Other {
        segments.push(segment);
        return;
    }
    if !segment.is_complete() {
        return;
    }

    let count = segment.notes.len();
    match segment.kind {
        SegmentKind::ZigZag if count == 2 => segment.kind = SegmentKind::Switch,
        SegmentKind::SingleStream => {
            if let Some(stack) = SegmentKind::stack_of(count) {
                segment.kind = stack;
            }
        }
        _ => {}
    }
    segments.push(segment);
}

/// Convenience wrapper around [`SegmentBuilder`].
pub fn analyse_segments(notes: &[Note], config: &SegmentConfig, sample_rate: u32) -> Vec<Segment> {
    SegmentBuilder::new(config, sample_rate).build(notes)
}
