//! Candidate pattern builders.
//!
//! A [`Candidate`] is the working buffer of one pattern kind while the
//! classifier walks the segment list. Every kind shares the same contract:
//!
//! - [`Candidate::check`] offers a segment; the buffer grows on acceptance.
//! - [`Candidate::is_appendable`] says whether the buffer is a complete
//!   instance of its kind. A buffer holding a segment its kind forbids is a
//!   [`AnalysisError::CompositionViolation`].
//! - [`Candidate::reset`] re-seeds the buffer around the hinge `(prev, cur)`.
//!
//! The per-kind rules are plain functions in the submodules, selected by
//! matching on the kind.

mod circles;
mod stacks;
mod stretch;

use crate::error::AnalysisError;
use crate::models::{Pattern, PatternKind, Segment};

/// Working buffer for one pattern kind.
#[derive(Debug, Clone)]
pub struct Candidate {
    kind: PatternKind,
    segments: Vec<Segment>,
    is_active: bool,
    /// Pattern timing tolerance, in samples.
    tolerance: u64,
}

impl Candidate {
    pub fn new(kind: PatternKind, tolerance: u64) -> Self {
        Self {
            kind,
            segments: Vec::new(),
            is_active: true,
            tolerance,
        }
    }

    /// Candidate pre-filled with `segments`.
    #[cfg(test)]
    pub(crate) fn with_segments(kind: PatternKind, segments: Vec<Segment>, tolerance: u64) -> Self {
        Self {
            segments,
            ..Self::new(kind, tolerance)
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Stops the candidate from accepting segments until the next reset.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Offers `segment` to the candidate. Returns `true` if it was accepted.
    ///
    /// An interval arriving after the buffer already has content is recorded
    /// but reported as rejected: it closes the run.
    pub fn check(&mut self, segment: &Segment) -> bool {
        match self.kind {
            PatternKind::EvenCircles => circles::check(self, segment, &circles::EVEN_CIRCLES),
            PatternKind::SkewedCircles => circles::check(self, segment, &circles::SKEWED_CIRCLES),
            PatternKind::NothingButTheory => {
                circles::check(self, segment, &circles::NOTHING_BUT_THEORY)
            }
            PatternKind::VaryingStacks => stacks::check(self, segment),
            PatternKind::SlowStretch => stretch::check(self, segment),
            PatternKind::Other => {
                self.segments.push(segment.clone());
                true
            }
        }
    }

    /// Whether the buffer is a complete, valid instance of its kind.
    pub fn is_appendable(&self) -> Result<bool, AnalysisError> {
        match self.kind {
            PatternKind::EvenCircles => circles::is_appendable(self, &circles::EVEN_CIRCLES),
            PatternKind::SkewedCircles => circles::is_appendable(self, &circles::SKEWED_CIRCLES),
            PatternKind::NothingButTheory => {
                circles::is_appendable(self, &circles::NOTHING_BUT_THEORY)
            }
            PatternKind::VaryingStacks => stacks::is_appendable(self),
            PatternKind::SlowStretch => stretch::is_appendable(self),
            PatternKind::Other => Ok(true),
        }
    }

    /// Re-seeds the buffer from the hinge `(prev, cur)`.
    ///
    /// An interval at `cur` seeds alone. Otherwise `prev` then `cur` are
    /// offered; if `cur` (or a non-interval `prev`) is refused the candidate
    /// is left empty and inactive, so a buffer always ends at `cur`.
    pub fn reset(&mut self, prev: Option<&Segment>, cur: &Segment) {
        self.is_active = true;
        self.segments.clear();

        if cur.is_interval() {
            self.check(cur);
        } else if let Some(prev) = prev {
            let seeded = if prev.is_interval() {
                // An interval opening the buffer is always recorded.
                self.check(prev);
                self.check(cur)
            } else {
                self.check(prev) && self.check(cur)
            };
            if !seeded {
                self.segments.clear();
                self.is_active = false;
            }
        }
    }

    /// Moves the buffer out as a finalized pattern, leaving the candidate empty.
    pub fn take_pattern(&mut self) -> Pattern {
        Pattern::new(self.kind, std::mem::take(&mut self.segments))
    }

    /// Finalized copy of the buffer, leaving the candidate untouched.
    pub fn to_pattern(&self) -> Pattern {
        Pattern::new(self.kind, self.segments.clone())
    }

    /// Records an interval. Returns `true` if it opened the buffer.
    fn add_interval(&mut self, segment: &Segment) -> bool {
        let at_start = self.segments.is_empty();
        self.segments.push(segment.clone());
        at_start
    }

    fn push(&mut self, segment: &Segment) -> bool {
        self.segments.push(segment.clone());
        true
    }

    fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Two segments keep the same rhythm if their gaps agree within tolerance.
    /// Intervals always pass.
    fn time_difference_is_tolerable(&self, prev: &Segment, cur: &Segment) -> bool {
        if prev.is_interval() || cur.is_interval() {
            return true;
        }
        prev.time_difference.abs_diff(cur.time_difference) <= self.tolerance
    }

    /// Two segments are contiguous if the first ends (nearly) where the
    /// second starts. Intervals always pass.
    fn gap_is_tolerable(&self, prev: &Segment, cur: &Segment) -> bool {
        if prev.is_interval() || cur.is_interval() {
            return true;
        }
        match (prev.end_time(), cur.start_time()) {
            (Some(end), Some(start)) => end.abs_diff(start) <= self.tolerance,
            _ => false,
        }
    }

    fn violation(&self, segment: &Segment) -> AnalysisError {
        AnalysisError::CompositionViolation {
            pattern: self.kind,
            segment: segment.kind,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{DEFAULT_SAMPLE_RATE, Lane, Note, Segment, SegmentKind};

    /// 20ms at 44.1kHz.
    pub const TOLERANCE: u64 = 882;

    pub fn at(seconds: f64) -> u64 {
        (seconds * DEFAULT_SAMPLE_RATE as f64).round() as u64
    }

    /// Segment of `kind` with `count` notes spaced `gap` seconds apart from `start`.
    pub fn seg(kind: SegmentKind, start: f64, gap: f64, count: usize) -> Segment {
        let notes = (0..count)
            .map(|i| {
                let lane = if i % 2 == 0 { Lane::Left } else { Lane::Right };
                Note::new(lane, at(start + gap * i as f64))
            })
            .collect();
        Segment::at_default_rate(kind, notes)
    }
}
