//! Patterns: contiguous runs of segments recognized as one archetype.

use super::segment::Segment;
use std::collections::BTreeSet;
use std::fmt;

/// The six pattern archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// Switches alternating with stacks at a steady gap.
    EvenCircles,
    /// Three-note zig zags alternating with stacks.
    SkewedCircles,
    /// Stacks of any height back to back.
    VaryingStacks,
    /// 2-Stacks alternating with 4 or 6 note zig zags.
    NothingButTheory,
    /// Consecutive intervals.
    SlowStretch,
    /// Anything the other archetypes did not claim.
    Other,
}

impl PatternKind {
    /// Candidate kinds in the order the classifier offers segments to them.
    pub const CANDIDATES: [PatternKind; 5] = [
        PatternKind::EvenCircles,
        PatternKind::SkewedCircles,
        PatternKind::VaryingStacks,
        PatternKind::NothingButTheory,
        PatternKind::SlowStretch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PatternKind::EvenCircles => "Even Circles",
            PatternKind::SkewedCircles => "Skewed Circles",
            PatternKind::VaryingStacks => "Varying Stacks",
            PatternKind::NothingButTheory => "Nothing But Theory",
            PatternKind::SlowStretch => "Slow Stretch",
            PatternKind::Other => "Other",
        }
    }

    /// Kinds whose consecutive instances are artifacts of buffer resets and
    /// get merged back together.
    pub fn is_mergeable(self) -> bool {
        matches!(self, PatternKind::Other | PatternKind::SlowStretch)
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A finalized pattern. Read-only once produced by the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub segments: Vec<Segment>,
}

impl Pattern {
    pub fn new(kind: PatternKind, segments: Vec<Segment>) -> Self {
        Self { kind, segments }
    }

    /// Number of distinct note timestamps; hinge notes count once.
    pub fn total_notes(&self) -> usize {
        self.note_times().len()
    }

    /// Distinct note timestamps across all segments.
    pub fn note_times(&self) -> BTreeSet<u64> {
        self.segments
            .iter()
            .flat_map(|s| s.notes.iter().map(|n| n.sample_time))
            .collect()
    }

    pub fn has_interval_segment(&self) -> bool {
        self.segments.iter().any(Segment::is_interval)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.segments.len())
    }
}
