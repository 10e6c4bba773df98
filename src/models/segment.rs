//! Segments: the smallest classified unit between consecutive notes.

use super::note::{DEFAULT_SAMPLE_RATE, Note};
use std::fmt;

/// Classification of a run of notes sharing one timing gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SegmentKind {
    /// Two notes on different lanes.
    Switch,
    /// Three or more notes alternating lanes.
    ZigZag,
    TwoStack,
    ThreeStack,
    FourStack,
    /// Five or more notes on the same lane.
    SingleStream,
    ShortInterval,
    MedInterval,
    LongInterval,
    /// Degenerate fallback (e.g. two notes on the same sample).
    Other,
}

impl SegmentKind {
    /// Human-readable name, also used as the entropy label.
    pub fn name(self) -> &'static str {
        match self {
            SegmentKind::Switch => "Switch",
            SegmentKind::ZigZag => "Zig Zag",
            SegmentKind::TwoStack => "2-Stack",
            SegmentKind::ThreeStack => "3-Stack",
            SegmentKind::FourStack => "4-Stack",
            SegmentKind::SingleStream => "Single Streams",
            SegmentKind::ShortInterval => "Short Interval",
            SegmentKind::MedInterval => "Medium Interval",
            SegmentKind::LongInterval => "Long Interval",
            SegmentKind::Other => "Other",
        }
    }

    pub fn is_interval(self) -> bool {
        matches!(
            self,
            SegmentKind::ShortInterval | SegmentKind::MedInterval | SegmentKind::LongInterval
        )
    }

    pub fn is_n_stack(self) -> bool {
        matches!(
            self,
            SegmentKind::TwoStack | SegmentKind::ThreeStack | SegmentKind::FourStack
        )
    }

    /// Stack kind for a same-lane run of `notes` notes, if it is short
    /// enough to count as a stack.
    pub fn stack_of(notes: usize) -> Option<Self> {
        match notes {
            2 => Some(SegmentKind::TwoStack),
            3 => Some(SegmentKind::ThreeStack),
            4 => Some(SegmentKind::FourStack),
            _ => None,
        }
    }

    /// Notes a segment of this kind needs before it can be finalized.
    pub fn required_notes(self) -> usize {
        match self {
            SegmentKind::ZigZag | SegmentKind::SingleStream => 2,
            _ => 0,
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified run of notes.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Notes in time order. The first note is shared with the previous segment.
    pub notes: Vec<Note>,
    pub required_notes: usize,
    /// Gap between the first two notes, in samples.
    pub time_difference: u64,
    pub sample_rate: u32,
}

impl Segment {
    /// Creates a segment whose time difference is taken from its first two notes.
    pub fn new(kind: SegmentKind, notes: Vec<Note>, sample_rate: u32) -> Self {
        let time_difference = match notes.as_slice() {
            [first, second, ..] => first.distance_to(second),
            _ => 0,
        };
        Self::with_time_difference(kind, notes, time_difference, sample_rate)
    }

    pub fn with_time_difference(
        kind: SegmentKind,
        notes: Vec<Note>,
        time_difference: u64,
        sample_rate: u32,
    ) -> Self {
        Self {
            kind,
            notes,
            required_notes: kind.required_notes(),
            time_difference,
            sample_rate,
        }
    }

    /// Segment at the default sample rate.
    pub fn at_default_rate(kind: SegmentKind, notes: Vec<Note>) -> Self {
        Self::new(kind, notes, DEFAULT_SAMPLE_RATE)
    }

    /// Notes per second implied by the segment's gap. Zero when both notes
    /// share a sample.
    pub fn notes_per_second(&self) -> f64 {
        if self.time_difference == 0 {
            return 0.0;
        }
        self.sample_rate as f64 / self.time_difference as f64
    }

    pub fn is_interval(&self) -> bool {
        self.kind.is_interval()
    }

    pub fn is_n_stack(&self) -> bool {
        self.kind.is_n_stack()
    }

    pub fn start_time(&self) -> Option<u64> {
        self.notes.first().map(|n| n.sample_time)
    }

    pub fn end_time(&self) -> Option<u64> {
        self.notes.last().map(|n| n.sample_time)
    }

    /// Whether enough notes were collected for the segment to be kept.
    pub fn is_complete(&self) -> bool {
        self.notes.len() >= self.required_notes
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.notes.len(), self.time_difference)
    }
}
