//! Notes and charts: the raw input of the analysis pipeline.

use serde::{Deserialize, Serialize};

/// Default sample rate of chart audio, in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// One of the two lanes a note can land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lane {
    Left,
    Right,
}

impl Lane {
    /// Converts a 0-indexed lane id (as stored in chart files) into a lane.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Lane::Left),
            1 => Some(Lane::Right),
            _ => None,
        }
    }
}

/// A single hit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    /// Which lane the note lands on.
    pub lane: Lane,
    /// When the note should be hit, in audio samples.
    pub sample_time: u64,
}

impl Note {
    pub fn new(lane: Lane, sample_time: u64) -> Self {
        Self { lane, sample_time }
    }

    /// Samples between this note and `other`, regardless of order.
    pub fn distance_to(&self, other: &Note) -> u64 {
        self.sample_time.abs_diff(other.sample_time)
    }
}

/// A complete chart ready for analysis.
#[derive(Debug, Clone)]
pub struct Chart {
    pub title: String,
    /// Sample rate the note times are expressed in (Hz).
    pub sample_rate: u32,
    /// Notes ordered by `sample_time`.
    pub notes: Vec<Note>,
}

impl Chart {
    /// Creates a chart. Notes are sorted by time so the ordering precondition
    /// of the segment builder always holds.
    pub fn new(title: impl Into<String>, sample_rate: u32, mut notes: Vec<Note>) -> Self {
        notes.sort_by_key(|n| n.sample_time);
        Self {
            title: title.into(),
            sample_rate,
            notes,
        }
    }

    /// Chart at the default sample rate.
    pub fn with_default_rate(title: impl Into<String>, notes: Vec<Note>) -> Self {
        Self::new(title, DEFAULT_SAMPLE_RATE, notes)
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Time between the first and last note, in seconds.
    pub fn duration_secs(&self) -> f64 {
        match (self.notes.first(), self.notes.last()) {
            (Some(first), Some(last)) => {
                first.distance_to(last) as f64 / self.sample_rate as f64
            }
            _ => 0.0,
        }
    }

    /// Average notes per second over the whole chart.
    pub fn nps(&self) -> f64 {
        let duration = self.duration_secs();
        if duration > 0.0 {
            self.notes.len() as f64 / duration
        } else {
            0.0
        }
    }
}
