//! Domain types shared by every stage of the pipeline.

pub mod note;
pub mod pattern;
pub mod segment;

pub use note::{Chart, DEFAULT_SAMPLE_RATE, Lane, Note};
pub use pattern::{Pattern, PatternKind};
pub use segment::{Segment, SegmentKind};
