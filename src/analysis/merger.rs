//! Coalesces raw patterns split apart by the classifier's resets.
//!
//! Only Other and Slow Stretch runs are merged, and a merge never crosses a
//! pattern of a different kind. Consecutive raw instances repeat the hinge
//! segments their buffers were re-seeded with; a segment already in the run
//! is never appended twice.

use crate::models::{Pattern, PatternKind, Segment};

pub fn merge_patterns(raw: Vec<Pattern>) -> Vec<Pattern> {
    let raw_count = raw.len();
    let mut merged = Vec::with_capacity(raw_count);
    let mut run: Option<Pattern> = None;

    for pattern in raw {
        if !pattern.kind.is_mergeable() {
            if let Some(open) = run.take() {
                close_before_pattern(&mut merged, open);
            }
            merged.push(pattern);
            continue;
        }

        match run.as_ref().map(|open| open.kind) {
            Some(kind) if kind == pattern.kind => {
                if let Some(open) = run.as_mut() {
                    extend(open, pattern);
                }
            }
            // A stray single Other segment between two mergeable runs is noise.
            Some(_) if pattern.kind == PatternKind::Other && pattern.segments.len() == 1 => {}
            _ => {
                if let Some(open) = run.take() {
                    if !open.is_empty() {
                        merged.push(open);
                    }
                }
                run = start(pattern, raw_count);
            }
        }
    }

    if let Some(open) = run {
        if !open.is_empty() {
            merged.push(open);
        }
    }
    merged
}

/// Opens a run. A lone interval does not open one unless it is all there is.
fn start(pattern: Pattern, raw_count: usize) -> Option<Pattern> {
    let lone_interval = matches!(pattern.segments.as_slice(), [only] if only.is_interval());
    if raw_count > 1 && lone_interval {
        None
    } else {
        Some(pattern)
    }
}

fn extend(open: &mut Pattern, pattern: Pattern) {
    for segment in pattern.segments {
        if !contains(&open.segments, &segment) {
            open.segments.push(segment);
        }
    }
}

/// Whether `run` already holds `segment`. The run is in time order, so the
/// search stops at the first segment that ends before `segment` starts.
fn contains(run: &[Segment], segment: &Segment) -> bool {
    let start = segment.start_time();
    run.iter()
        .rev()
        .take_while(|s| s.end_time() >= start)
        .any(|s| s == segment)
}

/// An Other run ending in a non-interval carries the lead-in of the pattern
/// that follows it, which is dropped.
fn close_before_pattern(merged: &mut Vec<Pattern>, mut open: Pattern) {
    if open.kind == PatternKind::Other && open.segments.last().is_some_and(|s| !s.is_interval()) {
        open.segments.pop();
    }
    if !open.is_empty() {
        merged.push(open);
    }
}
