//! Slow Stretch: consecutive intervals.

use super::Candidate;
use crate::error::AnalysisError;
use crate::models::Segment;

pub(super) fn check(candidate: &mut Candidate, cur: &Segment) -> bool {
    if !candidate.is_active() || !cur.is_interval() {
        return false;
    }
    if candidate.last().is_some_and(|prev| !prev.is_interval()) {
        return false;
    }
    candidate.push(cur)
}

pub(super) fn is_appendable(candidate: &Candidate) -> Result<bool, AnalysisError> {
    if let Some(segment) = candidate.segments().iter().find(|s| !s.is_interval()) {
        return Err(candidate.violation(segment));
    }
    Ok(candidate.len() >= 2)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::models::{PatternKind, SegmentKind};

    #[test]
    fn test_collects_intervals() {
        let mut candidate = Candidate::new(PatternKind::SlowStretch, TOLERANCE);
        assert!(candidate.check(&seg(SegmentKind::ShortInterval, 0.0, 0.3, 2)));
        assert_eq!(candidate.is_appendable(), Ok(false));
        assert!(candidate.check(&seg(SegmentKind::LongInterval, 0.3, 1.5, 2)));
        assert_eq!(candidate.is_appendable(), Ok(true));
        assert!(!candidate.check(&seg(SegmentKind::TwoStack, 1.8, 0.1, 2)));
    }

    #[test]
    fn test_reset_from_stack_leaves_it_inactive() {
        let mut candidate = Candidate::new(PatternKind::SlowStretch, TOLERANCE);
        let prev = seg(SegmentKind::TwoStack, 0.0, 0.1, 2);
        let cur = seg(SegmentKind::Switch, 0.1, 0.1, 2);
        candidate.reset(Some(&prev), &cur);
        assert!(!candidate.is_active());
        assert!(!candidate.check(&seg(SegmentKind::MedInterval, 0.2, 0.5, 2)));
    }
}
