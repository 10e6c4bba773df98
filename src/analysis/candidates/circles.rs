//! Alternating patterns: stacks interleaved with a lane-changing partner
//! segment at a steady gap.
//!
//! Even Circles, Skewed Circles and Nothing But Theory differ only in which
//! stacks they accept and what the partner segment must look like, so they
//! share one rule set parameterized by [`Alternation`].

use super::Candidate;
use crate::error::AnalysisError;
use crate::models::{Segment, SegmentKind};

/// Which stack heights an alternating pattern accepts.
#[derive(Debug, Clone, Copy)]
pub(super) enum Stacks {
    Any,
    TwoOnly,
}

impl Stacks {
    fn accepts(self, kind: SegmentKind) -> bool {
        match self {
            Stacks::Any => kind.is_n_stack(),
            Stacks::TwoOnly => kind == SegmentKind::TwoStack,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Alternation {
    stacks: Stacks,
    partner: SegmentKind,
    /// Allowed note counts of the partner segment. Empty means any.
    partner_notes: &'static [usize],
}

impl Alternation {
    fn is_stack(&self, segment: &Segment) -> bool {
        self.stacks.accepts(segment.kind)
    }

    fn is_partner(&self, segment: &Segment) -> bool {
        segment.kind == self.partner
            && (self.partner_notes.is_empty()
                || self.partner_notes.contains(&segment.notes.len()))
    }
}

pub(super) const EVEN_CIRCLES: Alternation = Alternation {
    stacks: Stacks::Any,
    partner: SegmentKind::Switch,
    partner_notes: &[],
};

pub(super) const SKEWED_CIRCLES: Alternation = Alternation {
    stacks: Stacks::Any,
    partner: SegmentKind::ZigZag,
    partner_notes: &[3],
};

pub(super) const NOTHING_BUT_THEORY: Alternation = Alternation {
    stacks: Stacks::TwoOnly,
    partner: SegmentKind::ZigZag,
    partner_notes: &[4, 6],
};

pub(super) fn check(candidate: &mut Candidate, cur: &Segment, rule: &Alternation) -> bool {
    if !candidate.is_active() {
        return false;
    }
    if cur.is_interval() {
        return candidate.add_interval(cur);
    }

    let cur_is_stack = rule.is_stack(cur);
    if !cur_is_stack && !rule.is_partner(cur) {
        return false;
    }

    // Anything may follow an interval. Otherwise stacks and partners must
    // alternate at a steady, contiguous gap.
    if let Some(prev) = candidate.last().filter(|p| !p.is_interval()) {
        if rule.is_stack(prev) == cur_is_stack {
            return false;
        }
        if !candidate.time_difference_is_tolerable(prev, cur)
            || !candidate.gap_is_tolerable(prev, cur)
        {
            return false;
        }
    }

    candidate.push(cur)
}

pub(super) fn is_appendable(candidate: &Candidate, rule: &Alternation) -> Result<bool, AnalysisError> {
    let mut stacks = 0;
    for segment in candidate.segments() {
        if rule.is_stack(segment) {
            stacks += 1;
        } else if segment.kind != rule.partner && !segment.is_interval() {
            return Err(candidate.violation(segment));
        }
    }
    Ok(candidate.len() >= 3 && stacks >= 2)
}
