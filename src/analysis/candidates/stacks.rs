//! Varying Stacks: stacks of any height, back to back, with no timing rule.

use super::Candidate;
use crate::error::AnalysisError;
use crate::models::Segment;

pub(super) fn check(candidate: &mut Candidate, cur: &Segment) -> bool {
    if !candidate.is_active() {
        return false;
    }
    if cur.is_interval() {
        return candidate.add_interval(cur);
    }
    if !cur.is_n_stack() {
        return false;
    }
    candidate.push(cur)
}

pub(super) fn is_appendable(candidate: &Candidate) -> Result<bool, AnalysisError> {
    let mut stacks = 0;
    for segment in candidate.segments() {
        if segment.is_n_stack() {
            stacks += 1;
        } else if !segment.is_interval() {
            return Err(candidate.violation(segment));
        }
    }
    Ok(candidate.len() >= 2 && stacks >= 2)
}
