//! Variation (entropy) scoring of a pattern's segment mix.

use crate::config::IntervalDebuffs;
use crate::models::{Lane, Pattern, PatternKind, Segment, SegmentKind};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Entropy alphabet entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Label {
    Segment(SegmentKind),
    /// Any interval in the middle of a pattern.
    Interval,
    /// Zig zag told apart by its note count.
    ZigZag(usize),
}

/// Shannon entropy (base 2) of the label frequencies. Zero for no labels.
pub fn shannon_entropy<T: Eq + Hash>(labels: &[T]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let mut counts: HashMap<&T, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let n = labels.len() as f64;
    -counts
        .values()
        .map(|&count| {
            let p = count as f64 / n;
            p * p.log2()
        })
        .sum::<f64>()
}

impl IntervalDebuffs {
    /// Debuff of an interval kind; 1.0 for anything else.
    pub fn for_kind(&self, kind: SegmentKind) -> f64 {
        match kind {
            SegmentKind::ShortInterval => self.short,
            SegmentKind::MedInterval => self.med,
            SegmentKind::LongInterval => self.long,
            _ => 1.0,
        }
    }
}

/// Variation score of `pattern`, dispatched on its kind.
pub fn variation_score(pattern: &Pattern, debuffs: &IntervalDebuffs) -> f64 {
    match pattern.kind {
        PatternKind::EvenCircles | PatternKind::SkewedCircles | PatternKind::VaryingStacks => {
            segment_entropy(&pattern.segments, debuffs, false).max(1.0)
        }
        PatternKind::NothingButTheory => segment_entropy(&pattern.segments, debuffs, true).max(1.0),
        PatternKind::SlowStretch => lane_entropy(pattern).max(1.0),
        PatternKind::Other => segment_entropy(&pattern.segments, debuffs, false),
    }
}

/// Entropy of the segment kinds, debuffed for intervals and switches.
///
/// Intervals at either end are left out of the alphabet but still debuff
/// (with the end penalty on top). Middle intervals share one label. A zero
/// result is reported as 1.
pub fn segment_entropy(
    segments: &[Segment],
    debuffs: &IntervalDebuffs,
    zig_zags_by_note_count: bool,
) -> f64 {
    if segments.is_empty() {
        return 0.0;
    }

    let last = segments.len() - 1;
    let mut labels = Vec::with_capacity(segments.len());
    let mut interval_debuffs = Vec::new();

    for (i, segment) in segments.iter().enumerate() {
        if segment.is_interval() {
            let debuff = debuffs.for_kind(segment.kind);
            if i == 0 || i == last {
                interval_debuffs.push(debuff * debuffs.end_extra);
            } else {
                interval_debuffs.push(debuff);
                labels.push(Label::Interval);
            }
        } else if zig_zags_by_note_count && segment.kind == SegmentKind::ZigZag {
            labels.push(Label::ZigZag(segment.notes.len()));
        } else {
            labels.push(Label::Segment(segment.kind));
        }
    }

    let mut entropy = shannon_entropy(&labels);
    if !interval_debuffs.is_empty() {
        let average = interval_debuffs.iter().sum::<f64>() / interval_debuffs.len() as f64;
        entropy *= average;
    }
    entropy = switch_debuff(segments, entropy);

    if entropy == 0.0 { 1.0 } else { entropy }
}

/// Damps high entropy that comes from switches. Short patterns are damped
/// hardest, and a higher switch share is damped less.
fn switch_debuff(segments: &[Segment], entropy: f64) -> f64 {
    let switches = segments
        .iter()
        .filter(|s| s.kind == SegmentKind::Switch)
        .count();
    if entropy <= 1.0 || switches == 0 {
        return entropy;
    }

    let total = segments.len();
    let factor = if total < 4 {
        0.7
    } else if (switches as f64 / total as f64) < 0.5 {
        0.8
    } else {
        0.9
    };
    entropy * factor
}

/// Lane entropy over the pattern's distinct note timestamps.
fn lane_entropy(pattern: &Pattern) -> f64 {
    let mut by_time: BTreeMap<u64, Lane> = BTreeMap::new();
    for note in pattern.segments.iter().flat_map(|s| s.notes.iter()) {
        by_time.entry(note.sample_time).or_insert(note.lane);
    }
    let lanes: Vec<Lane> = by_time.into_values().collect();
    shannon_entropy(&lanes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::candidates::test_support::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn debuffs() -> IntervalDebuffs {
        IntervalDebuffs::default()
    }

    #[test]
    fn test_shannon_entropy() {
        assert_eq!(shannon_entropy::<u8>(&[]), 0.0);
        assert!(approx(shannon_entropy(&[1, 1, 1, 1]), 0.0));
        assert!(approx(shannon_entropy(&[1, 2]), 1.0));
        assert!(approx(shannon_entropy(&[1, 2, 3, 4]), 2.0));
    }

    #[test]
    fn test_identical_switches_floor_at_one() {
        let switches: Vec<Segment> = (0..8)
            .map(|i| seg(SegmentKind::Switch, i as f64 * 0.1, 0.1, 2))
            .collect();
        let other = Pattern::new(PatternKind::Other, switches.clone());
        assert_eq!(variation_score(&other, &debuffs()), 1.0);
        let circles = Pattern::new(PatternKind::EvenCircles, switches);
        assert_eq!(variation_score(&circles, &debuffs()), 1.0);
    }

    #[test]
    fn test_end_intervals_leave_the_alphabet() {
        let segments = vec![
            seg(SegmentKind::ShortInterval, 0.0, 0.3, 2),
            seg(SegmentKind::TwoStack, 0.3, 0.1, 2),
            seg(SegmentKind::ThreeStack, 0.4, 0.1, 3),
        ];
        // Alphabet is {2-Stack, 3-Stack}: entropy 1, debuffed by 0.7 * 0.8.
        let score = segment_entropy(&segments, &debuffs(), false);
        assert!(approx(score, 0.56));
    }

    #[test]
    fn test_middle_intervals_share_a_label() {
        let segments = vec![
            seg(SegmentKind::TwoStack, 0.0, 0.1, 2),
            seg(SegmentKind::ShortInterval, 0.1, 0.3, 2),
            seg(SegmentKind::TwoStack, 0.4, 0.1, 2),
            seg(SegmentKind::LongInterval, 0.5, 1.5, 2),
            seg(SegmentKind::ThreeStack, 2.0, 0.1, 3),
        ];
        // Labels: 2-Stack, Interval, 2-Stack, Interval, 3-Stack.
        let expected = shannon_entropy(&["a", "i", "a", "i", "b"]) * (0.7 + 0.4) / 2.0;
        let score = segment_entropy(&segments, &debuffs(), false);
        assert!(approx(score, expected));
    }

    #[test]
    fn test_switch_debuff_tiers() {
        let short = vec![
            seg(SegmentKind::ZigZag, 0.0, 0.1, 3),
            seg(SegmentKind::Switch, 0.2, 0.1, 2),
            seg(SegmentKind::TwoStack, 0.3, 0.1, 2),
        ];
        let raw = shannon_entropy(&[1, 2, 3]);
        assert!(approx(segment_entropy(&short, &debuffs(), false), raw * 0.7));

        let long = vec![
            seg(SegmentKind::ZigZag, 0.0, 0.1, 3),
            seg(SegmentKind::Switch, 0.2, 0.1, 2),
            seg(SegmentKind::TwoStack, 0.3, 0.1, 2),
            seg(SegmentKind::ThreeStack, 0.4, 0.1, 3),
        ];
        let raw = shannon_entropy(&[1, 2, 3, 4]);
        assert!(approx(segment_entropy(&long, &debuffs(), false), raw * 0.8));

        let switch_heavy = vec![
            seg(SegmentKind::Switch, 0.0, 0.1, 2),
            seg(SegmentKind::TwoStack, 0.1, 0.1, 2),
            seg(SegmentKind::Switch, 0.2, 0.1, 2),
            seg(SegmentKind::ThreeStack, 0.3, 0.1, 3),
            seg(SegmentKind::Switch, 0.5, 0.1, 2),
            seg(SegmentKind::FourStack, 0.6, 0.1, 4),
        ];
        let raw = shannon_entropy(&[1, 2, 1, 3, 1, 4]);
        assert!(approx(segment_entropy(&switch_heavy, &debuffs(), false), raw * 0.9));
    }

    #[test]
    fn test_nothing_but_theory_counts_zig_zag_notes() {
        let segments = vec![
            seg(SegmentKind::TwoStack, 0.0, 0.1, 2),
            seg(SegmentKind::ZigZag, 0.1, 0.1, 4),
            seg(SegmentKind::TwoStack, 0.4, 0.1, 2),
            seg(SegmentKind::ZigZag, 0.5, 0.1, 6),
        ];
        let plain = segment_entropy(&segments, &debuffs(), false);
        let by_count = segment_entropy(&segments, &debuffs(), true);
        assert!(approx(plain, 1.0));
        assert!(by_count > plain);
    }

    #[test]
    fn test_slow_stretch_is_at_least_one() {
        let pattern = Pattern::new(
            PatternKind::SlowStretch,
            vec![
                seg(SegmentKind::LongInterval, 0.0, 1.5, 2),
                seg(SegmentKind::MedInterval, 1.5, 0.5, 2),
            ],
        );
        assert_eq!(variation_score(&pattern, &debuffs()), 1.0);
    }
}
