//! Note density: the base difficulty of a chart.

use crate::config::TopWeighting;
use crate::models::Note;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

/// Counts notes per fixed-width time window, starting at the first note.
///
/// `notes` must be sorted by time. The last window always contains the last
/// note.
pub fn create_sections(notes: &[Note], window_secs: f64, sample_rate: u32) -> Vec<usize> {
    let (Some(first), Some(last)) = (notes.first(), notes.last()) else {
        return Vec::new();
    };
    let threshold = window_secs * sample_rate as f64;
    if threshold <= 0.0 {
        return vec![notes.len()];
    }

    let start = first.sample_time;
    let span = (last.sample_time - start) as f64;
    let num_sections = ((span + threshold) / threshold).floor() as usize;

    let mut sections = vec![0; num_sections];
    for note in notes {
        let index = ((note.sample_time - start) as f64 / threshold).floor() as usize;
        if let Some(count) = sections.get_mut(index) {
            *count += 1;
        }
    }
    sections
}

/// Trailing moving average. Early entries average over the windows seen so far.
pub fn moving_average(counts: &[usize], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..counts.len())
        .map(|i| {
            let from = (i + 1).saturating_sub(window);
            let slice = &counts[from..=i];
            slice.iter().sum::<usize>() as f64 / slice.len() as f64
        })
        .collect()
}

/// Weighted average favouring the highest values.
///
/// The top `top_percentage` of values (at least one) and anything tied with
/// the lowest of them get `top_weight`; the rest get `bottom_weight`.
/// Returns `None` for no values or a zero total weight.
pub fn weighted_average_of_values(values: &[f64], weighting: &TopWeighting) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted: Vec<OrderedFloat<f64>> = values.iter().copied().map(OrderedFloat).collect();
    sorted.sort_unstable_by_key(|&v| Reverse(v));

    let len = values.len();
    let top_count = ((len as f64 * weighting.top_percentage).round() as usize).clamp(1, len);
    let threshold = sorted[top_count - 1].0;

    let (weighted_sum, total_weight) = values.iter().fold((0.0, 0.0), |(sum, total), &v| {
        let weight = if v >= threshold {
            weighting.top_weight
        } else {
            weighting.bottom_weight
        };
        (sum + v * weight, total + weight)
    });

    if total_weight == 0.0 {
        return None;
    }
    Some(weighted_sum / total_weight)
}
