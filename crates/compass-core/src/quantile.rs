//! Tie-inclusive top/bottom 20% cohorts and the signal-sufficiency gate.

use crate::element::ElementScore;

/// Smallest spread between a family's highest and lowest element score for
/// its answers to count as a usable signal.
pub const SIGNAL_MIN_RANGE: i32 = 3;

/// Number of ranks a 20% cohort covers before tie extension:
/// `max(1, ceil(n * 0.2))`.
pub fn cohort_rank(n: usize) -> usize { n.div_ceil(5).max(1) }

/// Elements scoring at or above the score at rank `cohort_rank(n)` when
/// sorted descending. Ties at the threshold all join the cohort.
pub fn top20(scores: &[ElementScore]) -> Vec<ElementScore> {
  cohort(scores, |a, b| b.cmp(&a))
}

/// Elements scoring at or below the score at rank `cohort_rank(n)` when
/// sorted ascending.
pub fn bottom20(scores: &[ElementScore]) -> Vec<ElementScore> {
  cohort(scores, |a, b| a.cmp(&b))
}

fn cohort(
  scores: &[ElementScore],
  order: impl Fn(i32, i32) -> std::cmp::Ordering,
) -> Vec<ElementScore> {
  if scores.is_empty() {
    return vec![];
  }
  let mut sorted = scores.to_vec();
  sorted.sort_by(|a, b| order(a.score, b.score));

  let threshold = sorted[cohort_rank(sorted.len()) - 1].score;
  sorted.retain(|s| order(s.score, threshold).is_le());
  sorted
}

/// Whether one family's scores differentiate its elements enough to trust.
/// An empty family carries no signal.
pub fn has_signal(scores: &[ElementScore]) -> bool {
  let max = scores.iter().map(|s| s.score).max();
  let min = scores.iter().map(|s| s.score).min();
  match (max, min) {
    (Some(max), Some(min)) => max - min >= SIGNAL_MIN_RANGE,
    _ => false,
  }
}
