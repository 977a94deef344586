//! Per-element answer totals.

use std::collections::{BTreeMap, HashMap};

use crate::{
  answer::{Answer, Battery, Scale, ScaleId},
  element::ElementId,
};

/// Sum a user's answers per element over current-battery scales.
///
/// Elements without a single answer are absent from the result rather than
/// present with zero; answers to unknown or legacy scales are ignored.
pub fn element_scores(
  scales: &[Scale],
  answers: &[Answer],
) -> BTreeMap<ElementId, i32> {
  let element_of: HashMap<ScaleId, ElementId> = scales
    .iter()
    .filter(|s| s.battery == Battery::CURRENT)
    .map(|s| (s.scale_id, s.element_id))
    .collect();

  let mut totals = BTreeMap::new();
  for answer in answers {
    if let Some(&element_id) = element_of.get(&answer.scale_id) {
      *totals.entry(element_id).or_insert(0) += answer.score.value();
    }
  }
  totals
}
