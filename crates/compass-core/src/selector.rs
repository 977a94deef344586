//! Choosing the single quadrant to report.

use crate::{
  pairing::{QuadrantPairs, TraitPair},
  portrait::QuadrantKind,
};

/// The winning quadrant and its candidate pairs (unsorted).
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
  pub quadrant: QuadrantKind,
  pub pairs:    Vec<TraitPair>,
}

/// Walk [`QuadrantKind::CASCADE`] and take the first quadrant with at least
/// one pair. `None` when every quadrant, Q3 included, is empty.
pub fn select(pairs: &QuadrantPairs) -> Option<Selection> {
  let selection = QuadrantKind::CASCADE.into_iter().find_map(|quadrant| {
    let candidates = pairs.get(quadrant);
    (!candidates.is_empty()).then(|| Selection {
      quadrant,
      pairs: candidates.to_vec(),
    })
  });

  match &selection {
    Some(s) => tracing::debug!(quadrant = %s.quadrant, pairs = s.pairs.len(), "quadrant selected"),
    None => tracing::debug!("no quadrant produced a pair"),
  }
  selection
}
