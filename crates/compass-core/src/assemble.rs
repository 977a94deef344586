//! Ranking the winning pairs and assembling their portraits.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
  pairing::TraitPair,
  portrait::{
    EnrichmentRow, Portrait, PortraitEnrichment, PortraitId, PortraitTriple,
    QuadrantId, QuadrantKind,
  },
  store::AdvisoryStore,
};

/// A portrait together with the enrichment relevant to its quadrant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortraitView {
  #[serde(flatten)]
  pub portrait:   Portrait,
  pub enrichment: PortraitEnrichment,
}

/// Order pairs by combined score, highest first; equal sums by preference
/// score, highest first. Remaining ties keep their incoming order.
pub fn rank_pairs(pairs: &mut [TraitPair]) {
  pairs.sort_by(|a, b| {
    b.combined_score()
      .cmp(&a.combined_score())
      .then_with(|| b.like.score.cmp(&a.like.score))
  });
}

/// Fetch the portraits of `pairs` (already ranked) and attach enrichment.
///
/// Pairs without a stored portrait are skipped. The result follows the order
/// of `pairs`, whatever order the store returns rows in.
pub async fn assemble<S: AdvisoryStore>(
  store: &S,
  quadrant: QuadrantKind,
  quadrant_id: QuadrantId,
  pairs: &[TraitPair],
) -> Result<Vec<PortraitView>, S::Error> {
  if pairs.is_empty() {
    return Ok(vec![]);
  }

  let triples: Vec<PortraitTriple> = pairs
    .iter()
    .map(|p| PortraitTriple {
      like_element_id: p.like.element_id,
      talent_element_id: p.talent.element_id,
      quadrant_id,
    })
    .collect();

  let mut by_triple: HashMap<PortraitTriple, Portrait> = HashMap::new();
  for portrait in store.find_portraits_by_triples(&triples).await? {
    by_triple.entry(portrait.triple()).or_insert(portrait);
  }

  let ordered: Vec<Portrait> = triples
    .iter()
    .filter_map(|t| {
      let found = by_triple.get(t).cloned();
      if found.is_none() {
        tracing::debug!(?t, "no portrait for pair");
      }
      found
    })
    .collect();
  if ordered.is_empty() {
    return Ok(vec![]);
  }

  let ids: Vec<PortraitId> = ordered.iter().map(|p| p.portrait_id).collect();
  let mut rows_by_portrait: HashMap<PortraitId, Vec<EnrichmentRow>> = HashMap::new();
  for row in store.find_enrichment(&ids, quadrant).await? {
    rows_by_portrait.entry(row.portrait_id).or_default().push(row);
  }

  Ok(
    ordered
      .into_iter()
      .map(|portrait| {
        let rows = rows_by_portrait.remove(&portrait.portrait_id).unwrap_or_default();
        PortraitView {
          enrichment: PortraitEnrichment::from_rows(quadrant, rows),
          portrait,
        }
      })
      .collect(),
  )
}
