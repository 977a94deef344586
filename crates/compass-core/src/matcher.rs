//! The portrait pipeline: answers → element scores → cohorts → pairs →
//! quadrant → portraits.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  aggregate::element_scores,
  assemble::{PortraitView, assemble, rank_pairs},
  answer::Battery,
  element::{ElementIndex, ElementScore},
  error::EngineError,
  pairing::{Cohorts, FamilyScores, pair_all},
  portrait::QuadrantKind,
  selector::select,
  store::AdvisoryStore,
};

/// How a portrait match concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "quadrant", rename_all = "snake_case")]
pub enum MatchOutcome {
  /// A quadrant produced pairs and was reported.
  Matched(QuadrantKind),
  /// The signal was sufficient but no quadrant produced a pair.
  NoPairs,
  /// At least one family's scores span less than
  /// [`SIGNAL_MIN_RANGE`](crate::quantile::SIGNAL_MIN_RANGE).
  InsufficientSignal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortraitMatch {
  pub outcome:                      MatchOutcome,
  pub selected_preference_elements: Vec<ElementScore>,
  pub selected_aptitude_elements:   Vec<ElementScore>,
  pub portraits:                    Vec<PortraitView>,
}

impl PortraitMatch {
  pub fn insufficient_signal() -> Self {
    Self {
      outcome: MatchOutcome::InsufficientSignal,
      selected_preference_elements: vec![],
      selected_aptitude_elements: vec![],
      portraits: vec![],
    }
  }
}

/// Runs the portrait pipeline for one user against a store.
pub struct PortraitMatcher<S> {
  store: Arc<S>,
}

impl<S: AdvisoryStore> PortraitMatcher<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Classify `user_id` into a quadrant and fetch the matching portraits.
  ///
  /// "Nothing matched" outcomes are reported through
  /// [`PortraitMatch::outcome`], never as errors.
  pub async fn match_user(
    &self,
    user_id: Uuid,
  ) -> Result<PortraitMatch, EngineError<S::Error>> {
    let store = self.store.as_ref();
    let elements = store.list_elements().await.map_err(EngineError::Store)?;
    let scales = store
      .list_scales(Battery::CURRENT)
      .await
      .map_err(EngineError::Store)?;
    let answers = store.list_answers(user_id).await.map_err(EngineError::Store)?;

    let index = ElementIndex::new(elements);
    let scores = FamilyScores::split(&index, &element_scores(&scales, &answers));

    if !scores.has_signal() {
      tracing::debug!(%user_id, "insufficient signal, skipping portrait match");
      return Ok(PortraitMatch::insufficient_signal());
    }

    let cohorts = Cohorts::compute(&scores);
    let Some(mut selection) = select(&pair_all(&index, &cohorts)) else {
      return Ok(PortraitMatch {
        outcome: MatchOutcome::NoPairs,
        selected_preference_elements: cohorts.preference_top,
        selected_aptitude_elements: cohorts.aptitude_top,
        portraits: vec![],
      });
    };
    rank_pairs(&mut selection.pairs);

    let quadrant = selection.quadrant;
    let quadrants = store.list_quadrants().await.map_err(EngineError::Store)?;
    let portraits = match quadrants.iter().find(|q| q.kind == quadrant) {
      Some(row) => assemble(store, quadrant, row.quadrant_id, &selection.pairs)
        .await
        .map_err(EngineError::Store)?,
      None => {
        tracing::warn!(%quadrant, "quadrant row missing, no portraits fetched");
        vec![]
      }
    };

    let (preference, aptitude) = cohorts.for_quadrant(quadrant);
    Ok(PortraitMatch {
      outcome: MatchOutcome::Matched(quadrant),
      selected_preference_elements: preference.to_vec(),
      selected_aptitude_elements: aptitude.to_vec(),
      portraits,
    })
  }
}
