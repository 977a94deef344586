//! Pairing "like" elements with their linked "talent" elements, per quadrant.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
  element::{ElementId, ElementIndex, ElementScore, Family},
  portrait::QuadrantKind,
  quantile::{bottom20, has_signal, top20},
};

// ─── Family scores ───────────────────────────────────────────────────────────

/// A user's element scores split by family.
#[derive(Debug, Clone, Default)]
pub struct FamilyScores {
  pub preference: Vec<ElementScore>,
  pub aptitude:   Vec<ElementScore>,
}

impl FamilyScores {
  /// Attach element metadata to raw totals. Totals for elements missing from
  /// the index are dropped.
  pub fn split(index: &ElementIndex, totals: &BTreeMap<ElementId, i32>) -> Self {
    let mut scores = Self::default();
    for (&id, &total) in totals {
      let Some(element) = index.get(id) else { continue };
      let score = ElementScore::new(element, total);
      match element.family {
        Family::Preference => scores.preference.push(score),
        Family::Aptitude => scores.aptitude.push(score),
      }
    }
    scores
  }

  /// Both families must differentiate their elements.
  pub fn has_signal(&self) -> bool {
    has_signal(&self.preference) && has_signal(&self.aptitude)
  }
}

// ─── Cohorts ─────────────────────────────────────────────────────────────────

/// Top and bottom 20% of each family.
#[derive(Debug, Clone, Default)]
pub struct Cohorts {
  pub preference_top:    Vec<ElementScore>,
  pub preference_bottom: Vec<ElementScore>,
  pub aptitude_top:      Vec<ElementScore>,
  pub aptitude_bottom:   Vec<ElementScore>,
}

impl Cohorts {
  pub fn compute(scores: &FamilyScores) -> Self {
    Self {
      preference_top:    top20(&scores.preference),
      preference_bottom: bottom20(&scores.preference),
      aptitude_top:      top20(&scores.aptitude),
      aptitude_bottom:   bottom20(&scores.aptitude),
    }
  }

  /// The (preference, aptitude) cohorts a quadrant draws from: the top
  /// cohort where that family is obvious, the bottom cohort where not.
  pub fn for_quadrant(
    &self,
    quadrant: QuadrantKind,
  ) -> (&[ElementScore], &[ElementScore]) {
    let preference = if quadrant.preference_obvious() {
      &self.preference_top
    } else {
      &self.preference_bottom
    };
    let aptitude = if quadrant.aptitude_obvious() {
      &self.aptitude_top
    } else {
      &self.aptitude_bottom
    };
    (preference, aptitude)
  }
}

// ─── Pairs ───────────────────────────────────────────────────────────────────

/// A preference element and its aptitude counterpart, both within the
/// cohorts of one quadrant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitPair {
  pub like:   ElementScore,
  pub talent: ElementScore,
}

impl TraitPair {
  pub fn combined_score(&self) -> i32 { self.like.score + self.talent.score }
}

/// Candidate pairs of every quadrant.
#[derive(Debug, Clone, Default)]
pub struct QuadrantPairs {
  by_quadrant: HashMap<QuadrantKind, Vec<TraitPair>>,
}

impl QuadrantPairs {
  pub fn get(&self, quadrant: QuadrantKind) -> &[TraitPair] {
    self.by_quadrant.get(&quadrant).map(Vec::as_slice).unwrap_or_default()
  }

  pub fn insert(&mut self, quadrant: QuadrantKind, pairs: Vec<TraitPair>) {
    self.by_quadrant.insert(quadrant, pairs);
  }

  pub fn is_empty(&self) -> bool { self.by_quadrant.values().all(Vec::is_empty) }
}

/// Pair each preference element of the quadrant's preference cohort with its
/// counterpart, keeping only counterparts inside the aptitude cohort.
///
/// Several preference elements may share one counterpart; each yields its
/// own pair.
pub fn pair_quadrant(
  index: &ElementIndex,
  cohorts: &Cohorts,
  quadrant: QuadrantKind,
) -> Vec<TraitPair> {
  let (preference, aptitude) = cohorts.for_quadrant(quadrant);
  let aptitude_by_id: HashMap<ElementId, &ElementScore> =
    aptitude.iter().map(|s| (s.element_id, s)).collect();

  preference
    .iter()
    .filter_map(|like| {
      let counterpart = index.correspondent(like.element_id)?;
      let talent = aptitude_by_id.get(&counterpart.element_id)?;
      Some(TraitPair { like: like.clone(), talent: (*talent).clone() })
    })
    .collect()
}

/// Candidate pairs for all four quadrants.
pub fn pair_all(index: &ElementIndex, cohorts: &Cohorts) -> QuadrantPairs {
  let mut pairs = QuadrantPairs::default();
  for quadrant in QuadrantKind::CASCADE {
    pairs.insert(quadrant, pair_quadrant(index, cohorts, quadrant));
  }
  pairs
}
