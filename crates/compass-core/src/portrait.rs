//! Quadrants, portraits, and the quadrant-specific enrichment attached to a
//! portrait.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{Result, element::ElementId};

pub type QuadrantId = i64;
pub type PortraitId = i64;

// ─── Quadrant ────────────────────────────────────────────────────────────────

/// One cell of the (preference obvious?, aptitude obvious?) grid.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QuadrantKind {
  /// Both preference and aptitude obvious.
  Q1,
  /// Aptitude obvious, preference not.
  Q2,
  /// Neither obvious.
  Q3,
  /// Preference obvious, aptitude not.
  Q4,
}

impl QuadrantKind {
  /// Order in which quadrants are tried when choosing the one to report.
  pub const CASCADE: [Self; 4] = [Self::Q1, Self::Q2, Self::Q4, Self::Q3];

  pub fn parse(s: &str) -> Result<Self> { crate::error::parse_tag("quadrant", s) }

  pub fn from_flags(preference_obvious: bool, aptitude_obvious: bool) -> Self {
    match (preference_obvious, aptitude_obvious) {
      (true, true) => Self::Q1,
      (false, true) => Self::Q2,
      (false, false) => Self::Q3,
      (true, false) => Self::Q4,
    }
  }

  pub fn preference_obvious(self) -> bool { matches!(self, Self::Q1 | Self::Q4) }

  pub fn aptitude_obvious(self) -> bool { matches!(self, Self::Q1 | Self::Q2) }
}

/// A stored quadrant row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quadrant {
  pub quadrant_id: QuadrantId,
  pub kind:        QuadrantKind,
  pub name:        String,
}

// ─── Portrait ────────────────────────────────────────────────────────────────

/// Lookup key of a portrait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortraitTriple {
  pub like_element_id:   ElementId,
  pub talent_element_id: ElementId,
  pub quadrant_id:       QuadrantId,
}

/// Narrative content describing one (like, talent, quadrant) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portrait {
  pub portrait_id:       PortraitId,
  pub like_element_id:   ElementId,
  pub talent_element_id: ElementId,
  pub quadrant_id:       QuadrantId,
  pub title:             String,
  pub summary:           String,
  pub strengths:         String,
  pub advice:            String,
}

impl Portrait {
  pub fn triple(&self) -> PortraitTriple {
    PortraitTriple {
      like_element_id:   self.like_element_id,
      talent_element_id: self.talent_element_id,
      quadrant_id:       self.quadrant_id,
    }
  }
}

// ─── Enrichment rows ─────────────────────────────────────────────────────────

/// Which collection an enrichment row belongs to. Two kinds per quadrant.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnrichmentKind {
  Challenge,
  Niche,
  LifeChallenge,
  FeasibilityStudy,
  Weakness,
  Compensation,
  Dilemma,
  GrowthPath,
}

impl EnrichmentKind {
  pub fn parse(s: &str) -> Result<Self> {
    crate::error::parse_tag("enrichment kind", s)
  }

  pub fn quadrant(self) -> QuadrantKind {
    match self {
      Self::Challenge | Self::Niche => QuadrantKind::Q1,
      Self::LifeChallenge | Self::FeasibilityStudy => QuadrantKind::Q2,
      Self::Weakness | Self::Compensation => QuadrantKind::Q3,
      Self::Dilemma | Self::GrowthPath => QuadrantKind::Q4,
    }
  }

  /// The two kinds relevant to `quadrant`.
  pub fn for_quadrant(quadrant: QuadrantKind) -> [Self; 2] {
    match quadrant {
      QuadrantKind::Q1 => [Self::Challenge, Self::Niche],
      QuadrantKind::Q2 => [Self::LifeChallenge, Self::FeasibilityStudy],
      QuadrantKind::Q3 => [Self::Weakness, Self::Compensation],
      QuadrantKind::Q4 => [Self::Dilemma, Self::GrowthPath],
    }
  }
}

/// A supplementary content row as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRow {
  pub enrichment_id: i64,
  pub portrait_id:   PortraitId,
  pub kind:          EnrichmentKind,
  pub title:         String,
  pub body:          String,
  pub ordinal:       i32,
}

/// An enrichment row as presented inside a portrait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentItem {
  pub enrichment_id: i64,
  pub title:         String,
  pub body:          String,
  pub ordinal:       i32,
}

impl From<EnrichmentRow> for EnrichmentItem {
  fn from(row: EnrichmentRow) -> Self {
    Self {
      enrichment_id: row.enrichment_id,
      title:         row.title,
      body:          row.body,
      ordinal:       row.ordinal,
    }
  }
}

// ─── PortraitEnrichment ──────────────────────────────────────────────────────

/// The one family of supplementary content relevant to a portrait's quadrant.
///
/// Serialises as the quadrant tag plus all eight slots, the unused ones as
/// empty arrays. Deserialising keeps only the tagged quadrant's slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "TaggedSlots", from = "TaggedSlots")]
pub enum PortraitEnrichment {
  Q1 {
    challenges: Vec<EnrichmentItem>,
    niches:     Vec<EnrichmentItem>,
  },
  Q2 {
    life_challenges:     Vec<EnrichmentItem>,
    feasibility_studies: Vec<EnrichmentItem>,
  },
  Q3 {
    weaknesses:    Vec<EnrichmentItem>,
    compensations: Vec<EnrichmentItem>,
  },
  Q4 {
    dilemmas:     Vec<EnrichmentItem>,
    growth_paths: Vec<EnrichmentItem>,
  },
}

impl PortraitEnrichment {
  /// An enrichment of the shape `quadrant` calls for, with both collections
  /// empty.
  pub fn empty(quadrant: QuadrantKind) -> Self {
    match quadrant {
      QuadrantKind::Q1 => Self::Q1 { challenges: vec![], niches: vec![] },
      QuadrantKind::Q2 => Self::Q2 {
        life_challenges:     vec![],
        feasibility_studies: vec![],
      },
      QuadrantKind::Q3 => Self::Q3 { weaknesses: vec![], compensations: vec![] },
      QuadrantKind::Q4 => Self::Q4 { dilemmas: vec![], growth_paths: vec![] },
    }
  }

  /// Build the enrichment for `quadrant` from raw rows. Rows belonging to a
  /// different quadrant's collections are dropped. Each collection is
  /// ordered by `ordinal`.
  pub fn from_rows(
    quadrant: QuadrantKind,
    rows: impl IntoIterator<Item = EnrichmentRow>,
  ) -> Self {
    let mut enrichment = Self::empty(quadrant);
    for row in rows {
      if row.kind.quadrant() != quadrant {
        tracing::debug!(
          portrait_id = row.portrait_id,
          kind = %row.kind,
          %quadrant,
          "dropping enrichment row of another quadrant"
        );
        continue;
      }
      if let Some(slot) = enrichment.slot_mut(row.kind) {
        slot.push(row.into());
      }
    }
    for slot in enrichment.collections_mut() {
      slot.sort_by_key(|item| item.ordinal);
    }
    enrichment
  }

  pub fn quadrant(&self) -> QuadrantKind {
    match self {
      Self::Q1 { .. } => QuadrantKind::Q1,
      Self::Q2 { .. } => QuadrantKind::Q2,
      Self::Q3 { .. } => QuadrantKind::Q3,
      Self::Q4 { .. } => QuadrantKind::Q4,
    }
  }

  fn slot_mut(&mut self, kind: EnrichmentKind) -> Option<&mut Vec<EnrichmentItem>> {
    use EnrichmentKind as K;
    match (self, kind) {
      (Self::Q1 { challenges, .. }, K::Challenge) => Some(challenges),
      (Self::Q1 { niches, .. }, K::Niche) => Some(niches),
      (Self::Q2 { life_challenges, .. }, K::LifeChallenge) => Some(life_challenges),
      (Self::Q2 { feasibility_studies, .. }, K::FeasibilityStudy) => {
        Some(feasibility_studies)
      }
      (Self::Q3 { weaknesses, .. }, K::Weakness) => Some(weaknesses),
      (Self::Q3 { compensations, .. }, K::Compensation) => Some(compensations),
      (Self::Q4 { dilemmas, .. }, K::Dilemma) => Some(dilemmas),
      (Self::Q4 { growth_paths, .. }, K::GrowthPath) => Some(growth_paths),
      _ => None,
    }
  }

  fn collections_mut(&mut self) -> [&mut Vec<EnrichmentItem>; 2] {
    match self {
      Self::Q1 { challenges, niches } => [challenges, niches],
      Self::Q2 { life_challenges, feasibility_studies } => {
        [life_challenges, feasibility_studies]
      }
      Self::Q3 { weaknesses, compensations } => [weaknesses, compensations],
      Self::Q4 { dilemmas, growth_paths } => [dilemmas, growth_paths],
    }
  }

  /// The uniform eight-slot shape: the populated pair in place, every other
  /// slot an empty vector.
  pub fn flatten(&self) -> EnrichmentSlots { self.clone().into_slots() }

  fn into_slots(self) -> EnrichmentSlots {
    let mut slots = EnrichmentSlots::default();
    match self {
      Self::Q1 { challenges, niches } => {
        slots.challenges = challenges;
        slots.niches = niches;
      }
      Self::Q2 { life_challenges, feasibility_studies } => {
        slots.life_challenges = life_challenges;
        slots.feasibility_studies = feasibility_studies;
      }
      Self::Q3 { weaknesses, compensations } => {
        slots.weaknesses = weaknesses;
        slots.compensations = compensations;
      }
      Self::Q4 { dilemmas, growth_paths } => {
        slots.dilemmas = dilemmas;
        slots.growth_paths = growth_paths;
      }
    }
    slots
  }
}

/// Wire form of [`PortraitEnrichment`].
#[derive(Serialize, Deserialize)]
struct TaggedSlots {
  quadrant: QuadrantKind,
  #[serde(flatten)]
  slots:    EnrichmentSlots,
}

impl From<PortraitEnrichment> for TaggedSlots {
  fn from(enrichment: PortraitEnrichment) -> Self {
    Self { quadrant: enrichment.quadrant(), slots: enrichment.into_slots() }
  }
}

impl From<TaggedSlots> for PortraitEnrichment {
  fn from(tagged: TaggedSlots) -> Self {
    let s = tagged.slots;
    match tagged.quadrant {
      QuadrantKind::Q1 => Self::Q1 { challenges: s.challenges, niches: s.niches },
      QuadrantKind::Q2 => Self::Q2 {
        life_challenges:     s.life_challenges,
        feasibility_studies: s.feasibility_studies,
      },
      QuadrantKind::Q3 => Self::Q3 {
        weaknesses:    s.weaknesses,
        compensations: s.compensations,
      },
      QuadrantKind::Q4 => Self::Q4 {
        dilemmas:     s.dilemmas,
        growth_paths: s.growth_paths,
      },
    }
  }
}

/// Flat view of a [`PortraitEnrichment`] with every slot present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentSlots {
  pub challenges:          Vec<EnrichmentItem>,
  pub niches:              Vec<EnrichmentItem>,
  pub life_challenges:     Vec<EnrichmentItem>,
  pub feasibility_studies: Vec<EnrichmentItem>,
  pub weaknesses:          Vec<EnrichmentItem>,
  pub compensations:       Vec<EnrichmentItem>,
  pub dilemmas:            Vec<EnrichmentItem>,
  pub growth_paths:        Vec<EnrichmentItem>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn row(id: i64, kind: EnrichmentKind, ordinal: i32) -> EnrichmentRow {
    EnrichmentRow {
      enrichment_id: id,
      portrait_id: 1,
      kind,
      title: format!("t{id}"),
      body: String::new(),
      ordinal,
    }
  }

  #[test]
  fn flags_round_trip_through_kind() {
    for kind in QuadrantKind::CASCADE {
      assert_eq!(
        QuadrantKind::from_flags(kind.preference_obvious(), kind.aptitude_obvious()),
        kind
      );
    }
  }

  #[test]
  fn from_rows_keeps_only_matching_collections() {
    let enrichment = PortraitEnrichment::from_rows(
      QuadrantKind::Q2,
      [
        row(1, EnrichmentKind::FeasibilityStudy, 2),
        row(2, EnrichmentKind::Challenge, 1),
        row(3, EnrichmentKind::FeasibilityStudy, 1),
        row(4, EnrichmentKind::LifeChallenge, 0),
      ],
    );
    let PortraitEnrichment::Q2 { life_challenges, feasibility_studies } = &enrichment
    else {
      panic!("expected Q2 enrichment, got {enrichment:?}");
    };
    assert_eq!(life_challenges.len(), 1);
    let ids: Vec<i64> = feasibility_studies.iter().map(|i| i.enrichment_id).collect();
    assert_eq!(ids, vec![3, 1]);
  }

  #[test]
  fn flatten_leaves_other_slots_empty_not_missing() {
    let enrichment = PortraitEnrichment::from_rows(
      QuadrantKind::Q4,
      [row(1, EnrichmentKind::Dilemma, 0), row(2, EnrichmentKind::GrowthPath, 0)],
    );
    let slots = enrichment.flatten();
    assert_eq!(slots.dilemmas.len(), 1);
    assert_eq!(slots.growth_paths.len(), 1);
    assert!(slots.challenges.is_empty() && slots.weaknesses.is_empty());

    let json = serde_json::to_value(&slots).unwrap();
    assert_eq!(json["niches"], serde_json::json!([]));
  }

  const SLOT_KEYS: [&str; 8] = [
    "challenges",
    "niches",
    "life_challenges",
    "feasibility_studies",
    "weaknesses",
    "compensations",
    "dilemmas",
    "growth_paths",
  ];

  #[test]
  fn enrichment_serialises_tag_and_every_slot() {
    let json = serde_json::to_value(PortraitEnrichment::empty(QuadrantKind::Q1)).unwrap();
    assert_eq!(json["quadrant"], "q1");
    for key in SLOT_KEYS {
      assert_eq!(json[key], serde_json::json!([]), "slot {key}");
    }
  }

  #[test]
  fn deserialising_keeps_only_the_tagged_slots() {
    let json = serde_json::json!({
      "quadrant": "q3",
      "weaknesses": [{ "enrichment_id": 7, "title": "t", "body": "", "ordinal": 0 }],
      "challenges": [{ "enrichment_id": 8, "title": "t", "body": "", "ordinal": 0 }],
    });
    let enrichment: PortraitEnrichment = serde_json::from_value(json).unwrap();
    let PortraitEnrichment::Q3 { weaknesses, compensations } = &enrichment else {
      panic!("expected Q3 enrichment, got {enrichment:?}");
    };
    assert_eq!(weaknesses.len(), 1);
    assert!(compensations.is_empty());
  }

  #[test]
  fn from_rows_drops_rows_of_other_quadrants() {
    let enrichment = PortraitEnrichment::from_rows(
      QuadrantKind::Q1,
      [row(1, EnrichmentKind::Weakness, 0), row(2, EnrichmentKind::Niche, 0)],
    );
    let slots = enrichment.flatten();
    assert_eq!(slots.niches.len(), 1);
    assert!(slots.weaknesses.is_empty());
  }

  #[test]
  fn every_kind_maps_back_to_its_quadrant() {
    for quadrant in QuadrantKind::CASCADE {
      for kind in EnrichmentKind::for_quadrant(quadrant) {
        assert_eq!(kind.quadrant(), quadrant);
      }
    }
  }
}
