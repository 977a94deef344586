//! Elements: the atomic trait dimensions a questionnaire measures.
//!
//! Every element belongs to exactly one [`Family`]. An element may name a
//! counterpart in the other family; that link is a plain id and is only ever
//! resolved through an [`ElementIndex`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::Result;

pub type ElementId = i64;

// ─── Tags ────────────────────────────────────────────────────────────────────

/// Which half of the trait model an element belongs to.
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
pub enum Family {
  /// "Like" elements.
  Preference,
  /// "Talent" elements.
  Aptitude,
}

impl Family {
  pub fn parse(s: &str) -> Result<Self> { crate::error::parse_tag("family", s) }

  pub fn other(self) -> Self {
    match self {
      Self::Preference => Self::Aptitude,
      Self::Aptitude => Self::Preference,
    }
  }
}

/// Display grouping for elements. Never consulted by the scoring logic.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dimension {
  Analytical,
  Linguistic,
  Spatial,
  Social,
  Practical,
  Creative,
  Organizational,
}

impl Dimension {
  pub fn parse(s: &str) -> Result<Self> {
    crate::error::parse_tag("dimension", s)
  }
}

// ─── Element ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
  pub element_id:               ElementId,
  pub name:                     String,
  pub family:                   Family,
  pub dimension:                Dimension,
  /// Weak back-reference to the paired element in the other family.
  pub corresponding_element_id: Option<ElementId>,
}

/// A user's aggregated score on one element, carrying enough of the element
/// to be reported without another lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementScore {
  pub element_id:               ElementId,
  pub element_name:             String,
  pub family:                   Family,
  pub score:                    i32,
  pub dimension:                Dimension,
  pub corresponding_element_id: Option<ElementId>,
}

impl ElementScore {
  pub fn new(element: &Element, score: i32) -> Self {
    Self {
      element_id: element.element_id,
      element_name: element.name.clone(),
      family: element.family,
      score,
      dimension: element.dimension,
      corresponding_element_id: element.corresponding_element_id,
    }
  }
}

// ─── Index ───────────────────────────────────────────────────────────────────

/// Id-keyed lookup over the full element catalogue.
#[derive(Debug, Clone, Default)]
pub struct ElementIndex {
  by_id: HashMap<ElementId, Element>,
}

impl ElementIndex {
  pub fn new(elements: impl IntoIterator<Item = Element>) -> Self {
    Self {
      by_id: elements.into_iter().map(|e| (e.element_id, e)).collect(),
    }
  }

  pub fn get(&self, id: ElementId) -> Option<&Element> { self.by_id.get(&id) }

  /// Resolve the cross-family counterpart of `id`.
  ///
  /// Returns `None` when the element is unknown, names no counterpart, names
  /// a missing element, or names an element of its own family.
  pub fn correspondent(&self, id: ElementId) -> Option<&Element> {
    let element = self.get(id)?;
    let other = self.get(element.corresponding_element_id?)?;
    (other.family == element.family.other()).then_some(other)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn element(
    id: ElementId,
    family: Family,
    corresponding: Option<ElementId>,
  ) -> Element {
    Element {
      element_id: id,
      name: format!("e{id}"),
      family,
      dimension: Dimension::Analytical,
      corresponding_element_id: corresponding,
    }
  }

  #[test]
  fn correspondent_resolves_across_families() {
    let index = ElementIndex::new([
      element(1, Family::Preference, Some(10)),
      element(10, Family::Aptitude, Some(1)),
    ]);
    assert_eq!(index.correspondent(1).map(|e| e.element_id), Some(10));
    assert_eq!(index.correspondent(10).map(|e| e.element_id), Some(1));
  }

  #[test]
  fn dangling_or_same_family_links_resolve_to_none() {
    let index = ElementIndex::new([
      element(1, Family::Preference, Some(99)),
      element(2, Family::Preference, Some(3)),
      element(3, Family::Preference, None),
    ]);
    assert!(index.correspondent(1).is_none());
    assert!(index.correspondent(2).is_none());
    assert!(index.correspondent(3).is_none());
    assert!(index.correspondent(42).is_none());
  }

  #[test]
  fn tags_parse_from_snake_case() {
    assert_eq!(Family::parse("aptitude").unwrap(), Family::Aptitude);
    assert_eq!(Dimension::parse("organizational").unwrap(), Dimension::Organizational);
    assert!(Family::parse("talent").is_err());
    assert_eq!(Family::Preference.to_string(), "preference");
  }
}
