//! Majors and the weighted links between majors and trait elements.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{Error, Result, element::ElementId};

pub type MajorId = i64;

// ─── Major ───────────────────────────────────────────────────────────────────

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
pub enum EduLevel {
  /// Four-year undergraduate programmes.
  Bachelor,
  /// Two- or three-year vocational programmes.
  Associate,
}

impl EduLevel {
  pub fn parse(s: &str) -> Result<Self> {
    crate::error::parse_tag("education level", s)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Major {
  pub major_id:  MajorId,
  pub code:      String,
  pub name:      String,
  pub brief:     String,
  pub edu_level: EduLevel,
}

// ─── Analysis ────────────────────────────────────────────────────────────────

/// What an analysis row says about how an element bears on a major.
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
pub enum Axis {
  PreferenceFit,
  AptitudeFit,
  AversionRisk,
  ChallengeRisk,
}

impl Axis {
  pub fn parse(s: &str) -> Result<Self> { crate::error::parse_tag("axis", s) }

  /// Risk axes deduct from the score; fit axes add to it.
  pub fn is_risk(self) -> bool {
    matches!(self, Self::AversionRisk | Self::ChallengeRisk)
  }
}

/// How readily a risk can be worked around. Lower convertibility means a
/// heavier deduction.
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
pub enum Convertibility {
  Medium,
  Low,
  None,
}

impl Convertibility {
  pub fn parse(s: &str) -> Result<Self> {
    crate::error::parse_tag("convertibility", s)
  }

  /// Multiplier applied to a risk ratio before scaling to points.
  pub fn deduction_factor(self) -> f64 {
    match self {
      Self::Medium => 0.5 * 0.25,
      Self::Low => 0.25,
      Self::None => 0.0,
    }
  }
}

/// A strictly positive, finite analysis weight.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Weight(f64);

impl Weight {
  pub fn new(value: f64) -> Result<Self> {
    if value.is_finite() && value > 0.0 {
      Ok(Self(value))
    } else {
      Err(Error::NonPositiveWeight(value))
    }
  }

  pub fn value(self) -> f64 { self.0 }
}

impl TryFrom<f64> for Weight {
  type Error = Error;

  fn try_from(value: f64) -> Result<Self> { Self::new(value) }
}

impl From<Weight> for f64 {
  fn from(w: Weight) -> Self { w.0 }
}

/// Links a major to an element along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorElementAnalysis {
  pub major_id:       MajorId,
  pub element_id:     ElementId,
  pub axis:           Axis,
  pub weight:         Weight,
  pub convertibility: Convertibility,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn weight_must_be_positive() {
    assert!(Weight::new(0.5).is_ok());
    assert!(matches!(Weight::new(0.0), Err(Error::NonPositiveWeight(_))));
    assert!(Weight::new(-1.0).is_err());
    assert!(Weight::new(f64::NAN).is_err());
    assert!(serde_json::from_str::<Weight>("-2.0").is_err());
  }

  #[test]
  fn low_convertibility_is_twice_medium() {
    assert_eq!(
      Convertibility::Low.deduction_factor(),
      2.0 * Convertibility::Medium.deduction_factor()
    );
    assert_eq!(Convertibility::None.deduction_factor(), 0.0);
  }

  #[test]
  fn axis_tags() {
    assert_eq!(Axis::parse("challenge_risk").unwrap(), Axis::ChallengeRisk);
    assert!(Axis::AversionRisk.is_risk());
    assert!(!Axis::PreferenceFit.is_risk());
    assert!(Axis::parse("risk").is_err());
  }
}
