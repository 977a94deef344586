//! Scales (questionnaire items) and the answers users give to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result, element::ElementId};

pub type ScaleId = i64;

/// Largest magnitude a single answer may take.
pub const MAX_ANSWER_MAGNITUDE: i8 = 2;

// ─── Battery ─────────────────────────────────────────────────────────────────

/// The question set a scale belongs to. Only [`Battery::Standard`] feeds the
/// engines; legacy scales are kept for history.
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
pub enum Battery {
  Standard,
  Legacy,
}

impl Battery {
  /// The battery currently in use.
  pub const CURRENT: Self = Self::Standard;

  pub fn parse(s: &str) -> Result<Self> { crate::error::parse_tag("battery", s) }
}

// ─── Scale ───────────────────────────────────────────────────────────────────

/// A single questionnaire item measuring one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
  pub scale_id:   ScaleId,
  pub element_id: ElementId,
  pub battery:    Battery,
  pub content:    String,
}

// ─── Answer ──────────────────────────────────────────────────────────────────

/// A Likert-style answer bounded to `[-2, 2]`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct AnswerScore(i8);

impl AnswerScore {
  pub fn new(value: i64) -> Result<Self> {
    let max = i64::from(MAX_ANSWER_MAGNITUDE);
    if (-max..=max).contains(&value) {
      Ok(Self(value as i8))
    } else {
      Err(Error::ScoreOutOfRange(value))
    }
  }

  pub fn value(self) -> i32 { i32::from(self.0) }
}

impl TryFrom<i64> for AnswerScore {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self> { Self::new(value) }
}

impl From<AnswerScore> for i64 {
  fn from(score: AnswerScore) -> Self { i64::from(score.0) }
}

/// The live answer of one user to one scale. A later submission for the same
/// `(user_id, scale_id)` replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
  pub user_id:     Uuid,
  pub scale_id:    ScaleId,
  pub score:       AnswerScore,
  pub answered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn answer_score_bounds() {
    assert_eq!(AnswerScore::new(-2).unwrap().value(), -2);
    assert_eq!(AnswerScore::new(2).unwrap().value(), 2);
    assert!(matches!(AnswerScore::new(3), Err(Error::ScoreOutOfRange(3))));
    assert!(AnswerScore::new(-3).is_err());
  }

  #[test]
  fn answer_score_rejects_out_of_range_json() {
    assert!(serde_json::from_str::<AnswerScore>("1").is_ok());
    assert!(serde_json::from_str::<AnswerScore>("5").is_err());
  }
}
