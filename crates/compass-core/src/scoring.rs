//! Major match scoring.
//!
//! A major's score blends how well the user's answers fit its preference and
//! aptitude profile (up to 50 points each) and deducts for aversion and
//! challenge risks, scaled by how convertible each risk is.
//!
//! For every analysis row `(major, element, axis, weight)` and every
//! current-battery scale of that element:
//!
//! ```text
//! weighted = answer * weight        (0 when unanswered)
//! cap      = weight * 2
//! ratio    = Σweighted / Σcap       (0 when Σcap = 0)
//! ```
//!
//! Fit axes score `ratio * 50`; risk axes deduct `ratio * factor * 100` only
//! when the axis's weighted sum is positive. When one risk axis mixes
//! convertibilities, `factor` is the cap-weighted mean of the rows' factors.
//! Fit scores, deductions and the final score are each rounded to two
//! decimals in turn.

use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  answer::{Answer, Battery, MAX_ANSWER_MAGNITUDE, Scale, ScaleId},
  element::ElementId,
  error::EngineError,
  major::{Axis, Convertibility, EduLevel, Major, MajorElementAnalysis, MajorId},
  store::{AdvisoryStore, MajorFilter},
};

/// Points available to each fit axis.
pub const FIT_AXIS_POINTS: f64 = 50.0;

// ─── Output ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorMatch {
  pub major_code:           String,
  pub major_name:           String,
  pub major_brief:          String,
  pub edu_level:            EduLevel,
  pub aversion_deduction:   f64,
  pub challenge_deduction:  f64,
  pub score:                f64,
  pub preference_fit_score: f64,
  pub aptitude_fit_score:   f64,
}

// ─── Pure scoring ────────────────────────────────────────────────────────────

/// Everything [`score_majors`] reads, already fetched.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
  pub majors:   &'a [Major],
  pub analyses: &'a [MajorElementAnalysis],
  pub scales:   &'a [Scale],
  pub answers:  &'a [Answer],
}

#[derive(Debug, Clone, Copy, Default)]
struct AxisSums {
  weighted: f64,
  cap:      f64,
}

impl AxisSums {
  fn ratio(self) -> f64 {
    if self.cap == 0.0 { 0.0 } else { self.weighted / self.cap }
  }
}

/// A risk axis: its sums plus the cap scaled by each row's deduction factor.
#[derive(Debug, Clone, Copy, Default)]
struct RiskSums {
  sums:       AxisSums,
  factor_cap: f64,
}

impl RiskSums {
  fn add(&mut self, weighted: f64, cap: f64, convertibility: Convertibility) {
    self.sums.weighted += weighted;
    self.sums.cap += cap;
    self.factor_cap += cap * convertibility.deduction_factor();
  }

  /// Zero unless the whole axis is net-positive.
  fn deduction(self) -> f64 {
    if self.sums.weighted <= 0.0 || self.sums.cap == 0.0 {
      return 0.0;
    }
    self.sums.ratio() * (self.factor_cap / self.sums.cap) * 100.0
  }
}

/// Round half away from zero to two decimals, treating the input as the
/// decimal it was meant to be: `1.005` rounds to `1.01`.
///
/// Scaling by 100 can land a hair below a `.5` boundary (`1.005 * 100` is
/// `100.49999999999999`), so the scaled value is nudged a few ulps away from
/// zero before rounding.
pub fn round2(value: f64) -> f64 {
  let scaled = value * 100.0;
  (scaled * (1.0 + 4.0 * f64::EPSILON)).round() / 100.0
}

fn fit_score(sums: AxisSums) -> f64 {
  round2((sums.ratio() * FIT_AXIS_POINTS).clamp(0.0, FIT_AXIS_POINTS))
}

/// Score every major in `input.majors`, best first.
///
/// Majors with no analysis rows or no answers still appear, scored 0 on the
/// axes they lack. Analysis rows for majors outside `input.majors` are
/// ignored. Ties keep the order of `input.majors`.
pub fn score_majors(input: ScoringInput<'_>) -> Vec<MajorMatch> {
  let mut scales_of: HashMap<ElementId, Vec<ScaleId>> = HashMap::new();
  for scale in input.scales.iter().filter(|s| s.battery == Battery::CURRENT) {
    scales_of.entry(scale.element_id).or_default().push(scale.scale_id);
  }
  let answer_of: HashMap<ScaleId, i32> = input
    .answers
    .iter()
    .map(|a| (a.scale_id, a.score.value()))
    .collect();

  let mut fit: HashMap<(MajorId, Axis), AxisSums> = HashMap::new();
  let mut risk: HashMap<(MajorId, Axis), RiskSums> = HashMap::new();

  for row in input.analyses {
    let Some(scale_ids) = scales_of.get(&row.element_id) else { continue };
    let weight = row.weight.value();
    let key = (row.major_id, row.axis);
    for scale_id in scale_ids {
      let answer = answer_of.get(scale_id).copied().unwrap_or(0);
      let weighted = f64::from(answer) * weight;
      let cap = weight * f64::from(MAX_ANSWER_MAGNITUDE);
      if row.axis.is_risk() {
        risk.entry(key).or_default().add(weighted, cap, row.convertibility);
      } else {
        let sums = fit.entry(key).or_default();
        sums.weighted += weighted;
        sums.cap += cap;
      }
    }
  }

  let mut matches: Vec<MajorMatch> = input
    .majors
    .iter()
    .map(|major| {
      let id = major.major_id;
      let fit_of = |axis: Axis| {
        fit_score(fit.get(&(id, axis)).copied().unwrap_or_default())
      };
      let deduction_of = |axis: Axis| {
        round2(risk.get(&(id, axis)).copied().unwrap_or_default().deduction())
      };

      let preference_fit_score = fit_of(Axis::PreferenceFit);
      let aptitude_fit_score = fit_of(Axis::AptitudeFit);
      let aversion_deduction = deduction_of(Axis::AversionRisk);
      let challenge_deduction = deduction_of(Axis::ChallengeRisk);
      let score = round2(
        preference_fit_score + aptitude_fit_score
          - (aversion_deduction + challenge_deduction),
      );

      tracing::trace!(
        major = %major.code,
        preference_fit_score,
        aptitude_fit_score,
        aversion_deduction,
        challenge_deduction,
        score,
        "scored major"
      );

      MajorMatch {
        major_code: major.code.clone(),
        major_name: major.name.clone(),
        major_brief: major.brief.clone(),
        edu_level: major.edu_level,
        aversion_deduction,
        challenge_deduction,
        score,
        preference_fit_score,
        aptitude_fit_score,
      }
    })
    .collect();

  matches.sort_by(|a, b| b.score.total_cmp(&a.score));
  matches
}

// ─── Store-driven scorer ─────────────────────────────────────────────────────

/// Computes ranked major matches for a user against a store.
pub struct MajorMatchScorer<S> {
  store: Arc<S>,
}

impl<S: AdvisoryStore> MajorMatchScorer<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Rank the majors matching `edu_level` and `major_codes` for `user_id`.
  /// An empty filter match yields an empty list.
  pub async fn calculate(
    &self,
    user_id: Uuid,
    edu_level: Option<EduLevel>,
    major_codes: Option<Vec<String>>,
  ) -> Result<Vec<MajorMatch>, EngineError<S::Error>> {
    let store = self.store.as_ref();
    let filter = MajorFilter { edu_level, codes: major_codes };

    let majors = store.list_majors(&filter).await.map_err(EngineError::Store)?;
    if majors.is_empty() {
      return Ok(vec![]);
    }
    let major_ids: Vec<MajorId> = majors.iter().map(|m| m.major_id).collect();

    let analyses = store
      .list_major_element_analyses(Some(&major_ids))
      .await
      .map_err(EngineError::Store)?;
    let scales = store
      .list_scales(Battery::CURRENT)
      .await
      .map_err(EngineError::Store)?;
    let answers = store.list_answers(user_id).await.map_err(EngineError::Store)?;

    let matches = score_majors(ScoringInput {
      majors:   &majors,
      analyses: &analyses,
      scales:   &scales,
      answers:  &answers,
    });
    tracing::debug!(%user_id, majors = matches.len(), "major match scored");
    Ok(matches)
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use proptest::prelude::*;

  use super::*;
  use crate::{answer::AnswerScore, major::Weight};

  fn major(id: MajorId) -> Major {
    Major {
      major_id:  id,
      code:      format!("M{id:03}"),
      name:      format!("Major {id}"),
      brief:     String::new(),
      edu_level: EduLevel::Bachelor,
    }
  }

  fn scale(id: ScaleId, element_id: ElementId) -> Scale {
    Scale {
      scale_id: id,
      element_id,
      battery: Battery::Standard,
      content: String::new(),
    }
  }

  fn answer(scale_id: ScaleId, score: i64) -> Answer {
    Answer {
      user_id: Uuid::nil(),
      scale_id,
      score: AnswerScore::new(score).unwrap(),
      answered_at: Utc::now(),
    }
  }

  fn analysis(
    major_id: MajorId,
    element_id: ElementId,
    axis: Axis,
    weight: f64,
    convertibility: Convertibility,
  ) -> MajorElementAnalysis {
    MajorElementAnalysis {
      major_id,
      element_id,
      axis,
      weight: Weight::new(weight).unwrap(),
      convertibility,
    }
  }

  fn run(
    majors: &[Major],
    analyses: &[MajorElementAnalysis],
    scales: &[Scale],
    answers: &[Answer],
  ) -> Vec<MajorMatch> {
    score_majors(ScoringInput { majors, analyses, scales, answers })
  }

  #[test]
  fn single_full_preference_row_scores_fifty() {
    let result = run(
      &[major(1)],
      &[analysis(1, 10, Axis::PreferenceFit, 2.0, Convertibility::None)],
      &[scale(100, 10)],
      &[answer(100, 2)],
    );
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].preference_fit_score, 50.0);
    assert_eq!(result[0].aptitude_fit_score, 0.0);
    assert_eq!(result[0].score, 50.0);
  }

  #[test]
  fn low_convertibility_risk_deducts_ten_at_ratio_point_four() {
    // Five scales, weight 1: cap = 10, answers sum to 4 → ratio 0.4.
    let scales: Vec<Scale> = (0..5).map(|i| scale(100 + i, 20)).collect();
    let answers = [answer(100, 2), answer(101, 2), answer(102, 1), answer(103, -1)];
    let result = run(
      &[major(1)],
      &[analysis(1, 20, Axis::ChallengeRisk, 1.0, Convertibility::Low)],
      &scales,
      &answers,
    );
    assert_eq!(result[0].challenge_deduction, 10.0);
    assert_eq!(result[0].score, -10.0);
  }

  #[test]
  fn medium_convertibility_deducts_half_as_much() {
    let scales: Vec<Scale> = (0..5).map(|i| scale(100 + i, 20)).collect();
    let answers = [answer(100, 2), answer(101, 2), answer(102, 1), answer(103, -1)];
    let result = run(
      &[major(1)],
      &[analysis(1, 20, Axis::AversionRisk, 1.0, Convertibility::Medium)],
      &scales,
      &answers,
    );
    assert_eq!(result[0].aversion_deduction, 5.0);
  }

  #[test]
  fn net_non_positive_risk_never_deducts() {
    let result = run(
      &[major(1)],
      &[
        analysis(1, 20, Axis::AversionRisk, 3.0, Convertibility::Low),
        analysis(1, 21, Axis::ChallengeRisk, 3.0, Convertibility::Medium),
      ],
      &[scale(100, 20), scale(101, 21)],
      &[answer(100, -2), answer(101, 0)],
    );
    assert_eq!(result[0].aversion_deduction, 0.0);
    assert_eq!(result[0].challenge_deduction, 0.0);
  }

  #[test]
  fn mixed_convertibility_axis_is_gated_on_its_total() {
    // +2 * 1 on a medium row, -2 * 2 on a low row: the axis nets -2.
    let result = run(
      &[major(1)],
      &[
        analysis(1, 20, Axis::AversionRisk, 1.0, Convertibility::Medium),
        analysis(1, 21, Axis::AversionRisk, 2.0, Convertibility::Low),
      ],
      &[scale(100, 20), scale(101, 21)],
      &[answer(100, 2), answer(101, -2)],
    );
    assert_eq!(result[0].aversion_deduction, 0.0);
    assert_eq!(result[0].score, 0.0);
  }

  #[test]
  fn mixed_convertibility_averages_factors_by_cap() {
    // Ratio 1.0; factors 0.125 and 0.25 over equal caps → 0.1875.
    let result = run(
      &[major(1)],
      &[
        analysis(1, 20, Axis::ChallengeRisk, 1.0, Convertibility::Medium),
        analysis(1, 21, Axis::ChallengeRisk, 1.0, Convertibility::Low),
      ],
      &[scale(100, 20), scale(101, 21)],
      &[answer(100, 2), answer(101, 2)],
    );
    assert_eq!(result[0].challenge_deduction, 18.75);
  }

  #[test]
  fn round2_rounds_decimal_halves_away_from_zero() {
    assert_eq!(round2(1.005), 1.01);
    assert_eq!(round2(2.675), 2.68);
    assert_eq!(round2(-1.005), -1.01);
    assert_eq!(round2(8.333_333), 8.33);
    assert_eq!(round2(16.66), 16.66);
    assert_eq!(round2(0.0), 0.0);
  }

  #[test]
  fn unanswered_major_is_kept_with_zero_score() {
    let result = run(
      &[major(1), major(2)],
      &[analysis(1, 10, Axis::AptitudeFit, 1.0, Convertibility::None)],
      &[scale(100, 10)],
      &[],
    );
    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|m| m.score == 0.0));
  }

  #[test]
  fn legacy_scales_do_not_count() {
    let mut legacy = scale(101, 10);
    legacy.battery = Battery::Legacy;
    let result = run(
      &[major(1)],
      &[analysis(1, 10, Axis::PreferenceFit, 1.0, Convertibility::None)],
      &[scale(100, 10), legacy],
      &[answer(100, 2), answer(101, -2)],
    );
    assert_eq!(result[0].preference_fit_score, 50.0);
  }

  #[test]
  fn fit_scores_are_rounded_before_summing() {
    // Three scales, weight 1, answers 1,0,0 → ratio 1/6 → 8.333.. → 8.33.
    let scales: Vec<Scale> = (0..3).map(|i| scale(100 + i, 10)).collect();
    let aptitude: Vec<Scale> = (0..3).map(|i| scale(200 + i, 11)).collect();
    let all: Vec<Scale> = scales.into_iter().chain(aptitude).collect();
    let result = run(
      &[major(1)],
      &[
        analysis(1, 10, Axis::PreferenceFit, 1.0, Convertibility::None),
        analysis(1, 11, Axis::AptitudeFit, 1.0, Convertibility::None),
      ],
      &all,
      &[answer(100, 1), answer(200, 1)],
    );
    assert_eq!(result[0].preference_fit_score, 8.33);
    assert_eq!(result[0].aptitude_fit_score, 8.33);
    assert_eq!(result[0].score, 16.66);
  }

  #[test]
  fn results_are_sorted_best_first() {
    let result = run(
      &[major(1), major(2), major(3)],
      &[
        analysis(1, 10, Axis::PreferenceFit, 1.0, Convertibility::None),
        analysis(2, 11, Axis::PreferenceFit, 1.0, Convertibility::None),
        analysis(3, 10, Axis::AptitudeFit, 1.0, Convertibility::None),
        analysis(3, 11, Axis::PreferenceFit, 1.0, Convertibility::None),
      ],
      &[scale(100, 10), scale(101, 11)],
      &[answer(100, 1), answer(101, 2)],
    );
    let codes: Vec<&str> = result.iter().map(|m| m.major_code.as_str()).collect();
    assert_eq!(codes, vec!["M003", "M002", "M001"]);
  }

  #[test]
  fn analyses_of_unlisted_majors_are_ignored() {
    let result = run(
      &[major(1)],
      &[analysis(9, 10, Axis::PreferenceFit, 1.0, Convertibility::None)],
      &[scale(100, 10)],
      &[answer(100, 2)],
    );
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].score, 0.0);
  }

  proptest! {
    #[test]
    fn scores_respect_bounds_and_order(
      rows in prop::collection::vec(
        (1i64..6, 0i64..8, 0usize..4, 1u8..10, 0usize..3),
        0..40,
      ),
      answers in prop::collection::vec((0i64..8, -2i64..=2), 0..8),
    ) {
      let majors: Vec<Major> = (1..6).map(major).collect();
      let scales: Vec<Scale> = (0..8).map(|e| scale(e, e)).collect();
      let axes = [Axis::PreferenceFit, Axis::AptitudeFit, Axis::AversionRisk, Axis::ChallengeRisk];
      let convs = [Convertibility::Medium, Convertibility::Low, Convertibility::None];
      let analyses: Vec<MajorElementAnalysis> = rows
        .iter()
        .map(|&(m, e, a, w, c)| analysis(m, e, axes[a], f64::from(w) / 2.0, convs[c]))
        .collect();
      let answers: Vec<Answer> = answers.iter().map(|&(s, v)| answer(s, v)).collect();

      let answer_of: HashMap<ScaleId, i32> =
        answers.iter().map(|a| (a.scale_id, a.score.value())).collect();
      let net = |major_code: &str, axis: Axis| -> f64 {
        analyses
          .iter()
          .filter(|r| major(r.major_id).code == major_code && r.axis == axis)
          .map(|r| {
            f64::from(answer_of.get(&r.element_id).copied().unwrap_or(0))
              * r.weight.value()
          })
          .sum()
      };

      let result = run(&majors, &analyses, &scales, &answers);
      prop_assert_eq!(result.len(), majors.len());
      for m in &result {
        prop_assert!(m.preference_fit_score <= 50.0 && m.preference_fit_score >= 0.0);
        prop_assert!(m.aptitude_fit_score <= 50.0 && m.aptitude_fit_score >= 0.0);
        prop_assert!(m.preference_fit_score + m.aptitude_fit_score <= 100.0);
        prop_assert!(m.aversion_deduction >= 0.0 && m.challenge_deduction >= 0.0);
        if net(&m.major_code, Axis::AversionRisk) <= 0.0 {
          prop_assert_eq!(m.aversion_deduction, 0.0);
        }
        if net(&m.major_code, Axis::ChallengeRisk) <= 0.0 {
          prop_assert_eq!(m.challenge_deduction, 0.0);
        }
      }
      for w in result.windows(2) {
        prop_assert!(w[0].score >= w[1].score);
      }
    }
  }
}
