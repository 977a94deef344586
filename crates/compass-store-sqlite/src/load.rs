//! Bulk loading of reference data (elements, scales, majors, analyses,
//! quadrants, portraits, enrichment) from a serialised bundle.

use compass_core::{
  answer::Scale,
  element::Element,
  major::{Major, MajorElementAnalysis},
  portrait::{EnrichmentRow, Portrait, Quadrant},
};
use serde::{Deserialize, Serialize};

use crate::{Result, SqliteStore};

/// Every reference table the engines read, in one document.
///
/// Each section is optional in the serialised form and defaults to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceData {
  pub elements:   Vec<Element>,
  pub scales:     Vec<Scale>,
  pub majors:     Vec<Major>,
  pub analyses:   Vec<MajorElementAnalysis>,
  pub quadrants:  Vec<Quadrant>,
  pub portraits:  Vec<Portrait>,
  pub enrichment: Vec<EnrichmentRow>,
}

impl ReferenceData {
  pub fn from_json(json: &str) -> Result<Self> { Ok(serde_json::from_str(json)?) }
}

impl SqliteStore {
  /// Insert `data` in a single transaction. Rows must not already exist; on
  /// any failure nothing is written.
  pub async fn load_reference_data(&self, data: ReferenceData) -> Result<()> {
    let counts = (
      data.elements.len(),
      data.scales.len(),
      data.majors.len(),
      data.analyses.len(),
      data.portraits.len(),
    );

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO elements
               (element_id, name, family, dimension, corresponding_element_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for e in &data.elements {
            stmt.execute(rusqlite::params![
              e.element_id,
              e.name,
              e.family.to_string(),
              e.dimension.to_string(),
              e.corresponding_element_id,
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO scales (scale_id, element_id, battery, content)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for s in &data.scales {
            stmt.execute(rusqlite::params![
              s.scale_id,
              s.element_id,
              s.battery.to_string(),
              s.content,
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO majors (major_id, code, name, brief, edu_level)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for m in &data.majors {
            stmt.execute(rusqlite::params![
              m.major_id,
              m.code,
              m.name,
              m.brief,
              m.edu_level.to_string(),
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO major_element_analyses
               (major_id, element_id, axis, weight, convertibility)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for a in &data.analyses {
            stmt.execute(rusqlite::params![
              a.major_id,
              a.element_id,
              a.axis.to_string(),
              a.weight.value(),
              a.convertibility.to_string(),
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO quadrants
               (quadrant_id, preference_obvious, aptitude_obvious, name)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for q in &data.quadrants {
            stmt.execute(rusqlite::params![
              q.quadrant_id,
              q.kind.preference_obvious(),
              q.kind.aptitude_obvious(),
              q.name,
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO portraits
               (portrait_id, like_element_id, talent_element_id, quadrant_id,
                title, summary, strengths, advice)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          )?;
          for p in &data.portraits {
            stmt.execute(rusqlite::params![
              p.portrait_id,
              p.like_element_id,
              p.talent_element_id,
              p.quadrant_id,
              p.title,
              p.summary,
              p.strengths,
              p.advice,
            ])?;
          }

          let mut stmt = tx.prepare(
            "INSERT INTO portrait_enrichment
               (enrichment_id, portrait_id, kind, title, body, ordinal)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          )?;
          for r in &data.enrichment {
            stmt.execute(rusqlite::params![
              r.enrichment_id,
              r.portrait_id,
              r.kind.to_string(),
              r.title,
              r.body,
              r.ordinal,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(
      elements = counts.0,
      scales = counts.1,
      majors = counts.2,
      analyses = counts.3,
      portraits = counts.4,
      "reference data loaded"
    );
    Ok(())
  }
}
