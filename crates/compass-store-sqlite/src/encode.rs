//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings, and
//! tag enums their snake_case names.

use chrono::{DateTime, Utc};
use compass_core::{
  answer::{Answer, AnswerScore, Battery, Scale},
  element::{Dimension, Element, Family},
  major::{Axis, Convertibility, EduLevel, Major, MajorElementAnalysis, Weight},
  portrait::{EnrichmentKind, EnrichmentRow, Portrait, Quadrant, QuadrantKind},
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── SQL helpers ─────────────────────────────────────────────────────────────

/// `?, ?, ?` with `n` placeholders.
pub fn placeholders(n: usize) -> String { vec!["?"; n].join(", ") }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `elements` row.
pub struct RawElement {
  pub element_id:               i64,
  pub name:                     String,
  pub family:                   String,
  pub dimension:                String,
  pub corresponding_element_id: Option<i64>,
}

impl RawElement {
  pub const COLUMNS: &str =
    "element_id, name, family, dimension, corresponding_element_id";

  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      element_id:               row.get(0)?,
      name:                     row.get(1)?,
      family:                   row.get(2)?,
      dimension:                row.get(3)?,
      corresponding_element_id: row.get(4)?,
    })
  }

  pub fn into_element(self) -> Result<Element> {
    Ok(Element {
      element_id:               self.element_id,
      name:                     self.name,
      family:                   Family::parse(&self.family)?,
      dimension:                Dimension::parse(&self.dimension)?,
      corresponding_element_id: self.corresponding_element_id,
    })
  }
}

/// Raw values read directly from a `scales` row.
pub struct RawScale {
  pub scale_id:   i64,
  pub element_id: i64,
  pub battery:    String,
  pub content:    String,
}

impl RawScale {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      scale_id:   row.get(0)?,
      element_id: row.get(1)?,
      battery:    row.get(2)?,
      content:    row.get(3)?,
    })
  }

  pub fn into_scale(self) -> Result<Scale> {
    Ok(Scale {
      scale_id:   self.scale_id,
      element_id: self.element_id,
      battery:    Battery::parse(&self.battery)?,
      content:    self.content,
    })
  }
}

/// Raw values read directly from an `answers` row.
pub struct RawAnswer {
  pub user_id:     String,
  pub scale_id:    i64,
  pub score:       i64,
  pub answered_at: String,
}

impl RawAnswer {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:     row.get(0)?,
      scale_id:    row.get(1)?,
      score:       row.get(2)?,
      answered_at: row.get(3)?,
    })
  }

  pub fn into_answer(self) -> Result<Answer> {
    Ok(Answer {
      user_id:     decode_uuid(&self.user_id)?,
      scale_id:    self.scale_id,
      score:       AnswerScore::new(self.score)?,
      answered_at: decode_dt(&self.answered_at)?,
    })
  }
}

/// Raw values read directly from a `majors` row.
pub struct RawMajor {
  pub major_id:  i64,
  pub code:      String,
  pub name:      String,
  pub brief:     String,
  pub edu_level: String,
}

impl RawMajor {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      major_id:  row.get(0)?,
      code:      row.get(1)?,
      name:      row.get(2)?,
      brief:     row.get(3)?,
      edu_level: row.get(4)?,
    })
  }

  pub fn into_major(self) -> Result<Major> {
    Ok(Major {
      major_id:  self.major_id,
      code:      self.code,
      name:      self.name,
      brief:     self.brief,
      edu_level: EduLevel::parse(&self.edu_level)?,
    })
  }
}

/// Raw values read directly from a `major_element_analyses` row.
pub struct RawAnalysis {
  pub major_id:       i64,
  pub element_id:     i64,
  pub axis:           String,
  pub weight:         f64,
  pub convertibility: String,
}

impl RawAnalysis {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      major_id:       row.get(0)?,
      element_id:     row.get(1)?,
      axis:           row.get(2)?,
      weight:         row.get(3)?,
      convertibility: row.get(4)?,
    })
  }

  pub fn into_analysis(self) -> Result<MajorElementAnalysis> {
    Ok(MajorElementAnalysis {
      major_id:       self.major_id,
      element_id:     self.element_id,
      axis:           Axis::parse(&self.axis)?,
      weight:         Weight::new(self.weight)?,
      convertibility: Convertibility::parse(&self.convertibility)?,
    })
  }
}

/// Raw values read directly from a `quadrants` row.
pub struct RawQuadrant {
  pub quadrant_id:        i64,
  pub preference_obvious: bool,
  pub aptitude_obvious:   bool,
  pub name:               String,
}

impl RawQuadrant {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      quadrant_id:        row.get(0)?,
      preference_obvious: row.get(1)?,
      aptitude_obvious:   row.get(2)?,
      name:               row.get(3)?,
    })
  }

  pub fn into_quadrant(self) -> Quadrant {
    Quadrant {
      quadrant_id: self.quadrant_id,
      kind:        QuadrantKind::from_flags(
        self.preference_obvious,
        self.aptitude_obvious,
      ),
      name:        self.name,
    }
  }
}

/// Portrait columns are all native SQLite types; no raw stage needed.
pub fn portrait_from_row(row: &Row<'_>) -> rusqlite::Result<Portrait> {
  Ok(Portrait {
    portrait_id:       row.get(0)?,
    like_element_id:   row.get(1)?,
    talent_element_id: row.get(2)?,
    quadrant_id:       row.get(3)?,
    title:             row.get(4)?,
    summary:           row.get(5)?,
    strengths:         row.get(6)?,
    advice:            row.get(7)?,
  })
}

/// Raw values read directly from a `portrait_enrichment` row.
pub struct RawEnrichment {
  pub enrichment_id: i64,
  pub portrait_id:   i64,
  pub kind:          String,
  pub title:         String,
  pub body:          String,
  pub ordinal:       i32,
}

impl RawEnrichment {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      enrichment_id: row.get(0)?,
      portrait_id:   row.get(1)?,
      kind:          row.get(2)?,
      title:         row.get(3)?,
      body:          row.get(4)?,
      ordinal:       row.get(5)?,
    })
  }

  pub fn into_row(self) -> Result<EnrichmentRow> {
    Ok(EnrichmentRow {
      enrichment_id: self.enrichment_id,
      portrait_id:   self.portrait_id,
      kind:          EnrichmentKind::parse(&self.kind)?,
      title:         self.title,
      body:          self.body,
      ordinal:       self.ordinal,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn placeholder_lists() {
    assert_eq!(placeholders(1), "?");
    assert_eq!(placeholders(3), "?, ?, ?");
  }

  #[test]
  fn unknown_tags_surface_as_core_errors() {
    let raw = RawMajor {
      major_id:  1,
      code:      "X".into(),
      name:      "X".into(),
      brief:     String::new(),
      edu_level: "doctorate".into(),
    };
    assert!(matches!(raw.into_major(), Err(Error::Core(_))));
  }
}
