//! [`SqliteStore`]: the SQLite implementation of [`AdvisoryStore`].

use std::path::Path;

use chrono::Utc;
use compass_core::{
  answer::{Answer, AnswerScore, Battery, Scale, ScaleId},
  element::Element,
  major::{Major, MajorElementAnalysis, MajorId},
  portrait::{
    EnrichmentKind, EnrichmentRow, Portrait, PortraitId, PortraitTriple,
    Quadrant, QuadrantKind,
  },
  store::{AdvisoryStore, MajorFilter},
};
use rusqlite::types::Value;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawAnalysis, RawAnswer, RawElement, RawEnrichment, RawMajor, RawQuadrant,
    RawScale, encode_dt, encode_uuid, placeholders, portrait_from_row,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Compass store backed by a single SQLite file.
///
/// Clones share one reference-counted connection.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Answers: write path ──────────────────────────────────────────────────

  /// Record `user_id`'s answer to `scale_id`, replacing any earlier answer to
  /// the same scale.
  pub async fn record_answer(
    &self,
    user_id:  Uuid,
    scale_id: ScaleId,
    score:    AnswerScore,
  ) -> Result<Answer> {
    let answer = Answer { user_id, scale_id, score, answered_at: Utc::now() };

    let user_str  = encode_uuid(user_id);
    let score_val = i64::from(score);
    let at_str    = encode_dt(answer.answered_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO answers (user_id, scale_id, score, answered_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (user_id, scale_id) DO UPDATE
             SET score = excluded.score, answered_at = excluded.answered_at",
          rusqlite::params![user_str, scale_id, score_val, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(answer)
  }
}

// ─── AdvisoryStore impl ──────────────────────────────────────────────────────

impl AdvisoryStore for SqliteStore {
  type Error = Error;

  async fn list_answers(&self, user_id: Uuid) -> Result<Vec<Answer>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawAnswer> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, scale_id, score, answered_at
           FROM answers WHERE user_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], RawAnswer::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(%user_id, rows = raws.len(), "listed answers");
    raws.into_iter().map(RawAnswer::into_answer).collect()
  }

  async fn list_elements(&self) -> Result<Vec<Element>> {
    let raws: Vec<RawElement> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM elements ORDER BY element_id",
          RawElement::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawElement::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(rows = raws.len(), "listed elements");
    raws.into_iter().map(RawElement::into_element).collect()
  }

  async fn list_scales(&self, battery: Battery) -> Result<Vec<Scale>> {
    let battery_str = battery.to_string();

    let raws: Vec<RawScale> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT scale_id, element_id, battery, content
           FROM scales WHERE battery = ?1 ORDER BY scale_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![battery_str], RawScale::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(%battery, rows = raws.len(), "listed scales");
    raws.into_iter().map(RawScale::into_scale).collect()
  }

  async fn list_majors(&self, filter: &MajorFilter) -> Result<Vec<Major>> {
    if filter.codes.as_ref().is_some_and(Vec::is_empty) {
      return Ok(vec![]);
    }
    let edu_str = filter.edu_level.map(|e| e.to_string());
    let codes   = filter.codes.clone();

    let raws: Vec<RawMajor> = self
      .conn
      .call(move |conn| {
        // Build WHERE clause dynamically.
        let mut conds: Vec<String> = vec![];
        let mut params: Vec<Value> = vec![];
        if let Some(edu) = edu_str {
          conds.push("edu_level = ?".to_owned());
          params.push(Value::Text(edu));
        }
        if let Some(codes) = codes {
          conds.push(format!("code IN ({})", placeholders(codes.len())));
          params.extend(codes.into_iter().map(Value::Text));
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let mut stmt = conn.prepare(&format!(
          "SELECT major_id, code, name, brief, edu_level
           FROM majors {where_clause} ORDER BY major_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawMajor::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(rows = raws.len(), "listed majors");
    raws.into_iter().map(RawMajor::into_major).collect()
  }

  async fn list_major_element_analyses(
    &self,
    major_ids: Option<&[MajorId]>,
  ) -> Result<Vec<MajorElementAnalysis>> {
    if major_ids.is_some_and(<[MajorId]>::is_empty) {
      return Ok(vec![]);
    }
    let ids: Option<Vec<MajorId>> = major_ids.map(<[MajorId]>::to_vec);

    let raws: Vec<RawAnalysis> = self
      .conn
      .call(move |conn| {
        let where_clause = match &ids {
          Some(ids) => format!("WHERE major_id IN ({})", placeholders(ids.len())),
          None => String::new(),
        };
        let mut stmt = conn.prepare(&format!(
          "SELECT major_id, element_id, axis, weight, convertibility
           FROM major_element_analyses {where_clause}"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(ids.unwrap_or_default()),
            RawAnalysis::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(rows = raws.len(), "listed major element analyses");
    raws.into_iter().map(RawAnalysis::into_analysis).collect()
  }

  async fn list_quadrants(&self) -> Result<Vec<Quadrant>> {
    let raws: Vec<RawQuadrant> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT quadrant_id, preference_obvious, aptitude_obvious, name
           FROM quadrants ORDER BY quadrant_id",
        )?;
        let rows = stmt
          .query_map([], RawQuadrant::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawQuadrant::into_quadrant).collect())
  }

  async fn find_portraits_by_triples(
    &self,
    triples: &[PortraitTriple],
  ) -> Result<Vec<Portrait>> {
    let mut wanted: Vec<PortraitTriple> = Vec::with_capacity(triples.len());
    for t in triples {
      if !wanted.contains(t) {
        wanted.push(*t);
      }
    }
    if wanted.is_empty() {
      return Ok(vec![]);
    }

    let portraits: Vec<Portrait> = self
      .conn
      .call(move |conn| {
        // One statement: row-value membership in a VALUES list.
        let values = vec!["(?, ?, ?)"; wanted.len()].join(", ");
        let params: Vec<i64> = wanted
          .iter()
          .flat_map(|t| [t.like_element_id, t.talent_element_id, t.quadrant_id])
          .collect();
        let mut stmt = conn.prepare(&format!(
          "SELECT portrait_id, like_element_id, talent_element_id, quadrant_id,
                  title, summary, strengths, advice
           FROM portraits
           WHERE (like_element_id, talent_element_id, quadrant_id)
                 IN (VALUES {values})"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), portrait_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(
      requested = triples.len(),
      found = portraits.len(),
      "fetched portraits by triple"
    );
    Ok(portraits)
  }

  async fn find_enrichment(
    &self,
    portrait_ids: &[PortraitId],
    quadrant: QuadrantKind,
  ) -> Result<Vec<EnrichmentRow>> {
    if portrait_ids.is_empty() {
      return Ok(vec![]);
    }
    let ids = portrait_ids.to_vec();
    let kinds = EnrichmentKind::for_quadrant(quadrant);

    let raws: Vec<RawEnrichment> = self
      .conn
      .call(move |conn| {
        let mut params: Vec<Value> = ids.iter().copied().map(Value::Integer).collect();
        params.extend(kinds.iter().map(|k| Value::Text(k.to_string())));

        let mut stmt = conn.prepare(&format!(
          "SELECT enrichment_id, portrait_id, kind, title, body, ordinal
           FROM portrait_enrichment
           WHERE portrait_id IN ({}) AND kind IN ({})
           ORDER BY portrait_id, ordinal, enrichment_id",
          placeholders(ids.len()),
          placeholders(kinds.len()),
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawEnrichment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    tracing::debug!(%quadrant, rows = raws.len(), "fetched enrichment");
    raws.into_iter().map(RawEnrichment::into_row).collect()
  }
}
