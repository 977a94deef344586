//! The `AdvisoryStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `compass-store-sqlite`).
//! The engines depend on this abstraction only. Every method is a bulk read;
//! an engine run issues a small, fixed number of calls no matter how many
//! elements or majors are involved.

use std::future::Future;

use uuid::Uuid;

use crate::{
  answer::{Answer, Battery, Scale},
  element::Element,
  major::{EduLevel, Major, MajorElementAnalysis, MajorId},
  portrait::{
    EnrichmentRow, Portrait, PortraitId, PortraitTriple, Quadrant, QuadrantKind,
  },
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`AdvisoryStore::list_majors`].
#[derive(Debug, Clone, Default)]
pub struct MajorFilter {
  pub edu_level: Option<EduLevel>,
  /// Restrict to these major codes. `None` means every major; an empty list
  /// matches nothing.
  pub codes:     Option<Vec<String>>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Read-only access to the reference data and answers the engines consume.
///
/// All methods return `Send` futures so engines can be driven from
/// multi-threaded async runtimes.
pub trait AdvisoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every live answer of `user_id`, across all batteries.
  fn list_answers(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Answer>, Self::Error>> + Send + '_;

  /// The full element catalogue, both families.
  fn list_elements(
    &self,
  ) -> impl Future<Output = Result<Vec<Element>, Self::Error>> + Send + '_;

  /// All scales of one battery.
  fn list_scales(
    &self,
    battery: Battery,
  ) -> impl Future<Output = Result<Vec<Scale>, Self::Error>> + Send + '_;

  /// Majors matching `filter`.
  fn list_majors<'a>(
    &'a self,
    filter: &'a MajorFilter,
  ) -> impl Future<Output = Result<Vec<Major>, Self::Error>> + Send + 'a;

  /// Analysis rows, restricted to `major_ids` when given.
  fn list_major_element_analyses<'a>(
    &'a self,
    major_ids: Option<&'a [MajorId]>,
  ) -> impl Future<Output = Result<Vec<MajorElementAnalysis>, Self::Error>>
  + Send
  + 'a;

  /// The four quadrant rows.
  fn list_quadrants(
    &self,
  ) -> impl Future<Output = Result<Vec<Quadrant>, Self::Error>> + Send + '_;

  /// Portraits whose (like, talent, quadrant) triple is one of `triples`.
  /// Order of the result is unspecified.
  fn find_portraits_by_triples<'a>(
    &'a self,
    triples: &'a [PortraitTriple],
  ) -> impl Future<Output = Result<Vec<Portrait>, Self::Error>> + Send + 'a;

  /// Enrichment rows for `portrait_ids` belonging to the collections of
  /// `quadrant`.
  fn find_enrichment<'a>(
    &'a self,
    portrait_ids: &'a [PortraitId],
    quadrant: QuadrantKind,
  ) -> impl Future<Output = Result<Vec<EnrichmentRow>, Self::Error>> + Send + 'a;
}
