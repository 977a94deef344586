//! Error types for `compass-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("answer score {0} is outside [-2, 2]")]
  ScoreOutOfRange(i64),

  #[error("analysis weight must be finite and positive, got {0}")]
  NonPositiveWeight(f64),

  #[error("unknown {kind} tag: {value:?}")]
  UnknownTag { kind: &'static str, value: String },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure of an engine run. The engines themselves never fail on missing
/// data; the only fault they surface is the collaborator's own.
#[derive(Debug, Error)]
pub enum EngineError<E: std::error::Error + 'static> {
  #[error("store error: {0}")]
  Store(#[source] E),
}

/// Helper for parsing strum-backed tag enums into [`Error::UnknownTag`].
pub(crate) fn parse_tag<T: std::str::FromStr>(
  kind: &'static str,
  value: &str,
) -> Result<T> {
  value.parse().map_err(|_| Error::UnknownTag {
    kind,
    value: value.to_owned(),
  })
}
