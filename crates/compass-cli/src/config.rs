//! Runtime configuration, read from an optional TOML file layered under
//! `COMPASS_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use compass_core::major::EduLevel;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CompassConfig {
  /// SQLite database file. A leading `~/` is expanded.
  pub store_path:        PathBuf,
  /// Education level applied to `majors` and `report` when none is given on
  /// the command line.
  pub default_edu_level: Option<EduLevel>,
}

impl CompassConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", "compass.db")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("COMPASS"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise CompassConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let cfg = CompassConfig::load(Path::new("/nonexistent/compass.toml")).unwrap();
    assert_eq!(cfg.store_path, PathBuf::from("compass.db"));
    assert!(cfg.default_edu_level.is_none());
  }

  #[test]
  fn absolute_paths_are_left_alone() {
    assert_eq!(expand_tilde(Path::new("/var/db")), PathBuf::from("/var/db"));
  }
}
