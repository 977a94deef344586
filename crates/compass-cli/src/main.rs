//! `compass`: run the Compass analytics engines from the command line.
//!
//! Reads `compass.toml` (or the path given with `--config`), opens the
//! SQLite store, and prints JSON results.
//!
//! # Usage
//!
//! ```text
//! compass load --file reference.json
//! compass answer --user <uuid> --scale 101 --score 2
//! compass majors --user <uuid> --edu-level bachelor --codes 080901,080902
//! compass portrait --user <uuid>
//! compass report --user <uuid>
//! ```

mod config;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use compass_core::{
  MajorMatch, MajorMatchScorer, PortraitMatch, PortraitMatcher,
  answer::{AnswerScore, ScaleId},
  major::EduLevel,
};
use compass_store_sqlite::{ReferenceData, SqliteStore};
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::config::CompassConfig;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Compass major-matching and trait portraits")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "compass.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Load reference data from a JSON bundle into an empty store.
  Load {
    #[arg(short, long)]
    file: PathBuf,
  },

  /// Record one answer, replacing any earlier answer to the same scale.
  Answer {
    #[arg(long)]
    user:  Uuid,
    #[arg(long)]
    scale: ScaleId,
    #[arg(long, allow_hyphen_values = true)]
    score: i64,
  },

  /// Rank majors for a user.
  Majors {
    #[arg(long)]
    user:      Uuid,
    /// `bachelor` or `associate`; falls back to `default_edu_level`.
    #[arg(long, value_parser = EduLevel::parse)]
    edu_level: Option<EduLevel>,
    /// Comma-separated major codes to restrict to.
    #[arg(long, value_delimiter = ',')]
    codes:     Option<Vec<String>>,
  },

  /// Classify a user's traits and print the matching portraits.
  Portrait {
    #[arg(long)]
    user: Uuid,
  },

  /// Majors and portrait together.
  Report {
    #[arg(long)]
    user:      Uuid,
    #[arg(long, value_parser = EduLevel::parse)]
    edu_level: Option<EduLevel>,
  },
}

#[derive(Serialize)]
struct Report {
  user_id:  Uuid,
  majors:   Vec<MajorMatch>,
  portrait: PortraitMatch,
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing. Logs go to stderr so stdout stays valid JSON.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = CompassConfig::load(&cli.config)?;

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;
  let store = Arc::new(store);

  match cli.command {
    Command::Load { file } => {
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("reading reference data {}", file.display()))?;
      let data = ReferenceData::from_json(&raw).context("parsing reference data")?;
      store
        .load_reference_data(data)
        .await
        .context("loading reference data")?;
    }

    Command::Answer { user, scale, score } => {
      let score = AnswerScore::new(score)?;
      let answer = store
        .record_answer(user, scale, score)
        .await
        .context("recording answer")?;
      print_json(&answer)?;
    }

    Command::Majors { user, edu_level, codes } => {
      let edu_level = edu_level.or(cfg.default_edu_level);
      let majors = MajorMatchScorer::new(store)
        .calculate(user, edu_level, codes)
        .await
        .context("scoring majors")?;
      print_json(&majors)?;
    }

    Command::Portrait { user } => {
      let portrait = PortraitMatcher::new(store)
        .match_user(user)
        .await
        .context("matching portrait")?;
      print_json(&portrait)?;
    }

    Command::Report { user, edu_level } => {
      let edu_level = edu_level.or(cfg.default_edu_level);
      let scorer = MajorMatchScorer::new(store.clone());
      let matcher = PortraitMatcher::new(store);

      let (majors, portrait) = tokio::try_join!(
        async { scorer.calculate(user, edu_level, None).await.context("scoring majors") },
        async { matcher.match_user(user).await.context("matching portrait") },
      )?;

      tracing::info!(%user, majors = majors.len(), outcome = ?portrait.outcome, "report ready");
      print_json(&Report { user_id: user, majors, portrait })?;
    }
  }

  Ok(())
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
