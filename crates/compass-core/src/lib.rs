//! Core types, the store trait, and the analytics engines of Compass.
//!
//! Two independent engines read the same questionnaire answers:
//!
//! - [`scoring`] ranks majors by a weighted fit score minus risk deductions.
//! - [`matcher`] classifies a user's element scores into a quadrant and
//!   fetches the narrative portraits for the strongest pairs, built from
//!   [`aggregate`], [`quantile`], [`pairing`], [`selector`] and
//!   [`assemble`].
//!
//! This crate is free of HTTP and database dependencies. Data comes in
//! through [`store::AdvisoryStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod aggregate;
pub mod answer;
pub mod assemble;
pub mod element;
pub mod error;
pub mod major;
pub mod matcher;
pub mod pairing;
pub mod portrait;
pub mod quantile;
pub mod scoring;
pub mod selector;
pub mod store;

pub use error::{EngineError, Error, Result};
pub use matcher::{MatchOutcome, PortraitMatch, PortraitMatcher};
pub use scoring::{MajorMatch, MajorMatchScorer};
