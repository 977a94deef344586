//! SQLite backend for the Compass advisory store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Besides the read-only
//! [`AdvisoryStore`](compass_core::store::AdvisoryStore) implementation it
//! carries the answer write path and a bulk loader for reference data.

mod encode;
mod load;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use load::ReferenceData;
pub use store::SqliteStore;
