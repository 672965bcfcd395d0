//! SQLite backend for the Billig quiz store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. The original deployment's stored
//! procedures (prize claim, code generation, weekly stock reset) are
//! implemented here as single-statement conditional updates.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
