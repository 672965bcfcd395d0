//! Error type for `billig-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] billig_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The code generator ran out of retries without finding an unused code.
  #[error("could not generate a unique prize code")]
  CodeSpaceExhausted,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
