//! Error types for `billig-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("session not found: {0}")]
  SessionNotFound(Uuid),

  #[error("participation not found: {0}")]
  ParticipationNotFound(Uuid),

  #[error("question index out of range: {0}")]
  QuestionIndexOutOfRange(usize),

  #[error("not an answer letter: {0:?}")]
  NotAnAnswerLetter(String),

  #[error("unknown question category: {0:?}")]
  UnknownCategory(String),

  #[error("unknown prize tier: {0:?}")]
  UnknownPrizeTier(String),

  #[error("unknown participation status: {0:?}")]
  UnknownStatus(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
