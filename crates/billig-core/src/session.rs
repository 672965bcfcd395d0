//! Quiz sessions — the short-lived per-device state of a quiz run.
//!
//! A session expires on a sliding window: each recorded answer pushes
//! `expires_at` forward by [`answer_window`]. Expiry is checked lazily on
//! access; nothing sweeps expired rows.
//!
//! `completed` and the answer cursor are independent on purpose: a session
//! that has answered all 10 questions stays `completed = false` until the
//! submission handler (or a reset) flips it. Deriving one from the other
//! would break the idempotent-restart behavior.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::question::AnswerLetter;

/// Questions served per session: 8 `local` + 2 `food`.
pub const QUESTIONS_PER_SESSION: usize = 10;
pub const LOCAL_QUESTIONS: usize = 8;
pub const FOOD_QUESTIONS: usize = 2;

/// Sliding inactivity window. Session creation and every answer set
/// `expires_at = now + answer_window()`.
pub fn answer_window() -> Duration { Duration::minutes(5) }

// ─── Recorded answer ─────────────────────────────────────────────────────────

/// One answered round, appended to the session's answer list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedAnswer {
  /// Session-relative index into `question_ids`, 0–9.
  pub question_index: usize,
  pub chosen:         AnswerLetter,
  pub is_correct:     bool,
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSession {
  pub session_id:         Uuid,
  pub device_fingerprint: String,
  /// Exactly [`QUESTIONS_PER_SESSION`] ids, in serving order.
  pub question_ids:       Vec<Uuid>,
  pub answers:            Vec<RecordedAnswer>,
  /// Next question to answer. Advances with each answer; reaching 10 does
  /// NOT mark the session completed.
  pub current_index:      usize,
  pub completed:          bool,
  pub expires_at:         DateTime<Utc>,
  pub created_at:         DateTime<Utc>,
}

impl QuizSession {
  pub fn new(device_fingerprint: String, question_ids: Vec<Uuid>, now: DateTime<Utc>) -> Self {
    Self {
      session_id: Uuid::new_v4(),
      device_fingerprint,
      question_ids,
      answers: Vec::new(),
      current_index: 0,
      completed: false,
      expires_at: now + answer_window(),
      created_at: now,
    }
  }

  pub fn is_expired(&self, now: DateTime<Utc>) -> bool { self.expires_at <= now }

  /// Count of answers judged correct. The scoring denominator is always
  /// [`QUESTIONS_PER_SESSION`], not `answers.len()`.
  pub fn correct_count(&self) -> usize {
    self.answers.iter().filter(|a| a.is_correct).count()
  }
}
