//! Quiz questions and their public projection.
//!
//! A question is immutable once served to a session. The correct answer is
//! never serialised toward a client before the round is over; handlers send
//! [`PublicQuestion`] instead of [`QuizQuestion`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Answer letter ───────────────────────────────────────────────────────────

/// One of the four answer slots of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerLetter {
  A,
  B,
  C,
  D,
}

impl AnswerLetter {
  /// Strict parse from client input. Anything but a single `A`–`D` is
  /// rejected; lowercase is not accepted.
  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "A" => Ok(Self::A),
      "B" => Ok(Self::B),
      "C" => Ok(Self::C),
      "D" => Ok(Self::D),
      other => Err(Error::NotAnAnswerLetter(other.to_string())),
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::A => "A",
      Self::B => "B",
      Self::C => "C",
      Self::D => "D",
    }
  }
}

// ─── Category ────────────────────────────────────────────────────────────────

/// The pool a question is drawn from. A session takes 8 `local` questions
/// and 2 `food` questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
  Local,
  Food,
}

impl QuestionCategory {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Local => "local",
      Self::Food => "food",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "local" => Ok(Self::Local),
      "food" => Ok(Self::Food),
      other => Err(Error::UnknownCategory(other.to_string())),
    }
  }
}

// ─── Question ────────────────────────────────────────────────────────────────

/// A quiz question as stored. Created and edited by staff tooling only;
/// request handlers read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
  pub question_id: Uuid,
  pub prompt:      String,
  /// Option texts in `A`, `B`, `C`, `D` order.
  pub options:     [String; 4],
  pub correct:     AnswerLetter,
  pub category:    QuestionCategory,
  pub is_active:   bool,
}

/// The client-facing view of a question — identical to [`QuizQuestion`] minus
/// the correct answer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
  pub question_id: Uuid,
  pub prompt:      String,
  pub options:     [String; 4],
  pub category:    QuestionCategory,
}

impl From<QuizQuestion> for PublicQuestion {
  fn from(q: QuizQuestion) -> Self {
    Self {
      question_id: q.question_id,
      prompt:      q.prompt,
      options:     q.options,
      category:    q.category,
    }
  }
}
