//! Participations — the durable record a completed session terminates into —
//! and the prize-tier mapping.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Prize tiers ─────────────────────────────────────────────────────────────

/// The three prize tiers, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrizeTier {
  FormuleComplete,
  Galette,
  Crepe,
}

impl PrizeTier {
  /// Map a score out of 10 to a tier: 100% → formule complète, ≥90% →
  /// galette, ≥80% → crêpe. Boundaries are inclusive; anything else,
  /// including out-of-range input, wins nothing.
  pub fn for_score(score: usize) -> Option<Self> {
    match score {
      10 => Some(Self::FormuleComplete),
      9 => Some(Self::Galette),
      8 => Some(Self::Crepe),
      _ => None,
    }
  }

  /// The customer-facing French label.
  pub fn label(&self) -> &'static str {
    match self {
      Self::FormuleComplete => "Formule Complète",
      Self::Galette => "Galette",
      Self::Crepe => "Crêpe",
    }
  }

  /// The stable identifier used in stock rows and database columns.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::FormuleComplete => "formule_complete",
      Self::Galette => "galette",
      Self::Crepe => "crepe",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "formule_complete" => Ok(Self::FormuleComplete),
      "galette" => Ok(Self::Galette),
      "crepe" => Ok(Self::Crepe),
      other => Err(Error::UnknownPrizeTier(other.to_string())),
    }
  }

  pub const ALL: [Self; 3] = [Self::FormuleComplete, Self::Galette, Self::Crepe];
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle of a participation's prize code. `Invalidated` also implies
/// `claimed = true` so the code cannot be replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationStatus {
  Active,
  Claimed,
  Invalidated,
}

impl ParticipationStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Active => "active",
      Self::Claimed => "claimed",
      Self::Invalidated => "invalidated",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "active" => Ok(Self::Active),
      "claimed" => Ok(Self::Claimed),
      "invalidated" => Ok(Self::Invalidated),
      other => Err(Error::UnknownStatus(other.to_string())),
    }
  }
}

// ─── Participation ───────────────────────────────────────────────────────────

/// One scored quiz run by one person. Inserted exactly once per completed
/// session, win or not; mutated later only by admin claim/invalidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizParticipation {
  pub participation_id:   Uuid,
  pub first_name:         String,
  pub email:              String,
  pub phone:              String,
  pub device_fingerprint: String,
  pub score:              usize,
  /// Always [`QUESTIONS_PER_SESSION`](crate::session::QUESTIONS_PER_SESSION).
  pub total_questions:    usize,
  pub prize_tier:         Option<PrizeTier>,
  /// 6–10 uppercase alphanumeric chars; unique across all weeks.
  pub prize_code:         Option<String>,
  /// Monday-aligned week identifier.
  pub week_start:         NaiveDate,
  pub rgpd_consent:       bool,
  pub claimed:            bool,
  pub claimed_at:         Option<DateTime<Utc>>,
  pub status:             ParticipationStatus,
  pub created_at:         DateTime<Utc>,
}

/// Input to `QuizStore::insert_participation`. Ids and timestamps are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewParticipation {
  pub first_name:         String,
  pub email:              String,
  pub phone:              String,
  pub device_fingerprint: String,
  pub score:              usize,
  pub prize_tier:         Option<PrizeTier>,
  pub prize_code:         Option<String>,
  pub week_start:         NaiveDate,
  pub rgpd_consent:       bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tier_boundaries_are_inclusive() {
    assert_eq!(PrizeTier::for_score(10), Some(PrizeTier::FormuleComplete));
    assert_eq!(PrizeTier::for_score(9), Some(PrizeTier::Galette));
    assert_eq!(PrizeTier::for_score(8), Some(PrizeTier::Crepe));
    assert_eq!(PrizeTier::for_score(7), None);
    assert_eq!(PrizeTier::for_score(0), None);
  }

  #[test]
  fn out_of_range_scores_win_nothing() {
    assert_eq!(PrizeTier::for_score(11), None);
    assert_eq!(PrizeTier::for_score(usize::MAX), None);
  }

  #[test]
  fn tier_string_roundtrip() {
    for tier in PrizeTier::ALL {
      assert_eq!(PrizeTier::parse(tier.as_str()).unwrap(), tier);
    }
    assert!(PrizeTier::parse("sandwich").is_err());
  }

  #[test]
  fn labels_are_customer_facing_french() {
    assert_eq!(PrizeTier::FormuleComplete.label(), "Formule Complète");
    assert_eq!(PrizeTier::Crepe.label(), "Crêpe");
  }
}
