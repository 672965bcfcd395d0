//! Weekly prize-stock counters.
//!
//! One row per `(week_start, tier)`. The decrement is the only operation in
//! the system where atomicity genuinely matters; it lives in the store
//! (`QuizStore::claim_prize`), never in handler code.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::participation::PrizeTier;

/// Units available for new weeks, best tier scarcest.
pub const DEFAULT_STOCK: [(PrizeTier, u32); 3] = [
  (PrizeTier::FormuleComplete, 3),
  (PrizeTier::Galette, 5),
  (PrizeTier::Crepe, 10),
];

/// One tier's counters for one week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLevel {
  pub tier:      PrizeTier,
  pub remaining: u32,
  pub total:     u32,
}

/// The full stock picture for a week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyStock {
  pub week_start: NaiveDate,
  pub levels:     Vec<StockLevel>,
}

/// The remaining-counts view returned to clients after a submission.
/// Totals are not exposed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStock {
  pub formule_complete: u32,
  pub galette:          u32,
  pub crepe:            u32,
}

impl From<&WeeklyStock> for PublicStock {
  fn from(stock: &WeeklyStock) -> Self {
    let remaining = |tier| {
      stock
        .levels
        .iter()
        .find(|l| l.tier == tier)
        .map(|l| l.remaining)
        .unwrap_or(0)
    };
    Self {
      formule_complete: remaining(PrizeTier::FormuleComplete),
      galette:          remaining(PrizeTier::Galette),
      crepe:            remaining(PrizeTier::Crepe),
    }
  }
}
