//! Week arithmetic. Participations and stock are scoped to Monday-aligned
//! weeks.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// The Monday of the week containing `now`, in UTC.
pub fn current_week_start(now: DateTime<Utc>) -> NaiveDate {
  week_start(now.date_naive())
}

/// The Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
  date - chrono::Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// ISO 8601 week number, shown on prize verification.
pub fn iso_week_number(date: NaiveDate) -> u32 {
  date.iso_week().week()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn week_start_is_monday_aligned() {
    // 2026-08-26 is a Wednesday; its week starts Monday 2026-08-24.
    assert_eq!(week_start(date(2026, 8, 26)), date(2026, 8, 24));
    // A Monday maps to itself.
    assert_eq!(week_start(date(2026, 8, 24)), date(2026, 8, 24));
    // A Sunday maps back six days.
    assert_eq!(week_start(date(2026, 8, 30)), date(2026, 8, 24));
  }

  #[test]
  fn week_start_crosses_month_and_year_boundaries() {
    // 2026-01-01 is a Thursday; its Monday is 2025-12-29.
    assert_eq!(week_start(date(2026, 1, 1)), date(2025, 12, 29));
  }

  #[test]
  fn iso_week_numbers() {
    assert_eq!(iso_week_number(date(2026, 8, 24)), 35);
    assert_eq!(iso_week_number(date(2026, 1, 1)), 1);
  }
}
