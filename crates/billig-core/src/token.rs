//! Rotating 4-digit security token shown next to admin verification.
//!
//! Derived from the coarse wall clock (10-second buckets) through a fixed
//! linear-congruential hash. It is an anti-screenshot device for in-person
//! redemption, NOT a cryptographic MAC: anyone who knows the derivation can
//! compute it. Do not build a security boundary on it.

use chrono::{DateTime, Utc};

const LCG_MULTIPLIER: u64 = 1_103_515_245;
const LCG_INCREMENT: u64 = 12_345;

/// The token valid at `now`. Stable within a 10-second bucket.
pub fn security_token(now: DateTime<Utc>) -> String {
  let bucket = (now.timestamp() / 10) as u64;
  let hashed = bucket
    .wrapping_mul(LCG_MULTIPLIER)
    .wrapping_add(LCG_INCREMENT);
  format!("{:04}", hashed % 10_000)
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn token_is_stable_within_a_bucket() {
    let t0 = Utc.timestamp_opt(1_756_200_000, 0).unwrap();
    let t1 = Utc.timestamp_opt(1_756_200_009, 0).unwrap();
    let t2 = Utc.timestamp_opt(1_756_200_010, 0).unwrap();
    assert_eq!(security_token(t0), security_token(t1));
    assert_ne!(security_token(t0), security_token(t2));
  }

  #[test]
  fn token_is_four_digits() {
    for offset in 0..50 {
      let t = Utc.timestamp_opt(1_756_200_000 + offset * 10, 0).unwrap();
      let token = security_token(t);
      assert_eq!(token.len(), 4);
      assert!(token.chars().all(|c| c.is_ascii_digit()));
    }
  }
}
