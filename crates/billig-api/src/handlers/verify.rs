//! `POST /api/prize/verify` — public, PII-minimised prize-code lookup.

use axum::{Json, extract::State};
use billig_core::{store::QuizStore, validate::is_valid_code, week::iso_week_number};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError, extract::ApiJson};

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
  pub code: String,
}

/// The minimised public view. Email, phone, fingerprint and the internal id
/// are deliberately absent — the code space is guessable enough that this
/// endpoint must not leak PII.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
  pub valid:       bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message:     Option<&'static str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub first_name:  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub prize:       Option<&'static str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub week_number: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub claimed:     Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub claimed_at:  Option<DateTime<Utc>>,
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError>
where
  S: QuizStore + Clone + Send + Sync + 'static,
{
  // A malformed code gets a distinct error; an unknown one gets a generic
  // valid:false. (Observed inconsistency, kept as-is.)
  if !is_valid_code(&body.code) {
    return Err(ApiError::InvalidCode);
  }

  let found = state
    .store
    .find_by_code(&body.code)
    .await
    .map_err(ApiError::store)?;

  let Some(p) = found else {
    return Ok(Json(VerifyResponse {
      valid:       false,
      message:     Some("Code inconnu."),
      first_name:  None,
      prize:       None,
      week_number: None,
      claimed:     None,
      claimed_at:  None,
    }));
  };

  // An invalidated participation still answers valid:true here; only the
  // admin view exposes the invalidated status.
  Ok(Json(VerifyResponse {
    valid:       true,
    message:     None,
    first_name:  Some(p.first_name),
    prize:       p.prize_tier.map(|t| t.label()),
    week_number: Some(iso_week_number(p.week_start)),
    claimed:     Some(p.claimed),
    claimed_at:  p.claimed_at,
  }))
}
