//! `POST /api/quiz/submit` — finalise a session into a scored participation
//! and allocate a prize.

use axum::{Json, extract::State};
use billig_core::{
  participation::{NewParticipation, PrizeTier},
  session::QUESTIONS_PER_SESSION,
  stock::{DEFAULT_STOCK, PublicStock},
  store::QuizStore,
  validate::{is_valid_email, is_valid_french_phone, is_valid_name, normalize_phone},
  week::current_week_start,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, extract::ApiJson, redact};

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
  pub session_id:         Uuid,
  pub device_fingerprint: String,
  pub first_name:         String,
  pub email:              String,
  pub phone:              String,
  #[serde(default)]
  pub rgpd_consent:       bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
  pub success:         bool,
  pub score:           usize,
  pub total_questions: usize,
  pub percentage:      usize,
  /// French tier label, or `null` when nothing was won (including the
  /// stock-exhausted downgrade).
  pub prize_won:       Option<&'static str>,
  pub prize_code:      Option<String>,
  pub first_name:      String,
  pub stock:           PublicStock,
  /// Consolation unlock: the current secret-menu code, win or lose.
  pub secret_code:     Option<String>,
}

// ─── Handler ─────────────────────────────────────────────────────────────────

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError>
where
  S: QuizStore + Clone + Send + Sync + 'static,
{
  // Input validation, all before any store access.
  if body.first_name.trim().is_empty()
    || body.email.trim().is_empty()
    || body.phone.trim().is_empty()
    || body.device_fingerprint.trim().is_empty()
  {
    return Err(ApiError::MissingFields);
  }
  if !body.rgpd_consent {
    return Err(ApiError::RgpdRequired);
  }
  if !is_valid_name(&body.first_name) {
    return Err(ApiError::InvalidName);
  }
  if !is_valid_email(&body.email) {
    return Err(ApiError::InvalidEmail);
  }
  if !is_valid_french_phone(&body.phone) {
    return Err(ApiError::InvalidPhone);
  }
  let phone = normalize_phone(&body.phone);

  let session = state
    .store
    .get_session(body.session_id, &body.device_fingerprint)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::InvalidSession)?;

  // Idempotency guard against double-scoring.
  if session.completed {
    return Err(ApiError::AlreadySubmitted);
  }

  let score = session.correct_count();
  let percentage = score * 100 / QUESTIONS_PER_SESSION;
  let mut prize_tier = PrizeTier::for_score(score);

  let now = Utc::now();
  let week = current_week_start(now);

  // Per-week per-phone uniqueness, checked after scoring and before any
  // write. This also blocks a non-winning resubmission by a phone that
  // already won this week — observed behavior, preserved.
  if state
    .store
    .has_winning_phone(&phone, week)
    .await
    .map_err(ApiError::store)?
  {
    return Err(ApiError::PhoneAlreadyWon);
  }

  let mut prize_code = None;
  if let Some(tier) = prize_tier {
    state
      .store
      .ensure_weekly_stock(week, &DEFAULT_STOCK)
      .await
      .map_err(ApiError::store)?;

    // The atomic decrement is the only concurrency-sensitive step. A false
    // return means the tier ran out: the win silently downgrades to a loss.
    if state
      .store
      .claim_prize(week, tier)
      .await
      .map_err(ApiError::store)?
    {
      prize_code = Some(
        state
          .store
          .generate_prize_code()
          .await
          .map_err(ApiError::store)?,
      );
    } else {
      tracing::info!(tier = tier.as_str(), "stock exhausted, prize revoked");
      prize_tier = None;
    }
  }

  // The participation row is inserted win or lose.
  let participation = state
    .store
    .insert_participation(NewParticipation {
      first_name:         body.first_name.clone(),
      email:              body.email.clone(),
      phone:              phone.clone(),
      device_fingerprint: body.device_fingerprint.clone(),
      score,
      prize_tier,
      prize_code:         prize_code.clone(),
      week_start:         week,
      rgpd_consent:       body.rgpd_consent,
    })
    .await
    .map_err(ApiError::store)?;

  state
    .store
    .complete_session(session.session_id)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(
    participation_id = %participation.participation_id,
    score,
    prize = ?prize_tier.map(|t| t.as_str()),
    email = %redact::redact_email(&body.email),
    phone = %redact::redact_phone(&phone),
    "quiz submitted"
  );

  let stock = state
    .store
    .stock_levels(week)
    .await
    .map_err(ApiError::store)?;
  let secret_code = state
    .store
    .active_secret_menu(now)
    .await
    .map_err(ApiError::store)?
    .map(|m| m.secret_code);

  Ok(Json(SubmitResponse {
    success:         true,
    score,
    total_questions: QUESTIONS_PER_SESSION,
    percentage,
    prize_won:       prize_tier.map(|t| t.label()),
    prize_code,
    first_name:      body.first_name,
    stock:           PublicStock::from(&stock),
    secret_code,
  }))
}
