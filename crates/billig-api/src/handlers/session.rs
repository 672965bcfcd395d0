//! `POST /api/quiz/session` — start, answer, and reset a quiz run.

use axum::{Json, extract::State, response::{IntoResponse, Response}};
use billig_core::{
  question::{AnswerLetter, PublicQuestion, QuestionCategory},
  session::{
    FOOD_QUESTIONS, LOCAL_QUESTIONS, QUESTIONS_PER_SESSION, QuizSession,
    RecordedAnswer, answer_window,
  },
  store::QuizStore,
  validate::is_valid_fingerprint,
  week::current_week_start,
};
use chrono::Utc;
use rand::seq::SliceRandom as _;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, extract::ApiJson};

// ─── Wire types ──────────────────────────────────────────────────────────────

/// Tagged request body; one variant per action so dispatch is exhaustive at
/// compile time.
#[derive(Debug, Deserialize)]
#[serde(
  tag = "action",
  rename_all = "lowercase",
  rename_all_fields = "camelCase"
)]
pub enum SessionRequest {
  Start {
    device_fingerprint: String,
  },
  Answer {
    session_id:         Uuid,
    device_fingerprint: String,
    answer:             String,
    /// Accepted as an integer so an out-of-range value gets a proper
    /// `invalid_question` envelope instead of a deserialisation failure.
    question_index:     i64,
  },
  Reset {
    device_fingerprint: String,
  },
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
  pub session:   QuizSession,
  pub questions: Vec<PublicQuestion>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
  pub is_correct:     bool,
  /// Safe to disclose now that the round is over.
  pub correct_answer: &'static str,
}

// ─── Handler ─────────────────────────────────────────────────────────────────

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<SessionRequest>,
) -> Result<Response, ApiError>
where
  S: QuizStore + Clone + Send + Sync + 'static,
{
  match body {
    SessionRequest::Start { device_fingerprint } => {
      start(&state, device_fingerprint).await
    }
    SessionRequest::Answer {
      session_id,
      device_fingerprint,
      answer,
      question_index,
    } => record(&state, session_id, device_fingerprint, answer, question_index).await,
    SessionRequest::Reset { device_fingerprint } => {
      reset(&state, device_fingerprint).await
    }
  }
}

// ─── Start ───────────────────────────────────────────────────────────────────

async fn start<S>(state: &AppState<S>, fingerprint: String) -> Result<Response, ApiError>
where
  S: QuizStore,
{
  if !is_valid_fingerprint(&fingerprint) {
    return Err(ApiError::InvalidFingerprint);
  }

  let now = Utc::now();
  let week = current_week_start(now);

  if state
    .store
    .has_winning_participation(&fingerprint, week)
    .await
    .map_err(ApiError::store)?
  {
    return Err(ApiError::AlreadyWon);
  }

  // Idempotent restart: an open, unexpired session is returned verbatim.
  if let Some(session) = state
    .store
    .find_active_session(&fingerprint, now)
    .await
    .map_err(ApiError::store)?
  {
    let questions = public_questions(state, &session.question_ids).await?;
    return Ok(Json(StartResponse { session, questions }).into_response());
  }

  let local = state
    .store
    .active_questions(QuestionCategory::Local)
    .await
    .map_err(ApiError::store)?;
  let food = state
    .store
    .active_questions(QuestionCategory::Food)
    .await
    .map_err(ApiError::store)?;
  if local.len() < LOCAL_QUESTIONS || food.len() < FOOD_QUESTIONS {
    return Err(ApiError::NotEnoughQuestions);
  }

  let question_ids = pick_question_ids(local, food);
  debug_assert_eq!(question_ids.len(), QUESTIONS_PER_SESSION);

  let session = QuizSession::new(fingerprint, question_ids, now);
  state
    .store
    .insert_session(session.clone())
    .await
    .map_err(ApiError::store)?;

  tracing::info!(session_id = %session.session_id, "quiz session started");

  let questions = public_questions(state, &session.question_ids).await?;
  Ok(Json(StartResponse { session, questions }).into_response())
}

/// 8 random `local` + 2 random `food`, then the combined ten re-shuffled so
/// category blocks don't show through the serving order.
fn pick_question_ids(
  mut local: Vec<billig_core::question::QuizQuestion>,
  mut food: Vec<billig_core::question::QuizQuestion>,
) -> Vec<Uuid> {
  let mut rng = rand::thread_rng();
  local.shuffle(&mut rng);
  food.shuffle(&mut rng);

  let mut ids: Vec<Uuid> = local
    .iter()
    .take(LOCAL_QUESTIONS)
    .chain(food.iter().take(FOOD_QUESTIONS))
    .map(|q| q.question_id)
    .collect();
  ids.shuffle(&mut rng);
  ids
}

/// Full question records in session order, with the correct answers
/// stripped.
async fn public_questions<S>(
  state: &AppState<S>,
  ids: &[Uuid],
) -> Result<Vec<PublicQuestion>, ApiError>
where
  S: QuizStore,
{
  let questions = state
    .store
    .questions_by_ids(ids)
    .await
    .map_err(ApiError::store)?;
  Ok(questions.into_iter().map(PublicQuestion::from).collect())
}

// ─── Answer ──────────────────────────────────────────────────────────────────

async fn record<S>(
  state: &AppState<S>,
  session_id: Uuid,
  fingerprint: String,
  answer: String,
  question_index: i64,
) -> Result<Response, ApiError>
where
  S: QuizStore,
{
  let chosen =
    AnswerLetter::parse(&answer).map_err(|_| ApiError::InvalidAnswer)?;
  if !(0..QUESTIONS_PER_SESSION as i64).contains(&question_index) {
    return Err(ApiError::InvalidQuestion);
  }
  let index = question_index as usize;

  let session = state
    .store
    .get_session(session_id, &fingerprint)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::InvalidSession)?;

  let now = Utc::now();
  if session.is_expired(now) {
    return Err(ApiError::SessionExpired);
  }

  // Each index is answerable exactly once, and a full sheet takes no more.
  if session.answers.len() >= QUESTIONS_PER_SESSION
    || session.answers.iter().any(|a| a.question_index == index)
  {
    return Err(ApiError::InvalidQuestion);
  }

  let question_id = session
    .question_ids
    .get(index)
    .copied()
    .ok_or(ApiError::InvalidQuestion)?;
  let question = state
    .store
    .questions_by_ids(&[question_id])
    .await
    .map_err(ApiError::store)?
    .into_iter()
    .next()
    .ok_or(ApiError::InvalidQuestion)?;

  let is_correct = chosen == question.correct;

  // Sliding window: every answer pushes the expiry forward.
  state
    .store
    .record_answer(
      session.session_id,
      RecordedAnswer { question_index: index, chosen, is_correct },
      now + answer_window(),
    )
    .await
    .map_err(ApiError::store)?;

  Ok(
    Json(AnswerResponse {
      is_correct,
      correct_answer: question.correct.as_str(),
    })
    .into_response(),
  )
}

// ─── Reset ───────────────────────────────────────────────────────────────────

/// Soft-cancel. Always succeeds, even when there is nothing to cancel.
async fn reset<S>(state: &AppState<S>, fingerprint: String) -> Result<Response, ApiError>
where
  S: QuizStore,
{
  state
    .store
    .cancel_sessions(&fingerprint)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(serde_json::json!({ "success": true })).into_response())
}
