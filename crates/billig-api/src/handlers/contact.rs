//! `POST /api/contact` — contact-form intake. Messages are stored and read
//! back from the admin endpoint, never emailed.

use axum::{Json, extract::State, response::{IntoResponse, Response}};
use billig_core::{
  content::ContactMessage,
  store::QuizStore,
  validate::{is_valid_email, is_valid_name},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extract::ApiJson, redact::redact_email};

const MAX_BODY_LEN: usize = 2000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
  pub name:    String,
  pub email:   String,
  pub message: String,
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<ContactRequest>,
) -> Result<Response, ApiError>
where
  S: QuizStore + Clone + Send + Sync + 'static,
{
  let name = body.name.trim().to_owned();
  let email = body.email.trim().to_owned();
  let message = body.message.trim().to_owned();

  if !is_valid_name(&name) {
    return Err(ApiError::InvalidName);
  }
  if !is_valid_email(&email) {
    return Err(ApiError::InvalidEmail);
  }
  if message.is_empty() || message.chars().count() > MAX_BODY_LEN {
    return Err(ApiError::MissingFields);
  }

  let record = ContactMessage {
    message_id: Uuid::new_v4(),
    name,
    email,
    body: message,
    created_at: Utc::now(),
  };
  let message_id = record.message_id;
  let email_log = redact_email(&record.email);

  state
    .store
    .insert_message(record)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(%message_id, email = %email_log, "contact message received");
  Ok(Json(json!({ "success": true })).into_response())
}
