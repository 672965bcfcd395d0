//! `POST /api/social` — public feed of the restaurant's social posts, with
//! anonymous per-device likes and comments.

use axum::{Json, extract::State, response::{IntoResponse, Response}};
use billig_core::{
  content::InteractionKind,
  store::{NewInteraction, QuizStore},
  validate::is_valid_fingerprint,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extract::ApiJson};

const MAX_COMMENT_LEN: usize = 500;

#[derive(Debug, Deserialize)]
#[serde(
  tag = "action",
  rename_all = "lowercase",
  rename_all_fields = "camelCase"
)]
pub enum SocialRequest {
  List,
  Like {
    post_id:   Uuid,
    device_id: String,
  },
  Comment {
    post_id:   Uuid,
    device_id: String,
    body:      String,
  },
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<SocialRequest>,
) -> Result<Response, ApiError>
where
  S: QuizStore + Clone + Send + Sync + 'static,
{
  match body {
    SocialRequest::List => {
      let posts = state
        .store
        .list_social_posts(true)
        .await
        .map_err(ApiError::store)?;
      Ok(Json(json!({ "posts": posts })).into_response())
    }
    SocialRequest::Like { post_id, device_id } => {
      interact(&state, post_id, device_id, InteractionKind::Like, None).await
    }
    SocialRequest::Comment { post_id, device_id, body } => {
      let body = body.trim().to_owned();
      if body.is_empty() || body.chars().count() > MAX_COMMENT_LEN {
        return Err(ApiError::MissingFields);
      }
      interact(&state, post_id, device_id, InteractionKind::Comment, Some(body))
        .await
    }
  }
}

async fn interact<S>(
  state: &AppState<S>,
  post_id: Uuid,
  device_id: String,
  kind: InteractionKind,
  body: Option<String>,
) -> Result<Response, ApiError>
where
  S: QuizStore,
{
  if !is_valid_fingerprint(&device_id) {
    return Err(ApiError::InvalidFingerprint);
  }

  let recorded = state
    .store
    .record_interaction(NewInteraction { post_id, device_id, kind, body })
    .await
    .map_err(ApiError::store)?;

  // Hidden posts are indistinguishable from missing ones.
  match recorded {
    Some(interaction) => Ok(
      Json(json!({
        "success":       true,
        "interactionId": interaction.interaction_id,
      }))
      .into_response(),
    ),
    None => Err(ApiError::PostNotFound),
  }
}
