//! `POST /api/carte` — the regular public menu. No gating; the gated
//! counterpart lives behind `/api/secret-menu`.

use axum::{Json, extract::State, response::{IntoResponse, Response}};
use billig_core::store::QuizStore;
use serde_json::json;

use crate::{AppState, error::ApiError};

pub async fn handler<S>(State(state): State<AppState<S>>) -> Result<Response, ApiError>
where
  S: QuizStore + Clone + Send + Sync + 'static,
{
  let carte = state.store.get_carte().await.map_err(ApiError::store)?;

  // An unedited carte reads as empty, not as an error.
  match carte {
    Some(carte) => Ok(Json(carte).into_response()),
    None => Ok(
      Json(json!({ "galetteItems": [], "crepeItems": [], "updatedAt": null }))
        .into_response(),
    ),
  }
}
