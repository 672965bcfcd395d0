//! `POST /api/secret-menu` — unlock the current secret menu with its
//! daily code.

use axum::{Json, extract::State, response::{IntoResponse, Response}};
use billig_core::store::QuizStore;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiError, extract::ApiJson};

#[derive(Debug, Deserialize)]
#[serde(
  tag = "action",
  rename_all = "lowercase",
  rename_all_fields = "camelCase"
)]
pub enum SecretMenuRequest {
  Unlock { code: String },
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<SecretMenuRequest>,
) -> Result<Response, ApiError>
where
  S: QuizStore + Clone + Send + Sync + 'static,
{
  let SecretMenuRequest::Unlock { code } = body;

  let menu = state
    .store
    .active_secret_menu(Utc::now())
    .await
    .map_err(ApiError::store)?;

  // A wrong code and no current menu answer identically, so probing reveals
  // nothing about whether a menu exists.
  match menu {
    Some(menu) if menu.secret_code.eq_ignore_ascii_case(code.trim()) => Ok(
      Json(json!({
        "unlocked": true,
        "menu": {
          "name":         menu.name,
          "specials":     menu.specials,
          "galetteItems": menu.galette_items,
          "crepeItems":   menu.crepe_items,
        },
      }))
      .into_response(),
    ),
    _ => Ok(
      Json(json!({ "unlocked": false, "message": "Code incorrect." }))
        .into_response(),
    ),
  }
}
