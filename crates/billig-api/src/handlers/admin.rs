//! `POST /api/admin` — password-gated staff endpoint.
//!
//! A single endpoint with a tagged action union: one variant per action with
//! its own typed payload, so dispatch is exhaustive at compile time instead
//! of string matching.

use axum::{Json, extract::State, response::{IntoResponse, Response}};
use billig_core::{
  content::{Carte, MenuItem, SecretMenu, SocialPost},
  store::{ClaimOutcome, QuizStore},
  token::security_token,
  validate::is_valid_code,
  week::iso_week_number,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extract::ApiJson};

const LIST_CAP: usize = 100;

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRequest {
  pub admin_password: String,
  #[serde(flatten)]
  pub action:         AdminAction,
}

#[derive(Debug, Deserialize)]
#[serde(
  tag = "action",
  rename_all = "snake_case",
  rename_all_fields = "camelCase"
)]
pub enum AdminAction {
  Verify {
    code: String,
  },
  Claim {
    code: String,
  },
  Invalidate {
    participation_id: Uuid,
  },
  ListParticipations {
    limit: Option<usize>,
  },
  Stats,
  UpdateSecretMenu {
    menu_id:       Option<Uuid>,
    name:          String,
    secret_code:   String,
    specials:      Vec<MenuItem>,
    #[serde(default)]
    galette_items: Vec<MenuItem>,
    #[serde(default)]
    crepe_items:   Vec<MenuItem>,
    valid_from:    DateTime<Utc>,
    valid_until:   DateTime<Utc>,
    #[serde(default = "default_true")]
    is_active:     bool,
  },
  UpdateCarte {
    #[serde(default)]
    galette_items: Vec<MenuItem>,
    #[serde(default)]
    crepe_items:   Vec<MenuItem>,
  },
  CreateSocialPost {
    url:     String,
    network: String,
  },
  SetPostVisibility {
    post_id: Uuid,
    visible: bool,
  },
  ValidateDailyCode {
    code: String,
  },
  ListMessages {
    limit: Option<usize>,
  },
}

fn default_true() -> bool { true }

/// Staff verification view: everything the public view hides, plus the
/// rotating anti-screenshot token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AdminVerifyResponse {
  valid:            bool,
  participation_id: Uuid,
  first_name:       String,
  prize:            Option<&'static str>,
  week_number:      u32,
  status:           billig_core::participation::ParticipationStatus,
  claimed:          bool,
  claimed_at:       Option<DateTime<Utc>>,
  security_token:   String,
}

// ─── Handler ─────────────────────────────────────────────────────────────────

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<AdminRequest>,
) -> Result<Response, ApiError>
where
  S: QuizStore + Clone + Send + Sync + 'static,
{
  // Shared-secret equality check against the configured value. 401 before
  // anything else runs.
  if body.admin_password != state.config.admin_password {
    return Err(ApiError::Unauthorized);
  }

  match body.action {
    AdminAction::Verify { code } => verify(&state, code).await,
    AdminAction::Claim { code } => claim(&state, code).await,
    AdminAction::Invalidate { participation_id } => {
      invalidate(&state, participation_id).await
    }
    AdminAction::ListParticipations { limit } => {
      let rows = state
        .store
        .list_participations(limit.unwrap_or(LIST_CAP).min(LIST_CAP))
        .await
        .map_err(ApiError::store)?;
      Ok(Json(json!({ "participations": rows })).into_response())
    }
    AdminAction::Stats => {
      let stats = state.store.stats().await.map_err(ApiError::store)?;
      Ok(Json(stats).into_response())
    }
    AdminAction::UpdateSecretMenu {
      menu_id,
      name,
      secret_code,
      specials,
      galette_items,
      crepe_items,
      valid_from,
      valid_until,
      is_active,
    } => {
      if name.trim().is_empty()
        || !is_valid_code(&secret_code)
        || specials.len() > 2
        || galette_items.len() > 3
        || crepe_items.len() > 3
        || valid_until <= valid_from
      {
        return Err(ApiError::InvalidMenu);
      }
      let menu = SecretMenu {
        menu_id: menu_id.unwrap_or_else(Uuid::new_v4),
        name,
        secret_code,
        specials,
        galette_items,
        crepe_items,
        valid_from,
        valid_until,
        is_active,
      };
      let menu_id = menu.menu_id;
      state
        .store
        .upsert_secret_menu(menu)
        .await
        .map_err(ApiError::store)?;
      tracing::info!(%menu_id, "secret menu updated");
      Ok(Json(json!({ "success": true, "menuId": menu_id })).into_response())
    }
    AdminAction::UpdateCarte { galette_items, crepe_items } => {
      let items_ok = |items: &[MenuItem]| {
        items.len() <= 12 && items.iter().all(|i| !i.name.trim().is_empty())
      };
      if !items_ok(&galette_items) || !items_ok(&crepe_items) {
        return Err(ApiError::InvalidMenu);
      }
      state
        .store
        .upsert_carte(Carte {
          galette_items,
          crepe_items,
          updated_at: Utc::now(),
        })
        .await
        .map_err(ApiError::store)?;
      tracing::info!("public carte updated");
      Ok(Json(json!({ "success": true })).into_response())
    }
    AdminAction::CreateSocialPost { url, network } => {
      let post = SocialPost {
        post_id:    Uuid::new_v4(),
        url,
        network,
        visible:    true,
        created_at: Utc::now(),
      };
      let post_id = post.post_id;
      state
        .store
        .insert_social_post(post)
        .await
        .map_err(ApiError::store)?;
      Ok(Json(json!({ "success": true, "postId": post_id })).into_response())
    }
    AdminAction::SetPostVisibility { post_id, visible } => {
      let updated = state
        .store
        .set_post_visibility(post_id, visible)
        .await
        .map_err(ApiError::store)?;
      if !updated {
        return Err(ApiError::PostNotFound);
      }
      Ok(Json(json!({ "success": true })).into_response())
    }
    AdminAction::ValidateDailyCode { code } => {
      let menu = state
        .store
        .active_secret_menu(Utc::now())
        .await
        .map_err(ApiError::store)?;
      let valid =
        menu.is_some_and(|m| m.secret_code.eq_ignore_ascii_case(&code));
      Ok(Json(json!({ "valid": valid })).into_response())
    }
    AdminAction::ListMessages { limit } => {
      let rows = state
        .store
        .list_messages(limit.unwrap_or(LIST_CAP).min(LIST_CAP))
        .await
        .map_err(ApiError::store)?;
      Ok(Json(json!({ "messages": rows })).into_response())
    }
  }
}

// ─── Verify / claim / invalidate ─────────────────────────────────────────────

async fn verify<S>(state: &AppState<S>, code: String) -> Result<Response, ApiError>
where
  S: QuizStore,
{
  if !is_valid_code(&code) {
    return Err(ApiError::InvalidCode);
  }

  let Some(p) = state
    .store
    .find_by_code(&code)
    .await
    .map_err(ApiError::store)?
  else {
    return Ok(
      Json(json!({ "valid": false, "message": "Code inconnu." })).into_response(),
    );
  };

  Ok(
    Json(AdminVerifyResponse {
      valid:            true,
      participation_id: p.participation_id,
      first_name:       p.first_name,
      prize:            p.prize_tier.map(|t| t.label()),
      week_number:      iso_week_number(p.week_start),
      status:           p.status,
      claimed:          p.claimed,
      claimed_at:       p.claimed_at,
      security_token:   security_token(Utc::now()),
    })
    .into_response(),
  )
}

async fn claim<S>(state: &AppState<S>, code: String) -> Result<Response, ApiError>
where
  S: QuizStore,
{
  if !is_valid_code(&code) {
    return Err(ApiError::InvalidCode);
  }

  let outcome = state
    .store
    .claim_code(&code, Utc::now())
    .await
    .map_err(ApiError::store)?;

  let (success, message) = match outcome {
    ClaimOutcome::Claimed => (true, "Lot remis."),
    ClaimOutcome::AlreadyClaimed => (false, "Ce code a déjà été utilisé."),
    ClaimOutcome::Invalidated => (false, "Ce code a été invalidé."),
    ClaimOutcome::NotFound => (false, "Code inconnu."),
  };
  Ok(Json(json!({ "success": success, "message": message })).into_response())
}

async fn invalidate<S>(
  state: &AppState<S>,
  participation_id: Uuid,
) -> Result<Response, ApiError>
where
  S: QuizStore,
{
  let updated = state
    .store
    .invalidate_participation(participation_id, Utc::now())
    .await
    .map_err(ApiError::store)?;

  if updated {
    tracing::info!(%participation_id, "participation invalidated");
  }
  Ok(Json(json!({ "success": updated })).into_response())
}
