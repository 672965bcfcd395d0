//! Marketing content entities: the weekly secret menu, social-proof posts,
//! and contact-form messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Secret menu ─────────────────────────────────────────────────────────────

/// A dish on the secret menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
  pub name:        String,
  pub description: String,
  pub price_cents: u32,
  /// Media URL for the item photo, if any.
  pub media_url:   Option<String>,
}

/// The week's hidden menu, unlocked by quiz winners or by entering the
/// secret code. Written only through the admin endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretMenu {
  pub menu_id:       Uuid,
  pub name:          String,
  /// The unlock code handed out as a consolation after every submission.
  pub secret_code:   String,
  /// The two headline dishes.
  pub specials:      Vec<MenuItem>,
  /// Up to three ordinary galettes.
  pub galette_items: Vec<MenuItem>,
  /// Up to three ordinary crêpes.
  pub crepe_items:   Vec<MenuItem>,
  pub valid_from:    DateTime<Utc>,
  pub valid_until:   DateTime<Utc>,
  pub is_active:     bool,
}

impl SecretMenu {
  pub fn is_current(&self, now: DateTime<Utc>) -> bool {
    self.is_active && self.valid_from <= now && now < self.valid_until
  }
}

/// The regular public menu shown on the site, as opposed to the gated
/// [`SecretMenu`]. A single record, replaced wholesale on each staff edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carte {
  pub galette_items: Vec<MenuItem>,
  pub crepe_items:   Vec<MenuItem>,
  pub updated_at:    DateTime<Utc>,
}

// ─── Social posts ────────────────────────────────────────────────────────────

/// A social-network post embedded on the site for social proof.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialPost {
  pub post_id:    Uuid,
  pub url:        String,
  /// Network tag, e.g. `"instagram"` or `"facebook"`.
  pub network:    String,
  pub visible:    bool,
  pub created_at: DateTime<Utc>,
}

/// Public like/comment on a post. `device_id` is a client-generated
/// identifier, not an authenticated principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
  Like,
  Comment,
}

impl InteractionKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Like => "like",
      Self::Comment => "comment",
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInteraction {
  pub interaction_id: Uuid,
  pub post_id:        Uuid,
  pub device_id:      String,
  pub kind:           InteractionKind,
  /// Present only for comments.
  pub body:           Option<String>,
  pub created_at:     DateTime<Utc>,
}

/// A post together with its interaction counts — the display view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostWithCounts {
  #[serde(flatten)]
  pub post:     SocialPost,
  pub likes:    u64,
  pub comments: u64,
}

// ─── Contact messages ────────────────────────────────────────────────────────

/// A message left through the contact form; read from the admin endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
  pub message_id: Uuid,
  pub name:       String,
  pub email:      String,
  pub body:       String,
  pub created_at: DateTime<Utc>,
}
