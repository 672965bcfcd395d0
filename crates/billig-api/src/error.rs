//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure leaves the server as a uniform `{error, message}` envelope:
//! a stable machine code the front-end switches on, plus a short French
//! message. Validation and policy failures are 400, auth is 401, anything
//! unexpected is an opaque 500 — store detail is logged, never surfaced.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  // ── Input validation ────────────────────────────────────────────────
  #[error("invalid fingerprint")]
  InvalidFingerprint,
  #[error("invalid answer letter")]
  InvalidAnswer,
  #[error("invalid question index")]
  InvalidQuestion,
  #[error("missing fields")]
  MissingFields,
  #[error("unreadable request body")]
  InvalidBody,
  #[error("rgpd consent required")]
  RgpdRequired,
  #[error("invalid name")]
  InvalidName,
  #[error("invalid email")]
  InvalidEmail,
  #[error("invalid phone")]
  InvalidPhone,
  #[error("invalid code format")]
  InvalidCode,
  #[error("invalid secret menu payload")]
  InvalidMenu,

  // ── State / policy ──────────────────────────────────────────────────
  #[error("already won this week")]
  AlreadyWon,
  #[error("not enough questions")]
  NotEnoughQuestions,
  #[error("session not found")]
  InvalidSession,
  #[error("session expired")]
  SessionExpired,
  #[error("already submitted")]
  AlreadySubmitted,
  #[error("phone already won this week")]
  PhoneAlreadyWon,
  #[error("post not found")]
  PostNotFound,

  // ── Auth ────────────────────────────────────────────────────────────
  #[error("unauthorized")]
  Unauthorized,

  // ── Unexpected ──────────────────────────────────────────────────────
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap any backend error. Detail is kept for server-side logging only.
  pub fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    Self::Store(Box::new(e))
  }

  /// The stable machine code in the error envelope.
  pub fn code(&self) -> &'static str {
    match self {
      Self::InvalidFingerprint => "invalid_fingerprint",
      Self::InvalidAnswer => "invalid_answer",
      Self::InvalidQuestion => "invalid_question",
      Self::MissingFields => "missing_fields",
      Self::InvalidBody => "invalid_body",
      Self::RgpdRequired => "rgpd_required",
      Self::InvalidName => "invalid_name",
      Self::InvalidEmail => "invalid_email",
      Self::InvalidPhone => "invalid_phone",
      Self::InvalidCode => "invalid_code",
      Self::InvalidMenu => "invalid_menu",
      Self::AlreadyWon => "already_won",
      Self::NotEnoughQuestions => "not_enough_questions",
      Self::InvalidSession => "invalid_session",
      Self::SessionExpired => "session_expired",
      Self::AlreadySubmitted => "already_submitted",
      Self::PhoneAlreadyWon => "phone_already_won",
      Self::PostNotFound => "post_not_found",
      Self::Unauthorized => "unauthorized",
      Self::Store(_) => "server_error",
    }
  }

  /// The human message shown by the front-end.
  pub fn message(&self) -> &'static str {
    match self {
      Self::InvalidFingerprint => "Empreinte d'appareil invalide.",
      Self::InvalidAnswer => "La réponse doit être A, B, C ou D.",
      Self::InvalidQuestion => "Numéro de question invalide.",
      Self::MissingFields => "Tous les champs sont obligatoires.",
      Self::InvalidBody => "Corps de requête illisible.",
      Self::RgpdRequired => "Le consentement RGPD est obligatoire.",
      Self::InvalidName => "Prénom invalide.",
      Self::InvalidEmail => "Adresse e-mail invalide.",
      Self::InvalidPhone => "Numéro de téléphone invalide.",
      Self::InvalidCode => "Format de code invalide.",
      Self::InvalidMenu => "Contenu du menu secret invalide.",
      Self::AlreadyWon => "Vous avez déjà gagné cette semaine.",
      Self::NotEnoughQuestions => "Pas assez de questions disponibles.",
      Self::InvalidSession => "Session introuvable.",
      Self::SessionExpired => "La session a expiré, veuillez recommencer.",
      Self::AlreadySubmitted => "Ce quiz a déjà été validé.",
      Self::PhoneAlreadyWon => "Ce numéro de téléphone a déjà gagné cette semaine.",
      Self::PostNotFound => "Publication introuvable.",
      Self::Unauthorized => "Mot de passe administrateur incorrect.",
      Self::Store(_) => "Une erreur interne est survenue.",
    }
  }

  fn status(&self) -> StatusCode {
    match self {
      Self::Unauthorized => StatusCode::UNAUTHORIZED,
      Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
      _ => StatusCode::BAD_REQUEST,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    if let Self::Store(e) = &self {
      // Full detail stays server-side; the client sees an opaque code.
      tracing::error!(error = %e, "store error while handling request");
    }
    (
      self.status(),
      Json(json!({ "error": self.code(), "message": self.message() })),
    )
      .into_response()
  }
}
