//! HTTP layer for the Billig quiz backend.
//!
//! Exposes an axum [`Router`] with the public quiz, prize and content
//! endpoints plus the password-gated admin endpoint, backed by any
//! [`QuizStore`].

pub mod error;
pub mod extract;
pub mod handlers;
pub mod redact;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  http::{HeaderValue, Method, header},
  routing::post,
};
use billig_core::store::QuizStore;
use serde::Deserialize;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `BILLIG_*` environment.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  pub admin_password: String,
  /// Exact front-end origin for CORS. `None` means any origin, which is
  /// what the embedded dev front-end needs.
  pub cors_origin:    Option<String>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: QuizStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`]. Every endpoint is `POST` + JSON.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: QuizStore + Clone + Send + Sync + 'static,
{
  let cors = match state
    .config
    .cors_origin
    .as_deref()
    .and_then(|o| o.parse::<HeaderValue>().ok())
  {
    Some(origin) => CorsLayer::new().allow_origin(origin),
    None => CorsLayer::new().allow_origin(Any),
  }
  .allow_methods([Method::POST, Method::OPTIONS])
  .allow_headers([header::CONTENT_TYPE]);

  Router::new()
    .route("/api/quiz/session", post(handlers::session::handler::<S>))
    .route("/api/quiz/submit",  post(handlers::submit::handler::<S>))
    .route("/api/prize/verify", post(handlers::verify::handler::<S>))
    .route("/api/carte",        post(handlers::carte::handler::<S>))
    .route("/api/secret-menu",  post(handlers::secret_menu::handler::<S>))
    .route("/api/social",       post(handlers::social::handler::<S>))
    .route("/api/contact",      post(handlers::contact::handler::<S>))
    .route("/api/admin",        post(handlers::admin::handler::<S>))
    .layer(cors)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use billig_core::{
    participation::PrizeTier,
    question::{AnswerLetter, QuestionCategory, QuizQuestion},
    session::{QuizSession, answer_window},
    store::QuizStore as _,
    week::current_week_start,
  };
  use billig_store_sqlite::SqliteStore;
  use chrono::{Duration, Utc};
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  const ADMIN_PASSWORD: &str = "kouign-amann";
  const FP: &str = "device-fingerprint-1";

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      store:  Arc::new(store),
      config: Arc::new(ServerConfig {
        host:           "127.0.0.1".to_string(),
        port:           8080,
        store_path:     PathBuf::from(":memory:"),
        admin_password: ADMIN_PASSWORD.to_string(),
        cors_origin:    None,
      }),
    }
  }

  fn question(prompt: &str, category: QuestionCategory) -> QuizQuestion {
    QuizQuestion {
      question_id: Uuid::new_v4(),
      prompt:      prompt.to_string(),
      options:     [
        "Bonne réponse".to_string(),
        "Mauvaise réponse".to_string(),
        "Autre réponse".to_string(),
        "Encore une autre".to_string(),
      ],
      correct:     AnswerLetter::A,
      category,
      is_active:   true,
    }
  }

  /// 8 local + 2 food questions, all with `A` as the right answer.
  async fn seed_questions(state: &AppState<SqliteStore>) {
    for i in 0..8 {
      let q = question(&format!("Question locale {i}"), QuestionCategory::Local);
      state.store.insert_question(q).await.unwrap();
    }
    for i in 0..2 {
      let q = question(&format!("Question cuisine {i}"), QuestionCategory::Food);
      state.store.insert_question(q).await.unwrap();
    }
  }

  async fn post(
    state: AppState<SqliteStore>,
    uri: &str,
    body: Value,
  ) -> axum::response::Response {
    let req = Request::builder()
      .method("POST")
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  /// `body` carries the action tag and fields; the password is merged in.
  async fn admin(
    state: AppState<SqliteStore>,
    password: &str,
    mut body: Value,
  ) -> axum::response::Response {
    body["adminPassword"] = json!(password);
    post(state, "/api/admin", body).await
  }

  /// Run a full session for `fp`, answering `correct` questions right and
  /// the rest wrong. Returns the session id.
  async fn run_quiz(state: &AppState<SqliteStore>, fp: &str, correct: usize) -> String {
    let resp = post(
      state.clone(),
      "/api/quiz/session",
      json!({ "action": "start", "deviceFingerprint": fp }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let session_id = body["session"]["sessionId"].as_str().unwrap().to_string();

    for index in 0..10 {
      let answer = if index < correct { "A" } else { "B" };
      let resp = post(
        state.clone(),
        "/api/quiz/session",
        json!({
          "action":            "answer",
          "sessionId":         session_id,
          "deviceFingerprint": fp,
          "answer":            answer,
          "questionIndex":     index,
        }),
      )
      .await;
      assert_eq!(resp.status(), StatusCode::OK);
      let body = body_json(resp).await;
      assert_eq!(body["isCorrect"].as_bool().unwrap(), index < correct);
    }
    session_id
  }

  fn submit_body(session_id: &str, fp: &str, phone: &str) -> Value {
    json!({
      "sessionId":         session_id,
      "deviceFingerprint": fp,
      "firstName":         "Gwenn",
      "email":             "gwenn@example.com",
      "phone":             phone,
      "rgpdConsent":       true,
    })
  }

  // ── Session lifecycle ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn start_rejects_malformed_fingerprint() {
    let state = make_state().await;
    let resp = post(
      state,
      "/api/quiz/session",
      json!({ "action": "start", "deviceFingerprint": "a!" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "invalid_fingerprint");
  }

  #[tokio::test]
  async fn start_with_empty_question_pool_is_rejected() {
    let state = make_state().await;
    let resp = post(
      state,
      "/api/quiz/session",
      json!({ "action": "start", "deviceFingerprint": FP }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "not_enough_questions");
  }

  #[tokio::test]
  async fn start_twice_returns_the_same_open_session() {
    let state = make_state().await;
    seed_questions(&state).await;

    let first = body_json(
      post(
        state.clone(),
        "/api/quiz/session",
        json!({ "action": "start", "deviceFingerprint": FP }),
      )
      .await,
    )
    .await;
    let second = body_json(
      post(
        state,
        "/api/quiz/session",
        json!({ "action": "start", "deviceFingerprint": FP }),
      )
      .await,
    )
    .await;

    assert_eq!(first["session"]["sessionId"], second["session"]["sessionId"]);
    let questions = first["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 10);
    // The wire view must never carry the answer key.
    assert!(questions.iter().all(|q| q.get("correct").is_none()));
  }

  #[tokio::test]
  async fn answer_judges_and_reveals_the_correct_letter() {
    let state = make_state().await;
    seed_questions(&state).await;
    let body = body_json(
      post(
        state.clone(),
        "/api/quiz/session",
        json!({ "action": "start", "deviceFingerprint": FP }),
      )
      .await,
    )
    .await;
    let session_id = body["session"]["sessionId"].as_str().unwrap();

    let right = body_json(
      post(
        state.clone(),
        "/api/quiz/session",
        json!({
          "action":            "answer",
          "sessionId":         session_id,
          "deviceFingerprint": FP,
          "answer":            "A",
          "questionIndex":     0,
        }),
      )
      .await,
    )
    .await;
    assert_eq!(right["isCorrect"], true);
    assert_eq!(right["correctAnswer"], "A");

    let wrong = body_json(
      post(
        state,
        "/api/quiz/session",
        json!({
          "action":            "answer",
          "sessionId":         session_id,
          "deviceFingerprint": FP,
          "answer":            "C",
          "questionIndex":     1,
        }),
      )
      .await,
    )
    .await;
    assert_eq!(wrong["isCorrect"], false);
    assert_eq!(wrong["correctAnswer"], "A");
  }

  #[tokio::test]
  async fn answer_validation_failures_never_touch_the_session() {
    let state = make_state().await;
    seed_questions(&state).await;
    let body = body_json(
      post(
        state.clone(),
        "/api/quiz/session",
        json!({ "action": "start", "deviceFingerprint": FP }),
      )
      .await,
    )
    .await;
    let session_id = body["session"]["sessionId"].as_str().unwrap();

    for (answer, index, expected) in [
      ("E", 0, "invalid_answer"),
      ("a", 0, "invalid_answer"),
      ("A", 10, "invalid_question"),
      ("A", -1, "invalid_question"),
    ] {
      let resp = post(
        state.clone(),
        "/api/quiz/session",
        json!({
          "action":            "answer",
          "sessionId":         session_id,
          "deviceFingerprint": FP,
          "answer":            answer,
          "questionIndex":     index,
        }),
      )
      .await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
      assert_eq!(body_json(resp).await["error"], expected);
    }

    // The restart still hands back an untouched session.
    let again = body_json(
      post(
        state,
        "/api/quiz/session",
        json!({ "action": "start", "deviceFingerprint": FP }),
      )
      .await,
    )
    .await;
    assert_eq!(again["session"]["answers"].as_array().unwrap().len(), 0);
  }

  #[tokio::test]
  async fn an_index_is_only_answerable_once() {
    let state = make_state().await;
    seed_questions(&state).await;
    let body = body_json(
      post(
        state.clone(),
        "/api/quiz/session",
        json!({ "action": "start", "deviceFingerprint": FP }),
      )
      .await,
    )
    .await;
    let session_id = body["session"]["sessionId"].as_str().unwrap().to_string();

    let answer = json!({
      "action":            "answer",
      "sessionId":         session_id,
      "deviceFingerprint": FP,
      "answer":            "A",
      "questionIndex":     0,
    });
    let resp = post(state.clone(), "/api/quiz/session", answer.clone()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // The first response revealed the correct letter; replaying the same
    // index must not accumulate further correct answers.
    for _ in 0..10 {
      let resp = post(state.clone(), "/api/quiz/session", answer.clone()).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
      assert_eq!(body_json(resp).await["error"], "invalid_question");
    }

    let submitted = body_json(
      post(
        state,
        "/api/quiz/submit",
        submit_body(&session_id, FP, "0612345678"),
      )
      .await,
    )
    .await;
    assert_eq!(submitted["score"], 1);
    assert_eq!(submitted["percentage"], 10);
    assert!(submitted["prizeWon"].is_null());
  }

  #[tokio::test]
  async fn answers_past_the_window_report_an_expired_session() {
    let state = make_state().await;
    let opened = Utc::now() - answer_window() - Duration::seconds(30);
    let session =
      QuizSession::new(FP.to_string(), vec![Uuid::new_v4(); 10], opened);
    state.store.insert_session(session.clone()).await.unwrap();

    let resp = post(
      state,
      "/api/quiz/session",
      json!({
        "action":            "answer",
        "sessionId":         session.session_id,
        "deviceFingerprint": FP,
        "answer":            "A",
        "questionIndex":     0,
      }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "session_expired");
  }

  // ── Submission and prizes ───────────────────────────────────────────────────

  #[tokio::test]
  async fn perfect_score_wins_the_top_tier() {
    let state = make_state().await;
    seed_questions(&state).await;
    let session_id = run_quiz(&state, FP, 10).await;

    let resp = post(
      state,
      "/api/quiz/submit",
      submit_body(&session_id, FP, "0612345678"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["score"], 10);
    assert_eq!(body["percentage"], 100);
    assert_eq!(body["prizeWon"], "Formule Complète");

    let code = body["prizeCode"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));

    // One Formule Complète gone from this week's stock.
    assert_eq!(body["stock"]["formuleComplete"], 2);
  }

  #[tokio::test]
  async fn lower_scores_map_to_lower_tiers() {
    for (correct, prize) in [(9, json!("Galette")), (8, json!("Crêpe")), (7, Value::Null)] {
      let state = make_state().await;
      seed_questions(&state).await;
      let session_id = run_quiz(&state, FP, correct).await;

      let body = body_json(
        post(
          state,
          "/api/quiz/submit",
          submit_body(&session_id, FP, "0612345678"),
        )
        .await,
      )
      .await;
      assert_eq!(body["score"], correct);
      assert_eq!(body["prizeWon"], prize, "score {correct}");
      assert_eq!(body["prizeCode"].is_null(), prize.is_null());
    }
  }

  #[tokio::test]
  async fn submit_validates_consent_and_contact_details() {
    let state = make_state().await;
    seed_questions(&state).await;
    let session_id = run_quiz(&state, FP, 10).await;

    let mut no_consent = submit_body(&session_id, FP, "0612345678");
    no_consent["rgpdConsent"] = json!(false);
    let resp = post(state.clone(), "/api/quiz/submit", no_consent).await;
    assert_eq!(body_json(resp).await["error"], "rgpd_required");

    let mut bad_email = submit_body(&session_id, FP, "0612345678");
    bad_email["email"] = json!("not-an-email");
    let resp = post(state.clone(), "/api/quiz/submit", bad_email).await;
    assert_eq!(body_json(resp).await["error"], "invalid_email");

    let mut bad_phone = submit_body(&session_id, FP, "0612345678");
    bad_phone["phone"] = json!("12345");
    let resp = post(state.clone(), "/api/quiz/submit", bad_phone).await;
    assert_eq!(body_json(resp).await["error"], "invalid_phone");

    // All rejections left the session open; a correct submission still works.
    let resp = post(
      state,
      "/api/quiz/submit",
      submit_body(&session_id, FP, "0612345678"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn undeserialisable_bodies_stay_in_the_error_envelope() {
    let state = make_state().await;
    seed_questions(&state).await;
    let session_id = run_quiz(&state, FP, 10).await;

    // An absent required field must come back as the usual 400 envelope,
    // never as the extractor's plain-text 422.
    let mut body = submit_body(&session_id, FP, "0612345678");
    body.as_object_mut().unwrap().remove("firstName");
    let resp = post(state.clone(), "/api/quiz/submit", body).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "missing_fields");
    assert!(body["message"].is_string());

    // Same contract for JSON that does not parse at all.
    let req = Request::builder()
      .method("POST")
      .uri("/api/quiz/submit")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{"))
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "invalid_body");
  }

  #[tokio::test]
  async fn double_submit_is_rejected() {
    let state = make_state().await;
    seed_questions(&state).await;
    let session_id = run_quiz(&state, FP, 7).await;

    let first = post(
      state.clone(),
      "/api/quiz/submit",
      submit_body(&session_id, FP, "0612345678"),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post(
      state,
      "/api/quiz/submit",
      submit_body(&session_id, FP, "0612345678"),
    )
    .await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(second).await["error"], "already_submitted");
  }

  #[tokio::test]
  async fn winner_cannot_restart_the_same_week() {
    let state = make_state().await;
    seed_questions(&state).await;
    let session_id = run_quiz(&state, FP, 10).await;
    post(
      state.clone(),
      "/api/quiz/submit",
      submit_body(&session_id, FP, "0612345678"),
    )
    .await;

    let resp = post(
      state,
      "/api/quiz/session",
      json!({ "action": "start", "deviceFingerprint": FP }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "already_won");
  }

  #[tokio::test]
  async fn same_phone_cannot_win_twice_in_a_week() {
    let state = make_state().await;
    seed_questions(&state).await;

    let first = run_quiz(&state, FP, 10).await;
    post(
      state.clone(),
      "/api/quiz/submit",
      submit_body(&first, FP, "06 12 34 56 78"),
    )
    .await;

    // Different device, same number once normalised.
    let fp2 = "device-fingerprint-2";
    let second = run_quiz(&state, fp2, 10).await;
    let resp = post(
      state,
      "/api/quiz/submit",
      submit_body(&second, fp2, "0612345678"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "phone_already_won");
  }

  #[tokio::test]
  async fn exhausted_stock_downgrades_a_win_to_a_loss() {
    let state = make_state().await;
    seed_questions(&state).await;

    // Zero stock seeded first wins over the defaults.
    let week = current_week_start(Utc::now());
    state
      .store
      .ensure_weekly_stock(
        week,
        &[
          (PrizeTier::FormuleComplete, 0),
          (PrizeTier::Galette, 0),
          (PrizeTier::Crepe, 0),
        ],
      )
      .await
      .unwrap();

    let session_id = run_quiz(&state, FP, 10).await;
    let body = body_json(
      post(
        state,
        "/api/quiz/submit",
        submit_body(&session_id, FP, "0612345678"),
      )
      .await,
    )
    .await;
    assert_eq!(body["success"], true);
    assert_eq!(body["score"], 10);
    assert!(body["prizeWon"].is_null());
    assert!(body["prizeCode"].is_null());
  }

  // ── Verification and claiming ───────────────────────────────────────────────

  #[tokio::test]
  async fn prize_code_round_trip_verify_then_claim() {
    let state = make_state().await;
    seed_questions(&state).await;
    let session_id = run_quiz(&state, FP, 10).await;
    let submitted = body_json(
      post(
        state.clone(),
        "/api/quiz/submit",
        submit_body(&session_id, FP, "0612345678"),
      )
      .await,
    )
    .await;
    let code = submitted["prizeCode"].as_str().unwrap().to_string();

    let public = body_json(
      post(state.clone(), "/api/prize/verify", json!({ "code": code })).await,
    )
    .await;
    assert_eq!(public["valid"], true);
    assert_eq!(public["firstName"], "Gwenn");
    assert_eq!(public["prize"], "Formule Complète");
    assert_eq!(public["claimed"], false);
    // PII never crosses the public endpoint.
    assert!(public.get("email").is_none());
    assert!(public.get("phone").is_none());

    let claimed = body_json(
      admin(state.clone(), ADMIN_PASSWORD, json!({ "action": "claim", "code": code })).await,
    )
    .await;
    assert_eq!(claimed["success"], true);

    let again = body_json(
      admin(state.clone(), ADMIN_PASSWORD, json!({ "action": "claim", "code": code })).await,
    )
    .await;
    assert_eq!(again["success"], false);

    let public = body_json(
      post(state, "/api/prize/verify", json!({ "code": code })).await,
    )
    .await;
    assert_eq!(public["claimed"], true);
    assert!(public["claimedAt"].is_string());
  }

  #[tokio::test]
  async fn unknown_code_is_not_an_error() {
    let state = make_state().await;
    let resp = post(state, "/api/prize/verify", json!({ "code": "ZZZZZZZZ" })).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["valid"], false);
  }

  #[tokio::test]
  async fn invalidated_code_stays_publicly_valid() {
    let state = make_state().await;
    seed_questions(&state).await;
    let session_id = run_quiz(&state, FP, 10).await;
    let submitted = body_json(
      post(
        state.clone(),
        "/api/quiz/submit",
        submit_body(&session_id, FP, "0612345678"),
      )
      .await,
    )
    .await;
    let code = submitted["prizeCode"].as_str().unwrap().to_string();

    let staff = body_json(
      admin(state.clone(), ADMIN_PASSWORD, json!({ "action": "verify", "code": code })).await,
    )
    .await;
    assert_eq!(staff["status"], "active");
    let token = staff["securityToken"].as_str().unwrap();
    assert_eq!(token.len(), 4);
    assert!(token.chars().all(|c| c.is_ascii_digit()));
    let participation_id = staff["participationId"].as_str().unwrap().to_string();

    let invalidated = body_json(
      admin(
        state.clone(),
        ADMIN_PASSWORD,
        json!({ "action": "invalidate", "participationId": participation_id }),
      )
      .await,
    )
    .await;
    assert_eq!(invalidated["success"], true);

    // The public view shows a used code, never the invalidated status.
    let public = body_json(
      post(state.clone(), "/api/prize/verify", json!({ "code": code })).await,
    )
    .await;
    assert_eq!(public["valid"], true);
    assert_eq!(public["claimed"], true);
    assert!(public.get("status").is_none());

    let staff = body_json(
      admin(state.clone(), ADMIN_PASSWORD, json!({ "action": "verify", "code": code })).await,
    )
    .await;
    assert_eq!(staff["status"], "invalidated");

    let claim = body_json(
      admin(state, ADMIN_PASSWORD, json!({ "action": "claim", "code": code })).await,
    )
    .await;
    assert_eq!(claim["success"], false);
  }

  // ── Admin gate ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admin_rejects_a_wrong_password() {
    let state = make_state().await;
    let resp = admin(state, "wrong", json!({ "action": "stats" })).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["error"], "unauthorized");
  }

  #[tokio::test]
  async fn stats_count_totals_and_winners() {
    let state = make_state().await;
    seed_questions(&state).await;

    let win = run_quiz(&state, FP, 10).await;
    post(
      state.clone(),
      "/api/quiz/submit",
      submit_body(&win, FP, "0612345678"),
    )
    .await;
    let lose = run_quiz(&state, "device-fingerprint-2", 3).await;
    post(
      state.clone(),
      "/api/quiz/submit",
      submit_body(&lose, "device-fingerprint-2", "0698765432"),
    )
    .await;

    let stats = body_json(
      admin(state, ADMIN_PASSWORD, json!({ "action": "stats" })).await,
    )
    .await;
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["winners"], 1);
    assert_eq!(stats["claimed"], 0);
    assert_eq!(stats["invalidated"], 0);
  }

  // ── Secret menu ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn secret_menu_unlocks_with_the_daily_code() {
    let state = make_state().await;
    let now = Utc::now();

    let updated = body_json(
      admin(
        state.clone(),
        ADMIN_PASSWORD,
        json!({
          "action":     "update_secret_menu",
          "name":       "Menu de la semaine",
          "secretCode": "KOUIGN",
          "specials":   [{
            "name":        "Galette du chef",
            "description": "Andouille et oignons confits",
            "priceCents":  1250,
            "mediaUrl":    null,
          }],
          "validFrom":  now - Duration::hours(1),
          "validUntil": now + Duration::hours(23),
        }),
      )
      .await,
    )
    .await;
    assert_eq!(updated["success"], true);

    let denied = body_json(
      post(
        state.clone(),
        "/api/secret-menu",
        json!({ "action": "unlock", "code": "WRONG1" }),
      )
      .await,
    )
    .await;
    assert_eq!(denied["unlocked"], false);

    // Case-insensitive.
    let unlocked = body_json(
      post(
        state,
        "/api/secret-menu",
        json!({ "action": "unlock", "code": "kouign" }),
      )
      .await,
    )
    .await;
    assert_eq!(unlocked["unlocked"], true);
    assert_eq!(unlocked["menu"]["name"], "Menu de la semaine");
    assert_eq!(unlocked["menu"]["specials"][0]["priceCents"], 1250);
  }

  #[tokio::test]
  async fn oversized_secret_menu_is_rejected() {
    let state = make_state().await;
    let now = Utc::now();
    let item = json!({
      "name":        "Crêpe",
      "description": "Beurre sucre",
      "priceCents":  450,
      "mediaUrl":    null,
    });
    let resp = admin(
      state,
      ADMIN_PASSWORD,
      json!({
        "action":     "update_secret_menu",
        "name":       "Trop de plats",
        "secretCode": "KOUIGN",
        "specials":   [item.clone(), item.clone(), item],
        "validFrom":  now,
        "validUntil": now + Duration::hours(1),
      }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "invalid_menu");
  }

  #[tokio::test]
  async fn carte_updates_are_publicly_visible() {
    let state = make_state().await;

    // Before any edit the carte reads as empty.
    let empty = body_json(post(state.clone(), "/api/carte", json!({})).await).await;
    assert!(empty["galetteItems"].as_array().unwrap().is_empty());

    let updated = body_json(
      admin(
        state.clone(),
        ADMIN_PASSWORD,
        json!({
          "action":       "update_carte",
          "galetteItems": [{
            "name":        "Complète",
            "description": "Jambon, œuf, emmental",
            "priceCents":  950,
            "mediaUrl":    null,
          }],
          "crepeItems":   [{
            "name":        "Caramel au beurre salé",
            "description": "Caramel maison",
            "priceCents":  650,
            "mediaUrl":    null,
          }],
        }),
      )
      .await,
    )
    .await;
    assert_eq!(updated["success"], true);

    let carte = body_json(post(state.clone(), "/api/carte", json!({})).await).await;
    assert_eq!(carte["galetteItems"][0]["name"], "Complète");
    assert_eq!(carte["crepeItems"][0]["priceCents"], 650);

    // A nameless item is rejected.
    let resp = admin(
      state,
      ADMIN_PASSWORD,
      json!({
        "action":       "update_carte",
        "galetteItems": [{
          "name":        "  ",
          "description": "",
          "priceCents":  100,
          "mediaUrl":    null,
        }],
      }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "invalid_menu");
  }

  // ── Contact and social ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn contact_message_reaches_the_admin_inbox() {
    let state = make_state().await;
    let resp = post(
      state.clone(),
      "/api/contact",
      json!({
        "name":    "Nolwenn",
        "email":   "nolwenn@example.com",
        "message": "Ouvrez-vous le lundi ?",
      }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let inbox = body_json(
      admin(state, ADMIN_PASSWORD, json!({ "action": "list_messages" })).await,
    )
    .await;
    let messages = inbox["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["name"], "Nolwenn");
    assert_eq!(messages[0]["body"], "Ouvrez-vous le lundi ?");
  }

  #[tokio::test]
  async fn social_likes_count_and_hidden_posts_disappear() {
    let state = make_state().await;
    let created = body_json(
      admin(
        state.clone(),
        ADMIN_PASSWORD,
        json!({
          "action":  "create_social_post",
          "url":     "https://instagram.com/p/abc123",
          "network": "instagram",
        }),
      )
      .await,
    )
    .await;
    let post_id = created["postId"].as_str().unwrap().to_string();

    let liked = body_json(
      post(
        state.clone(),
        "/api/social",
        json!({ "action": "like", "postId": post_id, "deviceId": FP }),
      )
      .await,
    )
    .await;
    assert_eq!(liked["success"], true);

    let listed = body_json(
      post(state.clone(), "/api/social", json!({ "action": "list" })).await,
    )
    .await;
    let posts = listed["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["likes"], 1);
    assert_eq!(posts[0]["comments"], 0);

    admin(
      state.clone(),
      ADMIN_PASSWORD,
      json!({ "action": "set_post_visibility", "postId": post_id, "visible": false }),
    )
    .await;

    let listed = body_json(
      post(state.clone(), "/api/social", json!({ "action": "list" })).await,
    )
    .await;
    assert!(listed["posts"].as_array().unwrap().is_empty());

    // A hidden post refuses interactions like a missing one.
    let resp = post(
      state,
      "/api/social",
      json!({ "action": "like", "postId": post_id, "deviceId": FP }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "post_not_found");
  }
}
