//! The `QuizStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `billig-store-sqlite`).
//! Handlers depend on this abstraction, not on any concrete backend, so the
//! stock-claim atomicity and session lookups can move to a different
//! transactional backend without touching validation or scoring logic.

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  content::{Carte, ContactMessage, InteractionKind, PostInteraction, PostWithCounts, SecretMenu, SocialPost},
  participation::{NewParticipation, PrizeTier, QuizParticipation},
  question::{QuestionCategory, QuizQuestion},
  session::{QuizSession, RecordedAnswer},
  stock::WeeklyStock,
};

// ─── Supporting types ────────────────────────────────────────────────────────

/// Outcome of the conditional claim update on a prize code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
  /// The code transitioned from unclaimed to claimed.
  Claimed,
  /// The code was already claimed; nothing changed.
  AlreadyClaimed,
  /// The code was invalidated by staff; claims are refused.
  Invalidated,
  NotFound,
}

/// Input to [`QuizStore::record_interaction`].
#[derive(Debug, Clone)]
pub struct NewInteraction {
  pub post_id:   Uuid,
  pub device_id: String,
  pub kind:      InteractionKind,
  pub body:      Option<String>,
}

/// Count-only aggregates for the admin stats view. No rows, no PII.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationStats {
  pub total:       u64,
  pub winners:     u64,
  pub claimed:     u64,
  pub invalidated: u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Billig storage backend.
///
/// The original deployment delegated `claim_prize`, `generate_prize_code`
/// and `ensure_weekly_stock` to database stored procedures; here they are
/// trait methods with the same contracts. `claim_prize` is the one operation
/// that must be atomic: under concurrent submissions a tier must never go
/// below zero remaining.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (tokio with `axum`).
pub trait QuizStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Questions ─────────────────────────────────────────────────────────

  /// Persist a question. Staff tooling and the seed helper use this;
  /// request handlers never write questions.
  fn insert_question(
    &self,
    question: QuizQuestion,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All `is_active` questions in one category.
  fn active_questions(
    &self,
    category: QuestionCategory,
  ) -> impl Future<Output = Result<Vec<QuizQuestion>, Self::Error>> + Send + '_;

  /// Fetch full question records, ordered to match the input id order.
  /// Ids not found are silently skipped.
  fn questions_by_ids<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<QuizQuestion>, Self::Error>> + Send + 'a;

  // ── Sessions ──────────────────────────────────────────────────────────

  fn insert_session(
    &self,
    session: QuizSession,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The fingerprint's non-completed, non-expired session, if any. At most
  /// one exists at a time.
  fn find_active_session<'a>(
    &'a self,
    fingerprint: &'a str,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<QuizSession>, Self::Error>> + Send + 'a;

  /// Load by id and fingerprint together; a fingerprint mismatch reads as
  /// not-found.
  fn get_session<'a>(
    &'a self,
    session_id: Uuid,
    fingerprint: &'a str,
  ) -> impl Future<Output = Result<Option<QuizSession>, Self::Error>> + Send + 'a;

  /// Append an answer, advance the cursor, and slide the expiry forward to
  /// `new_expires_at`.
  fn record_answer(
    &self,
    session_id: Uuid,
    answer: RecordedAnswer,
    new_expires_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Set the `completed` flag. Called by the submission handler, never by
  /// the answer flow.
  fn complete_session(
    &self,
    session_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Soft-cancel: mark every open session for the fingerprint completed
  /// without scoring. Returns the number of sessions cancelled.
  fn cancel_sessions<'a>(
    &'a self,
    fingerprint: &'a str,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  // ── Participations ────────────────────────────────────────────────────

  fn insert_participation(
    &self,
    input: NewParticipation,
  ) -> impl Future<Output = Result<QuizParticipation, Self::Error>> + Send + '_;

  fn get_participation(
    &self,
    participation_id: Uuid,
  ) -> impl Future<Output = Result<Option<QuizParticipation>, Self::Error>> + Send + '_;

  fn find_by_code<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<QuizParticipation>, Self::Error>> + Send + 'a;

  /// Whether the fingerprint already has a winning (non-null prize)
  /// participation for the week. Plain read; the caller's check-then-insert
  /// is best-effort by design.
  fn has_winning_participation<'a>(
    &'a self,
    fingerprint: &'a str,
    week_start: NaiveDate,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Same best-effort check keyed on the normalized phone number.
  fn has_winning_phone<'a>(
    &'a self,
    phone: &'a str,
    week_start: NaiveDate,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Conditional claim: flips `claimed` only when the row is unclaimed and
  /// not invalidated. The guard lives in the update predicate itself so
  /// concurrent double-claims cannot both succeed.
  fn claim_code<'a>(
    &'a self,
    code: &'a str,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<ClaimOutcome, Self::Error>> + Send + 'a;

  /// Mark a participation invalidated AND claimed, so the code can neither
  /// be redeemed nor replayed. Returns `false` if the id is unknown.
  fn invalidate_participation(
    &self,
    participation_id: Uuid,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Newest-first listing for the staff view. `limit` is capped by the
  /// caller (100).
  fn list_participations(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<QuizParticipation>, Self::Error>> + Send + '_;

  fn stats(
    &self,
  ) -> impl Future<Output = Result<ParticipationStats, Self::Error>> + Send + '_;

  // ── Weekly stock ──────────────────────────────────────────────────────

  /// Idempotent upsert: create the week's counter rows if missing, leave
  /// existing rows untouched.
  fn ensure_weekly_stock<'a>(
    &'a self,
    week_start: NaiveDate,
    defaults: &'a [(PrizeTier, u32)],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Atomic decrement. Returns `true` when a unit was taken, `false` when
  /// the tier is exhausted. Must never drive `remaining` below zero under
  /// concurrent calls.
  fn claim_prize(
    &self,
    week_start: NaiveDate,
    tier: PrizeTier,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn stock_levels(
    &self,
    week_start: NaiveDate,
  ) -> impl Future<Output = Result<WeeklyStock, Self::Error>> + Send + '_;

  // ── Prize codes ───────────────────────────────────────────────────────

  /// A fresh 8-char uppercase alphanumeric code, unique across all
  /// participations ever recorded.
  fn generate_prize_code(
    &self,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;

  // ── Content ───────────────────────────────────────────────────────────

  fn upsert_secret_menu(
    &self,
    menu: SecretMenu,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The menu that is active and within its validity window at `now`.
  fn active_secret_menu(
    &self,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<SecretMenu>, Self::Error>> + Send + '_;

  /// Replace the public carte wholesale.
  fn upsert_carte(
    &self,
    carte: Carte,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_carte(
    &self,
  ) -> impl Future<Output = Result<Option<Carte>, Self::Error>> + Send + '_;

  fn insert_social_post(
    &self,
    post: SocialPost,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Returns `false` if the post id is unknown.
  fn set_post_visibility(
    &self,
    post_id: Uuid,
    visible: bool,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn list_social_posts(
    &self,
    visible_only: bool,
  ) -> impl Future<Output = Result<Vec<PostWithCounts>, Self::Error>> + Send + '_;

  /// Returns `None` when the target post does not exist.
  fn record_interaction(
    &self,
    input: NewInteraction,
  ) -> impl Future<Output = Result<Option<PostInteraction>, Self::Error>> + Send + '_;

  fn insert_message(
    &self,
    message: ContactMessage,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Newest-first.
  fn list_messages(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<ContactMessage>, Self::Error>> + Send + '_;
}
