//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings; week identifiers are `YYYY-MM-DD` dates.
//! Question-id lists, answer lists and menu items are compact JSON. UUIDs are
//! hyphenated lowercase strings.

use billig_core::{
  content::{ContactMessage, MenuItem, SecretMenu, SocialPost},
  participation::{ParticipationStatus, PrizeTier, QuizParticipation},
  question::{AnswerLetter, QuestionCategory, QuizQuestion},
  session::{QuizSession, RecordedAnswer},
};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Composite lists ─────────────────────────────────────────────────────────

pub fn encode_uuid_list(ids: &[Uuid]) -> Result<String> {
  Ok(serde_json::to_string(&ids.iter().map(|id| encode_uuid(*id)).collect::<Vec<_>>())?)
}

pub fn decode_uuid_list(s: &str) -> Result<Vec<Uuid>> {
  let raw: Vec<String> = serde_json::from_str(s)?;
  raw.iter().map(|s| decode_uuid(s)).collect()
}

pub fn encode_answers(answers: &[RecordedAnswer]) -> Result<String> {
  Ok(serde_json::to_string(answers)?)
}

pub fn decode_answers(s: &str) -> Result<Vec<RecordedAnswer>> {
  Ok(serde_json::from_str(s)?)
}

pub fn encode_items(items: &[MenuItem]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_items(s: &str) -> Result<Vec<MenuItem>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Raw row types ───────────────────────────────────────────────────────────

/// A `questions` row as read from SQLite, before decoding.
pub struct RawQuestion {
  pub question_id: String,
  pub prompt:      String,
  pub option_a:    String,
  pub option_b:    String,
  pub option_c:    String,
  pub option_d:    String,
  pub correct:     String,
  pub category:    String,
  pub is_active:   bool,
}

impl RawQuestion {
  pub fn into_question(self) -> Result<QuizQuestion> {
    Ok(QuizQuestion {
      question_id: decode_uuid(&self.question_id)?,
      prompt:      self.prompt,
      options:     [self.option_a, self.option_b, self.option_c, self.option_d],
      correct:     AnswerLetter::parse(&self.correct)?,
      category:    QuestionCategory::parse(&self.category)?,
      is_active:   self.is_active,
    })
  }
}

/// A `sessions` row as read from SQLite.
pub struct RawSession {
  pub session_id:         String,
  pub device_fingerprint: String,
  pub question_ids:       String,
  pub answers:            String,
  pub current_index:      i64,
  pub completed:          bool,
  pub expires_at:         String,
  pub created_at:         String,
}

impl RawSession {
  pub fn into_session(self) -> Result<QuizSession> {
    Ok(QuizSession {
      session_id:         decode_uuid(&self.session_id)?,
      device_fingerprint: self.device_fingerprint,
      question_ids:       decode_uuid_list(&self.question_ids)?,
      answers:            decode_answers(&self.answers)?,
      current_index:      self.current_index as usize,
      completed:          self.completed,
      expires_at:         decode_dt(&self.expires_at)?,
      created_at:         decode_dt(&self.created_at)?,
    })
  }
}

/// A `participations` row as read from SQLite.
pub struct RawParticipation {
  pub participation_id:   String,
  pub first_name:         String,
  pub email:              String,
  pub phone:              String,
  pub device_fingerprint: String,
  pub score:              i64,
  pub total_questions:    i64,
  pub prize_tier:         Option<String>,
  pub prize_code:         Option<String>,
  pub week_start:         String,
  pub rgpd_consent:       bool,
  pub claimed:            bool,
  pub claimed_at:         Option<String>,
  pub status:             String,
  pub created_at:         String,
}

impl RawParticipation {
  pub fn into_participation(self) -> Result<QuizParticipation> {
    Ok(QuizParticipation {
      participation_id:   decode_uuid(&self.participation_id)?,
      first_name:         self.first_name,
      email:              self.email,
      phone:              self.phone,
      device_fingerprint: self.device_fingerprint,
      score:              self.score as usize,
      total_questions:    self.total_questions as usize,
      prize_tier:         self
        .prize_tier
        .as_deref()
        .map(PrizeTier::parse)
        .transpose()?,
      prize_code:         self.prize_code,
      week_start:         decode_date(&self.week_start)?,
      rgpd_consent:       self.rgpd_consent,
      claimed:            self.claimed,
      claimed_at:         self.claimed_at.as_deref().map(decode_dt).transpose()?,
      status:             ParticipationStatus::parse(&self.status)?,
      created_at:         decode_dt(&self.created_at)?,
    })
  }
}

/// A `secret_menus` row as read from SQLite.
pub struct RawSecretMenu {
  pub menu_id:       String,
  pub name:          String,
  pub secret_code:   String,
  pub specials:      String,
  pub galette_items: String,
  pub crepe_items:   String,
  pub valid_from:    String,
  pub valid_until:   String,
  pub is_active:     bool,
}

impl RawSecretMenu {
  pub fn into_menu(self) -> Result<SecretMenu> {
    Ok(SecretMenu {
      menu_id:       decode_uuid(&self.menu_id)?,
      name:          self.name,
      secret_code:   self.secret_code,
      specials:      decode_items(&self.specials)?,
      galette_items: decode_items(&self.galette_items)?,
      crepe_items:   decode_items(&self.crepe_items)?,
      valid_from:    decode_dt(&self.valid_from)?,
      valid_until:   decode_dt(&self.valid_until)?,
      is_active:     self.is_active,
    })
  }
}

/// A `social_posts` row as read from SQLite.
pub struct RawPost {
  pub post_id:    String,
  pub url:        String,
  pub network:    String,
  pub visible:    bool,
  pub created_at: String,
}

impl RawPost {
  pub fn into_post(self) -> Result<SocialPost> {
    Ok(SocialPost {
      post_id:    decode_uuid(&self.post_id)?,
      url:        self.url,
      network:    self.network,
      visible:    self.visible,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// A `messages` row as read from SQLite.
pub struct RawMessage {
  pub message_id: String,
  pub name:       String,
  pub email:      String,
  pub body:       String,
  pub created_at: String,
}

impl RawMessage {
  pub fn into_message(self) -> Result<ContactMessage> {
    Ok(ContactMessage {
      message_id: decode_uuid(&self.message_id)?,
      name:       self.name,
      email:      self.email,
      body:       self.body,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
