//! [`SqliteStore`] — the SQLite implementation of [`QuizStore`].

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng as _;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use billig_core::{
  content::{Carte, ContactMessage, PostInteraction, PostWithCounts, SecretMenu, SocialPost},
  participation::{
    NewParticipation, ParticipationStatus, PrizeTier, QuizParticipation,
  },
  question::{QuestionCategory, QuizQuestion},
  session::{QUESTIONS_PER_SESSION, QuizSession, RecordedAnswer},
  store::{ClaimOutcome, NewInteraction, ParticipationStats, QuizStore},
  stock::{StockLevel, WeeklyStock},
};

use crate::{
  Error, Result,
  encode::{
    RawMessage, RawParticipation, RawPost, RawQuestion, RawSecretMenu,
    RawSession, decode_dt, decode_items, encode_answers, encode_date,
    encode_dt, encode_items, encode_uuid, encode_uuid_list,
  },
  schema::SCHEMA,
};

/// Alphabet for generated prize codes: uppercase alphanumeric, which is what
/// the 6–10 char verification shape accepts.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LENGTH: usize = 8;
const CODE_RETRIES: usize = 32;

// ─── Row mappers ─────────────────────────────────────────────────────────────

fn question_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawQuestion> {
  Ok(RawQuestion {
    question_id: row.get(0)?,
    prompt:      row.get(1)?,
    option_a:    row.get(2)?,
    option_b:    row.get(3)?,
    option_c:    row.get(4)?,
    option_d:    row.get(5)?,
    correct:     row.get(6)?,
    category:    row.get(7)?,
    is_active:   row.get(8)?,
  })
}

const QUESTION_COLS: &str =
  "question_id, prompt, option_a, option_b, option_c, option_d, correct, category, is_active";

fn session_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSession> {
  Ok(RawSession {
    session_id:         row.get(0)?,
    device_fingerprint: row.get(1)?,
    question_ids:       row.get(2)?,
    answers:            row.get(3)?,
    current_index:      row.get(4)?,
    completed:          row.get(5)?,
    expires_at:         row.get(6)?,
    created_at:         row.get(7)?,
  })
}

const SESSION_COLS: &str =
  "session_id, device_fingerprint, question_ids, answers, current_index, completed, expires_at, created_at";

fn participation_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawParticipation> {
  Ok(RawParticipation {
    participation_id:   row.get(0)?,
    first_name:         row.get(1)?,
    email:              row.get(2)?,
    phone:              row.get(3)?,
    device_fingerprint: row.get(4)?,
    score:              row.get(5)?,
    total_questions:    row.get(6)?,
    prize_tier:         row.get(7)?,
    prize_code:         row.get(8)?,
    week_start:         row.get(9)?,
    rgpd_consent:       row.get(10)?,
    claimed:            row.get(11)?,
    claimed_at:         row.get(12)?,
    status:             row.get(13)?,
    created_at:         row.get(14)?,
  })
}

const PARTICIPATION_COLS: &str = "participation_id, first_name, email, phone, device_fingerprint, \
   score, total_questions, prize_tier, prize_code, week_start, \
   rgpd_consent, claimed, claimed_at, status, created_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Billig store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── QuizStore impl ──────────────────────────────────────────────────────────

impl QuizStore for SqliteStore {
  type Error = Error;

  // ── Questions ─────────────────────────────────────────────────────────────

  async fn insert_question(&self, question: QuizQuestion) -> Result<()> {
    let id_str       = encode_uuid(question.question_id);
    let [a, b, c, d] = question.options;
    let correct      = question.correct.as_str();
    let category     = question.category.as_str();
    let is_active    = question.is_active;
    let prompt       = question.prompt;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO questions (
             question_id, prompt, option_a, option_b, option_c, option_d,
             correct, category, is_active
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![id_str, prompt, a, b, c, d, correct, category, is_active],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn active_questions(&self, category: QuestionCategory) -> Result<Vec<QuizQuestion>> {
    let category_str = category.as_str().to_owned();

    let raws: Vec<RawQuestion> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {QUESTION_COLS} FROM questions WHERE category = ?1 AND is_active = 1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![category_str], question_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawQuestion::into_question).collect()
  }

  async fn questions_by_ids(&self, ids: &[Uuid]) -> Result<Vec<QuizQuestion>> {
    let id_strs: Vec<String> = ids.iter().map(|id| encode_uuid(*id)).collect();

    let raws: Vec<RawQuestion> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {QUESTION_COLS} FROM questions WHERE question_id = ?1"
        ))?;
        // One lookup per id keeps the result in input order.
        let mut rows = Vec::with_capacity(id_strs.len());
        for id in &id_strs {
          if let Some(raw) = stmt
            .query_row(rusqlite::params![id], question_row)
            .optional()?
          {
            rows.push(raw);
          }
        }
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawQuestion::into_question).collect()
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn insert_session(&self, session: QuizSession) -> Result<()> {
    let id_str      = encode_uuid(session.session_id);
    let fingerprint = session.device_fingerprint;
    let ids_str     = encode_uuid_list(&session.question_ids)?;
    let answers_str = encode_answers(&session.answers)?;
    let index       = session.current_index as i64;
    let completed   = session.completed;
    let expires_str = encode_dt(session.expires_at);
    let created_str = encode_dt(session.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (
             session_id, device_fingerprint, question_ids, answers,
             current_index, completed, expires_at, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            fingerprint,
            ids_str,
            answers_str,
            index,
            completed,
            expires_str,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn find_active_session(
    &self,
    fingerprint: &str,
    now: DateTime<Utc>,
  ) -> Result<Option<QuizSession>> {
    let fingerprint = fingerprint.to_owned();
    let now_str     = encode_dt(now);

    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SESSION_COLS} FROM sessions
                 WHERE device_fingerprint = ?1 AND completed = 0 AND expires_at > ?2
                 ORDER BY created_at DESC LIMIT 1"
              ),
              rusqlite::params![fingerprint, now_str],
              session_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSession::into_session).transpose()
  }

  async fn get_session(
    &self,
    session_id: Uuid,
    fingerprint: &str,
  ) -> Result<Option<QuizSession>> {
    let id_str      = encode_uuid(session_id);
    let fingerprint = fingerprint.to_owned();

    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SESSION_COLS} FROM sessions
                 WHERE session_id = ?1 AND device_fingerprint = ?2"
              ),
              rusqlite::params![id_str, fingerprint],
              session_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSession::into_session).transpose()
  }

  async fn record_answer(
    &self,
    session_id: Uuid,
    answer: RecordedAnswer,
    new_expires_at: DateTime<Utc>,
  ) -> Result<()> {
    let id_str      = encode_uuid(session_id);
    let answer_json = serde_json::to_string(&answer)?;
    let expires_str = encode_dt(new_expires_at);

    self
      .conn
      .call(move |conn| {
        // json_insert with '$[#]' appends to the array in one statement, so
        // concurrent answers never clobber each other.
        conn.execute(
          "UPDATE sessions
           SET answers       = json_insert(answers, '$[#]', json(?2)),
               current_index = current_index + 1,
               expires_at    = ?3
           WHERE session_id = ?1",
          rusqlite::params![id_str, answer_json, expires_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn complete_session(&self, session_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(session_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE sessions SET completed = 1 WHERE session_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn cancel_sessions(&self, fingerprint: &str) -> Result<u64> {
    let fingerprint = fingerprint.to_owned();

    let cancelled = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE sessions SET completed = 1
           WHERE device_fingerprint = ?1 AND completed = 0",
          rusqlite::params![fingerprint],
        )?;
        Ok(n as u64)
      })
      .await?;
    Ok(cancelled)
  }

  // ── Participations ────────────────────────────────────────────────────────

  async fn insert_participation(
    &self,
    input: NewParticipation,
  ) -> Result<QuizParticipation> {
    let participation = QuizParticipation {
      participation_id:   Uuid::new_v4(),
      first_name:         input.first_name,
      email:              input.email,
      phone:              input.phone,
      device_fingerprint: input.device_fingerprint,
      score:              input.score,
      total_questions:    QUESTIONS_PER_SESSION,
      prize_tier:         input.prize_tier,
      prize_code:         input.prize_code,
      week_start:         input.week_start,
      rgpd_consent:       input.rgpd_consent,
      claimed:            false,
      claimed_at:         None,
      status:             ParticipationStatus::Active,
      created_at:         Utc::now(),
    };

    let id_str      = encode_uuid(participation.participation_id);
    let first_name  = participation.first_name.clone();
    let email       = participation.email.clone();
    let phone       = participation.phone.clone();
    let fingerprint = participation.device_fingerprint.clone();
    let score       = participation.score as i64;
    let total       = participation.total_questions as i64;
    let tier_str    = participation.prize_tier.map(|t| t.as_str().to_owned());
    let code        = participation.prize_code.clone();
    let week_str    = encode_date(participation.week_start);
    let consent     = participation.rgpd_consent;
    let status_str  = participation.status.as_str().to_owned();
    let created_str = encode_dt(participation.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO participations (
             participation_id, first_name, email, phone, device_fingerprint,
             score, total_questions, prize_tier, prize_code, week_start,
             rgpd_consent, claimed, claimed_at, status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0, NULL, ?12, ?13)",
          rusqlite::params![
            id_str,
            first_name,
            email,
            phone,
            fingerprint,
            score,
            total,
            tier_str,
            code,
            week_str,
            consent,
            status_str,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(participation)
  }

  async fn get_participation(
    &self,
    participation_id: Uuid,
  ) -> Result<Option<QuizParticipation>> {
    let id_str = encode_uuid(participation_id);

    let raw: Option<RawParticipation> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PARTICIPATION_COLS} FROM participations WHERE participation_id = ?1"
              ),
              rusqlite::params![id_str],
              participation_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawParticipation::into_participation).transpose()
  }

  async fn find_by_code(&self, code: &str) -> Result<Option<QuizParticipation>> {
    let code = code.to_owned();

    let raw: Option<RawParticipation> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PARTICIPATION_COLS} FROM participations WHERE prize_code = ?1"
              ),
              rusqlite::params![code],
              participation_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawParticipation::into_participation).transpose()
  }

  async fn has_winning_participation(
    &self,
    fingerprint: &str,
    week_start: NaiveDate,
  ) -> Result<bool> {
    let fingerprint = fingerprint.to_owned();
    let week_str    = encode_date(week_start);

    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM participations
               WHERE device_fingerprint = ?1 AND week_start = ?2
                 AND prize_tier IS NOT NULL
               LIMIT 1",
              rusqlite::params![fingerprint, week_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(found)
  }

  async fn has_winning_phone(&self, phone: &str, week_start: NaiveDate) -> Result<bool> {
    let phone    = phone.to_owned();
    let week_str = encode_date(week_start);

    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM participations
               WHERE phone = ?1 AND week_start = ?2 AND prize_tier IS NOT NULL
               LIMIT 1",
              rusqlite::params![phone, week_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(found)
  }

  async fn claim_code(&self, code: &str, now: DateTime<Utc>) -> Result<ClaimOutcome> {
    let code    = code.to_owned();
    let now_str = encode_dt(now);

    let outcome = self
      .conn
      .call(move |conn| {
        let row: Option<(bool, String)> = conn
          .query_row(
            "SELECT claimed, status FROM participations WHERE prize_code = ?1",
            rusqlite::params![code],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?;

        let (claimed, status) = match row {
          Some(r) => r,
          None => return Ok(ClaimOutcome::NotFound),
        };
        if status == "invalidated" {
          return Ok(ClaimOutcome::Invalidated);
        }
        if claimed {
          return Ok(ClaimOutcome::AlreadyClaimed);
        }

        // The guard is repeated in the predicate so a concurrent claim that
        // slipped in between read and write loses cleanly.
        let n = conn.execute(
          "UPDATE participations
           SET claimed = 1, claimed_at = ?2, status = 'claimed'
           WHERE prize_code = ?1 AND claimed = 0 AND status != 'invalidated'",
          rusqlite::params![code, now_str],
        )?;
        Ok(if n == 1 {
          ClaimOutcome::Claimed
        } else {
          ClaimOutcome::AlreadyClaimed
        })
      })
      .await?;
    Ok(outcome)
  }

  async fn invalidate_participation(
    &self,
    participation_id: Uuid,
    now: DateTime<Utc>,
  ) -> Result<bool> {
    let id_str  = encode_uuid(participation_id);
    let now_str = encode_dt(now);

    let updated = self
      .conn
      .call(move |conn| {
        // Invalidation also sets claimed so the code cannot be replayed.
        let n = conn.execute(
          "UPDATE participations
           SET status = 'invalidated', claimed = 1,
               claimed_at = COALESCE(claimed_at, ?2)
           WHERE participation_id = ?1",
          rusqlite::params![id_str, now_str],
        )?;
        Ok(n == 1)
      })
      .await?;
    Ok(updated)
  }

  async fn list_participations(&self, limit: usize) -> Result<Vec<QuizParticipation>> {
    let limit = limit as i64;

    let raws: Vec<RawParticipation> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PARTICIPATION_COLS} FROM participations
           ORDER BY created_at DESC LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit], participation_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawParticipation::into_participation)
      .collect()
  }

  async fn stats(&self) -> Result<ParticipationStats> {
    let stats = self
      .conn
      .call(|conn| {
        conn
          .query_row(
            "SELECT
               COUNT(*),
               COUNT(prize_tier),
               COALESCE(SUM(claimed), 0),
               COALESCE(SUM(status = 'invalidated'), 0)
             FROM participations",
            [],
            |row| {
              Ok(ParticipationStats {
                total:       row.get::<_, i64>(0)? as u64,
                winners:     row.get::<_, i64>(1)? as u64,
                claimed:     row.get::<_, i64>(2)? as u64,
                invalidated: row.get::<_, i64>(3)? as u64,
              })
            },
          )
          .map_err(Into::into)
      })
      .await?;
    Ok(stats)
  }

  // ── Weekly stock ──────────────────────────────────────────────────────────

  async fn ensure_weekly_stock(
    &self,
    week_start: NaiveDate,
    defaults: &[(PrizeTier, u32)],
  ) -> Result<()> {
    let week_str = encode_date(week_start);
    let rows: Vec<(String, i64)> = defaults
      .iter()
      .map(|(tier, total)| (tier.as_str().to_owned(), *total as i64))
      .collect();

    self
      .conn
      .call(move |conn| {
        for (tier, total) in &rows {
          conn.execute(
            "INSERT OR IGNORE INTO weekly_stock (week_start, tier, remaining, total)
             VALUES (?1, ?2, ?3, ?3)",
            rusqlite::params![week_str, tier, total],
          )?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn claim_prize(&self, week_start: NaiveDate, tier: PrizeTier) -> Result<bool> {
    let week_str = encode_date(week_start);
    let tier_str = tier.as_str().to_owned();

    let claimed = self
      .conn
      .call(move |conn| {
        // The predicate makes the decrement atomic: under concurrent calls
        // at remaining = 1, exactly one update matches.
        let n = conn.execute(
          "UPDATE weekly_stock SET remaining = remaining - 1
           WHERE week_start = ?1 AND tier = ?2 AND remaining > 0",
          rusqlite::params![week_str, tier_str],
        )?;
        Ok(n == 1)
      })
      .await?;
    Ok(claimed)
  }

  async fn stock_levels(&self, week_start: NaiveDate) -> Result<WeeklyStock> {
    let week_str = encode_date(week_start);

    let rows: Vec<(String, i64, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT tier, remaining, total FROM weekly_stock WHERE week_start = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![week_str], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let levels = rows
      .into_iter()
      .map(|(tier, remaining, total)| {
        Ok(StockLevel {
          tier:      PrizeTier::parse(&tier).map_err(Error::Core)?,
          remaining: remaining as u32,
          total:     total as u32,
        })
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(WeeklyStock { week_start, levels })
  }

  // ── Prize codes ───────────────────────────────────────────────────────────

  async fn generate_prize_code(&self) -> Result<String> {
    for _ in 0..CODE_RETRIES {
      let candidate: String = {
        let mut rng = rand::thread_rng();
        (0..CODE_LENGTH)
          .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
          .collect()
      };

      let code = candidate.clone();
      let taken = self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT 1 FROM participations WHERE prize_code = ?1",
                rusqlite::params![code],
                |_| Ok(true),
              )
              .optional()?
              .unwrap_or(false),
          )
        })
        .await?;

      if !taken {
        return Ok(candidate);
      }
    }
    Err(Error::CodeSpaceExhausted)
  }

  // ── Content ───────────────────────────────────────────────────────────────

  async fn upsert_secret_menu(&self, menu: SecretMenu) -> Result<()> {
    let id_str      = encode_uuid(menu.menu_id);
    let name        = menu.name;
    let secret_code = menu.secret_code;
    let specials    = encode_items(&menu.specials)?;
    let galettes    = encode_items(&menu.galette_items)?;
    let crepes      = encode_items(&menu.crepe_items)?;
    let from_str    = encode_dt(menu.valid_from);
    let until_str   = encode_dt(menu.valid_until);
    let is_active   = menu.is_active;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO secret_menus (
             menu_id, name, secret_code, specials, galette_items, crepe_items,
             valid_from, valid_until, is_active
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str, name, secret_code, specials, galettes, crepes, from_str,
            until_str, is_active,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn active_secret_menu(&self, now: DateTime<Utc>) -> Result<Option<SecretMenu>> {
    let now_str = encode_dt(now);

    let raw: Option<RawSecretMenu> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT menu_id, name, secret_code, specials, galette_items,
                      crepe_items, valid_from, valid_until, is_active
               FROM secret_menus
               WHERE is_active = 1 AND valid_from <= ?1 AND ?1 < valid_until
               ORDER BY valid_from DESC LIMIT 1",
              rusqlite::params![now_str],
              |row| {
                Ok(RawSecretMenu {
                  menu_id:       row.get(0)?,
                  name:          row.get(1)?,
                  secret_code:   row.get(2)?,
                  specials:      row.get(3)?,
                  galette_items: row.get(4)?,
                  crepe_items:   row.get(5)?,
                  valid_from:    row.get(6)?,
                  valid_until:   row.get(7)?,
                  is_active:     row.get(8)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSecretMenu::into_menu).transpose()
  }

  async fn upsert_carte(&self, carte: Carte) -> Result<()> {
    let galettes    = encode_items(&carte.galette_items)?;
    let crepes      = encode_items(&carte.crepe_items)?;
    let updated_str = encode_dt(carte.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO carte (id, galette_items, crepe_items, updated_at)
           VALUES (1, ?1, ?2, ?3)",
          rusqlite::params![galettes, crepes, updated_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_carte(&self) -> Result<Option<Carte>> {
    let raw: Option<(String, String, String)> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT galette_items, crepe_items, updated_at FROM carte WHERE id = 1",
              [],
              |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(galettes, crepes, updated)| {
        Ok(Carte {
          galette_items: decode_items(&galettes)?,
          crepe_items:   decode_items(&crepes)?,
          updated_at:    decode_dt(&updated)?,
        })
      })
      .transpose()
  }

  async fn insert_social_post(&self, post: SocialPost) -> Result<()> {
    let id_str      = encode_uuid(post.post_id);
    let url         = post.url;
    let network     = post.network;
    let visible     = post.visible;
    let created_str = encode_dt(post.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO social_posts (post_id, url, network, visible, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, url, network, visible, created_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn set_post_visibility(&self, post_id: Uuid, visible: bool) -> Result<bool> {
    let id_str = encode_uuid(post_id);

    let updated = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE social_posts SET visible = ?2 WHERE post_id = ?1",
          rusqlite::params![id_str, visible],
        )?;
        Ok(n == 1)
      })
      .await?;
    Ok(updated)
  }

  async fn list_social_posts(&self, visible_only: bool) -> Result<Vec<PostWithCounts>> {
    let rows: Vec<(RawPost, i64, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT p.post_id, p.url, p.network, p.visible, p.created_at,
             (SELECT COUNT(*) FROM post_interactions i
              WHERE i.post_id = p.post_id AND i.kind = 'like'),
             (SELECT COUNT(*) FROM post_interactions i
              WHERE i.post_id = p.post_id AND i.kind = 'comment')
           FROM social_posts p
           WHERE (?1 = 0 OR p.visible = 1)
           ORDER BY p.created_at DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![visible_only], |row| {
            Ok((
              RawPost {
                post_id:    row.get(0)?,
                url:        row.get(1)?,
                network:    row.get(2)?,
                visible:    row.get(3)?,
                created_at: row.get(4)?,
              },
              row.get(5)?,
              row.get(6)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(raw, likes, comments)| {
        Ok(PostWithCounts {
          post:     raw.into_post()?,
          likes:    likes as u64,
          comments: comments as u64,
        })
      })
      .collect()
  }

  async fn record_interaction(
    &self,
    input: NewInteraction,
  ) -> Result<Option<PostInteraction>> {
    let interaction = PostInteraction {
      interaction_id: Uuid::new_v4(),
      post_id:        input.post_id,
      device_id:      input.device_id,
      kind:           input.kind,
      body:           input.body,
      created_at:     Utc::now(),
    };

    let id_str      = encode_uuid(interaction.interaction_id);
    let post_str    = encode_uuid(interaction.post_id);
    let device_id   = interaction.device_id.clone();
    let kind_str    = interaction.kind.as_str().to_owned();
    let body        = interaction.body.clone();
    let created_str = encode_dt(interaction.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let exists: bool = conn
          .query_row(
            "SELECT 1 FROM social_posts WHERE post_id = ?1 AND visible = 1",
            rusqlite::params![post_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(false);
        }

        conn.execute(
          "INSERT INTO post_interactions (
             interaction_id, post_id, device_id, kind, body, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, post_str, device_id, kind_str, body, created_str],
        )?;
        Ok(true)
      })
      .await?;

    Ok(inserted.then_some(interaction))
  }

  async fn insert_message(&self, message: ContactMessage) -> Result<()> {
    let id_str      = encode_uuid(message.message_id);
    let name        = message.name;
    let email       = message.email;
    let body        = message.body;
    let created_str = encode_dt(message.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO messages (message_id, name, email, body, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, email, body, created_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_messages(&self, limit: usize) -> Result<Vec<ContactMessage>> {
    let limit = limit as i64;

    let raws: Vec<RawMessage> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT message_id, name, email, body, created_at FROM messages
           ORDER BY created_at DESC LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit], |row| {
            Ok(RawMessage {
              message_id: row.get(0)?,
              name:       row.get(1)?,
              email:      row.get(2)?,
              body:       row.get(3)?,
              created_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMessage::into_message).collect()
  }
}
