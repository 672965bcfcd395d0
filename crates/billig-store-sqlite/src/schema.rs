//! SQL schema for the Billig SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS questions (
    question_id TEXT PRIMARY KEY,
    prompt      TEXT NOT NULL,
    option_a    TEXT NOT NULL,
    option_b    TEXT NOT NULL,
    option_c    TEXT NOT NULL,
    option_d    TEXT NOT NULL,
    correct     TEXT NOT NULL,    -- 'A' | 'B' | 'C' | 'D'
    category    TEXT NOT NULL,    -- 'local' | 'food'
    is_active   INTEGER NOT NULL DEFAULT 1
);

-- Short-lived quiz runs. `completed` is set only by submit or reset;
-- reaching answer 10 does not touch it.
CREATE TABLE IF NOT EXISTS sessions (
    session_id         TEXT PRIMARY KEY,
    device_fingerprint TEXT NOT NULL,
    question_ids       TEXT NOT NULL,              -- JSON array of uuids
    answers            TEXT NOT NULL DEFAULT '[]', -- JSON array
    current_index      INTEGER NOT NULL DEFAULT 0,
    completed          INTEGER NOT NULL DEFAULT 0,
    expires_at         TEXT NOT NULL,              -- ISO 8601 UTC, sliding
    created_at         TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS participations (
    participation_id   TEXT PRIMARY KEY,
    first_name         TEXT NOT NULL,
    email              TEXT NOT NULL,
    phone              TEXT NOT NULL,
    device_fingerprint TEXT NOT NULL,
    score              INTEGER NOT NULL,
    total_questions    INTEGER NOT NULL,
    prize_tier         TEXT,
    prize_code         TEXT UNIQUE,
    week_start         TEXT NOT NULL,   -- Monday-aligned date
    rgpd_consent       INTEGER NOT NULL,
    claimed            INTEGER NOT NULL DEFAULT 0,
    claimed_at         TEXT,
    status             TEXT NOT NULL DEFAULT 'active',
    created_at         TEXT NOT NULL
);

-- Decremented only through claim_prize's conditional update.
CREATE TABLE IF NOT EXISTS weekly_stock (
    week_start TEXT NOT NULL,
    tier       TEXT NOT NULL,
    remaining  INTEGER NOT NULL,
    total      INTEGER NOT NULL,
    PRIMARY KEY (week_start, tier),
    CHECK (remaining >= 0)
);

CREATE TABLE IF NOT EXISTS secret_menus (
    menu_id       TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    secret_code   TEXT NOT NULL,
    specials      TEXT NOT NULL,   -- JSON array of items
    galette_items TEXT NOT NULL,
    crepe_items   TEXT NOT NULL,
    valid_from    TEXT NOT NULL,
    valid_until   TEXT NOT NULL,
    is_active     INTEGER NOT NULL
);

-- Single-row table: the public carte is replaced wholesale on edit.
CREATE TABLE IF NOT EXISTS carte (
    id            INTEGER PRIMARY KEY CHECK (id = 1),
    galette_items TEXT NOT NULL,
    crepe_items   TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS social_posts (
    post_id    TEXT PRIMARY KEY,
    url        TEXT NOT NULL,
    network    TEXT NOT NULL,
    visible    INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS post_interactions (
    interaction_id TEXT PRIMARY KEY,
    post_id        TEXT NOT NULL REFERENCES social_posts(post_id),
    device_id      TEXT NOT NULL,
    kind           TEXT NOT NULL,  -- 'like' | 'comment'
    body           TEXT,
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS messages (
    message_id TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    email      TEXT NOT NULL,
    body       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS sessions_fingerprint_idx      ON sessions(device_fingerprint);
CREATE INDEX IF NOT EXISTS participations_week_idx       ON participations(week_start);
CREATE INDEX IF NOT EXISTS participations_phone_idx      ON participations(phone, week_start);
CREATE INDEX IF NOT EXISTS interactions_post_idx         ON post_interactions(post_id);

PRAGMA user_version = 1;
";
