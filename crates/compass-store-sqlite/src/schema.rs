//! SQL schema for the Compass SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- corresponding_element_id is a weak link: it may dangle, so no FK.
CREATE TABLE IF NOT EXISTS elements (
    element_id               INTEGER PRIMARY KEY,
    name                     TEXT NOT NULL,
    family                   TEXT NOT NULL,   -- 'preference' | 'aptitude'
    dimension                TEXT NOT NULL,
    corresponding_element_id INTEGER
);

CREATE TABLE IF NOT EXISTS scales (
    scale_id   INTEGER PRIMARY KEY,
    element_id INTEGER NOT NULL REFERENCES elements(element_id),
    battery    TEXT NOT NULL,                 -- 'standard' | 'legacy'
    content    TEXT NOT NULL
);

-- One live answer per (user, scale); writes are upserts.
CREATE TABLE IF NOT EXISTS answers (
    user_id     TEXT NOT NULL,
    scale_id    INTEGER NOT NULL REFERENCES scales(scale_id),
    score       INTEGER NOT NULL CHECK (score BETWEEN -2 AND 2),
    answered_at TEXT NOT NULL,                -- ISO 8601 UTC
    PRIMARY KEY (user_id, scale_id)
);

CREATE TABLE IF NOT EXISTS majors (
    major_id  INTEGER PRIMARY KEY,
    code      TEXT NOT NULL UNIQUE,
    name      TEXT NOT NULL,
    brief     TEXT NOT NULL DEFAULT '',
    edu_level TEXT NOT NULL                   -- 'bachelor' | 'associate'
);

CREATE TABLE IF NOT EXISTS major_element_analyses (
    major_id       INTEGER NOT NULL REFERENCES majors(major_id),
    element_id     INTEGER NOT NULL REFERENCES elements(element_id),
    axis           TEXT NOT NULL,
    weight         REAL NOT NULL CHECK (weight > 0),
    convertibility TEXT NOT NULL              -- 'medium' | 'low' | 'none'
);

CREATE TABLE IF NOT EXISTS quadrants (
    quadrant_id        INTEGER PRIMARY KEY,
    preference_obvious INTEGER NOT NULL,
    aptitude_obvious   INTEGER NOT NULL,
    name               TEXT NOT NULL,
    UNIQUE (preference_obvious, aptitude_obvious)
);

CREATE TABLE IF NOT EXISTS portraits (
    portrait_id       INTEGER PRIMARY KEY,
    like_element_id   INTEGER NOT NULL REFERENCES elements(element_id),
    talent_element_id INTEGER NOT NULL REFERENCES elements(element_id),
    quadrant_id       INTEGER NOT NULL REFERENCES quadrants(quadrant_id),
    title             TEXT NOT NULL,
    summary           TEXT NOT NULL DEFAULT '',
    strengths         TEXT NOT NULL DEFAULT '',
    advice            TEXT NOT NULL DEFAULT '',
    UNIQUE (like_element_id, talent_element_id, quadrant_id)
);

CREATE TABLE IF NOT EXISTS portrait_enrichment (
    enrichment_id INTEGER PRIMARY KEY,
    portrait_id   INTEGER NOT NULL REFERENCES portraits(portrait_id),
    kind          TEXT NOT NULL,              -- EnrichmentKind, snake_case
    title         TEXT NOT NULL,
    body          TEXT NOT NULL DEFAULT '',
    ordinal       INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS scales_element_idx     ON scales(element_id);
CREATE INDEX IF NOT EXISTS scales_battery_idx     ON scales(battery);
CREATE INDEX IF NOT EXISTS analyses_major_idx     ON major_element_analyses(major_id);
CREATE INDEX IF NOT EXISTS enrichment_portrait_idx ON portrait_enrichment(portrait_id);

PRAGMA user_version = 1;
";
