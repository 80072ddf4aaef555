// Schema lifecycle - table creation, teardown and the stored version stamp.
use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Bumping this recreates the store on the next open.
pub(crate) const SCHEMA_VERSION: i64 = 1;

// Entity tables
pub(crate) const TABLE_ARTWORK: &str = "artwork";
pub(crate) const TABLE_CERTIFICATION: &str = "certification";
pub(crate) const TABLE_CODEC: &str = "codec";
pub(crate) const TABLE_COMPANY: &str = "company";
pub(crate) const TABLE_COUNTRY: &str = "country";
pub(crate) const TABLE_GENRE: &str = "genre";
pub(crate) const TABLE_LANGUAGE: &str = "language";
pub(crate) const TABLE_PERSON: &str = "person";
pub(crate) const TABLE_VIDEO: &str = "video";
pub(crate) const TABLE_VIDEO_FILE: &str = "video_file";
pub(crate) const TABLE_VIDEO_FILE_PART: &str = "video_file_part";
pub(crate) const TABLE_VIDEO_SITE: &str = "video_site";

// Join tables
pub(crate) const TABLE_VIDEO_GENRE: &str = "video_genre";
pub(crate) const TABLE_VIDEO_COMPANY: &str = "video_company";
pub(crate) const TABLE_VIDEO_COUNTRY: &str = "video_country";
pub(crate) const TABLE_VIDEO_LANGUAGE: &str = "video_language";
pub(crate) const TABLE_VIDEO_PERSON: &str = "video_person";

/// Full catalog schema. Natural keys and join pairs carry UNIQUE
/// constraints so a duplicate logical record can never reach a table,
/// whatever the callers do.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS artwork (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL UNIQUE,
    url TEXT NOT NULL DEFAULT '',
    kind TEXT NOT NULL DEFAULT '',
    related_id INTEGER NOT NULL DEFAULT 0,
    foreign_key TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS certification (
    id INTEGER PRIMARY KEY,
    certification TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS codec (
    id INTEGER PRIMARY KEY,
    codec TEXT NOT NULL UNIQUE,
    kind TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS company (
    id INTEGER PRIMARY KEY,
    company TEXT NOT NULL UNIQUE,
    url TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS country (
    id INTEGER PRIMARY KEY,
    country TEXT NOT NULL UNIQUE,
    url TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS genre (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    foreign_key TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS language (
    id INTEGER PRIMARY KEY,
    language TEXT NOT NULL UNIQUE,
    short_code TEXT NOT NULL DEFAULT '',
    medium_code TEXT NOT NULL DEFAULT '',
    long_code TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS person (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    job TEXT NOT NULL,
    foreign_key TEXT NOT NULL DEFAULT '',
    url TEXT NOT NULL DEFAULT '',
    biography TEXT NOT NULL DEFAULT '',
    birthday TEXT NOT NULL DEFAULT '',
    UNIQUE (name, job)
);

CREATE TABLE IF NOT EXISTS video (
    id INTEGER PRIMARY KEY,
    mjb_version TEXT NOT NULL DEFAULT '',
    mjb_revision INTEGER NOT NULL DEFAULT 0,
    mjb_update_date TEXT NOT NULL DEFAULT '',
    base_filename TEXT NOT NULL DEFAULT '',
    title TEXT NOT NULL UNIQUE,
    title_sort TEXT NOT NULL DEFAULT '',
    title_original TEXT NOT NULL DEFAULT '',
    release_date TEXT NOT NULL DEFAULT '',
    rating INTEGER NOT NULL DEFAULT -1,
    top250 INTEGER NOT NULL DEFAULT 0,
    plot TEXT NOT NULL DEFAULT '',
    outline TEXT NOT NULL DEFAULT '',
    quote TEXT NOT NULL DEFAULT '',
    tagline TEXT NOT NULL DEFAULT '',
    runtime INTEGER NOT NULL DEFAULT 0,
    video_type TEXT NOT NULL DEFAULT '',
    season INTEGER NOT NULL DEFAULT 0,
    subtitles TEXT NOT NULL DEFAULT '',
    library_description TEXT NOT NULL DEFAULT '',
    certification_id INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS video_file (
    id INTEGER PRIMARY KEY,
    video_id INTEGER NOT NULL DEFAULT 0,
    file_location TEXT NOT NULL UNIQUE,
    file_url TEXT NOT NULL DEFAULT '',
    container TEXT NOT NULL DEFAULT '',
    audio_channels INTEGER NOT NULL DEFAULT 0,
    video_codec_id INTEGER NOT NULL DEFAULT 0,
    audio_codec_id INTEGER NOT NULL DEFAULT 0,
    resolution TEXT NOT NULL DEFAULT '',
    video_source TEXT NOT NULL DEFAULT '',
    video_output TEXT NOT NULL DEFAULT '',
    aspect TEXT NOT NULL DEFAULT '',
    fps REAL NOT NULL DEFAULT 0,
    file_date TEXT NOT NULL DEFAULT '',
    file_size INTEGER NOT NULL DEFAULT 0,
    number_parts INTEGER NOT NULL DEFAULT 0,
    first_part INTEGER NOT NULL DEFAULT 0,
    last_part INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_video_file_video_id ON video_file(video_id);

CREATE TABLE IF NOT EXISTS video_file_part (
    id INTEGER PRIMARY KEY,
    file_id INTEGER NOT NULL DEFAULT 0,
    part INTEGER NOT NULL DEFAULT 0,
    title TEXT NOT NULL DEFAULT '',
    plot TEXT NOT NULL DEFAULT '',
    season INTEGER NOT NULL DEFAULT 0,
    UNIQUE (file_id, part)
);

CREATE TABLE IF NOT EXISTS video_site (
    video_id INTEGER NOT NULL,
    site TEXT NOT NULL,
    site_id TEXT NOT NULL DEFAULT '',
    UNIQUE (video_id, site)
);

CREATE TABLE IF NOT EXISTS video_genre (
    video_id INTEGER NOT NULL,
    genre_id INTEGER NOT NULL,
    UNIQUE (video_id, genre_id)
);

CREATE TABLE IF NOT EXISTS video_company (
    video_id INTEGER NOT NULL,
    company_id INTEGER NOT NULL,
    UNIQUE (video_id, company_id)
);

CREATE TABLE IF NOT EXISTS video_country (
    video_id INTEGER NOT NULL,
    country_id INTEGER NOT NULL,
    UNIQUE (video_id, country_id)
);

CREATE TABLE IF NOT EXISTS video_language (
    video_id INTEGER NOT NULL,
    language_id INTEGER NOT NULL,
    UNIQUE (video_id, language_id)
);

CREATE TABLE IF NOT EXISTS video_person (
    video_id INTEGER NOT NULL,
    person_id INTEGER NOT NULL,
    UNIQUE (video_id, person_id)
);

CREATE TABLE IF NOT EXISTS db_version (
    version INTEGER PRIMARY KEY,
    stamped_at TEXT NOT NULL
);
"#;

const DROP: &str = r#"
DROP TABLE IF EXISTS artwork;
DROP TABLE IF EXISTS certification;
DROP TABLE IF EXISTS codec;
DROP TABLE IF EXISTS company;
DROP TABLE IF EXISTS country;
DROP TABLE IF EXISTS genre;
DROP TABLE IF EXISTS language;
DROP TABLE IF EXISTS person;
DROP TABLE IF EXISTS video;
DROP TABLE IF EXISTS video_file;
DROP TABLE IF EXISTS video_file_part;
DROP TABLE IF EXISTS video_site;
DROP TABLE IF EXISTS video_genre;
DROP TABLE IF EXISTS video_company;
DROP TABLE IF EXISTS video_country;
DROP TABLE IF EXISTS video_language;
DROP TABLE IF EXISTS video_person;
DROP TABLE IF EXISTS db_version;
"#;

/// Create all tables if absent and stamp the version row.
pub(crate) fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA).map_err(StoreError::schema)?;

    let stamped_at = chrono::Utc::now().to_rfc3339();
    conn.execute("DELETE FROM db_version", [])
        .map_err(StoreError::schema)?;
    conn.execute(
        "INSERT INTO db_version (version, stamped_at) VALUES (?1, ?2)",
        rusqlite::params![SCHEMA_VERSION, stamped_at],
    )
    .map_err(StoreError::schema)?;

    Ok(())
}

/// Remove every catalog table.
pub(crate) fn drop_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(DROP).map_err(StoreError::schema)
}

/// Version stamped into the store, or 0 when the store is fresh or the
/// version table is unreadable.
pub(crate) fn stored_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT version FROM db_version", [], |row| row.get(0))
        .unwrap_or(0)
}

/// Bring the store up to the current schema. An older stamp gets the
/// blunt treatment: drop everything and recreate.
pub(crate) fn ensure_schema(conn: &Connection) -> Result<()> {
    let stored = stored_version(conn);
    if stored < SCHEMA_VERSION {
        if stored > 0 {
            tracing::info!(
                "catalog schema version {stored} is older than {SCHEMA_VERSION}, recreating"
            );
        }
        drop_tables(conn)?;
    }
    create_tables(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_store_gets_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        assert_eq!(stored_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn stale_version_recreates_tables() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();

        conn.execute("INSERT INTO genre (id, name) VALUES (1, 'Action')", [])
            .unwrap();
        conn.execute("UPDATE db_version SET version = 0", []).unwrap();

        ensure_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM genre", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(stored_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn ensure_schema_is_idempotent_at_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();

        conn.execute("INSERT INTO genre (id, name) VALUES (1, 'Action')", [])
            .unwrap();
        ensure_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM genre", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn missing_version_table_reads_as_zero() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(stored_version(&conn), 0);
    }
}
