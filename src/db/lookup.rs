// Lookup layer - resolve natural keys to surrogate ids. 0 means not found.
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::schema::*;
use crate::error::{Result, StoreError};

/// Resolve a single-column natural key to an id. Blank search terms
/// short-circuit to "not found" without touching the store; matching is
/// exact and case-sensitive.
pub(crate) fn find_id(
    conn: &Connection,
    table: &'static str,
    column: &str,
    value: &str,
) -> Result<i64> {
    if value.trim().is_empty() {
        return Ok(0);
    }

    let id: Option<i64> = conn
        .query_row(
            &format!("SELECT id FROM {table} WHERE {column} = ?1"),
            params![value],
            |row| row.get(0),
        )
        .optional()
        .map_err(StoreError::store(table))?;
    Ok(id.unwrap_or(0))
}

/// Two-column variant for composite natural keys (person name+job).
pub(crate) fn find_id2(
    conn: &Connection,
    table: &'static str,
    column1: &str,
    value1: &str,
    column2: &str,
    value2: &str,
) -> Result<i64> {
    if value1.trim().is_empty() || value2.trim().is_empty() {
        return Ok(0);
    }

    let id: Option<i64> = conn
        .query_row(
            &format!("SELECT id FROM {table} WHERE {column1} = ?1 AND {column2} = ?2"),
            params![value1, value2],
            |row| row.get(0),
        )
        .optional()
        .map_err(StoreError::store(table))?;
    Ok(id.unwrap_or(0))
}

pub(crate) fn artwork_id(conn: &Connection, filename: &str) -> Result<i64> {
    find_id(conn, TABLE_ARTWORK, "filename", filename)
}

pub(crate) fn certification_id(conn: &Connection, certification: &str) -> Result<i64> {
    find_id(conn, TABLE_CERTIFICATION, "certification", certification)
}

pub(crate) fn codec_id(conn: &Connection, codec: &str) -> Result<i64> {
    find_id(conn, TABLE_CODEC, "codec", codec)
}

pub(crate) fn company_id(conn: &Connection, company: &str) -> Result<i64> {
    find_id(conn, TABLE_COMPANY, "company", company)
}

pub(crate) fn country_id(conn: &Connection, country: &str) -> Result<i64> {
    find_id(conn, TABLE_COUNTRY, "country", country)
}

pub(crate) fn genre_id(conn: &Connection, name: &str) -> Result<i64> {
    find_id(conn, TABLE_GENRE, "name", name)
}

pub(crate) fn language_id(conn: &Connection, language: &str) -> Result<i64> {
    find_id(conn, TABLE_LANGUAGE, "language", language)
}

pub(crate) fn person_id(conn: &Connection, name: &str, job: &str) -> Result<i64> {
    find_id2(conn, TABLE_PERSON, "name", name, "job", job)
}

pub(crate) fn video_id(conn: &Connection, title: &str) -> Result<i64> {
    find_id(conn, TABLE_VIDEO, "title", title)
}

pub(crate) fn video_file_id(conn: &Connection, file_location: &str) -> Result<i64> {
    find_id(conn, TABLE_VIDEO_FILE, "file_location", file_location)
}

/// Composite numeric key: (file_id, part).
pub(crate) fn video_file_part_id(conn: &Connection, file_id: i64, part: i32) -> Result<i64> {
    let id: Option<i64> = conn
        .query_row(
            "SELECT id FROM video_file_part WHERE file_id = ?1 AND part = ?2",
            params![file_id, part],
            |row| row.get(0),
        )
        .optional()
        .map_err(StoreError::store(TABLE_VIDEO_FILE_PART))?;
    Ok(id.unwrap_or(0))
}

/// External site id string for (video, site); empty string when absent.
pub(crate) fn video_site_id(conn: &Connection, video_id: i64, site: &str) -> Result<String> {
    if video_id < 1 || site.trim().is_empty() {
        return Ok(String::new());
    }

    let site_id: Option<String> = conn
        .query_row(
            "SELECT site_id FROM video_site WHERE video_id = ?1 AND site = ?2",
            params![video_id, site],
            |row| row.get(0),
        )
        .optional()
        .map_err(StoreError::store(TABLE_VIDEO_SITE))?;
    Ok(site_id.unwrap_or_default())
}

/// Whether a video with this exact title is already stored.
pub(crate) fn video_exists(conn: &Connection, title: &str) -> Result<bool> {
    Ok(video_id(conn, title)? != 0)
}
