// Fetch layer - reconstitute value records by id.
//
// An id of 0 returns the default record without querying, and a missing row
// returns the same default record. Callers rely on never seeing an absence
// error here.
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::schema::*;
use crate::error::{Result, StoreError};
use crate::model::*;

fn map_artwork(row: &Row) -> rusqlite::Result<Artwork> {
    Ok(Artwork {
        id: row.get(0)?,
        filename: row.get(1)?,
        url: row.get(2)?,
        kind: row.get(3)?,
        related_id: row.get(4)?,
        foreign_key: row.get(5)?,
    })
}

fn map_certification(row: &Row) -> rusqlite::Result<Certification> {
    Ok(Certification {
        id: row.get(0)?,
        certification: row.get(1)?,
    })
}

fn map_codec(row: &Row) -> rusqlite::Result<Codec> {
    Ok(Codec {
        id: row.get(0)?,
        codec: row.get(1)?,
        kind: row.get(2)?,
    })
}

fn map_company(row: &Row) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        company: row.get(1)?,
        url: row.get(2)?,
    })
}

fn map_country(row: &Row) -> rusqlite::Result<Country> {
    Ok(Country {
        id: row.get(0)?,
        country: row.get(1)?,
        url: row.get(2)?,
    })
}

fn map_genre(row: &Row) -> rusqlite::Result<Genre> {
    Ok(Genre {
        id: row.get(0)?,
        name: row.get(1)?,
        foreign_key: row.get(2)?,
    })
}

fn map_language(row: &Row) -> rusqlite::Result<Language> {
    Ok(Language {
        id: row.get(0)?,
        language: row.get(1)?,
        short_code: row.get(2)?,
        medium_code: row.get(3)?,
        long_code: row.get(4)?,
    })
}

fn map_person(row: &Row) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get(0)?,
        name: row.get(1)?,
        job: row.get(2)?,
        foreign_key: row.get(3)?,
        url: row.get(4)?,
        biography: row.get(5)?,
        birthday: row.get(6)?,
    })
}

fn map_video(row: &Row) -> rusqlite::Result<Video> {
    Ok(Video {
        id: row.get(0)?,
        mjb_version: row.get(1)?,
        mjb_revision: row.get(2)?,
        mjb_update_date: row.get(3)?,
        base_filename: row.get(4)?,
        title: row.get(5)?,
        title_sort: row.get(6)?,
        title_original: row.get(7)?,
        release_date: row.get(8)?,
        rating: row.get(9)?,
        top250: row.get(10)?,
        plot: row.get(11)?,
        outline: row.get(12)?,
        quote: row.get(13)?,
        tagline: row.get(14)?,
        runtime: row.get(15)?,
        video_type: row.get(16)?,
        season: row.get(17)?,
        subtitles: row.get(18)?,
        library_description: row.get(19)?,
        certification_id: row.get(20)?,
    })
}

fn map_video_file(row: &Row) -> rusqlite::Result<VideoFile> {
    Ok(VideoFile {
        id: row.get(0)?,
        video_id: row.get(1)?,
        file_location: row.get(2)?,
        file_url: row.get(3)?,
        container: row.get(4)?,
        audio_channels: row.get(5)?,
        video_codec_id: row.get(6)?,
        audio_codec_id: row.get(7)?,
        resolution: row.get(8)?,
        video_source: row.get(9)?,
        video_output: row.get(10)?,
        aspect: row.get(11)?,
        fps: row.get(12)?,
        file_date: row.get(13)?,
        file_size: row.get(14)?,
        number_parts: row.get(15)?,
        first_part: row.get(16)?,
        last_part: row.get(17)?,
    })
}

fn map_video_file_part(row: &Row) -> rusqlite::Result<VideoFilePart> {
    Ok(VideoFilePart {
        id: row.get(0)?,
        file_id: row.get(1)?,
        part: row.get(2)?,
        title: row.get(3)?,
        plot: row.get(4)?,
        season: row.get(5)?,
    })
}

fn map_video_site(row: &Row) -> rusqlite::Result<VideoSite> {
    Ok(VideoSite {
        video_id: row.get(0)?,
        site: row.get(1)?,
        site_id: row.get(2)?,
    })
}

pub(crate) fn fetch_artwork(conn: &Connection, id: i64) -> Result<Artwork> {
    if id == 0 {
        return Ok(Artwork::default());
    }
    let record = conn
        .query_row(
            "SELECT id, filename, url, kind, related_id, foreign_key
             FROM artwork WHERE id = ?1",
            params![id],
            map_artwork,
        )
        .optional()
        .map_err(StoreError::store(TABLE_ARTWORK))?;
    Ok(record.unwrap_or_default())
}

pub(crate) fn fetch_certification(conn: &Connection, id: i64) -> Result<Certification> {
    if id == 0 {
        return Ok(Certification::default());
    }
    let record = conn
        .query_row(
            "SELECT id, certification FROM certification WHERE id = ?1",
            params![id],
            map_certification,
        )
        .optional()
        .map_err(StoreError::store(TABLE_CERTIFICATION))?;
    Ok(record.unwrap_or_default())
}

pub(crate) fn fetch_codec(conn: &Connection, id: i64) -> Result<Codec> {
    if id == 0 {
        return Ok(Codec::default());
    }
    let record = conn
        .query_row(
            "SELECT id, codec, kind FROM codec WHERE id = ?1",
            params![id],
            map_codec,
        )
        .optional()
        .map_err(StoreError::store(TABLE_CODEC))?;
    Ok(record.unwrap_or_default())
}

pub(crate) fn fetch_company(conn: &Connection, id: i64) -> Result<Company> {
    if id == 0 {
        return Ok(Company::default());
    }
    let record = conn
        .query_row(
            "SELECT id, company, url FROM company WHERE id = ?1",
            params![id],
            map_company,
        )
        .optional()
        .map_err(StoreError::store(TABLE_COMPANY))?;
    Ok(record.unwrap_or_default())
}

pub(crate) fn fetch_country(conn: &Connection, id: i64) -> Result<Country> {
    if id == 0 {
        return Ok(Country::default());
    }
    let record = conn
        .query_row(
            "SELECT id, country, url FROM country WHERE id = ?1",
            params![id],
            map_country,
        )
        .optional()
        .map_err(StoreError::store(TABLE_COUNTRY))?;
    Ok(record.unwrap_or_default())
}

pub(crate) fn fetch_genre(conn: &Connection, id: i64) -> Result<Genre> {
    if id == 0 {
        return Ok(Genre::default());
    }
    let record = conn
        .query_row(
            "SELECT id, name, foreign_key FROM genre WHERE id = ?1",
            params![id],
            map_genre,
        )
        .optional()
        .map_err(StoreError::store(TABLE_GENRE))?;
    Ok(record.unwrap_or_default())
}

pub(crate) fn fetch_language(conn: &Connection, id: i64) -> Result<Language> {
    if id == 0 {
        return Ok(Language::default());
    }
    let record = conn
        .query_row(
            "SELECT id, language, short_code, medium_code, long_code
             FROM language WHERE id = ?1",
            params![id],
            map_language,
        )
        .optional()
        .map_err(StoreError::store(TABLE_LANGUAGE))?;
    Ok(record.unwrap_or_default())
}

pub(crate) fn fetch_person(conn: &Connection, id: i64) -> Result<Person> {
    if id == 0 {
        return Ok(Person::default());
    }
    let record = conn
        .query_row(
            "SELECT id, name, job, foreign_key, url, biography, birthday
             FROM person WHERE id = ?1",
            params![id],
            map_person,
        )
        .optional()
        .map_err(StoreError::store(TABLE_PERSON))?;
    Ok(record.unwrap_or_default())
}

pub(crate) fn fetch_video(conn: &Connection, id: i64) -> Result<Video> {
    if id == 0 {
        return Ok(Video::default());
    }
    let record = conn
        .query_row(
            "SELECT id, mjb_version, mjb_revision, mjb_update_date,
                    base_filename, title, title_sort, title_original,
                    release_date, rating, top250, plot, outline, quote,
                    tagline, runtime, video_type, season, subtitles,
                    library_description, certification_id
             FROM video WHERE id = ?1",
            params![id],
            map_video,
        )
        .optional()
        .map_err(StoreError::store(TABLE_VIDEO))?;
    Ok(record.unwrap_or_default())
}

const VIDEO_FILE_COLUMNS: &str = "id, video_id, file_location, file_url, container, \
     audio_channels, video_codec_id, audio_codec_id, resolution, video_source, \
     video_output, aspect, fps, file_date, file_size, number_parts, first_part, last_part";

pub(crate) fn fetch_video_file(conn: &Connection, id: i64) -> Result<VideoFile> {
    if id == 0 {
        return Ok(VideoFile::default());
    }
    let record = conn
        .query_row(
            &format!("SELECT {VIDEO_FILE_COLUMNS} FROM video_file WHERE id = ?1"),
            params![id],
            map_video_file,
        )
        .optional()
        .map_err(StoreError::store(TABLE_VIDEO_FILE))?;
    Ok(record.unwrap_or_default())
}

/// All files belonging to a video. Rows that reconstitute to id 0 are
/// skipped as malformed.
pub(crate) fn fetch_video_files(conn: &Connection, video_id: i64) -> Result<Vec<VideoFile>> {
    if video_id == 0 {
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {VIDEO_FILE_COLUMNS} FROM video_file WHERE video_id = ?1"
        ))
        .map_err(StoreError::store(TABLE_VIDEO_FILE))?;
    let rows = stmt
        .query_map(params![video_id], map_video_file)
        .map_err(StoreError::store(TABLE_VIDEO_FILE))?;

    let mut files = Vec::new();
    for row in rows {
        let file = row.map_err(StoreError::store(TABLE_VIDEO_FILE))?;
        if file.id > 0 {
            files.push(file);
        }
    }
    Ok(files)
}

pub(crate) fn fetch_video_file_part(conn: &Connection, id: i64) -> Result<VideoFilePart> {
    if id == 0 {
        return Ok(VideoFilePart::default());
    }
    let record = conn
        .query_row(
            "SELECT id, file_id, part, title, plot, season
             FROM video_file_part WHERE id = ?1",
            params![id],
            map_video_file_part,
        )
        .optional()
        .map_err(StoreError::store(TABLE_VIDEO_FILE_PART))?;
    Ok(record.unwrap_or_default())
}

/// All parts of a file, ordered by part number.
pub(crate) fn fetch_video_file_parts(conn: &Connection, file_id: i64) -> Result<Vec<VideoFilePart>> {
    if file_id == 0 {
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare(
            "SELECT id, file_id, part, title, plot, season
             FROM video_file_part WHERE file_id = ?1 ORDER BY part",
        )
        .map_err(StoreError::store(TABLE_VIDEO_FILE_PART))?;
    let rows = stmt
        .query_map(params![file_id], map_video_file_part)
        .map_err(StoreError::store(TABLE_VIDEO_FILE_PART))?;

    let mut parts = Vec::new();
    for row in rows {
        let part = row.map_err(StoreError::store(TABLE_VIDEO_FILE_PART))?;
        if part.id > 0 {
            parts.push(part);
        }
    }
    Ok(parts)
}

pub(crate) fn fetch_video_site(conn: &Connection, video_id: i64, site: &str) -> Result<VideoSite> {
    if video_id == 0 || site.trim().is_empty() {
        return Ok(VideoSite::default());
    }
    let record = conn
        .query_row(
            "SELECT video_id, site, site_id FROM video_site
             WHERE video_id = ?1 AND site = ?2",
            params![video_id, site],
            map_video_site,
        )
        .optional()
        .map_err(StoreError::store(TABLE_VIDEO_SITE))?;
    Ok(record.unwrap_or_default())
}

/// Child ids linked to a video in one of the pair tables.
fn linked_ids(
    conn: &Connection,
    table: &'static str,
    column: &str,
    video_id: i64,
) -> Result<Vec<i64>> {
    if video_id == 0 {
        return Ok(Vec::new());
    }

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {column} FROM {table} WHERE video_id = ?1 ORDER BY {column}"
        ))
        .map_err(StoreError::store(table))?;
    let rows = stmt
        .query_map(params![video_id], |row| row.get(0))
        .map_err(StoreError::store(table))?;

    let mut ids = Vec::new();
    for row in rows {
        ids.push(row.map_err(StoreError::store(table))?);
    }
    Ok(ids)
}

pub(crate) fn genre_ids_for_video(conn: &Connection, video_id: i64) -> Result<Vec<i64>> {
    linked_ids(conn, TABLE_VIDEO_GENRE, "genre_id", video_id)
}

pub(crate) fn company_ids_for_video(conn: &Connection, video_id: i64) -> Result<Vec<i64>> {
    linked_ids(conn, TABLE_VIDEO_COMPANY, "company_id", video_id)
}

pub(crate) fn country_ids_for_video(conn: &Connection, video_id: i64) -> Result<Vec<i64>> {
    linked_ids(conn, TABLE_VIDEO_COUNTRY, "country_id", video_id)
}

pub(crate) fn language_ids_for_video(conn: &Connection, video_id: i64) -> Result<Vec<i64>> {
    linked_ids(conn, TABLE_VIDEO_LANGUAGE, "language_id", video_id)
}

pub(crate) fn person_ids_for_video(conn: &Connection, video_id: i64) -> Result<Vec<i64>> {
    linked_ids(conn, TABLE_VIDEO_PERSON, "person_id", video_id)
}
