// Upsert / update / join layers.
//
// Every upsert is check-then-act: an id of 0 triggers a natural-key lookup
// (reuse the existing id, untouched), otherwise a fresh id is allocated and
// the full record inserted. The Catalog runs each call inside one held lock
// and one transaction, so the check and the act are a single critical
// section; the schema's UNIQUE constraints back that up.
use rusqlite::{params, Connection};
use tracing::debug;

use crate::db::schema::*;
use crate::db::{allocator, lookup};
use crate::error::{Result, StoreError};
use crate::model::*;

/// Delete a row by id. Deleting a row that is not there is not an error.
pub(crate) fn delete_by_id(conn: &Connection, table: &'static str, id: i64) -> Result<()> {
    conn.execute(&format!("DELETE FROM {table} WHERE id = ?1"), params![id])
        .map_err(StoreError::store(table))?;
    Ok(())
}

fn delete_video_site_row(conn: &Connection, video_id: i64, site: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM video_site WHERE video_id = ?1 AND site = ?2",
        params![video_id, site],
    )
    .map_err(StoreError::store(TABLE_VIDEO_SITE))?;
    Ok(())
}

pub(crate) fn upsert_artwork(conn: &Connection, artwork: &Artwork) -> Result<i64> {
    let mut id = artwork.id;
    if id == 0 {
        let existing = lookup::artwork_id(conn, &artwork.filename)?;
        if existing != 0 {
            return Ok(existing);
        }
        id = allocator::next_id(conn, TABLE_ARTWORK)?;
    }

    conn.execute(
        "INSERT INTO artwork (id, filename, url, kind, related_id, foreign_key)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            artwork.filename,
            artwork.url,
            artwork.kind,
            artwork.related_id,
            artwork.foreign_key,
        ],
    )
    .map_err(StoreError::store(TABLE_ARTWORK))?;
    Ok(id)
}

pub(crate) fn upsert_certification(conn: &Connection, cert: &Certification) -> Result<i64> {
    let mut id = cert.id;
    if id == 0 {
        let existing = lookup::certification_id(conn, &cert.certification)?;
        if existing != 0 {
            return Ok(existing);
        }
        id = allocator::next_id(conn, TABLE_CERTIFICATION)?;
    }

    conn.execute(
        "INSERT INTO certification (id, certification) VALUES (?1, ?2)",
        params![id, cert.certification],
    )
    .map_err(StoreError::store(TABLE_CERTIFICATION))?;
    Ok(id)
}

pub(crate) fn upsert_codec(conn: &Connection, codec: &Codec) -> Result<i64> {
    let mut id = codec.id;
    if id == 0 {
        let existing = lookup::codec_id(conn, &codec.codec)?;
        if existing != 0 {
            return Ok(existing);
        }
        id = allocator::next_id(conn, TABLE_CODEC)?;
    }

    conn.execute(
        "INSERT INTO codec (id, codec, kind) VALUES (?1, ?2, ?3)",
        params![id, codec.codec, codec.kind],
    )
    .map_err(StoreError::store(TABLE_CODEC))?;
    Ok(id)
}

pub(crate) fn upsert_company(conn: &Connection, company: &Company) -> Result<i64> {
    let mut id = company.id;
    if id == 0 {
        let existing = lookup::company_id(conn, &company.company)?;
        if existing != 0 {
            return Ok(existing);
        }
        id = allocator::next_id(conn, TABLE_COMPANY)?;
    }

    conn.execute(
        "INSERT INTO company (id, company, url) VALUES (?1, ?2, ?3)",
        params![id, company.company, company.url],
    )
    .map_err(StoreError::store(TABLE_COMPANY))?;
    Ok(id)
}

pub(crate) fn upsert_country(conn: &Connection, country: &Country) -> Result<i64> {
    let mut id = country.id;
    if id == 0 {
        let existing = lookup::country_id(conn, &country.country)?;
        if existing != 0 {
            return Ok(existing);
        }
        id = allocator::next_id(conn, TABLE_COUNTRY)?;
    }

    conn.execute(
        "INSERT INTO country (id, country, url) VALUES (?1, ?2, ?3)",
        params![id, country.country, country.url],
    )
    .map_err(StoreError::store(TABLE_COUNTRY))?;
    Ok(id)
}

pub(crate) fn upsert_genre(conn: &Connection, genre: &Genre) -> Result<i64> {
    let mut id = genre.id;
    if id == 0 {
        let existing = lookup::genre_id(conn, &genre.name)?;
        if existing != 0 {
            return Ok(existing);
        }
        id = allocator::next_id(conn, TABLE_GENRE)?;
    }

    conn.execute(
        "INSERT INTO genre (id, name, foreign_key) VALUES (?1, ?2, ?3)",
        params![id, genre.name, genre.foreign_key],
    )
    .map_err(StoreError::store(TABLE_GENRE))?;
    Ok(id)
}

pub(crate) fn upsert_language(conn: &Connection, language: &Language) -> Result<i64> {
    let mut id = language.id;
    if id == 0 {
        let existing = lookup::language_id(conn, &language.language)?;
        if existing != 0 {
            return Ok(existing);
        }
        id = allocator::next_id(conn, TABLE_LANGUAGE)?;
    }

    conn.execute(
        "INSERT INTO language (id, language, short_code, medium_code, long_code)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            id,
            language.language,
            language.short_code,
            language.medium_code,
            language.long_code,
        ],
    )
    .map_err(StoreError::store(TABLE_LANGUAGE))?;
    Ok(id)
}

pub(crate) fn upsert_person(conn: &Connection, person: &Person) -> Result<i64> {
    let mut id = person.id;
    if id == 0 {
        let existing = lookup::person_id(conn, &person.name, &person.job)?;
        if existing != 0 {
            return Ok(existing);
        }
        id = allocator::next_id(conn, TABLE_PERSON)?;
    }

    conn.execute(
        "INSERT INTO person (id, name, job, foreign_key, url, biography, birthday)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            person.name,
            person.job,
            person.foreign_key,
            person.url,
            person.biography,
            person.birthday,
        ],
    )
    .map_err(StoreError::store(TABLE_PERSON))?;
    Ok(id)
}

pub(crate) fn upsert_video(conn: &Connection, video: &Video) -> Result<i64> {
    let mut id = video.id;
    if id == 0 {
        let existing = lookup::video_id(conn, &video.title)?;
        if existing != 0 {
            return Ok(existing);
        }
        id = allocator::next_id(conn, TABLE_VIDEO)?;
    }

    conn.execute(
        "INSERT INTO video (
            id, mjb_version, mjb_revision, mjb_update_date, base_filename,
            title, title_sort, title_original, release_date, rating, top250,
            plot, outline, quote, tagline, runtime, video_type, season,
            subtitles, library_description, certification_id
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                  ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
        params![
            id,
            video.mjb_version,
            video.mjb_revision,
            video.mjb_update_date,
            video.base_filename,
            video.title,
            video.title_sort,
            video.title_original,
            video.release_date,
            video.rating,
            video.top250,
            video.plot,
            video.outline,
            video.quote,
            video.tagline,
            video.runtime,
            video.video_type,
            video.season,
            video.subtitles,
            video.library_description,
            video.certification_id,
        ],
    )
    .map_err(StoreError::store(TABLE_VIDEO))?;
    Ok(id)
}

pub(crate) fn upsert_video_file(conn: &Connection, file: &VideoFile) -> Result<i64> {
    let mut id = file.id;
    if id == 0 {
        let existing = lookup::video_file_id(conn, &file.file_location)?;
        if existing != 0 {
            return Ok(existing);
        }
        id = allocator::next_id(conn, TABLE_VIDEO_FILE)?;
    }

    conn.execute(
        "INSERT INTO video_file (
            id, video_id, file_location, file_url, container, audio_channels,
            video_codec_id, audio_codec_id, resolution, video_source,
            video_output, aspect, fps, file_date, file_size, number_parts,
            first_part, last_part
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                  ?14, ?15, ?16, ?17, ?18)",
        params![
            id,
            file.video_id,
            file.file_location,
            file.file_url,
            file.container,
            file.audio_channels,
            file.video_codec_id,
            file.audio_codec_id,
            file.resolution,
            file.video_source,
            file.video_output,
            file.aspect,
            file.fps,
            file.file_date,
            file.file_size,
            file.number_parts,
            file.first_part,
            file.last_part,
        ],
    )
    .map_err(StoreError::store(TABLE_VIDEO_FILE))?;
    Ok(id)
}

pub(crate) fn upsert_video_file_part(conn: &Connection, part: &VideoFilePart) -> Result<i64> {
    let mut id = part.id;
    if id == 0 {
        let existing = lookup::video_file_part_id(conn, part.file_id, part.part)?;
        if existing != 0 {
            return Ok(existing);
        }
        id = allocator::next_id(conn, TABLE_VIDEO_FILE_PART)?;
    }

    conn.execute(
        "INSERT INTO video_file_part (id, file_id, part, title, plot, season)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, part.file_id, part.part, part.title, part.plot, part.season],
    )
    .map_err(StoreError::store(TABLE_VIDEO_FILE_PART))?;
    Ok(id)
}

/// VideoSite is the odd one out: its identity is a caller-supplied external
/// string keyed by (video_id, site). An existing pair returns the stored
/// site_id unchanged - no overwrite.
pub(crate) fn upsert_video_site(conn: &Connection, site: &VideoSite) -> Result<String> {
    if site.video_id == 0 {
        return Ok(String::new());
    }

    let existing = lookup::video_site_id(conn, site.video_id, &site.site)?;
    if !existing.is_empty() {
        return Ok(existing);
    }

    conn.execute(
        "INSERT INTO video_site (video_id, site, site_id) VALUES (?1, ?2, ?3)",
        params![site.video_id, site.site, site.site_id],
    )
    .map_err(StoreError::store(TABLE_VIDEO_SITE))?;
    Ok(site.site_id.clone())
}

// Updates: delete the old row by id, then reinsert. With a non-zero id the
// upsert skips its reuse check, so the insert is unconditional.

pub(crate) fn update_artwork(conn: &Connection, artwork: &Artwork) -> Result<i64> {
    if artwork.id > 0 {
        delete_by_id(conn, TABLE_ARTWORK, artwork.id)?;
    }
    upsert_artwork(conn, artwork)
}

pub(crate) fn update_certification(conn: &Connection, cert: &Certification) -> Result<i64> {
    if cert.id > 0 {
        delete_by_id(conn, TABLE_CERTIFICATION, cert.id)?;
    }
    upsert_certification(conn, cert)
}

pub(crate) fn update_codec(conn: &Connection, codec: &Codec) -> Result<i64> {
    if codec.id > 0 {
        delete_by_id(conn, TABLE_CODEC, codec.id)?;
    }
    upsert_codec(conn, codec)
}

pub(crate) fn update_company(conn: &Connection, company: &Company) -> Result<i64> {
    if company.id > 0 {
        delete_by_id(conn, TABLE_COMPANY, company.id)?;
    }
    upsert_company(conn, company)
}

pub(crate) fn update_country(conn: &Connection, country: &Country) -> Result<i64> {
    if country.id > 0 {
        delete_by_id(conn, TABLE_COUNTRY, country.id)?;
    }
    upsert_country(conn, country)
}

pub(crate) fn update_genre(conn: &Connection, genre: &Genre) -> Result<i64> {
    if genre.id > 0 {
        delete_by_id(conn, TABLE_GENRE, genre.id)?;
    }
    upsert_genre(conn, genre)
}

pub(crate) fn update_language(conn: &Connection, language: &Language) -> Result<i64> {
    if language.id > 0 {
        delete_by_id(conn, TABLE_LANGUAGE, language.id)?;
    }
    upsert_language(conn, language)
}

pub(crate) fn update_person(conn: &Connection, person: &Person) -> Result<i64> {
    if person.id > 0 {
        delete_by_id(conn, TABLE_PERSON, person.id)?;
    }
    upsert_person(conn, person)
}

pub(crate) fn update_video(conn: &Connection, video: &Video) -> Result<i64> {
    if video.id > 0 {
        delete_by_id(conn, TABLE_VIDEO, video.id)?;
    }
    upsert_video(conn, video)
}

pub(crate) fn update_video_file(conn: &Connection, file: &VideoFile) -> Result<i64> {
    if file.id > 0 {
        delete_by_id(conn, TABLE_VIDEO_FILE, file.id)?;
    }
    upsert_video_file(conn, file)
}

pub(crate) fn update_video_file_part(conn: &Connection, part: &VideoFilePart) -> Result<i64> {
    if part.id > 0 {
        delete_by_id(conn, TABLE_VIDEO_FILE_PART, part.id)?;
    }
    upsert_video_file_part(conn, part)
}

/// Delete-then-insert keyed by (video_id, site). The delete may fail for a
/// row that was never there; that one failure is deliberately suppressed.
pub(crate) fn update_video_site(conn: &Connection, site: &VideoSite) -> Result<String> {
    if let Err(err) = delete_video_site_row(conn, site.video_id, &site.site) {
        debug!(
            "ignoring delete failure for video_site ({}, {}): {err}",
            site.video_id, site.site
        );
    }
    upsert_video_site(conn, site)
}

// Join layer. Links are idempotent: the pair tables carry a UNIQUE
// constraint and repeated links are ignored.

fn link(
    conn: &Connection,
    table: &'static str,
    column: &str,
    video_id: i64,
    child_id: i64,
) -> Result<()> {
    if video_id < 1 || child_id < 1 {
        return Err(StoreError::InvalidArgument("link ids must be positive"));
    }

    conn.execute(
        &format!("INSERT OR IGNORE INTO {table} (video_id, {column}) VALUES (?1, ?2)"),
        params![video_id, child_id],
    )
    .map_err(StoreError::store(table))?;
    Ok(())
}

pub(crate) fn link_genre(conn: &Connection, video_id: i64, genre_id: i64) -> Result<()> {
    link(conn, TABLE_VIDEO_GENRE, "genre_id", video_id, genre_id)
}

pub(crate) fn link_company(conn: &Connection, video_id: i64, company_id: i64) -> Result<()> {
    link(conn, TABLE_VIDEO_COMPANY, "company_id", video_id, company_id)
}

pub(crate) fn link_country(conn: &Connection, video_id: i64, country_id: i64) -> Result<()> {
    link(conn, TABLE_VIDEO_COUNTRY, "country_id", video_id, country_id)
}

pub(crate) fn link_language(conn: &Connection, video_id: i64, language_id: i64) -> Result<()> {
    link(conn, TABLE_VIDEO_LANGUAGE, "language_id", video_id, language_id)
}

pub(crate) fn link_person(conn: &Connection, video_id: i64, person_id: i64) -> Result<()> {
    link(conn, TABLE_VIDEO_PERSON, "person_id", video_id, person_id)
}
