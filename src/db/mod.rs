// Database module - the catalog store handle and its layers.
mod allocator;
mod lookup;
mod reader;
mod schema;
mod writer;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::model::*;

/// Handle to the catalog store.
///
/// Cheap to clone and safe to share across worker threads: every operation
/// takes the internal connection lock for its whole unit of work, and
/// multi-step writes additionally run in one transaction. That makes the
/// upsert's check-then-act a single critical section - two threads upserting
/// the same new natural key get the same id and exactly one row.
#[derive(Clone)]
pub struct Catalog {
    conn: Arc<Mutex<Connection>>,
}

impl Catalog {
    /// Open or create the catalog at the given path, bringing the schema up
    /// to the current version.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(StoreError::schema)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(StoreError::schema)?;
        Self::init(conn)
    }

    /// In-memory catalog, for tests and scratch stores.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::schema)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(StoreError::schema)?;
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(StoreError::schema)?;

        schema::ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    /// Run a write closure inside one transaction under the lock.
    fn write<T>(
        &self,
        table: &'static str,
        op: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        let mut conn = self.lock();
        let tx = conn.transaction().map_err(StoreError::store(table))?;
        let value = op(&tx)?;
        tx.commit().map_err(StoreError::store(table))?;
        Ok(value)
    }

    // Upsert layer: return the existing id for a known natural key, or
    // allocate, insert and return a fresh one.

    pub fn upsert_artwork(&self, artwork: &Artwork) -> Result<i64> {
        self.write(schema::TABLE_ARTWORK, |conn| {
            writer::upsert_artwork(conn, artwork)
        })
    }

    pub fn upsert_certification(&self, cert: &Certification) -> Result<i64> {
        self.write(schema::TABLE_CERTIFICATION, |conn| {
            writer::upsert_certification(conn, cert)
        })
    }

    pub fn upsert_codec(&self, codec: &Codec) -> Result<i64> {
        self.write(schema::TABLE_CODEC, |conn| writer::upsert_codec(conn, codec))
    }

    pub fn upsert_company(&self, company: &Company) -> Result<i64> {
        self.write(schema::TABLE_COMPANY, |conn| {
            writer::upsert_company(conn, company)
        })
    }

    pub fn upsert_country(&self, country: &Country) -> Result<i64> {
        self.write(schema::TABLE_COUNTRY, |conn| {
            writer::upsert_country(conn, country)
        })
    }

    pub fn upsert_genre(&self, genre: &Genre) -> Result<i64> {
        self.write(schema::TABLE_GENRE, |conn| writer::upsert_genre(conn, genre))
    }

    pub fn upsert_language(&self, language: &Language) -> Result<i64> {
        self.write(schema::TABLE_LANGUAGE, |conn| {
            writer::upsert_language(conn, language)
        })
    }

    pub fn upsert_person(&self, person: &Person) -> Result<i64> {
        self.write(schema::TABLE_PERSON, |conn| {
            writer::upsert_person(conn, person)
        })
    }

    pub fn upsert_video(&self, video: &Video) -> Result<i64> {
        self.write(schema::TABLE_VIDEO, |conn| writer::upsert_video(conn, video))
    }

    pub fn upsert_video_file(&self, file: &VideoFile) -> Result<i64> {
        self.write(schema::TABLE_VIDEO_FILE, |conn| {
            writer::upsert_video_file(conn, file)
        })
    }

    pub fn upsert_video_file_part(&self, part: &VideoFilePart) -> Result<i64> {
        self.write(schema::TABLE_VIDEO_FILE_PART, |conn| {
            writer::upsert_video_file_part(conn, part)
        })
    }

    /// Store a video's external-site id. If the (video, site) pair already
    /// exists the stored id string comes back unchanged.
    pub fn upsert_video_site(&self, site: &VideoSite) -> Result<String> {
        self.write(schema::TABLE_VIDEO_SITE, |conn| {
            writer::upsert_video_site(conn, site)
        })
    }

    // Update layer: delete-by-id then reinsert, one transaction.

    pub fn update_artwork(&self, artwork: &Artwork) -> Result<i64> {
        self.write(schema::TABLE_ARTWORK, |conn| {
            writer::update_artwork(conn, artwork)
        })
    }

    pub fn update_certification(&self, cert: &Certification) -> Result<i64> {
        self.write(schema::TABLE_CERTIFICATION, |conn| {
            writer::update_certification(conn, cert)
        })
    }

    pub fn update_codec(&self, codec: &Codec) -> Result<i64> {
        self.write(schema::TABLE_CODEC, |conn| writer::update_codec(conn, codec))
    }

    pub fn update_company(&self, company: &Company) -> Result<i64> {
        self.write(schema::TABLE_COMPANY, |conn| {
            writer::update_company(conn, company)
        })
    }

    pub fn update_country(&self, country: &Country) -> Result<i64> {
        self.write(schema::TABLE_COUNTRY, |conn| {
            writer::update_country(conn, country)
        })
    }

    pub fn update_genre(&self, genre: &Genre) -> Result<i64> {
        self.write(schema::TABLE_GENRE, |conn| writer::update_genre(conn, genre))
    }

    pub fn update_language(&self, language: &Language) -> Result<i64> {
        self.write(schema::TABLE_LANGUAGE, |conn| {
            writer::update_language(conn, language)
        })
    }

    pub fn update_person(&self, person: &Person) -> Result<i64> {
        self.write(schema::TABLE_PERSON, |conn| {
            writer::update_person(conn, person)
        })
    }

    pub fn update_video(&self, video: &Video) -> Result<i64> {
        self.write(schema::TABLE_VIDEO, |conn| writer::update_video(conn, video))
    }

    pub fn update_video_file(&self, file: &VideoFile) -> Result<i64> {
        self.write(schema::TABLE_VIDEO_FILE, |conn| {
            writer::update_video_file(conn, file)
        })
    }

    pub fn update_video_file_part(&self, part: &VideoFilePart) -> Result<i64> {
        self.write(schema::TABLE_VIDEO_FILE_PART, |conn| {
            writer::update_video_file_part(conn, part)
        })
    }

    pub fn update_video_site(&self, site: &VideoSite) -> Result<String> {
        self.write(schema::TABLE_VIDEO_SITE, |conn| {
            writer::update_video_site(conn, site)
        })
    }

    // Join layer: idempotent (video, child) links.

    pub fn link_genre(&self, video_id: i64, genre_id: i64) -> Result<()> {
        self.write(schema::TABLE_VIDEO_GENRE, |conn| {
            writer::link_genre(conn, video_id, genre_id)
        })
    }

    pub fn link_company(&self, video_id: i64, company_id: i64) -> Result<()> {
        self.write(schema::TABLE_VIDEO_COMPANY, |conn| {
            writer::link_company(conn, video_id, company_id)
        })
    }

    pub fn link_country(&self, video_id: i64, country_id: i64) -> Result<()> {
        self.write(schema::TABLE_VIDEO_COUNTRY, |conn| {
            writer::link_country(conn, video_id, country_id)
        })
    }

    pub fn link_language(&self, video_id: i64, language_id: i64) -> Result<()> {
        self.write(schema::TABLE_VIDEO_LANGUAGE, |conn| {
            writer::link_language(conn, video_id, language_id)
        })
    }

    pub fn link_person(&self, video_id: i64, person_id: i64) -> Result<()> {
        self.write(schema::TABLE_VIDEO_PERSON, |conn| {
            writer::link_person(conn, video_id, person_id)
        })
    }

    // Lookup layer: natural key -> id, 0 when not found.

    pub fn artwork_id(&self, filename: &str) -> Result<i64> {
        lookup::artwork_id(&self.lock(), filename)
    }

    pub fn certification_id(&self, certification: &str) -> Result<i64> {
        lookup::certification_id(&self.lock(), certification)
    }

    pub fn codec_id(&self, codec: &str) -> Result<i64> {
        lookup::codec_id(&self.lock(), codec)
    }

    pub fn company_id(&self, company: &str) -> Result<i64> {
        lookup::company_id(&self.lock(), company)
    }

    pub fn country_id(&self, country: &str) -> Result<i64> {
        lookup::country_id(&self.lock(), country)
    }

    pub fn genre_id(&self, name: &str) -> Result<i64> {
        lookup::genre_id(&self.lock(), name)
    }

    pub fn language_id(&self, language: &str) -> Result<i64> {
        lookup::language_id(&self.lock(), language)
    }

    pub fn person_id(&self, name: &str, job: &str) -> Result<i64> {
        lookup::person_id(&self.lock(), name, job)
    }

    pub fn video_id(&self, title: &str) -> Result<i64> {
        lookup::video_id(&self.lock(), title)
    }

    pub fn video_file_id(&self, file_location: &str) -> Result<i64> {
        lookup::video_file_id(&self.lock(), file_location)
    }

    pub fn video_file_part_id(&self, file_id: i64, part: i32) -> Result<i64> {
        lookup::video_file_part_id(&self.lock(), file_id, part)
    }

    /// External site id string for (video, site); empty when absent.
    pub fn video_site_id(&self, video_id: i64, site: &str) -> Result<String> {
        lookup::video_site_id(&self.lock(), video_id, site)
    }

    pub fn video_exists(&self, title: &str) -> Result<bool> {
        lookup::video_exists(&self.lock(), title)
    }

    // Fetch layer: id -> record, default record when absent.

    pub fn fetch_artwork(&self, id: i64) -> Result<Artwork> {
        reader::fetch_artwork(&self.lock(), id)
    }

    pub fn fetch_certification(&self, id: i64) -> Result<Certification> {
        reader::fetch_certification(&self.lock(), id)
    }

    pub fn fetch_codec(&self, id: i64) -> Result<Codec> {
        reader::fetch_codec(&self.lock(), id)
    }

    pub fn fetch_company(&self, id: i64) -> Result<Company> {
        reader::fetch_company(&self.lock(), id)
    }

    pub fn fetch_country(&self, id: i64) -> Result<Country> {
        reader::fetch_country(&self.lock(), id)
    }

    pub fn fetch_genre(&self, id: i64) -> Result<Genre> {
        reader::fetch_genre(&self.lock(), id)
    }

    pub fn fetch_language(&self, id: i64) -> Result<Language> {
        reader::fetch_language(&self.lock(), id)
    }

    pub fn fetch_person(&self, id: i64) -> Result<Person> {
        reader::fetch_person(&self.lock(), id)
    }

    pub fn fetch_video(&self, id: i64) -> Result<Video> {
        reader::fetch_video(&self.lock(), id)
    }

    pub fn fetch_video_file(&self, id: i64) -> Result<VideoFile> {
        reader::fetch_video_file(&self.lock(), id)
    }

    pub fn fetch_video_files(&self, video_id: i64) -> Result<Vec<VideoFile>> {
        reader::fetch_video_files(&self.lock(), video_id)
    }

    pub fn fetch_video_file_part(&self, id: i64) -> Result<VideoFilePart> {
        reader::fetch_video_file_part(&self.lock(), id)
    }

    pub fn fetch_video_file_parts(&self, file_id: i64) -> Result<Vec<VideoFilePart>> {
        reader::fetch_video_file_parts(&self.lock(), file_id)
    }

    pub fn fetch_video_site(&self, video_id: i64, site: &str) -> Result<VideoSite> {
        reader::fetch_video_site(&self.lock(), video_id, site)
    }

    // Relationship readers, for reconstituting a video for rendering.

    pub fn genre_ids_for_video(&self, video_id: i64) -> Result<Vec<i64>> {
        reader::genre_ids_for_video(&self.lock(), video_id)
    }

    pub fn company_ids_for_video(&self, video_id: i64) -> Result<Vec<i64>> {
        reader::company_ids_for_video(&self.lock(), video_id)
    }

    pub fn country_ids_for_video(&self, video_id: i64) -> Result<Vec<i64>> {
        reader::country_ids_for_video(&self.lock(), video_id)
    }

    pub fn language_ids_for_video(&self, video_id: i64) -> Result<Vec<i64>> {
        reader::language_ids_for_video(&self.lock(), video_id)
    }

    pub fn person_ids_for_video(&self, video_id: i64) -> Result<Vec<i64>> {
        reader::person_ids_for_video(&self.lock(), video_id)
    }
}
