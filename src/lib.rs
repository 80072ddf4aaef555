//! Embedded SQLite catalog store for a movie jukebox.
//!
//! Callers build plain value records ([`Video`], [`Genre`], [`Person`], ...),
//! push them through the upsert layer to obtain integer surrogate ids, relate
//! a video to its reference entities through the link operations, and later
//! reconstitute records through the fetch layer. Absence is always a sentinel
//! (id 0, empty string, default record), never an error.

mod db;
mod error;
mod model;

pub use db::Catalog;
pub use error::{Result, StoreError};
pub use model::{
    Artwork, Certification, Codec, Company, Country, Genre, Language, Person, Video, VideoFile,
    VideoFilePart, VideoSite,
};
