// Value records - plain structs passed in and out of the store.
//
// `Default` doubles as the "empty record" sentinel: id 0 means "no such
// record" and is never a valid row id.
use serde::{Deserialize, Serialize};

/// A piece of artwork (poster, fanart, banner). Natural key: filename.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: i64,
    pub filename: String,
    pub url: String,
    /// Artwork kind, e.g. "poster" or "fanart".
    pub kind: String,
    pub related_id: i64,
    pub foreign_key: String,
}

/// A certification string, e.g. "PG-13". Natural key: certification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub id: i64,
    pub certification: String,
}

/// An audio or video codec. Natural key: codec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Codec {
    pub id: i64,
    pub codec: String,
    /// "audio" or "video".
    pub kind: String,
}

/// A production company. Natural key: company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub company: String,
    pub url: String,
}

/// A country. Natural key: country.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub country: String,
    pub url: String,
}

/// A genre. Natural key: name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    pub foreign_key: String,
}

/// A language with its short/medium/long codes. Natural key: language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub id: i64,
    pub language: String,
    pub short_code: String,
    pub medium_code: String,
    pub long_code: String,
}

/// A person credit. Natural key: (name, job) - the same name with a
/// different job is a different record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub job: String,
    pub foreign_key: String,
    pub url: String,
    pub biography: String,
    pub birthday: String,
}

/// The central video entity. Natural key: title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: i64,
    pub mjb_version: String,
    pub mjb_revision: i32,
    pub mjb_update_date: String,
    pub base_filename: String,
    pub title: String,
    pub title_sort: String,
    pub title_original: String,
    pub release_date: String,
    /// 0-100, or -1 when unset.
    pub rating: i32,
    pub top250: i32,
    pub plot: String,
    pub outline: String,
    pub quote: String,
    pub tagline: String,
    /// Runtime in minutes.
    pub runtime: i32,
    pub video_type: String,
    pub season: i32,
    pub subtitles: String,
    pub library_description: String,
    /// FK into the certification table; 0 when unset.
    pub certification_id: i64,
}

impl Default for Video {
    fn default() -> Self {
        Video {
            id: 0,
            mjb_version: String::new(),
            mjb_revision: 0,
            mjb_update_date: String::new(),
            base_filename: String::new(),
            title: String::new(),
            title_sort: String::new(),
            title_original: String::new(),
            release_date: String::new(),
            rating: -1,
            top250: 0,
            plot: String::new(),
            outline: String::new(),
            quote: String::new(),
            tagline: String::new(),
            runtime: 0,
            video_type: String::new(),
            season: 0,
            subtitles: String::new(),
            library_description: String::new(),
            certification_id: 0,
        }
    }
}

/// A physical media file belonging to a video. Natural key: file_location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoFile {
    pub id: i64,
    pub video_id: i64,
    pub file_location: String,
    pub file_url: String,
    pub container: String,
    pub audio_channels: i32,
    pub video_codec_id: i64,
    pub audio_codec_id: i64,
    pub resolution: String,
    pub video_source: String,
    pub video_output: String,
    pub aspect: String,
    pub fps: f32,
    pub file_date: String,
    pub file_size: i64,
    pub number_parts: i32,
    pub first_part: i32,
    pub last_part: i32,
}

/// A part of a multi-part file. Natural key: (file_id, part).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoFilePart {
    pub id: i64,
    pub file_id: i64,
    pub part: i32,
    pub title: String,
    pub plot: String,
    pub season: i32,
}

/// Maps a video to its identifier on an external site. Unlike every other
/// entity the "id" here is a caller-supplied string, not a surrogate key;
/// the row is keyed by (video_id, site).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoSite {
    pub video_id: i64,
    pub site: String,
    pub site_id: String,
}
