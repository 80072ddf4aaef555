// End-to-end tests against the public Catalog surface.
use jukebox_db::{
    Artwork, Catalog, Certification, Codec, Company, Country, Genre, Language, Person, Video,
    VideoFile, VideoFilePart, VideoSite,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn sample_video(title: &str) -> Video {
    Video {
        mjb_version: "2.1".into(),
        mjb_revision: 2600,
        mjb_update_date: "2010-06-01 12:00:00".into(),
        base_filename: format!("{title}.mkv"),
        title: title.into(),
        title_sort: title.into(),
        title_original: title.into(),
        release_date: "1999-03-31".into(),
        rating: 87,
        top250: 16,
        plot: "A computer hacker learns the truth.".into(),
        outline: "Hacker learns the truth.".into(),
        quote: "There is no spoon.".into(),
        tagline: "Free your mind.".into(),
        runtime: 136,
        video_type: "MOVIE".into(),
        season: -1,
        subtitles: "NO".into(),
        library_description: "Main library".into(),
        ..Video::default()
    }
}

fn sample_file(video_id: i64, location: &str) -> VideoFile {
    VideoFile {
        video_id,
        file_location: location.into(),
        file_url: format!("file://{location}"),
        container: "MKV".into(),
        audio_channels: 6,
        video_codec_id: 1,
        audio_codec_id: 2,
        resolution: "1920x1080".into(),
        video_source: "BluRay".into(),
        video_output: "1080p".into(),
        aspect: "2.35:1".into(),
        fps: 23.976,
        file_date: "2010-06-01 12:00:00".into(),
        file_size: 8_589_934_592,
        number_parts: 1,
        first_part: 1,
        last_part: 1,
        ..VideoFile::default()
    }
}

#[test]
fn open_creates_store_file_and_parent_dirs() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("data").join("catalog.db");

    let catalog = Catalog::open(&path).unwrap();
    assert!(path.exists());

    let id = catalog.upsert_genre(&Genre { name: "Action".into(), ..Genre::default() }).unwrap();
    drop(catalog);

    // Reopen at the current schema version: data survives.
    let reopened = Catalog::open(&path).unwrap();
    assert_eq!(reopened.genre_id("Action").unwrap(), id);
}

#[test]
fn genre_upsert_scenario() {
    let catalog = Catalog::open_in_memory().unwrap();

    let action = Genre { name: "Action".into(), ..Genre::default() };
    let drama = Genre { name: "Drama".into(), ..Genre::default() };

    assert_eq!(catalog.upsert_genre(&action).unwrap(), 1);
    assert_eq!(catalog.upsert_genre(&action).unwrap(), 1);
    assert_eq!(catalog.upsert_genre(&drama).unwrap(), 2);

    assert_eq!(catalog.genre_id("Action").unwrap(), 1);
    assert_eq!(catalog.genre_id("Drama").unwrap(), 2);
    assert_eq!(catalog.genre_id("Horror").unwrap(), 0);
}

#[test]
fn person_composite_key_scenario() {
    let catalog = Catalog::open_in_memory().unwrap();

    let director = Person {
        name: "Jane Doe".into(),
        job: "Director".into(),
        ..Person::default()
    };
    let writer = Person {
        name: "Jane Doe".into(),
        job: "Writer".into(),
        ..Person::default()
    };

    assert_eq!(catalog.upsert_person(&director).unwrap(), 1);
    assert_eq!(catalog.upsert_person(&writer).unwrap(), 2);
    assert_eq!(catalog.person_id("Jane Doe", "Director").unwrap(), 1);
    assert_eq!(catalog.person_id("Jane Doe", "Writer").unwrap(), 2);
}

#[test]
fn link_is_idempotent() {
    let catalog = Catalog::open_in_memory().unwrap();

    catalog.link_genre(5, 2).unwrap();
    catalog.link_genre(5, 2).unwrap();

    assert_eq!(catalog.genre_ids_for_video(5).unwrap(), vec![2]);
}

#[test]
fn fetch_nonexistent_part_returns_empty_record() {
    let catalog = Catalog::open_in_memory().unwrap();

    let part = catalog.fetch_video_file_part(999).unwrap();
    assert_eq!(part.id, 0);
    assert_eq!(part, VideoFilePart::default());
}

#[test]
fn video_round_trip() {
    let catalog = Catalog::open_in_memory().unwrap();

    let video = sample_video("The Matrix");
    let id = catalog.upsert_video(&video).unwrap();
    assert!(id > 0);
    assert!(catalog.video_exists("The Matrix").unwrap());

    let mut expected = video.clone();
    expected.id = id;
    assert_eq!(catalog.fetch_video(id).unwrap(), expected);
}

#[test]
fn reference_entity_round_trips() {
    let catalog = Catalog::open_in_memory().unwrap();

    let artwork = Artwork {
        filename: "matrix_poster.jpg".into(),
        url: "http://example.com/matrix.jpg".into(),
        kind: "poster".into(),
        related_id: 1,
        foreign_key: "tmdb:603".into(),
        ..Artwork::default()
    };
    let id = catalog.upsert_artwork(&artwork).unwrap();
    let mut expected = artwork.clone();
    expected.id = id;
    assert_eq!(catalog.fetch_artwork(id).unwrap(), expected);

    let cert = Certification { certification: "R".into(), ..Certification::default() };
    let id = catalog.upsert_certification(&cert).unwrap();
    assert_eq!(catalog.fetch_certification(id).unwrap().certification, "R");

    let codec = Codec { codec: "H264".into(), kind: "video".into(), ..Codec::default() };
    let id = catalog.upsert_codec(&codec).unwrap();
    assert_eq!(catalog.fetch_codec(id).unwrap().codec, "H264");

    let company = Company {
        company: "Warner Bros.".into(),
        url: "http://warnerbros.example".into(),
        ..Company::default()
    };
    let id = catalog.upsert_company(&company).unwrap();
    assert_eq!(catalog.fetch_company(id).unwrap().company, "Warner Bros.");

    let country = Country { country: "Australia".into(), ..Country::default() };
    let id = catalog.upsert_country(&country).unwrap();
    assert_eq!(catalog.fetch_country(id).unwrap().country, "Australia");

    let language = Language {
        language: "English".into(),
        short_code: "en".into(),
        medium_code: "eng".into(),
        long_code: "english".into(),
        ..Language::default()
    };
    let id = catalog.upsert_language(&language).unwrap();
    let mut expected = language.clone();
    expected.id = id;
    assert_eq!(catalog.fetch_language(id).unwrap(), expected);

    let person = Person {
        name: "Keanu Reeves".into(),
        job: "Actor".into(),
        foreign_key: "imdb:nm0000206".into(),
        url: "http://example.com/keanu".into(),
        biography: "Born in Beirut.".into(),
        birthday: "1964-09-02".into(),
        ..Person::default()
    };
    let id = catalog.upsert_person(&person).unwrap();
    let mut expected = person.clone();
    expected.id = id;
    assert_eq!(catalog.fetch_person(id).unwrap(), expected);
}

#[test]
fn video_file_and_parts_round_trip() {
    let catalog = Catalog::open_in_memory().unwrap();

    let video_id = catalog.upsert_video(&sample_video("The Matrix")).unwrap();
    let file = sample_file(video_id, "/media/matrix.mkv");
    let file_id = catalog.upsert_video_file(&file).unwrap();

    let mut expected = file.clone();
    expected.id = file_id;
    assert_eq!(catalog.fetch_video_file(file_id).unwrap(), expected);
    assert_eq!(catalog.video_file_id("/media/matrix.mkv").unwrap(), file_id);

    // Same location is the same file.
    assert_eq!(catalog.upsert_video_file(&file).unwrap(), file_id);

    let part = VideoFilePart {
        file_id,
        part: 1,
        title: "The Matrix".into(),
        plot: "Part one.".into(),
        season: -1,
        ..VideoFilePart::default()
    };
    let part_id = catalog.upsert_video_file_part(&part).unwrap();
    assert_eq!(catalog.video_file_part_id(file_id, 1).unwrap(), part_id);

    let files = catalog.fetch_video_files(video_id).unwrap();
    assert_eq!(files.len(), 1);
    let parts = catalog.fetch_video_file_parts(file_id).unwrap();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].title, "The Matrix");
}

#[test]
fn update_replaces_all_fields() {
    let catalog = Catalog::open_in_memory().unwrap();

    let id = catalog.upsert_video(&sample_video("The Matrix")).unwrap();

    let mut revised = sample_video("The Matrix Reloaded");
    revised.id = id;
    revised.rating = 73;
    revised.quote = String::new();
    assert_eq!(catalog.update_video(&revised).unwrap(), id);

    let fetched = catalog.fetch_video(id).unwrap();
    assert_eq!(fetched.title, "The Matrix Reloaded");
    assert_eq!(fetched.rating, 73);
    assert_eq!(fetched.quote, "");
    assert!(!catalog.video_exists("The Matrix").unwrap());
}

#[test]
fn video_site_keeps_then_replaces_external_id() {
    let catalog = Catalog::open_in_memory().unwrap();

    let site = VideoSite {
        video_id: 5,
        site: "imdb".into(),
        site_id: "tt0133093".into(),
    };
    assert_eq!(catalog.upsert_video_site(&site).unwrap(), "tt0133093");

    // Upsert with a conflicting external id: the stored one wins.
    let conflicting = VideoSite {
        site_id: "tt0000000".into(),
        ..site.clone()
    };
    assert_eq!(catalog.upsert_video_site(&conflicting).unwrap(), "tt0133093");
    assert_eq!(catalog.video_site_id(5, "imdb").unwrap(), "tt0133093");

    // Update replaces it.
    assert_eq!(catalog.update_video_site(&conflicting).unwrap(), "tt0000000");
    assert_eq!(catalog.fetch_video_site(5, "imdb").unwrap().site_id, "tt0000000");
}

#[test]
fn linking_a_full_video() {
    let catalog = Catalog::open_in_memory().unwrap();

    let video_id = catalog.upsert_video(&sample_video("Heat")).unwrap();
    let genre_id = catalog
        .upsert_genre(&Genre { name: "Crime".into(), ..Genre::default() })
        .unwrap();
    let company_id = catalog
        .upsert_company(&Company { company: "Regency".into(), ..Company::default() })
        .unwrap();
    let country_id = catalog
        .upsert_country(&Country { country: "USA".into(), ..Country::default() })
        .unwrap();
    let language_id = catalog
        .upsert_language(&Language { language: "English".into(), ..Language::default() })
        .unwrap();
    let person_id = catalog
        .upsert_person(&Person {
            name: "Michael Mann".into(),
            job: "Director".into(),
            ..Person::default()
        })
        .unwrap();

    catalog.link_genre(video_id, genre_id).unwrap();
    catalog.link_company(video_id, company_id).unwrap();
    catalog.link_country(video_id, country_id).unwrap();
    catalog.link_language(video_id, language_id).unwrap();
    catalog.link_person(video_id, person_id).unwrap();

    assert_eq!(catalog.genre_ids_for_video(video_id).unwrap(), vec![genre_id]);
    assert_eq!(catalog.company_ids_for_video(video_id).unwrap(), vec![company_id]);
    assert_eq!(catalog.country_ids_for_video(video_id).unwrap(), vec![country_id]);
    assert_eq!(catalog.language_ids_for_video(video_id).unwrap(), vec![language_id]);
    assert_eq!(catalog.person_ids_for_video(video_id).unwrap(), vec![person_id]);
}

#[test]
fn reopening_an_old_store_recreates_the_schema() {
    init_tracing();
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("catalog.db");

    let catalog = Catalog::open(&path).unwrap();
    catalog.upsert_genre(&Genre { name: "Action".into(), ..Genre::default() }).unwrap();
    drop(catalog);

    // Stamp the store as older than the current schema version.
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute("UPDATE db_version SET version = 0", []).unwrap();
    drop(conn);

    let reopened = Catalog::open(&path).unwrap();
    assert_eq!(reopened.genre_id("Action").unwrap(), 0);
    assert_eq!(reopened.fetch_genre(1).unwrap(), Genre::default());
}

#[test]
fn concurrent_upserts_of_the_same_key_agree() {
    init_tracing();
    let tmp = tempfile::TempDir::new().unwrap();
    let catalog = Catalog::open(&tmp.path().join("catalog.db")).unwrap();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let catalog = catalog.clone();
        handles.push(std::thread::spawn(move || {
            catalog
                .upsert_genre(&Genre { name: "Thriller".into(), ..Genre::default() })
                .unwrap()
        }));
    }

    let ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(ids.iter().all(|&id| id == ids[0]));
    assert_eq!(catalog.genre_id("Thriller").unwrap(), ids[0]);
}
