use super::*;

#[test]
fn decodes_backend_movie_record() {
    let raw = r#"{
        "id": "1",
        "title": "Black Panther",
        "posterurl": "https://example.invalid/bp.jpg",
        "duration": "PT134M",
        "contentRating": "15",
        "storyline": "T'Challa returns home.",
        "releaseDate": "2018-02-14",
        "genres": ["Action", "Adventure"],
        "imdbRating": "",
        "ratings": [1, 2, 3]
    }"#;

    let movie: Movie = serde_json::from_str(raw).expect("movie");
    assert_eq!(movie.id, MovieId::new("1"));
    assert_eq!(movie.poster_url.as_deref(), Some("https://example.invalid/bp.jpg"));
    assert_eq!(movie.content_rating.as_deref(), Some("15"));
    assert_eq!(movie.genres.len(), 2);
    assert_eq!(movie.imdb_rating, None);
    assert_eq!(
        movie.release_date(),
        NaiveDate::from_ymd_opt(2018, 2, 14)
    );
}

#[test]
fn numeric_ids_are_normalised_to_strings() {
    let movie: Movie = serde_json::from_str(r#"{"id": 42, "title": "Up", "imdbRating": 8.3}"#)
        .expect("movie");
    assert_eq!(movie.id.as_str(), "42");
    assert_eq!(movie.imdb_rating, Some(8.3));

    let encoded = serde_json::to_value(&movie).expect("encode");
    assert_eq!(encoded["id"], "42");
    assert!(encoded.get("posterurl").is_none());
}

#[test]
fn parses_backend_durations() {
    assert_eq!(parse_iso_duration("PT100M"), Some(Duration::from_secs(6_000)));
    assert_eq!(parse_iso_duration("PT1H55M"), Some(Duration::from_secs(6_900)));
    assert_eq!(parse_iso_duration("P1DT30S"), Some(Duration::from_secs(86_430)));
    assert_eq!(parse_iso_duration(""), None);
    assert_eq!(parse_iso_duration("PT"), None);
    assert_eq!(parse_iso_duration("100 minutes"), None);
    assert_eq!(parse_iso_duration("PTM"), None);
}

#[test]
fn runtime_label_uses_hours_and_minutes() {
    let mut movie = Movie::new("1", "Coco");
    movie.duration = "PT100M".into();
    assert_eq!(movie.runtime_label().as_deref(), Some("01H 40M"));

    movie.duration = "whenever".into();
    assert_eq!(movie.runtime_label(), None);
}

#[test]
fn oversized_durations_are_unknown_rather_than_wrapped() {
    assert_eq!(parse_iso_duration("P999999999999999999D"), None);
    assert_eq!(parse_iso_duration("PT9999999999999999H"), None);
    assert_eq!(parse_iso_duration("PT1M18446744073709551615S"), None);
    assert_eq!(
        parse_iso_duration("PT18446744073709551615S"),
        Some(Duration::from_secs(u64::MAX))
    );

    let raw = r#"{"id": "9", "title": "Forever", "duration": "PT9999999999999999H"}"#;
    let movie: Movie = serde_json::from_str(raw).expect("decodes");
    assert_eq!(movie.runtime(), None);
    assert_eq!(movie.runtime_label(), None);
}

#[test]
fn category_parses_names_aliases_and_paths() {
    assert_eq!("now_playing".parse::<Category>(), Ok(Category::NowPlaying));
    assert_eq!("now-playing".parse::<Category>(), Ok(Category::NowPlaying));
    assert_eq!("movies-coming".parse::<Category>(), Ok(Category::ComingSoon));
    assert_eq!("favourit".parse::<Category>(), Ok(Category::Favourites));
    assert_eq!("Favourites".parse::<Category>(), Ok(Category::Favourites));
    assert!("trending".parse::<Category>().is_err());
    assert_eq!(Category::Favourites.path(), "favourit");
}

#[test]
fn detail_pages_default_to_coming_soon() {
    assert_eq!(Category::default_detail(), Category::ComingSoon);
    assert_eq!(Category::default_detail().path(), "movies-coming");
}
