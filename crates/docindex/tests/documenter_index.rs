//! Tests against a search index produced by a real documentation build.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use docindex::index::validate::{has_errors, validate};
use docindex::index::writer::{to_documenter_js, to_json, write_path};
use docindex::search::ResultOrder;
use docindex::{
    load_path, parse_str, Category, Config, LoadPolicy, Query, SearchMode, Searcher, SourceFormat,
};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/v1.2.0")
}

fn fixture_path() -> PathBuf {
    fixture_dir().join("search_index.js")
}

fn fixture_source() -> String {
    std::fs::read_to_string(fixture_path()).expect("fixture should be readable")
}

#[test]
fn loads_generator_output() {
    let (index, report) = load_path(fixture_path(), LoadPolicy::Strict).unwrap();

    assert_eq!(report.format, SourceFormat::DocumenterJs);
    assert_eq!(report.accepted, 10);
    assert!(report.skipped.is_empty());
    assert_eq!(index.len(), 10);

    let mut locations: Vec<_> = index.iter().map(|d| d.location.as_str()).collect();
    locations.sort_unstable();
    locations.dedup();
    assert_eq!(locations.len(), index.len());
}

#[test]
fn loads_from_build_directory() {
    let (index, _) = load_path(fixture_dir(), LoadPolicy::Strict).unwrap();
    assert_eq!(index.len(), 10);
}

#[test]
fn home_page_record() {
    let index = parse_str(&fixture_source()).unwrap();

    let home = index.find("#").unwrap();
    assert_eq!(home.page, "Home");
    assert_eq!(home.title, "Home");
    assert_eq!(home.category, Category::Page);
    assert!(home.text.is_empty());
    assert_eq!(index.position("#"), Some(0));
}

#[test]
fn section_record() {
    let index = parse_str(&fixture_source()).unwrap();

    let section = index.find("#ZMQ.jl-1").unwrap();
    assert_eq!(section.category, Category::Section);
    assert_eq!(section.page, "Home");
    assert!(section.text.starts_with("A Julia interface to ZeroMQ."));

    let usage = index.find("man/guide/#Usage-1").unwrap();
    assert!(usage.text.contains("bind(s1, \"tcp://*:5555\")\n"));
}

#[test]
fn pages_in_order() {
    let index = parse_str(&fixture_source()).unwrap();
    assert_eq!(index.pages(), vec!["Home", "Guide", "Examples", "Reference"]);
    assert_eq!(index.sections_of("Home").count(), 2);
    assert_eq!(index.sections_of("Reference").count(), 1);
}

#[test]
fn generator_output_validates() {
    let index = parse_str(&fixture_source()).unwrap();
    let issues = validate(&index);
    assert!(!has_errors(&issues), "unexpected errors: {issues:?}");
}

#[test]
fn script_round_trip_is_byte_identical() {
    let source = fixture_source();
    let index = parse_str(&source).unwrap();
    assert_eq!(to_documenter_js(&index).unwrap(), source);
}

#[test]
fn json_round_trip_preserves_records() {
    let index = parse_str(&fixture_source()).unwrap();

    for pretty in [false, true] {
        let json = to_json(&index, pretty).unwrap();
        let reloaded = parse_str(&json).unwrap();
        assert_eq!(reloaded, index);
        assert_eq!(reloaded.fingerprint(), index.fingerprint());
    }
}

#[test]
fn convert_through_files() {
    let index = parse_str(&fixture_source()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/search_index.json");

    write_path(&index, &path, SourceFormat::Json, true).unwrap();
    let (reloaded, report) = load_path(&path, LoadPolicy::Strict).unwrap();
    assert_eq!(report.format, SourceFormat::Json);
    assert_eq!(reloaded, index);
}

#[test]
fn token_search_ranks_by_frequency() {
    let index = parse_str(&fixture_source()).unwrap();
    let config = Config::default();
    let searcher = Searcher::new(&index, &config.search);

    let hits = searcher.search(&searcher.query("zeromq")).unwrap();
    let locations: Vec<_> = hits.iter().map(|h| h.fragment.location.as_str()).collect();
    assert_eq!(locations, vec!["#ZMQ.jl-1", "#Package-Features-1"]);
    assert!(hits[0].snippet.as_deref().unwrap().contains("ZeroMQ"));
}

#[test]
fn token_search_prefers_title_matches() {
    let index = parse_str(&fixture_source()).unwrap();
    let config = Config::default();
    let searcher = Searcher::new(&index, &config.search);

    let hits = searcher.search(&searcher.query("Guide")).unwrap();
    let locations: Vec<_> = hits.iter().map(|h| h.fragment.location.as_str()).collect();
    assert_eq!(
        locations,
        vec![
            "man/guide/#",
            "man/guide/#Guide-1",
            "man/guide/#Usage-1",
            "#Package-Features-1",
        ]
    );
}

#[test]
fn substring_search_finds_code() {
    let index = parse_str(&fixture_source()).unwrap();
    let config = Config::default();
    let searcher = Searcher::new(&index, &config.search);

    let query = searcher.query("send(").mode(SearchMode::Substring);
    let hits = searcher.search(&query).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].fragment.location, "man/guide/#Usage-1");
    assert_eq!(hits[0].score, 4);
}

#[test]
fn filtered_search_in_sequence_order() {
    let index = parse_str(&fixture_source()).unwrap();
    let config = Config::default();
    let searcher = Searcher::new(&index, &config.search);

    let query = Query::new("")
        .mode(SearchMode::Substring)
        .category(Category::Page)
        .order(ResultOrder::Sequence);
    let hits = searcher.search(&query).unwrap();
    let locations: Vec<_> = hits.iter().map(|h| h.fragment.location.as_str()).collect();
    assert_eq!(
        locations,
        vec!["#", "man/guide/#", "man/examples/#", "reference/#"]
    );
}
