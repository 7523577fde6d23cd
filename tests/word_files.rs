use std::fs;

use rand::{SeedableRng, rngs::StdRng};
use wordharvest::wordfile::{
    MAX_ID, MAX_WORDS_PER_WRITE, append_words, append_words_with, load_word_list,
};

#[test]
fn test_round_trip_keeps_order() {
    let dir = tempfile::tempdir().unwrap();
    let report = append_words(dir.path(), "english", ["alpha", "beta", "gamma"]).unwrap();

    assert_eq!(report.written, 3);
    assert_eq!(report.dropped, 0);
    assert_eq!(
        load_word_list(&report.path).unwrap(),
        vec!["alpha", "beta", "gamma"]
    );
}

#[test]
fn test_records_have_ids_in_range() {
    let dir = tempfile::tempdir().unwrap();
    let report = append_words_with(
        dir.path(),
        "english",
        ["alpha", "beta"],
        &mut StdRng::seed_from_u64(11),
    )
    .unwrap();

    let contents = fs::read_to_string(&report.path).unwrap();
    for line in contents.lines() {
        let (_, id) = line.split_once(", ").unwrap();
        let id: u64 = id.parse().unwrap();
        assert!((1..MAX_ID).contains(&id));
    }
}

#[test]
fn test_appends_instead_of_truncating() {
    let dir = tempfile::tempdir().unwrap();
    append_words(dir.path(), "english", ["alpha"]).unwrap();
    append_words(dir.path(), "english.txt", ["beta"]).unwrap();

    assert_eq!(
        load_word_list(&dir.path().join("english.txt")).unwrap(),
        vec!["alpha", "beta"]
    );
}

#[test]
fn test_write_capped() {
    let dir = tempfile::tempdir().unwrap();
    let words = (0..MAX_WORDS_PER_WRITE + 25).map(|i| format!("w{i}"));
    let report = append_words(dir.path(), "big", words).unwrap();

    assert_eq!(report.written, MAX_WORDS_PER_WRITE);
    assert_eq!(report.dropped, 25);
    let contents = fs::read_to_string(&report.path).unwrap();
    assert_eq!(contents.lines().count(), MAX_WORDS_PER_WRITE);
    assert!(contents.starts_with("w0, "));
}

#[test]
fn test_creates_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("out").join("words");
    let report = append_words(&nested, "chinese", ["你好"]).unwrap();
    assert!(report.path.starts_with(&nested));
    assert!(report.path.exists());
}

#[test]
fn test_missing_word_list() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_word_list(&dir.path().join("absent.txt")).is_err());
}
