use pretty_assertions::assert_eq;
use verse_core::{finalize_verses, Verse, MAX_VERSE_CHARS};

fn init_logging() {
    verse_logging::initialize_for_tests();
}

#[test]
fn longer_duplicate_wins() {
    init_logging();
    let short = "a".repeat(5);
    let long = "b".repeat(50);
    let verses = finalize_verses(vec![Verse::new(3, short), Verse::new(3, long.clone())]);
    assert_eq!(verses, vec![Verse::new(3, long.clone())]);

    // Order of arrival does not matter.
    let verses = finalize_verses(vec![Verse::new(3, long.clone()), Verse::new(3, "tiny")]);
    assert_eq!(verses, vec![Verse::new(3, long)]);
}

#[test]
fn out_of_range_numbers_and_empty_text_are_excluded() {
    init_logging();
    let verses = finalize_verses(vec![
        Verse::new(0, "zero"),
        Verse::new(250, "too far"),
        Verse::new(4, ""),
        Verse::new(200, "last allowed"),
        Verse::new(1, "first"),
    ]);
    let numbers: Vec<u32> = verses.iter().map(|v| v.number).collect();
    assert_eq!(numbers, vec![1, 200]);
}

#[test]
fn overlong_text_is_excluded() {
    init_logging();
    let verses = finalize_verses(vec![
        Verse::new(1, "x".repeat(MAX_VERSE_CHARS)),
        Verse::new(2, "x".repeat(MAX_VERSE_CHARS + 1)),
    ]);
    assert_eq!(verses.len(), 1);
    assert_eq!(verses[0].number, 1);
}

#[test]
fn result_is_sorted_and_unique() {
    init_logging();
    let verses = finalize_verses(
        [5, 2, 9, 2, 1]
            .into_iter()
            .map(|n| Verse::new(n, format!("verse {n}"))),
    );
    let numbers: Vec<u32> = verses.iter().map(|v| v.number).collect();
    assert_eq!(numbers, vec![1, 2, 5, 9]);
}
