use std::fs;

use tempfile::TempDir;
use verse_core::{Catalog, Chapter, Verse};
use verse_engine::{ChapterStore, OutputLayout, SaveOutcome};

fn genesis_one() -> Chapter {
    Chapter::new(
        "genesis",
        1,
        "ESV",
        vec![
            Verse::new(1, "In the beginning, God created the heavens and the earth."),
            Verse::new(2, "The earth was without form and void."),
        ],
    )
}

#[test]
fn save_writes_pretty_json_at_the_layout_path() {
    let temp = TempDir::new().unwrap();
    let catalog = Catalog::builtin();
    let store = ChapterStore::new(OutputLayout::new(temp.path()));

    let outcome = store.save(&catalog, &genesis_one()).unwrap();
    let expected = temp
        .path()
        .join("json_bibles/english/esv/esv_01-genesis/esv_01-genesis_chapter-01.json");
    assert_eq!(outcome, SaveOutcome::Saved(expected.clone()));

    let raw = fs::read_to_string(&expected).unwrap();
    assert!(raw.contains("\n  \"book\": \"genesis\""));
    let back: Chapter = serde_json::from_str(&raw).unwrap();
    assert_eq!(back, genesis_one());
    assert!(store.contains(&catalog, "esv", "genesis", 1));
}

#[test]
fn saving_an_existing_chapter_is_a_successful_no_op() {
    let temp = TempDir::new().unwrap();
    let catalog = Catalog::builtin();
    let store = ChapterStore::new(OutputLayout::new(temp.path()));

    let first = store.save(&catalog, &genesis_one()).unwrap();
    let before = fs::read_to_string(first.path()).unwrap();

    let mut changed = genesis_one();
    changed.verses.push(Verse::new(3, "And God said"));
    let second = store.save(&catalog, &changed).unwrap();

    assert_eq!(second, SaveOutcome::AlreadyPresent(first.path().to_path_buf()));
    assert_eq!(fs::read_to_string(second.path()).unwrap(), before);
}

#[test]
fn non_ascii_text_is_kept_verbatim() {
    let temp = TempDir::new().unwrap();
    let catalog = Catalog::builtin();
    let store = ChapterStore::new(OutputLayout::new(temp.path()));
    let chapter = Chapter::new("genesis", 1, "rvr60", vec![Verse::new(1, "En el principio creó Dios")]);

    let outcome = store.save(&catalog, &chapter).unwrap();
    assert!(outcome.path().starts_with(temp.path().join("json_bibles/spanish/rvr60")));
    assert!(fs::read_to_string(outcome.path()).unwrap().contains("creó"));
}

#[test]
fn unknown_book_is_an_error() {
    let temp = TempDir::new().unwrap();
    let catalog = Catalog::builtin();
    let store = ChapterStore::new(OutputLayout::new(temp.path()));
    let chapter = Chapter::new("maccabees", 1, "kjv", vec![Verse::new(1, "x")]);
    assert!(store.save(&catalog, &chapter).is_err());
    assert!(!store.contains(&catalog, "kjv", "maccabees", 1));
}
