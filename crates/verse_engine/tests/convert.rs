use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use verse_core::{Catalog, Chapter, Coverage, Verse};
use verse_engine::{
    convert_book, detect_coverage, BatchConverter, ChapterStore, ConvertSummary, LineStyle,
    OutputLayout,
};

fn save(store: &ChapterStore, catalog: &Catalog, book: &str, chapter: u32, tr: &str, texts: &[&str]) {
    let verses = texts
        .iter()
        .enumerate()
        .map(|(i, text)| Verse::new(i as u32 + 1, *text))
        .collect();
    store
        .save(catalog, &Chapter::new(book, chapter, tr, verses))
        .unwrap();
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn convert_book_writes_one_line_per_verse_in_order() {
    let temp = TempDir::new().unwrap();
    let catalog = Catalog::builtin();
    let layout = OutputLayout::new(temp.path());
    let store = ChapterStore::new(layout.clone());
    // Saved out of order on purpose.
    save(&store, &catalog, "genesis", 2, "esv", &["Thus the heavens", "And on the seventh day"]);
    save(
        &store,
        &catalog,
        "genesis",
        1,
        "esv",
        &["In the beginning", "The earth H776 was", "And God said"],
    );

    let genesis = catalog.book("genesis").unwrap();
    let path = convert_book(&catalog, &layout, "esv", genesis).unwrap().unwrap();
    assert_eq!(path, temp.path().join("txt_bibles/english/esv/01-genesis-esv.txt"));
    assert_eq!(
        fs::read_to_string(path).unwrap(),
        "Genesis 1:1 In the beginning\n\
         Genesis 1:2 The earth was\n\
         Genesis 1:3 And God said\n\
         Genesis 2:1 Thus the heavens\n\
         Genesis 2:2 And on the seventh day\n"
    );
}

#[test]
fn convert_book_without_chapters_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let catalog = Catalog::builtin();
    let layout = OutputLayout::new(temp.path());
    let exodus = catalog.book("exodus").unwrap();

    assert_eq!(convert_book(&catalog, &layout, "esv", exodus).unwrap(), None);
    fs::create_dir_all(layout.book_dir(&catalog, "esv", exodus)).unwrap();
    assert_eq!(convert_book(&catalog, &layout, "esv", exodus).unwrap(), None);
    assert!(!layout.text_path(&catalog, "esv", exodus).exists());
}

#[test]
fn coverage_is_detected_from_book_directories_and_flat_files() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("full/kjv_01-genesis")).unwrap();
    fs::create_dir_all(root.join("full/kjv_40-matthew")).unwrap();
    fs::create_dir_all(root.join("ot/wlc_05-deuteronomy")).unwrap();
    write(&root.join("nt/40-matthew-na28.json"), "{}");
    write(&root.join("nt/66_revelation.json"), "{}");
    fs::create_dir_all(root.join("empty")).unwrap();

    assert_eq!(detect_coverage(&root.join("full")).unwrap(), Coverage::Full);
    assert_eq!(detect_coverage(&root.join("ot")).unwrap(), Coverage::OldTestament);
    assert_eq!(detect_coverage(&root.join("nt")).unwrap(), Coverage::NewTestament);
    assert_eq!(detect_coverage(&root.join("empty")).unwrap(), Coverage::Unknown);
}

#[test]
fn batch_converts_every_translation_with_embedded_references() {
    let temp = TempDir::new().unwrap();
    let catalog = Catalog::builtin();
    let layout = OutputLayout::new(temp.path());
    let store = ChapterStore::new(layout.clone());
    save(
        &store,
        &catalog,
        "genesis",
        1,
        "kjv",
        &["Gen 1:1 - In the beginning", "Gen 1:3 - And God said", "plain text"],
    );
    save(&store, &catalog, "john", 3, "kjv", &["(Jesus(A) and Nicodemus(B)) There was a man"]);

    let summary = BatchConverter::new(&catalog, &layout).run().unwrap();
    assert_eq!(
        summary,
        ConvertSummary {
            translations: 1,
            files: 2,
            lines: 4,
            skipped_files: 0,
            failed: 0
        }
    );

    let genesis = fs::read_to_string(temp.path().join("txt_bibles/english/kjv/01-genesis-kjv.txt")).unwrap();
    assert_eq!(
        genesis,
        "Genesis 1:1 In the beginning\nGenesis 1:3 And God said\nGenesis 1:3 plain text\n"
    );
    let john = fs::read_to_string(temp.path().join("txt_bibles/english/kjv/43-john-kjv.txt")).unwrap();
    assert_eq!(john, "John 3:1 (Jesus and Nicodemus) There was a man\n");
}

#[test]
fn indexed_style_numbers_lines_across_the_translation() {
    let temp = TempDir::new().unwrap();
    let catalog = Catalog::builtin();
    let layout = OutputLayout::new(temp.path());
    let store = ChapterStore::new(layout.clone());
    save(&store, &catalog, "genesis", 1, "esv", &["a", "b"]);
    save(&store, &catalog, "exodus", 1, "esv", &["c"]);

    BatchConverter::new(&catalog, &layout)
        .with_line_style(LineStyle::Indexed)
        .run()
        .unwrap();

    let dir = temp.path().join("txt_bibles/english/esv");
    assert_eq!(
        fs::read_to_string(dir.join("01-genesis-esv.txt")).unwrap(),
        "00001| Genesis 1:1 a\n00002| Genesis 1:2 b\n"
    );
    assert_eq!(
        fs::read_to_string(dir.join("02-exodus-esv.txt")).unwrap(),
        "00003| Exodus 1:1 c\n"
    );
}

#[test]
fn new_testament_flat_whole_book_records_are_converted() {
    let temp = TempDir::new().unwrap();
    let catalog = Catalog::builtin();
    let layout = OutputLayout::new(temp.path());
    let tr_dir = layout.json_root().join("greek/na28");
    write(
        &tr_dir.join("40-matthew-na28.json"),
        r#"{"book_number": 40, "book_name": "Matthew", "chapters": {
            "10": {"verses": {"1": "Καὶ προσκαλεσάμενος"}},
            "2": {"verses": {"2": {"text": "λέγοντες"}, "1": "Τοῦ δὲ Ἰησοῦ", "3": ""}}
        }}"#,
    );
    write(&tr_dir.join("notes.json"), "{}");

    let summary = BatchConverter::new(&catalog, &layout).run().unwrap();
    assert_eq!(summary.files, 1);
    assert_eq!(summary.lines, 3);

    let text = fs::read_to_string(temp.path().join("txt_bibles/greek/na28/40-matthew-na28.txt")).unwrap();
    assert_eq!(
        text,
        "00001| Matthew 2:1 Τοῦ δὲ Ἰησοῦ\n\
         00002| Matthew 2:2 λέγοντες\n\
         00003| Matthew 10:1 Καὶ προσκαλεσάμενος\n"
    );
}

#[test]
fn psalms_chapters_are_read_in_numeric_order() {
    let temp = TempDir::new().unwrap();
    let catalog = Catalog::builtin();
    let layout = OutputLayout::new(temp.path());
    let store = ChapterStore::new(layout.clone());
    for chapter in [100, 11, 10, 9] {
        let text = format!("c{chapter}");
        save(&store, &catalog, "psalms", chapter, "kjv", &[text.as_str()]);
    }
    let expected = "Psalms 9:1 c9\nPsalms 10:1 c10\nPsalms 11:1 c11\nPsalms 100:1 c100\n";

    let psalms = catalog.book("psalms").unwrap();
    let path = convert_book(&catalog, &layout, "kjv", psalms).unwrap().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);

    fs::remove_file(&path).unwrap();
    BatchConverter::new(&catalog, &layout).run().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn chapter_records_without_translation_are_converted() {
    let temp = TempDir::new().unwrap();
    let catalog = Catalog::builtin();
    let layout = OutputLayout::new(temp.path());
    write(
        &layout.json_root().join("english/web/web_01-genesis/web_01-genesis_chapter-01.json"),
        r#"{"book": "genesis", "chapter": 1, "verses": [
            {"verse": 1, "text": "In the beginning"},
            {"verse": 2, "text": "The earth was formless"}
        ]}"#,
    );

    let summary = BatchConverter::new(&catalog, &layout).run().unwrap();
    assert_eq!(
        summary,
        ConvertSummary {
            translations: 1,
            files: 1,
            lines: 2,
            skipped_files: 0,
            failed: 0
        }
    );
    assert_eq!(
        fs::read_to_string(temp.path().join("txt_bibles/english/web/01-genesis-web.txt")).unwrap(),
        "Genesis 1:1 In the beginning\nGenesis 1:2 The earth was formless\n"
    );
}

#[test]
fn unreadable_chapter_file_is_skipped_and_the_book_still_converts() {
    let temp = TempDir::new().unwrap();
    let catalog = Catalog::builtin();
    let layout = OutputLayout::new(temp.path());
    let store = ChapterStore::new(layout.clone());
    save(&store, &catalog, "genesis", 1, "kjv", &["In the beginning"]);
    save(&store, &catalog, "genesis", 2, "asv", &["Thus the heavens"]);
    write(
        &layout.json_root().join("english/asv/asv_01-genesis/asv_01-genesis_chapter-01.json"),
        "not json",
    );

    let summary = BatchConverter::new(&catalog, &layout).run().unwrap();
    assert_eq!(summary.translations, 2);
    assert_eq!(summary.files, 2);
    assert_eq!(summary.skipped_files, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(
        fs::read_to_string(temp.path().join("txt_bibles/english/asv/01-genesis-asv.txt")).unwrap(),
        "Genesis 2:1 Thus the heavens\n"
    );
    assert!(temp.path().join("txt_bibles/english/kjv/01-genesis-kjv.txt").exists());
}
