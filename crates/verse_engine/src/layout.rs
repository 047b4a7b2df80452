//! Output tree naming.
//!
//! ```text
//! {root}/json_bibles/{language}/{tr}/{tr}_{NN}-{book}/{tr}_{NN}-{book}_chapter-{CC}.json
//! {root}/txt_bibles/{language}/{tr}/{NN}-{book}-{tr}.txt
//! {root}/summary.json
//! ```
use std::path::{Path, PathBuf};

use verse_core::{Book, Catalog};

const JSON_DIR: &str = "json_bibles";
const TEXT_DIR: &str = "txt_bibles";
const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn json_root(&self) -> PathBuf {
        self.root.join(JSON_DIR)
    }

    pub fn text_root(&self) -> PathBuf {
        self.root.join(TEXT_DIR)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.root.join(SUMMARY_FILE)
    }

    pub fn json_translation_dir(&self, catalog: &Catalog, translation: &str) -> PathBuf {
        let tr = sanitize_component(translation);
        self.json_root()
            .join(catalog.language_for(translation))
            .join(tr)
    }

    pub fn text_translation_dir(&self, catalog: &Catalog, translation: &str) -> PathBuf {
        let tr = sanitize_component(translation);
        self.text_root()
            .join(catalog.language_for(translation))
            .join(tr)
    }

    pub fn book_dir(&self, catalog: &Catalog, translation: &str, book: &Book) -> PathBuf {
        self.json_translation_dir(catalog, translation)
            .join(book_dir_name(translation, book.number, book.key))
    }

    pub fn chapter_path(
        &self,
        catalog: &Catalog,
        translation: &str,
        book: &Book,
        chapter: u32,
    ) -> PathBuf {
        self.book_dir(catalog, translation, book)
            .join(chapter_file_name(translation, book.number, book.key, chapter))
    }

    pub fn text_path(&self, catalog: &Catalog, translation: &str, book: &Book) -> PathBuf {
        self.text_translation_dir(catalog, translation)
            .join(text_file_name(translation, book.number, book.key))
    }
}

pub fn book_dir_name(translation: &str, number: u8, key: &str) -> String {
    let tr = sanitize_component(translation);
    format!("{tr}_{number:02}-{key}")
}

pub fn chapter_file_name(translation: &str, number: u8, key: &str, chapter: u32) -> String {
    format!("{}_chapter-{chapter:02}.json", book_dir_name(translation, number, key))
}

pub fn text_file_name(translation: &str, number: u8, key: &str) -> String {
    let tr = sanitize_component(translation);
    format!("{number:02}-{key}-{tr}.txt")
}

/// Chapter number of a chapter file name like `kjv_19-psalms_chapter-119.json`.
/// Numbers are padded to two digits only, so file names do not sort by chapter.
pub fn parse_chapter_file_number(name: &str) -> Option<u32> {
    let base = name.strip_suffix(".json")?;
    let (_, number) = base.rsplit_once("chapter-")?;
    number.parse().ok()
}

/// Parses a book directory name like `esv_01-genesis` into `(1, "genesis")`.
pub fn parse_book_dir_name(name: &str) -> Option<(u8, String)> {
    let (_, rest) = name.split_once('_')?;
    let (number, key) = rest.split_once('-')?;
    let number = number.parse::<u8>().ok()?;
    (!key.is_empty()).then(|| (number, key.to_string()))
}

/// Parses a flat per-book file name: `40-matthew-na28.json` or `40_matthew.json`.
/// Hyphenated names need at least three parts; the last one is the translation.
pub fn parse_flat_book_file(name: &str) -> Option<(u8, String)> {
    let base = name.strip_suffix(".json")?;
    if base.contains('-') {
        let parts: Vec<&str> = base.split('-').collect();
        if parts.len() < 3 {
            return None;
        }
        let number = parts[0].parse::<u8>().ok()?;
        return Some((number, parts[1..parts.len() - 1].join("-")));
    }
    let (number, key) = base.split_once('_')?;
    let number = number.parse::<u8>().ok()?;
    (!key.is_empty()).then(|| (number, key.to_string()))
}

/// Keeps user-supplied codes from escaping their directory.
pub fn sanitize_component(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
