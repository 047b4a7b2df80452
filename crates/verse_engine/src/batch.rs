//! Converts everything under `json_bibles/` into `txt_bibles/`.
//!
//! Besides chapter records written by this crate, the converter accepts
//! per-book files dropped in flat (`{NN}-{book}-{tr}.json`) and whole-book
//! records that carry every chapter in one object.
use std::collections::BTreeMap;
use std::fs;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use verse_core::{clean_headings, normalize, Catalog, Coverage, Verse};
use verse_logging::{verse_debug, verse_error, verse_info, verse_warn};

use crate::convert::{chapter_files, json_files, read_json, write_lines, ConvertError};
use crate::layout::{parse_book_dir_name, parse_flat_book_file, text_file_name, OutputLayout};

/// Abbreviations seen in relabelled text that are not tied to one book.
const GENERIC_ABBREVS: &[&str] = &["Ch", "Chr", "Co"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Plain,
    /// `{index:05}| ` before each line; the index runs across a translation.
    Indexed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvertSummary {
    pub translations: u32,
    pub files: u32,
    pub lines: u64,
    /// Record files that could not be read or parsed and were left out.
    pub skipped_files: u32,
    /// Translations that could not be converted at all.
    pub failed: u32,
}

impl AddAssign for ConvertSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.translations += rhs.translations;
        self.files += rhs.files;
        self.lines += rhs.lines;
        self.skipped_files += rhs.skipped_files;
        self.failed += rhs.failed;
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BookRecord {
    Chapter(ChapterRecord),
    WholeBook(WholeBookRecord),
}

/// A chapter record from any source. Other fields, such as the
/// `translation` this crate writes, are ignored.
#[derive(Debug, Deserialize)]
struct ChapterRecord {
    book: String,
    chapter: u32,
    verses: Vec<Verse>,
}

#[derive(Debug, Deserialize)]
struct WholeBookRecord {
    book_number: u8,
    #[serde(default)]
    book_name: String,
    chapters: BTreeMap<String, WholeBookChapter>,
}

#[derive(Debug, Deserialize)]
struct WholeBookChapter {
    #[serde(default)]
    verses: BTreeMap<String, VerseValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VerseValue {
    Text(String),
    Object {
        #[serde(default)]
        text: String,
    },
}

impl VerseValue {
    fn text(&self) -> &str {
        match self {
            VerseValue::Text(text) | VerseValue::Object { text } => text,
        }
    }
}

/// Book numbers present in a translation directory, from book directories
/// if there are any, otherwise from flat per-book files.
pub fn detect_coverage(translation_dir: &Path) -> Result<Coverage, ConvertError> {
    let numbers: Vec<u8> = match list_book_dirs(translation_dir)? {
        dirs if !dirs.is_empty() => dirs
            .iter()
            .filter_map(|dir| file_name(dir).and_then(parse_book_dir_name))
            .map(|(number, _)| number)
            .collect(),
        _ => json_files(translation_dir)?
            .iter()
            .filter_map(|file| file_name(file).and_then(parse_flat_book_file))
            .map(|(number, _)| number)
            .collect(),
    };
    Ok(Coverage::from_book_numbers(numbers))
}

pub struct BatchConverter<'a> {
    catalog: &'a Catalog,
    layout: &'a OutputLayout,
    style: LineStyle,
}

impl<'a> BatchConverter<'a> {
    pub fn new(catalog: &'a Catalog, layout: &'a OutputLayout) -> Self {
        Self {
            catalog,
            layout,
            style: LineStyle::Plain,
        }
    }

    pub fn with_line_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    /// Converts every translation of every known language. A translation
    /// that fails is logged and counted; the others still run.
    pub fn run(&self) -> Result<ConvertSummary, ConvertError> {
        let mut summary = ConvertSummary::default();
        for language in self.catalog.language_dirs() {
            let language_dir = self.layout.json_root().join(language);
            for translation_dir in list_book_dirs(&language_dir)? {
                let Some(translation) = file_name(&translation_dir) else {
                    continue;
                };
                verse_info!("Processing {}/{}", language, translation);
                match self.convert_translation(language, translation) {
                    Ok(done) => summary += done,
                    Err(err) => {
                        verse_error!("Conversion of {}/{} failed: {}", language, translation, err);
                        summary.failed += 1;
                    }
                }
            }
        }
        verse_info!(
            "Conversion complete: {} translations, {} files, {} lines, {} unreadable files skipped",
            summary.translations,
            summary.files,
            summary.lines,
            summary.skipped_files
        );
        Ok(summary)
    }

    pub fn convert_translation(
        &self,
        language: &str,
        translation: &str,
    ) -> Result<ConvertSummary, ConvertError> {
        let json_dir = self.layout.json_root().join(language).join(translation);
        let text_dir = self.layout.text_root().join(language).join(translation);

        let coverage = detect_coverage(&json_dir)?;
        let starting_book = coverage.starting_book();
        verse_info!(
            "  Detected {} - starting from book {}",
            coverage,
            starting_book
        );

        let mut lines = LineWriter::new(self.style);
        let mut books: BTreeMap<u8, (String, Vec<String>)> = BTreeMap::new();
        let mut skipped_files = 0;
        let book_dirs = list_book_dirs(&json_dir)?;

        if !book_dirs.is_empty() {
            for dir in &book_dirs {
                let Some((number, key)) = file_name(dir).and_then(parse_book_dir_name) else {
                    verse_warn!("Skipping invalid directory: {}", dir.display());
                    continue;
                };
                if number < starting_book {
                    continue;
                }
                let entry = books.entry(number).or_insert_with(|| (key, Vec::new()));
                for file in chapter_files(dir)? {
                    match self.record_lines(&file, &mut lines) {
                        Ok(record_lines) => entry.1.extend(record_lines),
                        Err(err) => {
                            verse_warn!("Skipping unreadable file: {}", err);
                            skipped_files += 1;
                        }
                    }
                }
            }
        } else {
            for file in json_files(&json_dir)? {
                let Some((number, key)) = file_name(&file).and_then(parse_flat_book_file) else {
                    verse_warn!("Skipping invalid file: {}", file.display());
                    continue;
                };
                if number < starting_book {
                    continue;
                }
                let record_lines = match self.record_lines(&file, &mut lines) {
                    Ok(record_lines) => record_lines,
                    Err(err) => {
                        verse_warn!("Skipping unreadable file: {}", err);
                        skipped_files += 1;
                        continue;
                    }
                };
                books
                    .entry(number)
                    .or_insert_with(|| (key, Vec::new()))
                    .1
                    .extend(record_lines);
            }
        }

        let mut summary = ConvertSummary {
            translations: 1,
            skipped_files,
            ..ConvertSummary::default()
        };
        for (number, (key, book_lines)) in books {
            if book_lines.is_empty() {
                continue;
            }
            let path = text_dir.join(text_file_name(translation, number, &key));
            write_lines(&path, &book_lines)?;
            verse_debug!("  Created {} ({} verses)", path.display(), book_lines.len());
            summary.files += 1;
            summary.lines += book_lines.len() as u64;
        }
        Ok(summary)
    }

    fn record_lines(&self, path: &Path, lines: &mut LineWriter) -> Result<Vec<String>, ConvertError> {
        let record: BookRecord = read_json(path)?;
        Ok(match record {
            BookRecord::Chapter(chapter) => self.chapter_lines(&chapter, lines),
            BookRecord::WholeBook(book) => self.whole_book_lines(&book, lines),
        })
    }

    fn chapter_lines(&self, chapter: &ChapterRecord, lines: &mut LineWriter) -> Vec<String> {
        let display = self.catalog.display_name(&chapter.book);
        let abbrevs: Vec<String> = match self.catalog.book(&chapter.book) {
            Some(book) => book.text_abbrevs.iter().map(|a| a.to_string()).collect(),
            None => vec![display
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .chars()
                .take(3)
                .collect()],
        };

        let mut out = Vec::with_capacity(chapter.verses.len());
        for verse in &chapter.verses {
            let text = clean_headings(&normalize(&verse.text));
            let body = match embedded_reference(&text, chapter.chapter, &abbrevs) {
                Some((label, remainder)) => {
                    format!("{display} {}:{label} {remainder}", chapter.chapter)
                }
                None => format!("{display} {}:{} {text}", chapter.chapter, verse.number),
            };
            out.push(lines.line(body, false));
        }
        out
    }

    fn whole_book_lines(&self, record: &WholeBookRecord, lines: &mut LineWriter) -> Vec<String> {
        let display = match self.catalog.book_by_number(record.book_number) {
            Some(book) => book.display.to_string(),
            None => record.book_name.clone(),
        };
        let mut out = Vec::new();
        for (chapter, data) in numeric_entries(&record.chapters) {
            for (verse, value) in numeric_entries(&data.verses) {
                let text = clean_headings(&normalize(value.text()));
                if text.is_empty() {
                    continue;
                }
                out.push(lines.line(format!("{display} {chapter}:{verse} {text}"), true));
            }
        }
        out
    }
}

/// Verse text that starts with its own reference, e.g. `Gen 1:3 - And God
/// said`, carries the authoritative verse label. Returns the label and the
/// text after it.
fn embedded_reference(text: &str, chapter: u32, abbrevs: &[String]) -> Option<(String, String)> {
    let rest = abbrevs
        .iter()
        .map(String::as_str)
        .chain(GENERIC_ABBREVS.iter().copied())
        .find_map(|abbrev| text.strip_prefix(&format!("{abbrev} {chapter}:")))?;
    let rest = rest.trim_start();
    let space = rest.find(' ').filter(|pos| *pos > 0)?;
    let label = &rest[..space];
    let remainder = rest[space + 1..].trim_start();
    let remainder = remainder.strip_prefix("- ").map(str::trim_start).unwrap_or(remainder);
    Some((label.to_string(), remainder.to_string()))
}

struct LineWriter {
    style: LineStyle,
    next_index: u32,
}

impl LineWriter {
    fn new(style: LineStyle) -> Self {
        Self {
            style,
            next_index: 1,
        }
    }

    fn line(&mut self, body: String, force_index: bool) -> String {
        if force_index || self.style == LineStyle::Indexed {
            let index = self.next_index;
            self.next_index += 1;
            format!("{index:05}| {body}")
        } else {
            body
        }
    }
}

/// Entries whose keys parse as numbers, in numeric order.
fn numeric_entries<V>(map: &BTreeMap<String, V>) -> Vec<(u32, &V)> {
    let mut entries: Vec<(u32, &V)> = map
        .iter()
        .filter_map(|(key, value)| key.trim().parse::<u32>().ok().map(|n| (n, value)))
        .collect();
    entries.sort_by_key(|(n, _)| *n);
    entries
}

/// Subdirectories of `dir`, sorted. A missing directory has none.
fn list_book_dirs(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(ConvertError::Read {
                path: dir.to_path_buf(),
                source,
            })
        }
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}
