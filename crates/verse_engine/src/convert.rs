use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use verse_core::{normalize, Book, Catalog, Chapter};

use crate::layout::{parse_chapter_file_number, OutputLayout};
use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed record {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("output path has no parent directory: {}", .0.display())]
    InvalidPath(PathBuf),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// `.json` files directly inside `dir`, sorted by file name. A missing
/// directory has no files.
pub(crate) fn json_files(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(ConvertError::Read {
                path: dir.to_path_buf(),
                source,
            })
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

/// Chapter files of one book directory in chapter order. Names without a
/// chapter number go last, by name.
pub(crate) fn chapter_files(book_dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let mut files = json_files(book_dir)?;
    files.sort_by_cached_key(|path| {
        let number = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(parse_chapter_file_number);
        (number.unwrap_or(u32::MAX), path.clone())
    });
    Ok(files)
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConvertError> {
    let raw = fs::read_to_string(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConvertError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Lines `{Display} {chapter}:{verse} {text}` for every chapter file in
/// `book_dir`, in chapter order.
pub fn book_lines(display: &str, book_dir: &Path) -> Result<Vec<String>, ConvertError> {
    let mut lines = Vec::new();
    for path in chapter_files(book_dir)? {
        let chapter: Chapter = read_json(&path)?;
        for verse in &chapter.verses {
            lines.push(format!(
                "{display} {}:{} {}",
                chapter.chapter,
                verse.number,
                normalize(&verse.text)
            ));
        }
    }
    Ok(lines)
}

/// Writes lines joined by newlines with a trailing newline, replacing `path`.
pub(crate) fn write_lines(path: &Path, lines: &[String]) -> Result<PathBuf, ConvertError> {
    let (Some(dir), Some(filename)) = (path.parent(), path.file_name().and_then(|n| n.to_str()))
    else {
        return Err(ConvertError::InvalidPath(path.to_path_buf()));
    };
    let mut content = lines.join("\n");
    content.push('\n');
    Ok(AtomicFileWriter::new(dir.to_path_buf()).write(filename, &content)?)
}

/// Flattens one book of one translation into its text file. Returns `None`
/// and writes nothing when the book has no chapter files.
pub fn convert_book(
    catalog: &Catalog,
    layout: &OutputLayout,
    translation: &str,
    book: &Book,
) -> Result<Option<PathBuf>, ConvertError> {
    let book_dir = layout.book_dir(catalog, translation, book);
    let lines = book_lines(book.display, &book_dir)?;
    if lines.is_empty() {
        return Ok(None);
    }
    let path = layout.text_path(catalog, translation, book);
    write_lines(&path, &lines).map(Some)
}
