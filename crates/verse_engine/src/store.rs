use std::path::PathBuf;

use thiserror::Error;
use verse_core::{Catalog, Chapter};

use crate::layout::OutputLayout;
use crate::persist::{AtomicFileWriter, PersistError, WriteOutcome};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown book key {0}")]
    UnknownBook(String),
    #[error("chapter path has no parent directory: {}", .0.display())]
    InvalidPath(PathBuf),
    #[error("could not serialize chapter: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// A file for this chapter was already on disk; nothing was written.
    AlreadyPresent(PathBuf),
}

impl SaveOutcome {
    pub fn path(&self) -> &std::path::Path {
        match self {
            SaveOutcome::Saved(path) | SaveOutcome::AlreadyPresent(path) => path,
        }
    }
}

/// Persists one JSON file per chapter and never overwrites an existing one,
/// so an interrupted run can be resumed by running it again.
#[derive(Debug, Clone)]
pub struct ChapterStore {
    layout: OutputLayout,
}

impl ChapterStore {
    pub fn new(layout: OutputLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn chapter_path(
        &self,
        catalog: &Catalog,
        translation: &str,
        book: &str,
        chapter: u32,
    ) -> Result<PathBuf, StoreError> {
        let book = catalog
            .book(book)
            .ok_or_else(|| StoreError::UnknownBook(book.to_string()))?;
        Ok(self.layout.chapter_path(catalog, translation, book, chapter))
    }

    pub fn contains(&self, catalog: &Catalog, translation: &str, book: &str, chapter: u32) -> bool {
        self.chapter_path(catalog, translation, book, chapter)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    pub fn save(&self, catalog: &Catalog, chapter: &Chapter) -> Result<SaveOutcome, StoreError> {
        let path = self.chapter_path(catalog, &chapter.translation, &chapter.book, chapter.chapter)?;
        if path.exists() {
            return Ok(SaveOutcome::AlreadyPresent(path));
        }
        let Some((dir, filename)) = path
            .parent()
            .zip(path.file_name().and_then(|name| name.to_str()))
        else {
            return Err(StoreError::InvalidPath(path.clone()));
        };

        let json = serde_json::to_string_pretty(chapter)?;
        let writer = AtomicFileWriter::new(dir.to_path_buf());
        match writer.write_new(filename, &json)? {
            WriteOutcome::Written(path) => Ok(SaveOutcome::Saved(path)),
            WriteOutcome::Kept(path) => Ok(SaveOutcome::AlreadyPresent(path)),
        }
    }
}
