use std::path::PathBuf;
use std::time::Duration;

use verse_core::{Book, Catalog, Chapter, Coverage, RunTally, Verse};
use verse_logging::{enter_unit, verse_error, verse_info, verse_warn};

use crate::convert::convert_book;
use crate::extract::ExtractContext;
use crate::fetch::Fetcher;
use crate::retry::{retry, RetryPolicy};
use crate::source::ChapterSource;
use crate::store::{ChapterStore, SaveOutcome};
use crate::{ChapterRef, FailureKind, FetchError, HarvestEvent};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: HarvestEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<HarvestEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<HarvestEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: HarvestEvent) {
        let _ = self.tx.send(event);
    }
}

/// Reports progress through the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&self, event: HarvestEvent) {
        match event {
            HarvestEvent::CoverageDetected {
                translation,
                coverage,
            } => verse_info!("{}: detected {}", translation.to_ascii_uppercase(), coverage),
            HarvestEvent::ChapterSaved {
                chapter, verses, ..
            } => verse_info!("Completed {} ({} verses)", chapter, verses),
            HarvestEvent::ChapterSkipped { chapter, .. } => {
                verse_info!("Skipping {} (already on disk)", chapter)
            }
            HarvestEvent::ChapterFailed { chapter, kind } => {
                verse_warn!("FAILED: {} ({})", chapter, kind)
            }
            HarvestEvent::BookAbandoned { translation, book } => verse_error!(
                "Could not save {} {}; moving on to the next book",
                translation.to_ascii_uppercase(),
                book
            ),
            HarvestEvent::BookConverted { path, .. } => {
                verse_info!("Created text file {}", path.display())
            }
            HarvestEvent::TranslationFinished { translation, tally } => verse_info!(
                "{} complete: {}/{} chapters ({:.1}%)",
                translation.to_ascii_uppercase(),
                tally.completed(),
                tally.attempted,
                tally.success_rate()
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Pause after every chapter that needed a request.
    pub chapter_delay: Duration,
    /// Pause between translations.
    pub translation_delay: Duration,
    pub save_retry: RetryPolicy,
    /// Attempts per probe chapter when detecting coverage.
    pub probe_attempts: u32,
    /// Write the book's text file after its chapters are downloaded.
    pub auto_convert: bool,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            chapter_delay: Duration::from_secs(2),
            translation_delay: Duration::from_secs(3),
            save_retry: RetryPolicy::fixed(10, Duration::from_secs(5)),
            probe_attempts: 2,
            auto_convert: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChapterOutcome {
    Saved { path: PathBuf, verses: usize },
    /// Already on disk; nothing was fetched.
    Skipped(PathBuf),
    /// Fetching or extracting failed after all retries.
    Failed(FailureKind),
    /// Verses were fetched but could not be written.
    SaveFailed(String),
}

/// Drives the download of chapters, books and translations from one source,
/// one request at a time.
pub struct Harvester<'a> {
    catalog: &'a Catalog,
    fetcher: &'a dyn Fetcher,
    source: &'a dyn ChapterSource,
    store: ChapterStore,
    options: HarvestOptions,
    sink: &'a dyn ProgressSink,
}

impl<'a> Harvester<'a> {
    pub fn new(
        catalog: &'a Catalog,
        fetcher: &'a dyn Fetcher,
        source: &'a dyn ChapterSource,
        store: ChapterStore,
        sink: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            catalog,
            fetcher,
            source,
            store,
            options: HarvestOptions::default(),
            sink,
        }
    }

    pub fn with_options(mut self, options: HarvestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &ChapterStore {
        &self.store
    }

    /// Fetches, extracts and saves one chapter. Never panics or aborts the
    /// run; the outcome says what happened.
    pub async fn download_chapter(
        &self,
        translation: &str,
        book: &Book,
        chapter: u32,
    ) -> ChapterOutcome {
        let chapter_ref = &ChapterRef {
            translation: translation.to_ascii_lowercase(),
            book: book.key,
            chapter,
        };
        let translation = chapter_ref.translation.as_str();
        let unit = chapter_ref.to_string();

        let path = self.store.layout().chapter_path(self.catalog, translation, book, chapter);
        if path.is_file() {
            self.sink.emit(HarvestEvent::ChapterSkipped {
                chapter: chapter_ref.clone(),
                path: path.clone(),
            });
            return ChapterOutcome::Skipped(path);
        }

        let fetched = self
            .fetch_verses(book, chapter, translation, &self.source.retry_policy())
            .await;
        self.pause(self.options.chapter_delay).await;

        let verses = match fetched {
            Ok(verses) => verses,
            Err(err) => {
                self.sink.emit(HarvestEvent::ChapterFailed {
                    chapter: chapter_ref.clone(),
                    kind: err.kind.clone(),
                });
                return ChapterOutcome::Failed(err.kind);
            }
        };

        let count = verses.len();
        let record = Chapter::new(book.key, chapter, translation, verses);
        let store = &self.store;
        let catalog = self.catalog;
        let record = &record;
        let unit = unit.as_str();
        let saved = retry(
            &self.options.save_retry,
            &format!("save {chapter_ref}"),
            |_| true,
            |_| async move {
                let _unit = enter_unit(unit);
                store.save(catalog, record)
            },
        )
        .await;

        match saved {
            Ok(SaveOutcome::Saved(path)) => {
                self.sink.emit(HarvestEvent::ChapterSaved {
                    chapter: chapter_ref.clone(),
                    verses: count,
                    path: path.clone(),
                });
                ChapterOutcome::Saved { path, verses: count }
            }
            Ok(SaveOutcome::AlreadyPresent(path)) => {
                self.sink.emit(HarvestEvent::ChapterSkipped {
                    chapter: chapter_ref.clone(),
                    path: path.clone(),
                });
                ChapterOutcome::Skipped(path)
            }
            Err(err) => {
                verse_error!("Failed to save {}: {}", chapter_ref, err);
                ChapterOutcome::SaveFailed(err.to_string())
            }
        }
    }

    /// One fetch-then-extract cycle under `policy`; an empty page counts as
    /// a retryable failure.
    async fn fetch_verses(
        &self,
        book: &Book,
        chapter: u32,
        translation: &str,
        policy: &RetryPolicy,
    ) -> Result<Vec<Verse>, FetchError> {
        let url = self.source.chapter_url(book, chapter, translation)?;
        let fetcher = self.fetcher;
        let extractor = self.source.extractor();
        let ctx = ExtractContext {
            book,
            chapter,
            translation,
        };
        let ctx = &ctx;
        let url = url.as_str();
        let label = format!("{} {} {}", translation.to_ascii_uppercase(), book.key, chapter);
        let unit = label.as_str();
        retry(
            policy,
            unit,
            |err: &FetchError| err.kind.is_retryable(),
            |_| async move {
                let page = fetcher.fetch(url).await?;
                // The label is thread-local, so it is only held while no
                // await point can move this task to another thread.
                let verses = {
                    let _unit = enter_unit(unit);
                    extractor.extract(&page.html, ctx)
                };
                if verses.is_empty() {
                    return Err(FetchError::new(
                        FailureKind::NoVerses,
                        format!("no verses in {}", page.metadata.final_url),
                    ));
                }
                Ok(verses)
            },
        )
        .await
    }

    /// Downloads every chapter of a book. A chapter that cannot be fetched
    /// is skipped; one that cannot be saved ends the book.
    pub async fn download_book(&self, translation: &str, book: &Book) -> RunTally {
        let translation = translation.to_ascii_lowercase();
        verse_info!(
            "Downloading {} {} ({} chapters)",
            translation.to_ascii_uppercase(),
            book.display,
            book.chapters
        );
        let mut tally = RunTally::new();
        for chapter in 1..=book.chapters {
            tally.attempted += 1;
            match self.download_chapter(&translation, book, chapter).await {
                ChapterOutcome::Saved { .. } => tally.saved += 1,
                ChapterOutcome::Skipped(_) => tally.skipped += 1,
                ChapterOutcome::Failed(_) => tally.failed += 1,
                ChapterOutcome::SaveFailed(_) => {
                    tally.failed += 1;
                    self.sink.emit(HarvestEvent::BookAbandoned {
                        translation: translation.clone(),
                        book: book.key,
                    });
                    break;
                }
            }
        }
        if self.options.auto_convert {
            self.convert(&translation, book);
        }
        tally
    }

    fn convert(&self, translation: &str, book: &Book) {
        match convert_book(self.catalog, self.store.layout(), translation, book) {
            Ok(Some(path)) => self.sink.emit(HarvestEvent::BookConverted {
                translation: translation.to_string(),
                book: book.key,
                path,
            }),
            Ok(None) => {}
            Err(err) => verse_error!("Could not convert {} {}: {}", translation, book.key, err),
        }
    }

    /// Which testaments a translation carries: from the catalog when known,
    /// otherwise by probing Genesis 1 and Matthew 1 if the source supports
    /// it. Anything undetermined is treated as the full canon.
    pub async fn detect_coverage(&self, translation: &str) -> Coverage {
        if let Some(known) = self.catalog.known_coverage(translation) {
            return known;
        }
        if !self.source.probes_coverage() {
            return Coverage::Full;
        }
        verse_info!("Detecting available books for {}", translation.to_ascii_uppercase());
        let policy = self
            .source
            .retry_policy()
            .with_max_attempts(self.options.probe_attempts);
        let has_old = self.probe(translation, "genesis", &policy).await;
        let has_new = self.probe(translation, "matthew", &policy).await;
        match Coverage::from_presence(has_old, has_new) {
            Coverage::Unknown => {
                verse_warn!(
                    "Could not detect any books for {}, assuming the full bible",
                    translation.to_ascii_uppercase()
                );
                Coverage::Full
            }
            coverage => coverage,
        }
    }

    async fn probe(&self, translation: &str, key: &str, policy: &RetryPolicy) -> bool {
        let Some(book) = self.catalog.book(key) else {
            return false;
        };
        let found = self.fetch_verses(book, 1, translation, policy).await.is_ok();
        self.pause(self.options.chapter_delay).await;
        found
    }

    /// Downloads every book of a translation that its coverage includes.
    pub async fn download_translation(&self, translation: &str) -> RunTally {
        let translation = translation.to_ascii_lowercase();
        verse_info!("=== Downloading translation {} ===", translation.to_ascii_uppercase());
        let coverage = self.detect_coverage(&translation).await;
        self.sink.emit(HarvestEvent::CoverageDetected {
            translation: translation.clone(),
            coverage,
        });

        let mut tally = RunTally::new();
        for book in self.catalog.books() {
            if !coverage.includes(book.number) {
                continue;
            }
            tally += self.download_book(&translation, book).await;
        }
        self.sink.emit(HarvestEvent::TranslationFinished {
            translation,
            tally,
        });
        tally
    }

    /// Runs several translations in order with a pause between them.
    pub async fn download_translations(&self, translations: &[String]) -> Vec<(String, RunTally)> {
        let mut results = Vec::with_capacity(translations.len());
        for (index, translation) in translations.iter().enumerate() {
            if index > 0 {
                self.pause(self.options.translation_delay).await;
            }
            verse_info!(
                "Translation {}/{}: {}",
                index + 1,
                translations.len(),
                translation.to_ascii_uppercase()
            );
            let tally = self.download_translation(translation).await;
            results.push((translation.to_ascii_lowercase(), tally));
        }
        results
    }

    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
