//! Verse extraction from fetched chapter pages.
//!
//! Each site supplies an ordered list of strategies. A strategy either
//! declines (`None`) or returns raw candidates; candidates are validated and
//! deduplicated by [`finalize_verses`], and the first strategy with a
//! non-empty result wins.
mod blue_letter;
mod dom;
mod gateway;

use scraper::Html;
use verse_core::{finalize_verses, Book, Verse};
use verse_logging::verse_debug;

pub use blue_letter::BlueLetterExtractor;
pub use gateway::GatewayExtractor;

/// What is being extracted; some strategies build selectors from it.
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext<'a> {
    pub book: &'a Book,
    pub chapter: u32,
    pub translation: &'a str,
}

pub trait VerseExtractor: Send + Sync {
    /// Never fails: a page without usable content yields an empty list.
    fn extract(&self, html: &str, ctx: &ExtractContext<'_>) -> Vec<Verse>;
}

pub(crate) trait ExtractionStrategy {
    fn name(&self) -> &'static str;
    fn candidates(&self, doc: &Html, ctx: &ExtractContext<'_>) -> Option<Vec<Verse>>;
}

pub(crate) fn run_strategies(
    doc: &Html,
    ctx: &ExtractContext<'_>,
    strategies: &[&dyn ExtractionStrategy],
) -> Vec<Verse> {
    for strategy in strategies {
        let Some(candidates) = strategy.candidates(doc, ctx) else {
            continue;
        };
        let found = candidates.len();
        let verses = finalize_verses(candidates);
        verse_debug!(
            "{} {} {}: strategy {} kept {}/{} candidates",
            ctx.translation,
            ctx.book.key,
            ctx.chapter,
            strategy.name(),
            verses.len(),
            found
        );
        if !verses.is_empty() {
            return verses;
        }
    }
    Vec::new()
}
