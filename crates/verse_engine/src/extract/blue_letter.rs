use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use verse_core::{normalize, Verse};

use super::dom::{joined_text, nearest_ancestor};
use super::{run_strategies, ExtractContext, ExtractionStrategy, VerseExtractor};

static SEL_BIBLE_ID: Lazy<Selector> = Lazy::new(|| Selector::parse("div[data-bible-id]").unwrap());
static SEL_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

static RE_REFERENCE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+\s+\d+:\d+\s*[-\u{2013}\u{2014}]\s*").unwrap());
static RE_NUMBER_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.?\s*").unwrap());
static RE_LAST_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\D*$").unwrap());

/// Container text shorter than this is replaced by its parent's text.
const MIN_CONTAINER_CHARS: usize = 10;
const CONTAINER_TAGS: &[&str] = &["div", "p", "span"];

/// Blue Letter Bible chapter pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlueLetterExtractor;

impl VerseExtractor for BlueLetterExtractor {
    fn extract(&self, html: &str, ctx: &ExtractContext<'_>) -> Vec<Verse> {
        let doc = Html::parse_document(html);
        run_strategies(&doc, ctx, &[&BibleIdContainers, &VerseLinks])
    }
}

/// `div[data-bible-id]` blocks, numbered by the id.
struct BibleIdContainers;

impl ExtractionStrategy for BibleIdContainers {
    fn name(&self) -> &'static str {
        "bible-id"
    }

    fn candidates(&self, doc: &Html, _ctx: &ExtractContext<'_>) -> Option<Vec<Verse>> {
        let mut candidates = Vec::new();
        for container in doc.select(&SEL_BIBLE_ID) {
            let id = container.value().attr("data-bible-id").unwrap_or_default();
            let Some(number) = verse_number_from_id(id) else {
                continue;
            };
            let text = container_text(container);
            if text.chars().count() > 1 {
                candidates.push(Verse::new(number, text));
            }
        }
        (!candidates.is_empty()).then_some(candidates)
    }
}

/// Links to individual verse pages, numbered in link order.
struct VerseLinks;

impl ExtractionStrategy for VerseLinks {
    fn name(&self) -> &'static str {
        "verse-links"
    }

    fn candidates(&self, doc: &Html, ctx: &ExtractContext<'_>) -> Option<Vec<Verse>> {
        let pattern = format!(
            r"(?i)/{}/{}/{}/(\d+)(?:[/?#]|$)",
            regex::escape(ctx.translation),
            regex::escape(ctx.book.url_abbrev),
            ctx.chapter
        );
        let link_re = Regex::new(&pattern).ok()?;

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for link in doc.select(&SEL_LINK) {
            let href = link.value().attr("href").unwrap_or_default();
            let Some(linked) = link_re.captures(href).and_then(|c| c[1].parse::<u32>().ok()) else {
                continue;
            };
            if !seen.insert(linked) {
                continue;
            }
            let Some(container) = nearest_ancestor(link, CONTAINER_TAGS) else {
                continue;
            };
            let text = container_text(container);
            if text.chars().count() > 1 {
                // Sequential on purpose: the linked number is only used for dedupe.
                candidates.push(Verse::new(candidates.len() as u32 + 1, text));
            }
        }
        (!candidates.is_empty()).then_some(candidates)
    }
}

/// The last run of digits in the id. Packed ids (`BBCCCVVV`, seven or more
/// digits) carry the verse in their last three digits.
fn verse_number_from_id(id: &str) -> Option<u32> {
    let digits = RE_LAST_DIGITS.captures(id)?.get(1)?.as_str();
    if digits.len() >= 7 {
        digits[digits.len() - 3..].parse().ok()
    } else {
        digits.parse().ok()
    }
}

fn container_text(container: ElementRef<'_>) -> String {
    let mut text = joined_text(container);
    if text.chars().count() < MIN_CONTAINER_CHARS {
        if let Some(parent) = nearest_ancestor(container, CONTAINER_TAGS) {
            text = joined_text(parent);
        }
    }
    strip_labels(&normalize(&text))
}

fn strip_labels(text: &str) -> String {
    let text = RE_REFERENCE_LABEL.replace(text, "");
    let text = RE_NUMBER_LABEL.replace(&text, "");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{strip_labels, verse_number_from_id};

    #[test]
    fn ids_yield_verse_numbers() {
        assert_eq!(verse_number_from_id("verse-12"), Some(12));
        assert_eq!(verse_number_from_id("1001031"), Some(31));
        assert_eq!(verse_number_from_id("gen_1_3"), Some(3));
        assert_eq!(verse_number_from_id("none"), None);
    }

    #[test]
    fn leading_reference_labels_are_removed() {
        assert_eq!(strip_labels("Gen 1:1 - In the beginning"), "In the beginning");
        assert_eq!(strip_labels("Gen 1:2 \u{2014} And the earth"), "And the earth");
        assert_eq!(strip_labels("3. And God said"), "And God said");
        assert_eq!(strip_labels("Plain text"), "Plain text");
    }
}
