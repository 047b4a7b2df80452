use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use verse_core::{normalize, Verse};

use super::dom::{
    collect_text, has_ancestor_tag, has_any_class, has_class_containing, verse_number_from_classes,
};
use super::{run_strategies, ExtractContext, ExtractionStrategy, VerseExtractor};

static SEL_SPAN: Lazy<Selector> = Lazy::new(|| Selector::parse("span").unwrap());
static SEL_HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").unwrap());
static SEL_PASSAGE_TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".passage-content .text-html").unwrap());
static SEL_PASSAGE: Lazy<Selector> = Lazy::new(|| Selector::parse(".passage-content").unwrap());

/// Labels and markers that sit inside verse spans but are not verse text.
const NOISE_CLASSES: &[&str] = &["chapternum", "versenum", "crossreference", "footnote"];

/// BibleGateway passage pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct GatewayExtractor;

impl VerseExtractor for GatewayExtractor {
    fn extract(&self, html: &str, ctx: &ExtractContext<'_>) -> Vec<Verse> {
        let doc = Html::parse_document(html);
        run_strategies(&doc, ctx, &[&PassageRegion, &WholeDocument])
    }
}

/// The passage container, verse spans grouped by number, headings prepended.
struct PassageRegion;

impl ExtractionStrategy for PassageRegion {
    fn name(&self) -> &'static str {
        "passage-region"
    }

    fn candidates(&self, doc: &Html, ctx: &ExtractContext<'_>) -> Option<Vec<Verse>> {
        let region = find_region(doc, ctx.translation)?;
        let headings = headings_by_verse(region);
        let fragments = verse_fragments(region);
        if fragments.is_empty() {
            return None;
        }
        Some(
            fragments
                .into_iter()
                .map(|(number, parts)| {
                    let body = parts.join(" ");
                    let text = match headings.get(&number) {
                        Some(heading) => format!("({heading}) {body}"),
                        None => body,
                    };
                    Verse::new(number, normalize(&text))
                })
                .collect(),
        )
    }
}

/// Any verse span anywhere in the page, for layouts without a known container.
struct WholeDocument;

impl ExtractionStrategy for WholeDocument {
    fn name(&self) -> &'static str {
        "whole-document"
    }

    fn candidates(&self, doc: &Html, _ctx: &ExtractContext<'_>) -> Option<Vec<Verse>> {
        let fragments = verse_fragments(doc.root_element());
        if fragments.is_empty() {
            return None;
        }
        Some(
            fragments
                .into_iter()
                .map(|(number, parts)| Verse::new(number, normalize(&parts.join(" "))))
                .collect(),
        )
    }
}

fn find_region<'a>(doc: &'a Html, translation: &str) -> Option<ElementRef<'a>> {
    if let Some(region) = doc.select(&SEL_PASSAGE_TEXT).next() {
        return Some(region);
    }
    if let Some(region) = doc.select(&SEL_PASSAGE).next() {
        return Some(region);
    }
    let version = Selector::parse(&format!(".version-{}", translation.to_ascii_uppercase())).ok()?;
    doc.select(&version).next()
}

fn is_noise(element: ElementRef<'_>) -> bool {
    has_any_class(element, NOISE_CLASSES)
}

/// A verse span carries a `text` class plus a `Book-chapter-verse` marker.
fn is_verse_span(element: ElementRef<'_>) -> bool {
    has_class_containing(element, "text")
}

/// Verse text fragments in document order, grouped by verse number. Spans
/// inside headings or nested in another verse span are not fragments.
fn verse_fragments(scope: ElementRef<'_>) -> BTreeMap<u32, Vec<String>> {
    let mut grouped: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for span in scope.select(&SEL_SPAN) {
        if !is_verse_span(span) || has_ancestor_tag(span, &["h3"]) || inside_verse_span(span) {
            continue;
        }
        let Some(number) = verse_number_from_classes(span) else {
            continue;
        };
        let text = normalize(&collect_text(span, &is_noise));
        if !text.is_empty() {
            grouped.entry(number).or_default().push(text);
        }
    }
    grouped
}

fn inside_verse_span(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == "span" && is_verse_span(ancestor))
}

/// Section headings keyed by the verse their marker names.
fn headings_by_verse(region: ElementRef<'_>) -> HashMap<u32, String> {
    let mut headings = HashMap::new();
    for heading in region.select(&SEL_HEADING) {
        let Some(number) = heading
            .select(&SEL_SPAN)
            .filter(|span| is_verse_span(*span))
            .find_map(verse_number_from_classes)
        else {
            continue;
        };
        let text = normalize(&collect_text(heading, &is_noise));
        if !text.is_empty() {
            headings.entry(number).or_insert(text);
        }
    }
    headings
}
