use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// Strong's numbers may follow NBSP or the U+2000..U+200F space/format block.
static RE_STRONGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\u{00A0}\u{2000}-\u{200F}]+[HG]\d+\b").unwrap());
static RE_ARROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*➔\s*").unwrap());
static RE_FOOTNOTE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\[fn\]\s*").unwrap());
static RE_SPLIT_LORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bL\s+ORD\b").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static RE_MARKED_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]*\([A-Z][^)]*\))+\)").unwrap());
static RE_LETTER_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\([A-Z](?:\([^)]*\))*\)(?:\([A-Z](?:\([^)]*\))*\))*").unwrap()
});
static RE_SINGLE_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([A-Z]\)\s*").unwrap());

/// Strips Strong's codes, arrow glyphs and `[fn]` tags, repairs "L ORD" and
/// collapses whitespace. Total: every input yields a string.
pub fn normalize(raw: &str) -> String {
    let text = RE_STRONGS.replace_all(raw, "");
    let text = RE_ARROW.replace_all(&text, " ");
    let text = RE_FOOTNOTE_TAG.replace_all(&text, " ");
    let text = RE_SPLIT_LORD.replace_all(&text, "LORD");
    RE_WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Tidies parenthesized section headings prepended to verse text:
/// footnote letters nested in the heading are dropped, and a heading that is
/// repeated right after its parenthesized form is removed.
pub fn clean_headings(text: &str) -> String {
    let cleaned = RE_MARKED_HEADING.replace_all(text, |caps: &Captures| {
        strip_letter_markers(&caps[0])
    });
    drop_repeated_heading(&cleaned)
}

fn strip_letter_markers(heading: &str) -> String {
    let cleaned = RE_LETTER_MARKERS.replace_all(heading, "");
    RE_SINGLE_LETTER
        .replace_all(&cleaned, "")
        .trim()
        .to_string()
}

fn drop_repeated_heading(text: &str) -> String {
    let Some(rest) = text.strip_prefix('(') else {
        return text.to_string();
    };
    let Some(close) = rest.find(')') else {
        return text.to_string();
    };
    let heading = &rest[..close];
    if heading.is_empty() {
        return text.to_string();
    }
    let after = rest[close + 1..].trim_start();
    match after.strip_prefix(heading) {
        Some(tail) if tail.starts_with(char::is_whitespace) => {
            format!("({}) {}", strip_letter_markers(heading), tail.trim_start())
        }
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{clean_headings, normalize};
    use pretty_assertions::assert_eq;

    #[test]
    fn strongs_codes_are_removed_with_leading_space() {
        assert_eq!(normalize("in the beginning  H123 God"), "in the beginning God");
        assert_eq!(normalize("the word\u{00A0}G3056 was"), "the word was");
        assert_eq!(normalize("light\u{2009}H216\u{2009}and"), "light and");
    }

    #[test]
    fn strongs_lookalikes_inside_words_survive() {
        assert_eq!(normalize("H2O and G7s"), "H2O and G7s");
    }

    #[test]
    fn split_lord_is_repaired() {
        assert_eq!(normalize("the L ORD said"), "the LORD said");
        assert_eq!(normalize("ALL ORDERS"), "ALL ORDERS");
    }

    #[test]
    fn arrow_and_footnote_tags_become_single_spaces() {
        assert_eq!(normalize("see  ➔  this [fn] here"), "see this here");
    }

    #[test]
    fn whitespace_is_collapsed_and_trimmed() {
        assert_eq!(normalize("  a \n\t b  "), "a b");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn heading_footnote_letters_are_dropped() {
        assert_eq!(
            clean_headings("(The Creation(A)(B)) In the beginning"),
            "(The Creation) In the beginning"
        );
    }

    #[test]
    fn repeated_heading_is_dropped() {
        assert_eq!(
            clean_headings("(The Fall) The Fall Now the serpent"),
            "(The Fall) Now the serpent"
        );
        assert_eq!(clean_headings("(Note) Nothing repeated"), "(Note) Nothing repeated");
        assert_eq!(clean_headings("plain text"), "plain text");
    }
}
