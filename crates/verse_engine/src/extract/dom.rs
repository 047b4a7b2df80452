use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::ElementRef;

/// Concatenates the text under `element`, skipping any subtree for which
/// `skip` returns true, plus script/style content.
pub(crate) fn collect_text<F>(element: ElementRef<'_>, skip: &F) -> String
where
    F: Fn(ElementRef<'_>) -> bool,
{
    let mut out = String::new();
    for child in element.children() {
        visit_node(child, skip, &mut |text| out.push_str(text));
    }
    out
}

/// Text nodes under `element`, each trimmed, empty ones dropped, joined by a
/// single space.
pub(crate) fn joined_text(element: ElementRef<'_>) -> String {
    let mut pieces: Vec<String> = Vec::new();
    for child in element.children() {
        visit_node(child, &|_| false, &mut |text| {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                pieces.push(trimmed.to_string());
            }
        });
    }
    pieces.join(" ")
}

fn visit_node<'a, F, S>(node: NodeRef<'a, Node>, skip: &F, sink: &mut S)
where
    F: Fn(ElementRef<'a>) -> bool,
    S: FnMut(&str),
{
    match node.value() {
        Node::Text(text) => sink(text),
        Node::Element(element) => {
            let name = element.name();
            if matches!(name, "script" | "style" | "noscript" | "template") {
                return;
            }
            if let Some(el) = ElementRef::wrap(node) {
                if skip(el) {
                    return;
                }
            }
            for child in node.children() {
                visit_node(child, skip, sink);
            }
        }
        _ => {
            for child in node.children() {
                visit_node(child, skip, sink);
            }
        }
    }
}

pub(crate) fn has_any_class(element: ElementRef<'_>, classes: &[&str]) -> bool {
    element
        .value()
        .classes()
        .any(|class| classes.contains(&class))
}

pub(crate) fn has_class_containing(element: ElementRef<'_>, needle: &str) -> bool {
    element.value().classes().any(|class| class.contains(needle))
}

/// Nearest ancestor element whose tag is one of `tags`.
pub(crate) fn nearest_ancestor<'a>(element: ElementRef<'a>, tags: &[&str]) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| tags.contains(&ancestor.value().name()))
}

pub(crate) fn has_ancestor_tag(element: ElementRef<'_>, tags: &[&str]) -> bool {
    nearest_ancestor(element, tags).is_some()
}

/// Verse number from a composite class such as `Gen-1-1` or `1Sam-3-10`:
/// the first class containing a hyphen (other than `text`) must have at least
/// three parts, and its last part is the verse.
pub(crate) fn verse_number_from_classes(element: ElementRef<'_>) -> Option<u32> {
    let marker = element
        .value()
        .classes()
        .find(|class| *class != "text" && class.contains('-'))?;
    let parts: Vec<&str> = marker.split('-').collect();
    if parts.len() < 3 {
        return None;
    }
    parts.last()?.parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::{collect_text, has_any_class, joined_text, verse_number_from_classes};

    fn first<'a>(doc: &'a Html, css: &str) -> scraper::ElementRef<'a> {
        let sel = Selector::parse(css).unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn skipped_subtrees_do_not_contribute_text() {
        let doc = Html::parse_fragment(
            r#"<span class="text Gen-1-1"><sup class="versenum">1 </sup>In the <sup class="footnote">[a]</sup>beginning</span>"#,
        );
        let span = first(&doc, "span");
        let text = collect_text(span, &|el| has_any_class(el, &["versenum", "footnote"]));
        assert_eq!(text, "In the beginning");
    }

    #[test]
    fn joined_text_trims_each_piece() {
        let doc = Html::parse_fragment("<div> a <b> b </b>\n<i></i> c </div>");
        assert_eq!(joined_text(first(&doc, "div")), "a b c");
    }

    #[test]
    fn verse_number_comes_from_last_part_of_marker_class() {
        let doc = Html::parse_fragment(
            r#"<span class="text Job-29-2">x</span><span class="text Ps-1">y</span><span class="text">z</span>"#,
        );
        let sel = Selector::parse("span").unwrap();
        let numbers: Vec<Option<u32>> = doc.select(&sel).map(verse_number_from_classes).collect();
        assert_eq!(numbers, vec![Some(2), None, None]);
    }
}
