use std::collections::BTreeMap;

use crate::Verse;

pub const MAX_VERSE_NUMBER: u32 = 200;
pub const MAX_VERSE_CHARS: usize = 5000;

/// Turns raw extraction candidates into a chapter's verse list.
///
/// Candidates outside `1..=MAX_VERSE_NUMBER` or with text outside
/// `1..=MAX_VERSE_CHARS` characters are dropped. When a number repeats, the
/// longer text wins (the earlier one on a tie). The result is ascending.
pub fn finalize_verses<I>(candidates: I) -> Vec<Verse>
where
    I: IntoIterator<Item = Verse>,
{
    let mut by_number: BTreeMap<u32, Verse> = BTreeMap::new();
    for candidate in candidates {
        if !is_valid(&candidate) {
            continue;
        }
        match by_number.get(&candidate.number) {
            Some(existing) if char_len(&existing.text) >= char_len(&candidate.text) => {}
            _ => {
                by_number.insert(candidate.number, candidate);
            }
        }
    }
    by_number.into_values().collect()
}

fn is_valid(verse: &Verse) -> bool {
    let len = char_len(&verse.text);
    (1..=MAX_VERSE_NUMBER).contains(&verse.number) && (1..=MAX_VERSE_CHARS).contains(&len)
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
