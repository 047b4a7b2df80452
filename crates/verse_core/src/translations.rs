/// Parses a translation list: one code per line, first whitespace-delimited
/// token, lowercased. Blank lines are ignored and duplicates keep their first
/// position.
pub fn parse_translation_list(raw: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for line in raw.lines() {
        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        let code = token.to_ascii_lowercase();
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    codes
}

/// Resolves user input against a list: either a code (case-insensitive) or a
/// 1-based position.
pub fn resolve_translation(input: &str, available: &[String]) -> Option<String> {
    let needle = input.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return None;
    }
    if let Some(code) = available.iter().find(|code| **code == needle) {
        return Some(code.clone());
    }
    let position = needle.parse::<usize>().ok()?;
    position
        .checked_sub(1)
        .and_then(|idx| available.get(idx))
        .cloned()
}

/// Resolves a comma-separated selection. Returns the resolved codes in input
/// order without duplicates, plus the entries that did not resolve.
pub fn resolve_translations(input: &str, available: &[String]) -> (Vec<String>, Vec<String>) {
    let mut selected: Vec<String> = Vec::new();
    let mut invalid = Vec::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match resolve_translation(part, available) {
            Some(code) => {
                if !selected.contains(&code) {
                    selected.push(code);
                }
            }
            None => invalid.push(part.to_string()),
        }
    }
    (selected, invalid)
}
