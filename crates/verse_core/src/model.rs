use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    #[serde(rename = "verse")]
    pub number: u32,
    pub text: String,
}

impl Verse {
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// One chapter as persisted on disk: `{book, chapter, translation, verses}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub book: String,
    pub chapter: u32,
    pub translation: String,
    pub verses: Vec<Verse>,
}

impl Chapter {
    /// Translation codes are always stored lowercase.
    pub fn new(book: &str, chapter: u32, translation: &str, verses: Vec<Verse>) -> Self {
        Self {
            book: book.to_string(),
            chapter,
            translation: translation.to_ascii_lowercase(),
            verses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Chapter, Verse};

    #[test]
    fn chapter_serializes_with_verse_key() {
        let chapter = Chapter::new("genesis", 1, "ESV", vec![Verse::new(1, "In the beginning")]);
        let json = serde_json::to_string(&chapter).unwrap();
        assert_eq!(
            json,
            r#"{"book":"genesis","chapter":1,"translation":"esv","verses":[{"verse":1,"text":"In the beginning"}]}"#
        );
    }
}
