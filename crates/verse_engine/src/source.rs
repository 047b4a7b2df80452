//! The two chapter sources: URL scheme, extractor and retry defaults per site.
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;
use verse_core::Book;

use crate::extract::{BlueLetterExtractor, GatewayExtractor, VerseExtractor};
use crate::retry::RetryPolicy;
use crate::{FailureKind, FetchError};

pub const GATEWAY_BASE_URL: &str = "https://www.biblegateway.com";
pub const BLUE_LETTER_BASE_URL: &str = "https://www.blueletterbible.org";

/// Translation list consulted for BibleGateway when none is given.
pub const GATEWAY_VERSIONS_FILE: &str = "biblegateway-versions-available.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    BibleGateway,
    BlueLetter,
}

impl Site {
    pub fn name(self) -> &'static str {
        match self {
            Site::BibleGateway => "biblegateway",
            Site::BlueLetter => "blueletter",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Site {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "biblegateway" | "gateway" | "bg" => Ok(Site::BibleGateway),
            "blueletter" | "blueletterbible" | "blb" => Ok(Site::BlueLetter),
            other => Err(format!(
                "unknown site '{other}' (expected biblegateway or blueletter)"
            )),
        }
    }
}

/// A site that serves one chapter per page.
pub trait ChapterSource: Send + Sync {
    fn site(&self) -> Site;
    fn chapter_url(&self, book: &Book, chapter: u32, translation: &str) -> Result<String, FetchError>;
    fn extractor(&self) -> &dyn VerseExtractor;
    /// Policy for the fetch-then-extract cycle of one chapter.
    fn retry_policy(&self) -> RetryPolicy;
    /// Whether coverage of an unlisted translation is found by probing
    /// Genesis 1 and Matthew 1.
    fn probes_coverage(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
pub struct BibleGateway {
    base_url: String,
    retry: RetryPolicy,
    extractor: GatewayExtractor,
}

impl BibleGateway {
    pub fn new() -> Self {
        Self::with_base_url(GATEWAY_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_base(base_url.into()),
            retry: RetryPolicy::fixed(3, Duration::from_secs(3)),
            extractor: GatewayExtractor,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for BibleGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl ChapterSource for BibleGateway {
    fn site(&self) -> Site {
        Site::BibleGateway
    }

    fn chapter_url(&self, book: &Book, chapter: u32, translation: &str) -> Result<String, FetchError> {
        let search = format!("{} {chapter}", book.display);
        let version = translation.to_ascii_uppercase();
        let url = Url::parse_with_params(
            &format!("{}/passage/", self.base_url),
            &[("search", search.as_str()), ("version", version.as_str())],
        )
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        Ok(url.into())
    }

    fn extractor(&self) -> &dyn VerseExtractor {
        &self.extractor
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    fn probes_coverage(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct BlueLetter {
    base_url: String,
    retry: RetryPolicy,
    extractor: BlueLetterExtractor,
}

impl BlueLetter {
    pub fn new() -> Self {
        Self::with_base_url(BLUE_LETTER_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_base(base_url.into()),
            retry: RetryPolicy::exponential(3, Duration::from_secs(5)),
            extractor: BlueLetterExtractor,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for BlueLetter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChapterSource for BlueLetter {
    fn site(&self) -> Site {
        Site::BlueLetter
    }

    fn chapter_url(&self, book: &Book, chapter: u32, translation: &str) -> Result<String, FetchError> {
        let raw = format!(
            "{}/{}/{}/{chapter}/1/",
            self.base_url,
            translation.to_ascii_lowercase(),
            book.url_abbrev
        );
        let url = Url::parse(&raw)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        Ok(url.into())
    }

    fn extractor(&self) -> &dyn VerseExtractor {
        &self.extractor
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use verse_core::Catalog;

    use super::*;

    #[test]
    fn gateway_url_carries_title_chapter_and_upper_case_version() {
        let catalog = Catalog::builtin();
        let book = catalog.book("1-samuel").unwrap();
        let url = BibleGateway::new().chapter_url(book, 3, "esv").unwrap();
        assert_eq!(
            url,
            "https://www.biblegateway.com/passage/?search=1+Samuel+3&version=ESV"
        );
    }

    #[test]
    fn blue_letter_url_uses_abbreviation() {
        let catalog = Catalog::builtin();
        let book = catalog.book("genesis").unwrap();
        let url = BlueLetter::with_base_url("http://127.0.0.1:9999/")
            .chapter_url(book, 12, "KJV")
            .unwrap();
        assert_eq!(url, "http://127.0.0.1:9999/kjv/gen/12/1/");
    }

    #[test]
    fn malformed_base_is_an_invalid_url() {
        let catalog = Catalog::builtin();
        let book = catalog.book("genesis").unwrap();
        let err = BlueLetter::with_base_url("not a url")
            .chapter_url(book, 1, "kjv")
            .unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }

    #[test]
    fn sites_parse_from_aliases() {
        assert_eq!("BLB".parse::<Site>(), Ok(Site::BlueLetter));
        assert_eq!("gateway".parse::<Site>(), Ok(Site::BibleGateway));
        assert!("other".parse::<Site>().is_err());
    }
}
