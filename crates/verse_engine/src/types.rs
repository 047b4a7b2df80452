use std::fmt;
use std::path::PathBuf;

use verse_core::{Coverage, RunTally};

/// Identifies one chapter of one translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRef {
    pub translation: String,
    pub book: &'static str,
    pub chapter: u32,
}

impl fmt::Display for ChapterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.translation.to_ascii_uppercase(),
            self.book,
            self.chapter
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HarvestEvent {
    CoverageDetected {
        translation: String,
        coverage: Coverage,
    },
    ChapterSaved {
        chapter: ChapterRef,
        verses: usize,
        path: PathBuf,
    },
    ChapterSkipped {
        chapter: ChapterRef,
        path: PathBuf,
    },
    ChapterFailed {
        chapter: ChapterRef,
        kind: FailureKind,
    },
    BookAbandoned {
        translation: String,
        book: &'static str,
    },
    BookConverted {
        translation: String,
        book: &'static str,
        path: PathBuf,
    },
    TranslationFinished {
        translation: String,
        tally: RunTally,
    },
}

/// A chapter page decoded to UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub html: String,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub requested_url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    /// Label of the encoding the body was decoded from.
    pub encoding: String,
    pub byte_len: u64,
}

impl FetchMetadata {
    pub fn redirected(&self) -> bool {
        self.requested_url != self.final_url
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Decode { encoding: String },
    /// The page was fetched but held no usable verses.
    NoVerses,
    Network,
}

impl FailureKind {
    /// Everything except a malformed URL may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FailureKind::InvalidUrl)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => f.write_str("malformed chapter url"),
            FailureKind::HttpStatus(code) => write!(f, "site answered {code}"),
            FailureKind::Timeout => f.write_str("request timed out"),
            FailureKind::RedirectLimitExceeded => f.write_str("too many redirects"),
            FailureKind::TooLarge { max_bytes, actual } => match actual {
                Some(actual) => write!(f, "page of {actual} bytes exceeds {max_bytes}"),
                None => write!(f, "page exceeds {max_bytes} bytes"),
            },
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "expected html, got {content_type}")
            }
            FailureKind::Decode { encoding } => write!(f, "body is not valid {encoding}"),
            FailureKind::NoVerses => f.write_str("page held no verses"),
            FailureKind::Network => f.write_str("network failure"),
        }
    }
}
