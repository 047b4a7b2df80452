//! Harvester engine: fetching, extraction, persistence and conversion.
mod batch;
mod convert;
mod decode;
mod extract;
mod fetch;
mod layout;
mod persist;
mod pipeline;
mod retry;
mod source;
mod store;
mod summary;
mod types;

pub use batch::{detect_coverage, BatchConverter, ConvertSummary, LineStyle};
pub use convert::{book_lines, convert_book, ConvertError};
pub use decode::{decode_html, DecodedHtml};
pub use extract::{BlueLetterExtractor, ExtractContext, GatewayExtractor, VerseExtractor};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use layout::{
    book_dir_name, chapter_file_name, parse_book_dir_name, parse_chapter_file_number,
    parse_flat_book_file,
    sanitize_component, text_file_name, OutputLayout,
};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError, WriteOutcome};
pub use pipeline::{
    ChannelProgressSink, ChapterOutcome, HarvestOptions, Harvester, LogSink, ProgressSink,
};
pub use retry::{retry, Backoff, RetryPolicy};
pub use source::{
    BibleGateway, BlueLetter, ChapterSource, Site, BLUE_LETTER_BASE_URL, GATEWAY_BASE_URL,
    GATEWAY_VERSIONS_FILE,
};
pub use store::{ChapterStore, SaveOutcome, StoreError};
pub use summary::{write_run_summary, RunSummary};
pub use types::{ChapterRef, FailureKind, FetchError, FetchMetadata, FetchOutput, HarvestEvent};
