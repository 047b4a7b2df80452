//! Verse core: domain model, static catalog and pure text rules.
mod catalog;
mod coverage;
mod model;
mod normalize;
mod tally;
mod translations;
mod verses;

pub use catalog::{Book, Catalog, Testament};
pub use coverage::Coverage;
pub use model::{Chapter, Verse};
pub use normalize::{clean_headings, normalize};
pub use tally::RunTally;
pub use translations::{parse_translation_list, resolve_translation, resolve_translations};
pub use verses::{finalize_verses, MAX_VERSE_CHARS, MAX_VERSE_NUMBER};
