use std::path::PathBuf;

use serde::Serialize;
use verse_core::Catalog;

use crate::layout::OutputLayout;
use crate::persist::{AtomicFileWriter, PersistError};

/// Contents of `summary.json`, written after a download run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub translations: Vec<String>,
    pub books: usize,
    pub total_chapters: u32,
    pub generated_at: String,
}

impl RunSummary {
    pub fn new(catalog: &Catalog, translations: Vec<String>, generated_at: impl Into<String>) -> Self {
        Self {
            translations,
            books: catalog.books().len(),
            total_chapters: catalog.total_chapters(),
            generated_at: generated_at.into(),
        }
    }
}

pub fn write_run_summary(layout: &OutputLayout, summary: &RunSummary) -> Result<PathBuf, PersistError> {
    let json = serde_json::to_string_pretty(summary).map_err(|err| PersistError::Io {
        path: layout.summary_path(),
        source: std::io::Error::other(err),
    })?;
    AtomicFileWriter::new(layout.root().to_path_buf()).write("summary.json", &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lands_at_the_output_root() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        let catalog = Catalog::builtin();
        let summary = RunSummary::new(&catalog, vec!["kjv".into()], "2024-01-01 12:00:00");
        let path = write_run_summary(&layout, &summary).unwrap();
        assert_eq!(path, layout.summary_path());

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["books"], 66);
        assert_eq!(value["total_chapters"], 1189);
        assert_eq!(value["translations"][0], "kjv");
    }
}
