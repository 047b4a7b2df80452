use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use verse_core::{parse_translation_list, resolve_translations, Book, Catalog, RunTally};
use verse_engine::{
    write_run_summary, BatchConverter, BibleGateway, BlueLetter, ChapterOutcome, ChapterSource,
    ChapterStore, FetchSettings, HarvestOptions, Harvester, LineStyle, LogSink, OutputLayout,
    ReqwestFetcher, RunSummary, Site, GATEWAY_VERSIONS_FILE,
};
use verse_logging::{verse_info, verse_warn};

use crate::platform::config::Options;
use crate::{ConvertCmd, DownloadCmd, ListTranslationsCmd};

const TRANSLATION_DELAY: Duration = Duration::from_secs(3);

fn output_layout(options: &Options) -> Result<OutputLayout> {
    let cwd = std::env::current_dir().context("could not determine the working directory")?;
    Ok(OutputLayout::new(options.output_root(&cwd)))
}

/// The translation list for a site: an explicit file, the BibleGateway
/// versions file, or the built-in Blue Letter Bible list.
fn available_translations(catalog: &Catalog, site: Site, versions_file: Option<&Path>) -> Result<Vec<String>> {
    let file = match (versions_file, site) {
        (Some(path), _) => path,
        (None, Site::BibleGateway) => Path::new(GATEWAY_VERSIONS_FILE),
        (None, Site::BlueLetter) => return Ok(catalog.blue_letter_translations().to_vec()),
    };
    let raw = fs::read_to_string(file)
        .with_context(|| format!("could not read versions file {}", file.display()))?;
    Ok(parse_translation_list(&raw))
}

pub(crate) fn list_translations(args: ListTranslationsCmd) -> Result<()> {
    let catalog = Catalog::builtin();
    let codes = available_translations(&catalog, args.site, args.versions_file.as_deref())?;
    println!("Available translations for {} ({} total):", args.site, codes.len());
    for (index, code) in codes.iter().enumerate() {
        println!(
            "{:3}. {} ({})",
            index + 1,
            code.to_ascii_uppercase(),
            catalog.language_for(code)
        );
    }
    Ok(())
}

pub(crate) fn list_books() {
    let catalog = Catalog::builtin();
    println!("Available books ({} total):", catalog.books().len());
    for book in catalog.books() {
        println!(
            "{:3}. {} ({}, {} chapters)",
            book.number, book.key, book.display, book.chapters
        );
    }
}

/// Resolves `-t` values against the site's list. No value, or `all`,
/// selects the whole list.
fn select_translations(requested: &[String], available: &[String]) -> Result<Vec<String>> {
    if requested.is_empty() || requested.iter().any(|r| r.trim().eq_ignore_ascii_case("all")) {
        return Ok(available.to_vec());
    }
    let (selected, invalid) = resolve_translations(&requested.join(","), available);
    for entry in &invalid {
        verse_warn!("Ignoring unknown translation '{}'", entry);
    }
    if selected.is_empty() {
        bail!("no valid translations selected");
    }
    Ok(selected)
}

fn build_source(site: Site, options: &Options) -> Box<dyn ChapterSource> {
    match site {
        Site::BibleGateway => {
            let source = BibleGateway::with_base_url(&options.gateway_base_url);
            let policy = source.retry_policy().with_max_attempts(options.max_retries);
            Box::new(source.with_retry_policy(policy))
        }
        Site::BlueLetter => {
            let source = BlueLetter::with_base_url(&options.blue_letter_base_url);
            let policy = source.retry_policy().with_max_attempts(options.max_retries);
            Box::new(source.with_retry_policy(policy))
        }
    }
}

fn resolve_book<'c>(catalog: &'c Catalog, input: &str) -> Result<&'c Book> {
    catalog
        .resolve_book(input)
        .with_context(|| format!("unknown book '{input}' (see list-books)"))
}

pub(crate) fn download(options: &Options, args: DownloadCmd) -> Result<()> {
    let catalog = Catalog::builtin();
    let available = available_translations(&catalog, args.site, args.versions_file.as_deref())?;
    let translations = select_translations(&args.translations, &available)?;
    let book = args
        .book
        .as_deref()
        .map(|input| resolve_book(&catalog, input))
        .transpose()?;
    if let (Some(book), Some(chapter)) = (book, args.chapter) {
        if chapter == 0 || chapter > book.chapters {
            bail!("{} has chapters 1 to {}", book.display, book.chapters);
        }
    }

    let layout = output_layout(options)?;
    let fetcher = ReqwestFetcher::new(FetchSettings {
        user_agent: options.user_agent.clone(),
        ..FetchSettings::default()
    })
    .context("could not build the http client")?;
    let source = build_source(args.site, options);
    let sink = LogSink;
    let harvester = Harvester::new(
        &catalog,
        &fetcher,
        source.as_ref(),
        ChapterStore::new(layout.clone()),
        &sink,
    )
    .with_options(HarvestOptions {
        chapter_delay: options.request_delay(),
        translation_delay: TRANSLATION_DELAY,
        auto_convert: options.auto_convert_to_txt,
        ..HarvestOptions::default()
    });

    verse_info!(
        "Downloading {} translation(s) from {} into {}",
        translations.len(),
        args.site,
        layout.root().display()
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("could not start the async runtime")?;

    let mut total = RunTally::new();
    runtime.block_on(async {
        match (book, args.chapter) {
            (Some(book), Some(chapter)) => {
                for translation in &translations {
                    total.attempted += 1;
                    match harvester.download_chapter(translation, book, chapter).await {
                        ChapterOutcome::Saved { .. } => total.saved += 1,
                        ChapterOutcome::Skipped(_) => total.skipped += 1,
                        ChapterOutcome::Failed(_) | ChapterOutcome::SaveFailed(_) => {
                            total.failed += 1
                        }
                    }
                }
            }
            (Some(book), None) => {
                for translation in &translations {
                    total += harvester.download_book(translation, book).await;
                }
            }
            _ => {
                for (_, tally) in harvester.download_translations(&translations).await {
                    total += tally;
                }
            }
        }
    });

    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let summary = RunSummary::new(&catalog, translations, generated_at);
    let path = write_run_summary(&layout, &summary).context("could not write the run summary")?;

    verse_info!(
        "Done: {} saved, {} already present, {} failed of {} chapters ({:.1}%). Summary at {}",
        total.saved,
        total.skipped,
        total.failed,
        total.attempted,
        total.success_rate(),
        path.display()
    );
    Ok(())
}

pub(crate) fn convert(options: &Options, args: ConvertCmd) -> Result<()> {
    let catalog = Catalog::builtin();
    let layout = output_layout(options)?;
    let style = if args.indexed {
        LineStyle::Indexed
    } else {
        LineStyle::Plain
    };
    let summary = BatchConverter::new(&catalog, &layout)
        .with_line_style(style)
        .run()
        .context("conversion failed")?;
    if summary.skipped_files > 0 {
        verse_warn!("{} record file(s) could not be read; see the log", summary.skipped_files);
    }
    if summary.failed > 0 {
        verse_warn!("{} translation(s) could not be converted; see the log", summary.failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::select_translations;

    fn list() -> Vec<String> {
        ["esv", "kjv", "niv"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_selection_or_all_means_every_translation() {
        assert_eq!(select_translations(&[], &list()).unwrap(), list());
        assert_eq!(select_translations(&["ALL".into()], &list()).unwrap(), list());
    }

    #[test]
    fn codes_positions_and_comma_lists_resolve() {
        let picked = select_translations(&["2,ESV".into(), "niv".into(), "bogus".into()], &list()).unwrap();
        assert_eq!(picked, vec!["kjv", "esv", "niv"]);
    }

    #[test]
    fn nothing_valid_is_an_error() {
        assert!(select_translations(&["bogus".into()], &list()).is_err());
    }
}
