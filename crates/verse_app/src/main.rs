use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use verse_engine::Site;

mod commands;
mod platform;

use platform::logging::{self, LogDestination};

#[derive(Parser)]
#[command(
    name = "bible-harvest",
    version,
    about = "Download Bible chapters from BibleGateway and Blue Letter Bible"
)]
struct Cli {
    /// RON options file (default: ./options.ron when present)
    #[arg(global = true, long)]
    config: Option<PathBuf>,
    /// Output root; overrides the config file and OUTPUT_DIR
    #[arg(global = true, long)]
    output_dir: Option<String>,
    #[arg(global = true, short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the numbered translation list for a site
    ListTranslations(ListTranslationsCmd),
    /// Print the 66 books with their chapter counts
    ListBooks,
    /// Download translations, one book, or one chapter
    Download(DownloadCmd),
    /// Convert every JSON chapter on disk into text files
    Convert(ConvertCmd),
}

#[derive(Args)]
pub(crate) struct ListTranslationsCmd {
    #[arg(long, default_value = "biblegateway")]
    pub site: Site,
    /// Newline-delimited translation codes
    #[arg(long)]
    pub versions_file: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct DownloadCmd {
    #[arg(long, default_value = "biblegateway")]
    pub site: Site,
    /// Code, 1-based list position, comma list, or `all`; repeatable
    #[arg(short = 't', long = "translation")]
    pub translations: Vec<String>,
    #[arg(long)]
    pub versions_file: Option<PathBuf>,
    /// Book key (`1-samuel`) or number (`9`)
    #[arg(short, long)]
    pub book: Option<String>,
    #[arg(short, long, requires = "book")]
    pub chapter: Option<u32>,
}

#[derive(Args)]
pub(crate) struct ConvertCmd {
    /// Prefix each line with a running `NNNNN| ` index
    #[arg(long, default_value_t = false)]
    pub indexed: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let destination = match cli.command {
        Commands::ListTranslations(_) | Commands::ListBooks => LogDestination::Terminal,
        Commands::Download(_) | Commands::Convert(_) => LogDestination::TerminalAndFile,
    };
    logging::initialize(destination, cli.verbose);

    let mut options = platform::config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.output_dir {
        options.output_dir = dir;
    }

    match cli.command {
        Commands::ListTranslations(args) => commands::list_translations(args),
        Commands::ListBooks => {
            commands::list_books();
            Ok(())
        }
        Commands::Download(args) => commands::download(&options, args),
        Commands::Convert(args) => commands::convert(&options, args),
    }
}
