//! Command-line interface definitions for the SCON scraper.
//!
//! Arguments are parsed with `clap`. Settings given on the command line
//! override the ones read from `--config`.
//!
//! # Examples
//!
//! ```sh
//! # First page of "furto", 50 decisions per page
//! scon_scraper furto
//!
//! # Walk three pages and export the last one as JSON
//! scon_scraper "ação penal" --pages 3 --export --format json -o ./exports
//!
//! # Drive the session by hand
//! scon_scraper --interactive
//! ```

use crate::config::SearchConfig;
use crate::error::ConfigError;
use crate::outputs::ExportFormat;
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Page size used by the command-line shell when nothing else is set.
pub const SHELL_PAGE_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(49);

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Term to search for (batch mode)
    pub term: Option<String>,

    /// Decisions per page
    #[arg(short = 'n', long)]
    pub page_size: Option<NonZeroUsize>,

    /// Number of pages to walk in batch mode
    #[arg(short, long, default_value_t = 1)]
    pub pages: usize,

    /// Dump each fetched page to the configured debug file
    #[arg(long)]
    pub save_html: bool,

    /// Only compute URLs on navigation; fetch on `load`
    #[arg(long)]
    pub deferred_load: bool,

    /// Export the records of the last visited page
    #[arg(short, long)]
    pub export: bool,

    /// Export format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Yaml)]
    pub format: ExportFormat,

    /// Directory for exported files
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Read navigation commands from standard input
    #[arg(short, long)]
    pub interactive: bool,
}

impl Cli {
    /// Build the session configuration: config file (if any), then flags.
    pub fn search_config(&self) -> Result<SearchConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::load(path)?,
            None => SearchConfig {
                page_size: SHELL_PAGE_SIZE,
                ..SearchConfig::default()
            },
        };

        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        config.save_html |= self.save_html;
        config.deferred_load |= self.deferred_load;
        Ok(config)
    }
}

/// One line of the interactive shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    First,
    Next,
    Prev,
    Last,
    Load,
    Show,
    Export,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parse a shell line. Returns `None` for blank or unknown input.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "search" | "s" if !rest.is_empty() => Some(Self::Search(rest.to_string())),
            "first" => Some(Self::First),
            "next" | "n" => Some(Self::Next),
            "prev" | "p" => Some(Self::Prev),
            "last" => Some(Self::Last),
            "load" => Some(Self::Load),
            "show" => Some(Self::Show),
            "export" => Some(Self::Export),
            "status" => Some(Self::Status),
            "help" | "?" => Some(Self::Help),
            "quit" | "exit" | "q" => Some(Self::Quit),
            _ => None,
        }
    }
}
