//! # SCON Scraper
//!
//! Search engine for the STJ (Superior Tribunal de Justiça) jurisprudence
//! database. It builds SCON search URLs, fetches result pages, extracts the
//! listed decisions into [`Lawsuit`] records, walks the result pages and
//! exports what it found.
//!
//! ## Architecture
//!
//! 1. **URL building** ([`scrapers::scon::search_url`])
//! 2. **Fetching** ([`fetch::FetchHtml`], blocking `reqwest`)
//! 3. **Extraction** ([`scrapers::scon::extract_page`]) with text sanitizing ([`utils`])
//! 4. **Assembly** ([`scrapers::scon::assemble`])
//! 5. **Pagination** ([`search::Search`])
//! 6. **Export** ([`outputs`], YAML or JSON)
//!
//! Any front end (the bundled CLI, a GUI) drives a [`Search`] it owns and
//! reads its state back through plain getters.

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod outputs;
pub mod scrapers;
pub mod search;
pub mod utils;

pub use config::{LastPageMode, SearchConfig};
pub use error::{ExportError, ExtractWarning, SearchError};
pub use models::{FieldKey, Lawsuit, SearchExport};
pub use outputs::ExportFormat;
pub use search::{LoadOutcome, Search};
