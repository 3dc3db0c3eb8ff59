//! Error types for the search engine.
//!
//! Transport problems are fatal to the navigation that caused them and are
//! reported through [`SearchError`]. Malformed pages are not errors at all:
//! they surface as [`ExtractWarning`] values next to whatever could be
//! assembled.

use thiserror::Error;

/// Errors that abort a navigation command.
///
/// When a command returns one of these, the session keeps the term, page,
/// records and flags it had before the call.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Connection, TLS or body read failure.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The site answered with anything other than 200 OK.
    #[error("Failed to access the site: status {status} for {url}")]
    Status { status: u16, url: String },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Errors raised while writing or reading an export document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension does not name a known export format.
    #[error("Unrecognized export format: {0}")]
    UnknownFormat(String),
}

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Non-fatal anomalies found while extracting a results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractWarning {
    /// No result counter element; the known total is kept.
    MissingCounter,
    /// The counter element held no digits.
    UnreadableCounter(String),
    /// No field containers were found on the page.
    NoFieldContainers,
    /// Some field lists were shorter than the case identifier list.
    UnevenFields { identifiers: usize, assembled: usize },
}

impl std::fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCounter => write!(f, "page has no result counter"),
            Self::UnreadableCounter(text) => write!(f, "result counter {text:?} holds no number"),
            Self::NoFieldContainers => write!(f, "page has no field containers"),
            Self::UnevenFields {
                identifiers,
                assembled,
            } => write!(
                f,
                "found {identifiers} case identifiers but only {assembled} complete records"
            ),
        }
    }
}
