//! Session configuration.
//!
//! A [`SearchConfig`] is set once before the first search and read by the
//! session on every fetch. It can be built in code, loaded from a YAML file
//! with [`SearchConfig::load`], and then overridden by command-line flags.
//!
//! ```yaml
//! page_size: 50
//! save_html: false
//! html_dump_path: out.html
//! deferred_load: false
//! fallback_encodings: [latin1, windows1252, latin9]
//! replacement: " "
//! last_page: legacy
//! ```

use crate::error::ConfigError;
use crate::utils::LegacyEncoding;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Records per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(9);

/// How the "last page" command chooses its page index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LastPageMode {
    /// `min(total / page_size - 1, 0)`, clamped at zero. Always lands on page 0.
    #[default]
    Legacy,
    /// `max(total / page_size - 1, 0)`, the last full page.
    Computed,
}

/// Configuration for a search session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Records requested per page.
    pub page_size: NonZeroUsize,
    /// Dump every fetched body to `html_dump_path`.
    pub save_html: bool,
    /// Where raw bodies are written when `save_html` is set.
    pub html_dump_path: PathBuf,
    /// Only recompute the URL on navigation; fetch on an explicit load.
    pub deferred_load: bool,
    /// Code pages tried, in order, for bodies that are not valid UTF-8.
    pub fallback_encodings: Vec<LegacyEncoding>,
    /// Placeholder for bytes no encoding could explain.
    pub replacement: char,
    pub last_page: LastPageMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            save_html: false,
            html_dump_path: PathBuf::from("out.html"),
            deferred_load: false,
            fallback_encodings: LegacyEncoding::DEFAULT_ORDER.to_vec(),
            replacement: ' ',
            last_page: LastPageMode::Legacy,
        }
    }
}

impl SearchConfig {
    /// Load a configuration from a YAML file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or is not valid
    /// YAML for this structure (including a `page_size` of zero).
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: SearchConfig =
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        info!(page_size = config.page_size.get(), "Loaded configuration");
        Ok(config)
    }
}
