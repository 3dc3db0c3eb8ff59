//! Export of the current search results.
//!
//! The exporter writes one document per search term, named after the term:
//!
//! ```text
//! output_dir/
//! ├── Search-furto.yml
//! └── Search-ação-penal.json
//! ```
//!
//! # Submodules
//!
//! - [`yaml`]: the default format, keys in record order
//! - [`json`]: same document as pretty-printed JSON
//!
//! Both formats carry `Term` and `Lawsuits`, each lawsuit with the keys
//! `Case`, `Rapporteur`, `JudgmentDate`, `PubDate`, `Headnote`, `Decision`.

pub mod json;
pub mod yaml;

use crate::error::ExportError;
use crate::models::SearchExport;
use crate::utils::term_slug;
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

/// Export document format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Yaml,
    Json,
}

impl ExportFormat {
    /// File extension written for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yml",
            Self::Json => "json",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yml" | "yaml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// File name for a term's export: `Search-<term with dashes>.<ext>`.
pub fn export_file_name(term: &str, format: ExportFormat) -> String {
    format!("Search-{}.{}", term_slug(term), format.extension())
}

/// Serialize `export` into `dir`, replacing any previous export of the same term.
///
/// # Returns
///
/// The path of the written file.
///
/// # Errors
///
/// Returns [`ExportError`] if the directory cannot be created, serialization
/// fails or the file cannot be written.
#[instrument(level = "info", skip_all, fields(term = %export.term, ?format))]
pub fn write_export(
    export: &SearchExport,
    dir: &Path,
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    let body = match format {
        ExportFormat::Yaml => yaml::to_document(export)?,
        ExportFormat::Json => json::to_document(export)?,
    };

    if let Err(e) = std::fs::create_dir_all(dir) {
        error!(dir = %dir.display(), error = %e, "Failed to create export dir");
        return Err(e.into());
    }

    let path = dir.join(export_file_name(&export.term, format));
    std::fs::write(&path, body)?;
    info!(
        path = %path.display(),
        lawsuits = export.lawsuits.len(),
        "Wrote export"
    );
    Ok(path)
}

/// Read back an export written by [`write_export`]; the format follows the extension.
///
/// # Errors
///
/// Returns [`ExportError::UnknownFormat`] for unrecognized extensions, or the
/// read / parse error.
pub fn read_export(path: &Path) -> Result<SearchExport, ExportError> {
    let format = ExportFormat::from_path(path)
        .ok_or_else(|| ExportError::UnknownFormat(path.display().to_string()))?;
    let raw = std::fs::read_to_string(path)?;
    match format {
        ExportFormat::Yaml => yaml::from_document(&raw),
        ExportFormat::Json => json::from_document(&raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lawsuit;

    fn sample(term: &str) -> SearchExport {
        let lawsuit = |n: u32| Lawsuit {
            case: format!("REsp {n}"),
            rapporteur: "Ministra NANCY ANDRIGHI".to_string(),
            judgment_date: "10/10/2023".to_string(),
            pub_date: "DJe 16/10/2023".to_string(),
            headnote: "PROCESSUAL PENAL: ação penal; \"trancamento\".".to_string(),
            decision: "Vistos, relatados e discutidos.".to_string(),
        };
        SearchExport {
            term: term.to_string(),
            lawsuits: vec![lawsuit(1), lawsuit(2)],
        }
    }

    #[test]
    fn test_export_file_name_uses_dashes() {
        assert_eq!(
            export_file_name("ação penal", ExportFormat::Yaml),
            "Search-ação-penal.yml"
        );
        assert_eq!(export_file_name("furto", ExportFormat::Json), "Search-furto.json");
    }

    #[test]
    fn test_yaml_export_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let export = sample("ação penal");

        let path = write_export(&export, dir.path(), ExportFormat::Yaml).unwrap();

        assert!(path.to_string_lossy().contains("ação-penal"));
        assert_eq!(read_export(&path).unwrap(), export);
    }

    #[test]
    fn test_json_export_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let export = sample("furto");

        let path = write_export(&export, dir.path(), ExportFormat::Json).unwrap();

        assert_eq!(path.file_name().unwrap(), "Search-furto.json");
        assert_eq!(read_export(&path).unwrap(), export);
    }

    #[test]
    fn test_export_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports/2024");

        let path = write_export(&sample("furto"), &nested, ExportFormat::Yaml).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_export_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut export = sample("furto");
        write_export(&export, dir.path(), ExportFormat::Yaml).unwrap();

        export.lawsuits.truncate(1);
        let path = write_export(&export, dir.path(), ExportFormat::Yaml).unwrap();
        assert_eq!(read_export(&path).unwrap().lawsuits.len(), 1);
    }

    #[test]
    fn test_read_export_unknown_extension() {
        let err = read_export(Path::new("Search-furto.txt")).unwrap_err();
        assert!(matches!(err, ExportError::UnknownFormat(_)));
    }
}
