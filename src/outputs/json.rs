//! JSON export, same document shape as the YAML one.

use crate::error::ExportError;
use crate::models::SearchExport;

pub fn to_document(export: &SearchExport) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(export)?)
}

pub fn from_document(raw: &str) -> Result<SearchExport, ExportError> {
    Ok(serde_json::from_str(raw)?)
}
