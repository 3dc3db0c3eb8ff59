//! YAML export.
//!
//! ```yaml
//! Term: furto
//! Lawsuits:
//! - Case: REsp 1.234.567/SP
//!   Rapporteur: Ministra NANCY ANDRIGHI
//!   JudgmentDate: 10/10/2023
//!   PubDate: DJe 16/10/2023
//!   Headnote: ...
//!   Decision: ...
//! ```

use crate::error::ExportError;
use crate::models::SearchExport;

pub fn to_document(export: &SearchExport) -> Result<String, ExportError> {
    Ok(serde_yaml::to_string(export)?)
}

pub fn from_document(raw: &str) -> Result<SearchExport, ExportError> {
    Ok(serde_yaml::from_str(raw)?)
}
