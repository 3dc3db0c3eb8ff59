//! Data models for extracted case law and exported search results.
//!
//! - [`Lawsuit`]: one decision as listed on a SCON results page
//! - [`FieldKey`]: the canonical name of each of the six record fields
//! - [`SearchExport`]: the document written by the exporter
//!
//! Serialized keys use PascalCase (`Case`, `Rapporteur`, ...) and follow
//! declaration order, so exported files always list the fields the same way.

use serde::{Deserialize, Serialize};

/// A single decision extracted from a results page.
///
/// Records are built all at once by the assembler and never edited
/// afterwards; a new page load replaces the whole list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lawsuit {
    /// Case identifier, e.g. `REsp 1.234.567/SP`.
    pub case: String,
    /// Reporting justice.
    pub rapporteur: String,
    /// Date of the judgment session.
    pub judgment_date: String,
    /// Publication date and source.
    pub pub_date: String,
    /// Headnote ("ementa").
    pub headnote: String,
    /// Decision text ("acórdão").
    pub decision: String,
}

/// Canonical field keys, independent of the label text used by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    Case,
    Rapporteur,
    JudgmentDate,
    PubDate,
    Headnote,
    Decision,
}

impl FieldKey {
    /// All keys in export order.
    pub const ALL: [FieldKey; 6] = [
        FieldKey::Case,
        FieldKey::Rapporteur,
        FieldKey::JudgmentDate,
        FieldKey::PubDate,
        FieldKey::Headnote,
        FieldKey::Decision,
    ];

    /// Map a label as printed on the page to its canonical key.
    ///
    /// "Relatora" (feminine) and "Relator" both map to [`FieldKey::Rapporteur`].
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Processo" => Some(Self::Case),
            "Relator" | "Relatora" => Some(Self::Rapporteur),
            "Data do Julgamento" => Some(Self::JudgmentDate),
            "Data da Publicação/Fonte" => Some(Self::PubDate),
            "Ementa" => Some(Self::Headnote),
            "Acórdão" => Some(Self::Decision),
            _ => None,
        }
    }

    /// The key name used in exported documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Case => "Case",
            Self::Rapporteur => "Rapporteur",
            Self::JudgmentDate => "JudgmentDate",
            Self::PubDate => "PubDate",
            Self::Headnote => "Headnote",
            Self::Decision => "Decision",
        }
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The exported document: the search term plus the records of the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchExport {
    pub term: String,
    pub lawsuits: Vec<Lawsuit>,
}
