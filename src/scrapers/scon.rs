//! STJ SCON jurisprudence search scraper.
//!
//! This module knows the two URL shapes the site uses for paginated results
//! and the markup of a results page. It is deliberately specific to SCON.
//!
//! # URL Pattern
//!
//! The first page goes through the free search endpoint
//! (`/SCON/pesquisar.jsp`). Later pages use the "table of contents" view
//! (`/SCON/jurisprudencia/toc.jsp`), which takes a 1-based start offset `i`.
//!
//! # Page Structure
//!
//! ```text
//! <span class="numDocs">15.575 acórdãos</span>
//! <div class="paragrafoBRS">
//!   <div class="docTitulo">Processo</div>
//!   <div class="docTexto">REsp 1.234.567/SP</div>
//! </div>
//! <div class="paragrafoBRS">
//!   <div class="docTitulo">Relatora</div>
//!   <div class="docTexto">Ministra NANCY ANDRIGHI</div>
//! </div>
//! ...
//! ```
//!
//! Every record emits its six fields in the same order, so the n-th value of
//! each field belongs to the n-th case. [`assemble`] relies on that.

use crate::error::ExtractWarning;
use crate::models::{FieldKey, Lawsuit};
use crate::utils::{LegacyEncoding, clean_text, escape_invalid_utf8, restore_text, truncate_for_log};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use tracing::{debug, info, instrument, warn};

const FREE_SEARCH_URL: &str = "https://scon.stj.jus.br/SCON/pesquisar.jsp";
const TOC_URL: &str = "https://scon.stj.jus.br/SCON/jurisprudencia/toc.jsp";

const COUNTER_CLASS: &str = "numDocs";
const CONTAINER_CLASS: &str = "paragrafoBRS";
const LABEL_CLASS: &str = "docTitulo";
const VALUE_CLASS: &str = "docTexto";

static COUNTER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(&format!(".{COUNTER_CLASS}")).expect("counter selector is valid"));
static CONTAINER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&format!(".{CONTAINER_CLASS}")).expect("container selector is valid")
});

/// Extracted values per canonical field, in document order.
pub type FieldValues = BTreeMap<FieldKey, Vec<String>>;

/// Build the request URL for one page of results.
///
/// Spaces in `term` become `+`; nothing else is escaped. `page` is only used
/// when `first_page` is false, where it becomes the start offset
/// `page_size * page + 1`.
///
/// # Examples
///
/// ```ignore
/// let url = search_url("furto qualificado", NonZeroUsize::new(50).unwrap(), 0, true);
/// assert!(url.contains("livre=furto+qualificado"));
/// ```
pub fn search_url(term: &str, page_size: NonZeroUsize, page: usize, first_page: bool) -> String {
    let search = term.replace(' ', "+");
    let page_size = page_size.get();

    if first_page {
        format!(
            "{FREE_SEARCH_URL}?pesquisaAmigavel=+{search}&b=ACOR&tp=T&numDocsPagina={page_size}&i=1&O=&ref=&processo=&ementa=&nota=&filtroPorNota=&orgao=&relator=&uf=&classe=&juizo=&data=&dtpb=&dtde=&operador=e&thesaurus=JURIDICO&p=true&livre={search}"
        )
    } else {
        let search_upper = search.to_uppercase();
        let offset = page_size * page + 1;
        format!(
            "{TOC_URL}?numDocsPagina={page_size}&tipo_visualizacao=&filtroPorNota=&ref=&data=&p=true&b=ACOR&pesquisaAmigavel=+{search}&thesaurus=JURIDICO&i={offset}&l={page_size}&tp=T&operador=e&livre={search_upper}&b=ACOR"
        )
    }
}

/// Everything read from one results page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageExtract {
    /// Total number of results, if the page carries a counter.
    pub total_results: Option<usize>,
    pub fields: FieldValues,
    pub warnings: Vec<ExtractWarning>,
}

/// One direct child of a field container, reduced to what the walk needs.
#[derive(Debug, Clone, PartialEq)]
enum Child {
    Label(String),
    Value(String),
    Other,
}

/// What the most recent label announced.
#[derive(Debug)]
enum Pending {
    Field(FieldKey),
    Unrecognized(String),
}

/// Turns the text of one element into a clean string.
#[derive(Debug, Clone, Copy)]
struct TextRepair<'a> {
    encodings: &'a [LegacyEncoding],
    replacement: char,
}

impl TextRepair<'_> {
    fn text_of(&self, element: ElementRef<'_>) -> String {
        let raw: String = element.text().collect();
        clean_text(&restore_text(&raw, self.encodings, self.replacement))
    }
}

/// Parse a raw results page.
///
/// Invalid UTF-8 is kept through parsing with [`escape_invalid_utf8`] and
/// repaired separately for the counter and for every label and value, so a
/// broken byte only affects the text it sits in. All text is then normalized
/// with [`clean_text`].
#[instrument(level = "info", skip_all, fields(bytes = body.len()))]
pub fn extract_page(body: &[u8], encodings: &[LegacyEncoding], replacement: char) -> PageExtract {
    let repair = TextRepair {
        encodings,
        replacement,
    };
    let html = escape_invalid_utf8(body);
    let document = Html::parse_document(&html);
    let mut warnings = Vec::new();

    let total_results = match document.select(&COUNTER_SELECTOR).next() {
        Some(counter) => {
            let text = repair.text_of(counter);
            let parsed = parse_result_count(&text);
            if parsed.is_none() {
                warn!(counter = %truncate_for_log(&text, 80), "Result counter holds no number");
                warnings.push(ExtractWarning::UnreadableCounter(text));
            }
            parsed
        }
        None => {
            debug!("No result counter on page");
            warnings.push(ExtractWarning::MissingCounter);
            None
        }
    };

    let containers = container_children(&document, repair);
    if containers.is_empty() {
        warn!("No field containers on page");
        warnings.push(ExtractWarning::NoFieldContainers);
    }
    let fields = collect_fields(&containers);

    info!(
        total_results = ?total_results,
        containers = containers.len(),
        identifiers = fields.get(&FieldKey::Case).map_or(0, Vec::len),
        "Parsed results page"
    );

    PageExtract {
        total_results,
        fields,
        warnings,
    }
}

/// Read a result counter such as `"15.575 acórdãos"`.
///
/// Every character that is not an ASCII digit is dropped, which also removes
/// thousands separators.
pub fn parse_result_count(text: &str) -> Option<usize> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Zip the per-field value lists into records.
///
/// The record count follows the case identifier list, cut down to the
/// shortest of the six lists so no record is ever half filled. A cut is
/// reported as [`ExtractWarning::UnevenFields`].
pub fn assemble(fields: &FieldValues) -> (Vec<Lawsuit>, Option<ExtractWarning>) {
    let identifiers = fields.get(&FieldKey::Case).map_or(0, Vec::len);
    let count = FieldKey::ALL
        .iter()
        .map(|key| fields.get(key).map_or(0, Vec::len))
        .min()
        .unwrap_or(0)
        .min(identifiers);

    let value = |key: FieldKey, i: usize| -> String {
        fields
            .get(&key)
            .and_then(|values| values.get(i))
            .cloned()
            .unwrap_or_default()
    };

    let lawsuits: Vec<Lawsuit> = (0..count)
        .map(|i| Lawsuit {
            case: value(FieldKey::Case, i),
            rapporteur: value(FieldKey::Rapporteur, i),
            judgment_date: value(FieldKey::JudgmentDate, i),
            pub_date: value(FieldKey::PubDate, i),
            headnote: value(FieldKey::Headnote, i),
            decision: value(FieldKey::Decision, i),
        })
        .collect();

    let warning = (count < identifiers).then(|| {
        warn!(identifiers, assembled = count, "Field lists are uneven; dropping incomplete records");
        ExtractWarning::UnevenFields {
            identifiers,
            assembled: count,
        }
    });

    (lawsuits, warning)
}

fn has_class(element: &ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Direct element children of every field container, in document order.
fn container_children(document: &Html, repair: TextRepair<'_>) -> Vec<Vec<Child>> {
    document
        .select(&CONTAINER_SELECTOR)
        .map(|container| {
            container
                .children()
                .filter_map(ElementRef::wrap)
                .map(|child| {
                    if has_class(&child, LABEL_CLASS) {
                        Child::Label(repair.text_of(child))
                    } else if has_class(&child, VALUE_CLASS) {
                        Child::Value(repair.text_of(child))
                    } else {
                        Child::Other
                    }
                })
                .collect()
        })
        .collect()
}

/// Pair labels with the value that follows them.
///
/// A single pending slot is kept across all containers. A label fills it, a
/// value consumes it; values without a pending label are ignored.
fn collect_fields(containers: &[Vec<Child>]) -> FieldValues {
    let mut fields = FieldValues::new();
    let mut pending: Option<Pending> = None;

    for child in containers.iter().flatten() {
        match child {
            Child::Label(label) => {
                pending = Some(match FieldKey::from_label(label) {
                    Some(key) => Pending::Field(key),
                    None => Pending::Unrecognized(label.clone()),
                });
            }
            Child::Value(text) => match pending.take() {
                Some(Pending::Field(key)) => fields.entry(key).or_default().push(text.clone()),
                Some(Pending::Unrecognized(label)) => {
                    debug!(%label, "Skipping value of unrecognized field");
                }
                None => {}
            },
            Child::Other => {}
        }
    }

    fields
}
