//! Paginated search session.
//!
//! A [`Search`] owns the state of one search: the term, the page being
//! shown, the last known total, the navigation flags and the records of the
//! current page. Every navigation command runs the same pipeline:
//!
//! 1. Build the target URL ([`scon::search_url`])
//! 2. Fetch it ([`FetchHtml`]), unless loading is deferred
//! 3. Extract and assemble the records ([`scon::extract_page`], [`scon::assemble`])
//! 4. Commit the new page, then recompute `has_prev` / `has_next`
//!
//! A failed fetch returns before step 4, so the session is left exactly as it
//! was. Commands must not overlap; the session is meant to be driven by one
//! caller at a time.
//!
//! # Deferred loading
//!
//! With `deferred_load` set, commands only move the page index and URL.
//! The caller fetches with [`Search::load`] and sees stale flags until then.

use crate::config::{LastPageMode, SearchConfig};
use crate::error::{ExportError, ExtractWarning, SearchError};
use crate::fetch::{FetchHtml, HttpFetcher};
use crate::models::{Lawsuit, SearchExport};
use crate::outputs::{self, ExportFormat};
use crate::scrapers::scon;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Result of a navigation command that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched; `records` were assembled.
    Loaded {
        records: usize,
        warnings: Vec<ExtractWarning>,
    },
    /// Loading is deferred; only the URL and page index moved.
    Deferred,
    /// Nothing to load yet (no term and no URL).
    Skipped,
}

/// A fetched and parsed page, not yet committed to the session.
#[derive(Debug)]
struct LoadedPage {
    lawsuits: Vec<Lawsuit>,
    total_results: Option<usize>,
    warnings: Vec<ExtractWarning>,
}

/// One search session against SCON.
#[derive(Debug)]
pub struct Search<F = HttpFetcher> {
    fetcher: F,
    config: SearchConfig,
    term: String,
    current_page: usize,
    total_results: usize,
    has_next: bool,
    has_prev: bool,
    current_url: String,
    lawsuits: Vec<Lawsuit>,
}

impl Search<HttpFetcher> {
    /// Create a session that talks to the live site.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Client`] if the HTTP client cannot be built.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        Ok(Self::with_fetcher(config, HttpFetcher::new()?))
    }
}

impl<F: FetchHtml> Search<F> {
    /// Create a session around any [`FetchHtml`] implementation.
    pub fn with_fetcher(config: SearchConfig, fetcher: F) -> Self {
        Self {
            fetcher,
            config,
            term: String::new(),
            current_page: 0,
            total_results: 0,
            has_next: true,
            has_prev: false,
            current_url: String::new(),
            lawsuits: Vec::new(),
        }
    }

    /// Records requested per page from the next navigation on.
    pub fn set_page_size(&mut self, page_size: NonZeroUsize) {
        self.config.page_size = page_size;
    }

    /// Dump every fetched body to the configured debug file.
    pub fn set_save_html(&mut self, save_html: bool) {
        self.config.save_html = save_html;
    }

    /// Only move the URL on navigation; fetch on [`Search::load`].
    pub fn set_deferred_load(&mut self, deferred_load: bool) {
        self.config.deferred_load = deferred_load;
    }

    /// The active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The fetcher pages are requested through.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The term of the current search; empty before the first one.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Zero-based index of the page shown.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Records per page.
    pub fn page_size(&self) -> NonZeroUsize {
        self.config.page_size
    }

    /// Total reported by the last page with a counter; 0 before any load.
    pub fn total_results(&self) -> usize {
        self.total_results
    }

    /// Whether a next page is expected.
    pub fn has_next_page(&self) -> bool {
        self.has_next
    }

    /// Whether a previous page exists.
    pub fn has_prev_page(&self) -> bool {
        self.has_prev
    }

    /// True while the first page is shown.
    pub fn is_home_page(&self) -> bool {
        self.current_page == 0
    }

    /// The URL of the current page; empty until the first command.
    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// Records of the current page.
    pub fn lawsuits(&self) -> &[Lawsuit] {
        &self.lawsuits
    }

    /// Start a new search for `term` on the first page.
    #[instrument(level = "info", skip(self))]
    pub fn search_term(&mut self, term: &str) -> Result<LoadOutcome, SearchError> {
        let url = scon::search_url(term, self.config.page_size, 0, true);
        let outcome = self.navigate(Some(term), 0, url)?;
        self.has_prev = false;
        self.has_next = self.total_results > self.config.page_size.get();
        Ok(outcome)
    }

    /// Go back to the first page of the current term.
    #[instrument(level = "info", skip(self), fields(term = %self.term))]
    pub fn first_page(&mut self) -> Result<LoadOutcome, SearchError> {
        let url = scon::search_url(&self.term, self.config.page_size, 0, true);
        let outcome = self.navigate(None, 0, url)?;
        self.has_prev = false;
        self.has_next = self.total_results > self.config.page_size.get();
        Ok(outcome)
    }

    /// Advance one page if there is a next page; otherwise reload the current one.
    #[instrument(level = "info", skip(self), fields(term = %self.term, page = self.current_page))]
    pub fn next_page(&mut self) -> Result<LoadOutcome, SearchError> {
        let page = if self.has_next {
            self.current_page + 1
        } else {
            self.current_page
        };
        let url = scon::search_url(&self.term, self.config.page_size, page, false);
        let outcome = self.navigate(None, page, url)?;
        self.has_prev = true;
        self.has_next = self.current_page + 1 < self.total_results / self.config.page_size.get();
        Ok(outcome)
    }

    /// Step back one page, stopping at the first page.
    #[instrument(level = "info", skip(self), fields(term = %self.term, page = self.current_page))]
    pub fn prev_page(&mut self) -> Result<LoadOutcome, SearchError> {
        let page = self.current_page.saturating_sub(1);
        let url = scon::search_url(&self.term, self.config.page_size, page, page == 0);
        let outcome = self.navigate(None, page, url)?;
        self.has_prev = self.current_page > 0;
        self.has_next = self.total_results > self.config.page_size.get() * (self.current_page + 1);
        Ok(outcome)
    }

    /// Jump to the "last" page as chosen by [`LastPageMode`].
    #[instrument(level = "info", skip(self), fields(term = %self.term))]
    pub fn last_page(&mut self) -> Result<LoadOutcome, SearchError> {
        let full_pages = self.total_results / self.config.page_size.get();
        let page = match self.config.last_page {
            // min(full_pages - 1, 0), with the page index floored at zero
            LastPageMode::Legacy => 0,
            LastPageMode::Computed => full_pages.saturating_sub(1),
        };
        let url = scon::search_url(&self.term, self.config.page_size, page, false);
        let outcome = self.navigate(None, page, url)?;
        self.has_prev = true;
        self.has_next = false;
        Ok(outcome)
    }

    /// Fetch the current URL (or the first page of the term if no URL was
    /// computed yet). Navigation flags are left as they are.
    #[instrument(level = "info", skip(self), fields(term = %self.term))]
    pub fn load(&mut self) -> Result<LoadOutcome, SearchError> {
        if self.term.is_empty() && self.current_url.is_empty() {
            debug!("Nothing to load");
            return Ok(LoadOutcome::Skipped);
        }

        let url = if self.current_url.is_empty() {
            scon::search_url(&self.term, self.config.page_size, 0, true)
        } else {
            self.current_url.clone()
        };
        let page = self.fetch_page(&url)?;
        Ok(self.commit(page))
    }

    /// Search `term` and walk forward through up to `pages` pages, handing
    /// each loaded page to `visit`. Returns the number of pages visited.
    ///
    /// In deferred mode every page is loaded as soon as it is reached, and the
    /// search is issued once more after the first load so its flags reflect
    /// the total that load observed.
    ///
    /// # Errors
    ///
    /// Stops at the first failed fetch; pages already visited stay committed.
    #[instrument(level = "info", skip(self, visit))]
    pub fn walk(
        &mut self,
        term: &str,
        pages: usize,
        mut visit: impl FnMut(&Self, LoadOutcome),
    ) -> Result<usize, SearchError> {
        let mut outcome = self.search_term(term)?;
        if self.config.deferred_load {
            outcome = self.load()?;
            self.search_term(term)?;
        }
        visit(self, outcome);

        let mut visited = 1;
        while visited < pages {
            if !self.has_next {
                info!(page = self.current_page, "No more pages");
                break;
            }
            let mut outcome = self.next_page()?;
            if self.config.deferred_load {
                outcome = self.load()?;
            }
            visit(self, outcome);
            visited += 1;
        }
        Ok(visited)
    }

    /// The current term and records as an exportable document.
    pub fn snapshot(&self) -> SearchExport {
        SearchExport {
            term: self.term.clone(),
            lawsuits: self.lawsuits.clone(),
        }
    }

    /// Write the current term and records into `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if serialization or the file write fails.
    pub fn export(&self, dir: &Path, format: ExportFormat) -> Result<PathBuf, ExportError> {
        outputs::write_export(&self.snapshot(), dir, format)
    }

    /// Fetch (unless deferred), then move to `page` / `url`.
    ///
    /// Nothing is changed when the fetch fails.
    fn navigate(
        &mut self,
        term: Option<&str>,
        page: usize,
        url: String,
    ) -> Result<LoadOutcome, SearchError> {
        let loaded = if self.config.deferred_load {
            None
        } else {
            Some(self.fetch_page(&url)?)
        };

        if let Some(term) = term {
            self.term = term.to_string();
        }
        self.current_page = page;
        self.current_url = url;

        Ok(match loaded {
            Some(loaded) => self.commit(loaded),
            None => {
                debug!(url = %self.current_url, "Deferred load; URL updated only");
                LoadOutcome::Deferred
            }
        })
    }

    /// Replace the record list and total with a freshly loaded page.
    fn commit(&mut self, page: LoadedPage) -> LoadOutcome {
        if let Some(total) = page.total_results {
            self.total_results = total;
        }
        let records = page.lawsuits.len();
        self.lawsuits = page.lawsuits;

        info!(
            page = self.current_page,
            records,
            total_results = self.total_results,
            "Loaded results page"
        );
        LoadOutcome::Loaded {
            records,
            warnings: page.warnings,
        }
    }

    fn fetch_page(&self, url: &str) -> Result<LoadedPage, SearchError> {
        let body = self.fetcher.fetch(url)?;

        if self.config.save_html {
            match std::fs::write(&self.config.html_dump_path, &body) {
                Ok(()) => debug!(path = %self.config.html_dump_path.display(), "Saved raw HTML"),
                Err(e) => warn!(
                    path = %self.config.html_dump_path.display(),
                    error = %e,
                    "Failed to save raw HTML"
                ),
            }
        }

        let extract =
            scon::extract_page(&body, &self.config.fallback_encodings, self.config.replacement);
        let (lawsuits, uneven) = scon::assemble(&extract.fields);
        let mut warnings = extract.warnings;
        warnings.extend(uneven);

        Ok(LoadedPage {
            lawsuits,
            total_results: extract.total_results,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Serves canned responses in order and records every requested URL.
    #[derive(Debug, Default)]
    struct ScriptedFetcher {
        responses: RefCell<VecDeque<Result<String, u16>>>,
        requested: RefCell<Vec<String>>,
    }

    impl ScriptedFetcher {
        fn push_page(&self, html: String) {
            self.responses.borrow_mut().push_back(Ok(html));
        }

        fn push_status(&self, status: u16) {
            self.responses.borrow_mut().push_back(Err(status));
        }

        fn requested(&self) -> Vec<String> {
            self.requested.borrow().clone()
        }
    }

    impl FetchHtml for ScriptedFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, SearchError> {
            self.requested.borrow_mut().push(url.to_string());
            match self.responses.borrow_mut().pop_front() {
                Some(Ok(html)) => Ok(html.into_bytes()),
                Some(Err(status)) => Err(SearchError::Status {
                    status,
                    url: url.to_string(),
                }),
                None => Err(SearchError::Status {
                    status: 404,
                    url: url.to_string(),
                }),
            }
        }
    }

    fn record(case: &str) -> String {
        [
            ("Processo", case),
            ("Relator", "Min. A"),
            ("Data do Julgamento", "01/02/2024"),
            ("Data da Publicação/Fonte", "DJe 05/02/2024"),
            ("Ementa", "PENAL."),
            ("Acórdão", "Vistos."),
        ]
        .iter()
        .map(|(label, value)| {
            format!(
                r#"<div class="paragrafoBRS"><div class="docTitulo">{label}</div><div class="docTexto">{value}</div></div>"#
            )
        })
        .collect()
    }

    fn first_page_html(total: &str, cases: &[&str]) -> String {
        let records: String = cases.iter().map(|c| record(c)).collect();
        format!(r#"<html><body><span class="numDocs">{total}</span>{records}</body></html>"#)
    }

    fn toc_page_html(cases: &[&str]) -> String {
        let records: String = cases.iter().map(|c| record(c)).collect();
        format!("<html><body>{records}</body></html>")
    }

    fn session(page_size: usize) -> Search<ScriptedFetcher> {
        let config = SearchConfig {
            page_size: NonZeroUsize::new(page_size).unwrap(),
            ..SearchConfig::default()
        };
        Search::with_fetcher(config, ScriptedFetcher::default())
    }

    #[test]
    fn test_new_session_state() {
        let search = session(10);
        assert_eq!(search.term(), "");
        assert_eq!(search.current_page(), 0);
        assert_eq!(search.total_results(), 0);
        assert!(search.is_home_page());
        assert!(!search.has_prev_page());
        assert!(search.current_url().is_empty());
        assert!(search.lawsuits().is_empty());
    }

    #[test]
    fn test_search_term_reads_counter_and_records() {
        let mut search = session(50);
        search
            .fetcher()
            .push_page(first_page_html("1.234 acórdãos", &["REsp 1", "REsp 2"]));

        let outcome = search.search_term("furto").unwrap();

        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                records: 2,
                warnings: vec![]
            }
        );
        assert_eq!(search.term(), "furto");
        assert_eq!(search.total_results(), 1234);
        assert!(search.has_next_page());
        assert!(!search.has_prev_page());
        assert!(search.current_url().contains("numDocsPagina=50"));
        assert!(search.current_url().contains("livre=furto"));
        assert_eq!(search.fetcher().requested(), vec![search.current_url().to_string()]);
        assert_eq!(search.lawsuits()[1].case, "REsp 2");
    }

    #[test]
    fn test_single_page_result_has_no_next() {
        let mut search = session(50);
        search.fetcher().push_page(first_page_html("12 acórdãos", &["REsp 1"]));
        search.search_term("furto").unwrap();
        assert!(!search.has_next_page());
    }

    #[test]
    fn test_next_page_uses_toc_url_and_keeps_total() {
        let mut search = session(50);
        search.fetcher().push_page(first_page_html("1.234", &["REsp 1"]));
        search.fetcher().push_page(toc_page_html(&["REsp 51"]));

        search.search_term("furto").unwrap();
        let outcome = search.next_page().unwrap();

        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                records: 1,
                warnings: vec![ExtractWarning::MissingCounter]
            }
        );
        assert_eq!(search.current_page(), 1);
        assert_eq!(search.total_results(), 1234);
        assert!(search.current_url().contains("toc.jsp"));
        assert!(search.current_url().contains("&i=51&"));
        assert!(search.has_prev_page());
        assert!(search.has_next_page());
        assert_eq!(search.lawsuits()[0].case, "REsp 51");
    }

    #[test]
    fn test_next_then_prev_restores_position_and_flags() {
        for total in ["120", "30", "1.234"] {
            let mut search = session(50);
            search.fetcher().push_page(first_page_html(total, &["REsp 1"]));
            search.fetcher().push_page(toc_page_html(&["REsp 51"]));
            search.fetcher().push_page(first_page_html(total, &["REsp 1"]));

            search.search_term("furto").unwrap();
            let before = (
                search.current_page(),
                search.has_prev_page(),
                search.has_next_page(),
            );

            search.next_page().unwrap();
            search.prev_page().unwrap();

            let after = (
                search.current_page(),
                search.has_prev_page(),
                search.has_next_page(),
            );
            assert_eq!(before, after, "total {total}");
        }
    }

    #[test]
    fn test_next_page_without_next_stays_put() {
        let mut search = session(50);
        search.fetcher().push_page(first_page_html("30", &["REsp 1"]));
        search.fetcher().push_page(toc_page_html(&["REsp 1"]));

        search.search_term("furto").unwrap();
        search.next_page().unwrap();

        assert_eq!(search.current_page(), 0);
        assert!(search.has_prev_page());
        assert!(!search.has_next_page());
        assert!(search.current_url().contains("&i=1&"));
    }

    #[test]
    fn test_prev_page_to_first_uses_first_page_url() {
        let mut search = session(10);
        search.fetcher().push_page(first_page_html("100", &["A"]));
        search.fetcher().push_page(toc_page_html(&["B"]));
        search.fetcher().push_page(toc_page_html(&["C"]));
        search.fetcher().push_page(toc_page_html(&["B"]));
        search.fetcher().push_page(first_page_html("100", &["A"]));

        search.search_term("furto").unwrap();
        search.next_page().unwrap();
        search.next_page().unwrap();
        assert_eq!(search.current_page(), 2);

        search.prev_page().unwrap();
        assert_eq!(search.current_page(), 1);
        assert!(search.current_url().contains("toc.jsp"));
        assert!(search.has_prev_page());
        assert!(search.has_next_page());

        search.prev_page().unwrap();
        assert_eq!(search.current_page(), 0);
        assert!(search.current_url().contains("pesquisar.jsp"));
        assert!(!search.has_prev_page());
    }

    #[test]
    fn test_first_page_resets_position() {
        let mut search = session(10);
        search.fetcher().push_page(first_page_html("100", &["A"]));
        search.fetcher().push_page(toc_page_html(&["B"]));
        search.fetcher().push_page(first_page_html("100", &["A"]));

        search.search_term("furto").unwrap();
        search.next_page().unwrap();
        search.first_page().unwrap();

        assert_eq!(search.current_page(), 0);
        assert!(!search.has_prev_page());
        assert!(search.has_next_page());
        assert_eq!(search.lawsuits()[0].case, "A");
    }

    #[test]
    fn test_last_page_legacy_lands_on_first_page() {
        let mut search = session(50);
        search.fetcher().push_page(first_page_html("1.234", &["A"]));
        search.fetcher().push_page(toc_page_html(&["A"]));

        search.search_term("furto").unwrap();
        search.last_page().unwrap();

        assert_eq!(search.current_page(), 0);
        assert!(search.current_url().contains("toc.jsp"));
        assert!(search.current_url().contains("&i=1&"));
        assert!(search.has_prev_page());
        assert!(!search.has_next_page());
    }

    #[test]
    fn test_last_page_computed() {
        let mut search = session(50);
        search.config.last_page = LastPageMode::Computed;
        search.fetcher().push_page(first_page_html("1.234", &["A"]));
        search.fetcher().push_page(toc_page_html(&["Z"]));

        search.search_term("furto").unwrap();
        search.last_page().unwrap();

        assert_eq!(search.current_page(), 23);
        assert!(search.current_url().contains("&i=1151&"));
    }

    #[test]
    fn test_last_page_computed_with_few_results() {
        let mut search = session(50);
        search.config.last_page = LastPageMode::Computed;
        search.fetcher().push_page(first_page_html("7", &["A"]));
        search.fetcher().push_page(toc_page_html(&["A"]));

        search.search_term("furto").unwrap();
        search.last_page().unwrap();
        assert_eq!(search.current_page(), 0);
    }

    #[test]
    fn test_transport_failure_leaves_state_untouched() {
        let mut search = session(50);
        search.fetcher().push_page(first_page_html("1.234", &["REsp 1", "REsp 2"]));
        search.fetcher().push_status(503);

        search.search_term("furto").unwrap();
        let url = search.current_url().to_string();
        let records = search.lawsuits().to_vec();

        let err = search.next_page().unwrap_err();

        assert!(matches!(err, SearchError::Status { status: 503, .. }));
        assert_eq!(search.current_page(), 0);
        assert_eq!(search.total_results(), 1234);
        assert!(search.has_next_page());
        assert!(!search.has_prev_page());
        assert_eq!(search.current_url(), url);
        assert_eq!(search.lawsuits(), records.as_slice());
    }

    #[test]
    fn test_failed_new_search_keeps_old_term() {
        let mut search = session(50);
        search.fetcher().push_page(first_page_html("1.234", &["REsp 1"]));
        search.fetcher().push_status(500);

        search.search_term("furto").unwrap();
        assert!(search.search_term("roubo").is_err());

        assert_eq!(search.term(), "furto");
        assert!(search.current_url().contains("livre=furto"));
        assert_eq!(search.lawsuits().len(), 1);
    }

    #[test]
    fn test_records_are_replaced_wholesale() {
        let mut search = session(10);
        search.fetcher().push_page(first_page_html("100", &["A", "B", "C"]));
        search.fetcher().push_page(toc_page_html(&["D"]));

        search.search_term("furto").unwrap();
        assert_eq!(search.lawsuits().len(), 3);
        search.next_page().unwrap();
        assert_eq!(search.lawsuits().len(), 1);
        assert_eq!(search.lawsuits()[0].case, "D");
    }

    #[test]
    fn test_deferred_load_only_moves_url() {
        let mut search = session(50);
        search.set_deferred_load(true);

        let outcome = search.search_term("furto").unwrap();

        assert_eq!(outcome, LoadOutcome::Deferred);
        assert_eq!(search.term(), "furto");
        assert!(search.current_url().contains("livre=furto"));
        assert!(search.fetcher().requested().is_empty());
        assert_eq!(search.total_results(), 0);
        assert!(!search.has_next_page());
    }

    #[test]
    fn test_load_after_deferred_navigation() {
        let mut search = session(50);
        search.set_deferred_load(true);
        search.fetcher().push_page(first_page_html("1.234", &["A"]));

        search.search_term("furto").unwrap();
        let outcome = search.load().unwrap();

        assert!(matches!(outcome, LoadOutcome::Loaded { records: 1, .. }));
        assert_eq!(search.fetcher().requested(), vec![search.current_url().to_string()]);
        assert_eq!(search.total_results(), 1234);
        // flags stay stale until the next navigation
        assert!(!search.has_next_page());
    }

    #[test]
    fn test_deferred_walk_follows_loaded_total() {
        let mut search = session(10);
        search.set_deferred_load(true);
        search.fetcher().push_page(first_page_html("25", &["A"]));
        search.fetcher().push_page(toc_page_html(&["B"]));
        search.fetcher().push_page(toc_page_html(&["C"]));

        let mut seen = Vec::new();
        let visited = search
            .walk("furto", 5, |s, outcome| {
                assert!(matches!(outcome, LoadOutcome::Loaded { records: 1, .. }));
                seen.push(s.lawsuits()[0].case.clone());
            })
            .unwrap();

        assert_eq!(visited, 2);
        assert_eq!(seen, vec!["A", "B"]);
        assert_eq!(search.current_page(), 1);
        let requested = search.fetcher().requested();
        assert_eq!(requested.len(), 2);
        assert!(requested[0].contains("pesquisar.jsp"));
        assert!(requested[1].contains("&i=11&"));
    }

    #[test]
    fn test_walk_stops_at_requested_page_count() {
        let mut search = session(10);
        search.fetcher().push_page(first_page_html("100", &["A"]));
        search.fetcher().push_page(toc_page_html(&["B"]));
        search.fetcher().push_page(toc_page_html(&["C"]));

        let mut pages = 0;
        let visited = search.walk("furto", 3, |_, _| pages += 1).unwrap();

        assert_eq!(visited, 3);
        assert_eq!(pages, 3);
        assert_eq!(search.current_page(), 2);
        assert_eq!(search.lawsuits()[0].case, "C");
    }

    #[test]
    fn test_load_with_nothing_to_load() {
        let mut search = session(50);
        assert_eq!(search.load().unwrap(), LoadOutcome::Skipped);
        assert!(search.fetcher().requested().is_empty());
    }

    #[test]
    fn test_save_html_dumps_raw_body() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("out.html");
        let mut search = session(50);
        search.config.html_dump_path = dump.clone();
        search.set_save_html(true);

        let html = first_page_html("3", &["A"]);
        search.fetcher().push_page(html.clone());
        search.search_term("furto").unwrap();

        assert_eq!(std::fs::read_to_string(&dump).unwrap(), html);
    }

    #[test]
    fn test_uneven_page_reports_warning() {
        let mut search = session(50);
        let html = format!(
            r#"<span class="numDocs">2</span>{}<div class="paragrafoBRS"><div class="docTitulo">Processo</div><div class="docTexto">B</div></div>"#,
            record("A")
        );
        search.fetcher().push_page(html);

        let outcome = search.search_term("furto").unwrap();

        assert_eq!(search.lawsuits().len(), 1);
        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                records: 1,
                warnings: vec![ExtractWarning::UnevenFields {
                    identifiers: 2,
                    assembled: 1
                }]
            }
        );
    }

    #[test]
    fn test_export_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut search = session(50);
        search.fetcher().push_page(first_page_html("2", &["A", "B"]));
        search.search_term("ação penal").unwrap();

        let path = search.export(dir.path(), ExportFormat::Yaml).unwrap();
        let read = outputs::read_export(&path).unwrap();
        assert_eq!(read, search.snapshot());
    }
}
