//! Site scrapers.
//!
//! Each scraper module owns everything that depends on one site's markup:
//!
//! 1. **URL building**: turn a term and a page position into a request URL
//! 2. **Extraction**: read the result counter and the labeled fields of a page
//! 3. **Assembly**: zip the extracted field lists into records
//!
//! # Supported Sources
//!
//! | Source | Module | Notes |
//! |--------|--------|-------|
//! | STJ SCON | [`scon`] | Free search for the first page, TOC view for the rest |
//!
//! Network access lives in [`crate::fetch`]; scrapers only see raw bodies.

pub mod scon;
