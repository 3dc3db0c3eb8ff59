//! # SCON Scraper
//!
//! Command-line shell over the SCON search engine. It either runs one search
//! and walks a fixed number of pages (batch mode), or reads navigation
//! commands from standard input (interactive mode).
//!
//! ## Usage
//!
//! ```sh
//! scon_scraper furto --pages 2 --export
//! RUST_LOG=debug scon_scraper --interactive
//! ```

use clap::Parser;
use scon_scraper::cli::{Cli, Command};
use scon_scraper::search::{LoadOutcome, Search};
use std::error::Error;
use std::io::{self, BufRead, Write};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = args.search_config()?;
    info!(
        page_size = config.page_size.get(),
        deferred_load = config.deferred_load,
        save_html = config.save_html,
        "scon_scraper starting up"
    );
    let mut search = Search::new(config)?;

    if args.interactive {
        run_interactive(&mut search, &args)?;
    } else if let Some(term) = args.term.as_deref() {
        run_batch(&mut search, &args, term)?;
    } else {
        error!("No search term given; pass a TERM or use --interactive");
        return Err("missing search term".into());
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    Ok(())
}

/// Search `term`, walk up to `--pages` pages and optionally export the last one.
#[instrument(level = "info", skip(search, args))]
fn run_batch(search: &mut Search, args: &Cli, term: &str) -> Result<(), Box<dyn Error>> {
    let visited = search.walk(term, args.pages, |search, outcome| {
        report(outcome);
        print_page(search);
    })?;
    info!(visited, "Batch walk finished");

    if args.export {
        let path = search.export(&args.output_dir, args.format)?;
        println!("Exported {} records to {}", search.lawsuits().len(), path.display());
    }
    Ok(())
}

/// Read commands line by line until `quit` or end of input.
///
/// A failing command is reported and the session stays usable.
fn run_interactive(search: &mut Search, args: &Cli) -> Result<(), Box<dyn Error>> {
    if let Some(term) = args.term.as_deref() {
        if let Err(e) = search.search_term(term).map(report) {
            error!(error = %e, "Initial search failed");
        }
    }

    print_help();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "scon> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let Some(command) = Command::parse(&line) else {
            if !line.trim().is_empty() {
                println!("Unknown command: {}", line.trim());
            }
            continue;
        };

        let result = match command {
            Command::Search(term) => search.search_term(&term),
            Command::First => search.first_page(),
            Command::Next => search.next_page(),
            Command::Prev => search.prev_page(),
            Command::Last => search.last_page(),
            Command::Load => search.load(),
            Command::Show => {
                print_page(search);
                continue;
            }
            Command::Status => {
                print_status(search);
                continue;
            }
            Command::Export => {
                match search.export(&args.output_dir, args.format) {
                    Ok(path) => println!("Exported to {}", path.display()),
                    Err(e) => println!("Export failed: {e}"),
                }
                continue;
            }
            Command::Help => {
                print_help();
                continue;
            }
            Command::Quit => break,
        };

        match result {
            Ok(outcome) => {
                report(outcome);
                print_status(search);
            }
            Err(e) => {
                error!(error = %e, "Navigation failed");
                println!("Failed: {e}");
            }
        }
    }
    Ok(())
}

fn report(outcome: LoadOutcome) {
    match outcome {
        LoadOutcome::Loaded { records, warnings } => {
            for warning in &warnings {
                warn!(%warning, "Page extracted with problems");
            }
            debug!(records, "Page loaded");
        }
        LoadOutcome::Deferred => debug!("Load deferred"),
        LoadOutcome::Skipped => debug!("Nothing to load"),
    }
}

fn print_status(search: &Search) {
    let lawsuits = search.lawsuits();
    let page_size = search.page_size().get();
    let first = search.current_page() * page_size + 1;
    let shown = if lawsuits.is_empty() {
        "none".to_string()
    } else {
        format!("{}-{}", first, first + lawsuits.len() - 1)
    };
    println!(
        "\"{}\": page {} | showing {} of {} | prev: {} | next: {}",
        search.term(),
        search.current_page() + 1,
        shown,
        search.total_results(),
        if search.has_prev_page() { "yes" } else { "no" },
        if search.has_next_page() { "yes" } else { "no" },
    );
}

fn print_page(search: &Search) {
    print_status(search);
    for lawsuit in search.lawsuits() {
        println!();
        println!("{}", lawsuit.case);
        println!("  Relator: {}", lawsuit.rapporteur);
        println!("  Julgamento: {}", lawsuit.judgment_date);
        println!("  Publicação: {}", lawsuit.pub_date);
        println!("  Ementa: {}", lawsuit.headnote);
    }
}

fn print_help() {
    println!("Commands: search <term> | first | next | prev | last | load | show | status | export | help | quit");
}
