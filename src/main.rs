use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use biblatex::Bibliography;
use clap::Parser;
use owo_colors::{OwoColorize, Stream};

use crate::cli::{Cli, Source};
use crate::extract::RawSource;

mod cli;
mod corpus;
mod extract;
mod matcher;
mod normalize;
mod pipeline;
mod record;
mod repolink;

fn main() -> Result<()> {
    let args = Cli::parse();

    // PDF support is only needed when document corpora are in play; a
    // missing pdfium library degrades those corpora to empty, not the run.
    let needs_pdf = !args.posters.is_empty() || !args.slides.is_empty() || args.repo_links;
    let pdfium = if needs_pdf {
        match corpus::bind_pdfium(&args.pdfium_path) {
            Ok(p) => Some(p),
            Err(e) => {
                eprintln!(
                    "{} {e:#}",
                    "warning:".if_supports_color(Stream::Stderr, |t| t.yellow())
                );
                None
            }
        }
    } else {
        None
    };

    let posters = corpus::load_corpus(pdfium.as_ref(), &args.posters);
    let slides = corpus::load_corpus(pdfium.as_ref(), &args.slides);

    let sources = if args.from.is_empty() {
        vec![Source::Listing(corpus::DEFAULT_LISTING_URL.to_string())]
    } else {
        args.from.clone()
    };

    let mut records = Vec::new();
    let (mut ok, mut failed) = (0u32, 0u32);
    for source in &sources {
        match gather(source) {
            Ok(raw) => {
                records.extend(raw.matching_records(&args.author, args.year));
                ok += 1;
            }
            Err(e) => {
                eprintln!(
                    "{} skipping source: {e:#}",
                    "warning:".if_supports_color(Stream::Stderr, |t| t.yellow())
                );
                failed += 1;
            }
        }
    }

    let paper_text = |url: &str| {
        if args.repo_links {
            corpus::document_text(pdfium.as_ref(), url)
        } else {
            String::new()
        }
    };
    pipeline::attach_links(&mut records, &paper_text, &posters, &slides);

    if records.is_empty() {
        println!("No matching items found.");
    } else {
        for record in &records {
            println!("{}", record.render());
        }
    }
    eprintln!(
        "{} {ok}  {} {failed}",
        "✓".if_supports_color(Stream::Stderr, |t| t.green()),
        "✗".if_supports_color(Stream::Stderr, |t| t.red())
    );
    Ok(())
}

/// Load one requested source, whole-source failures bubbling up so the
/// caller can skip it and keep going.
fn gather(source: &Source) -> Result<RawSource> {
    match source {
        Source::Listing(location) => {
            let markup = if Path::new(location).exists() {
                fs::read_to_string(location)
                    .with_context(|| format!("failed to read {location}"))?
            } else {
                corpus::fetch_page(location)?
            };
            Ok(RawSource::Listing(markup))
        }
        Source::Bibliography(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let bib = Bibliography::parse(&raw).map_err(|e| {
                anyhow::anyhow!("failed to parse BibTeX {}: {e}", path.display())
            })?;
            Ok(RawSource::Bibliography(bib))
        }
    }
}
