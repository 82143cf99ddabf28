use std::{fs, path::PathBuf, str::FromStr};

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Scrape and reformat biblio entries", long_about = None)]
pub struct Cli {
    /// Author name (substring match, case- and accent-insensitive)
    #[arg(long)]
    pub author: String,

    /// Publication year to filter
    #[arg(long)]
    pub year: i32,

    /// Poster document to consider as an additional link (repeatable)
    #[arg(long = "poster", value_name = "FILE")]
    pub posters: Vec<PathBuf>,

    /// Slide deck to consider as an additional link (repeatable)
    #[arg(long = "slides", value_name = "FILE")]
    pub slides: Vec<PathBuf>,

    /// Look for a code/data repository URL in each paper's primary document
    #[arg(long)]
    pub repo_links: bool,

    /// Override pdfium library path
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pub pdfium_path: Option<String>,

    /// Sources to scrape: listing-page URLs, local listing files, or BibTeX
    /// files. Defaults to the public biblio page.
    #[arg(value_name = "SRC")]
    pub from: Vec<Source>,
}

#[derive(Clone, Debug)]
/// Where publication records come from, which can either be
///
/// - an author-listing page (remote URL or a saved local copy), or
/// - a BibTeX bibliography file.
pub enum Source {
    Listing(String),
    Bibliography(PathBuf),
}

impl FromStr for Source {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // NOTE: No validation here, just a guess. An existing .bib file is a
        // bibliography; any other existing file is a saved listing page;
        // everything else is assumed to be a URL and fails later at fetch
        // time if it is not.
        if let Ok(path) = fs::canonicalize(s) {
            if path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("bib"))
            {
                Ok(Source::Bibliography(path))
            } else {
                Ok(Source::Listing(path.display().to_string()))
            }
        } else {
            Ok(Source::Listing(s.to_string()))
        }
    }
}
