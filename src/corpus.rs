use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use pdfium_render::prelude::*;

use crate::normalize::normalize;

pub const DEFAULT_LISTING_URL: &str = "https://ufal.mff.cuni.cz/biblio/";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

fn agent() -> ureq::Agent {
    let cfg = ureq::Agent::config_builder()
        .timeout_connect(Some(std::time::Duration::from_secs(5)))
        .timeout_global(Some(std::time::Duration::from_secs(30)))
        .build();
    ureq::Agent::new_with_config(cfg)
}

/// Fetch the listing page as a Unicode string.
pub fn fetch_page(url: &str) -> Result<String> {
    agent()
        .get(url)
        .header("User-Agent", USER_AGENT)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .call()
        .with_context(|| format!("failed request for URL {url}"))?
        .into_body()
        .read_to_string()
        .context("read body")
}

fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    agent()
        .get(url)
        .header("User-Agent", USER_AGENT)
        .call()
        .with_context(|| format!("failed request for URL {url}"))?
        .into_body()
        .read_to_vec()
        .context("read body")
}

/// Bind to the system pdfium library, with an explicit path override.
pub fn bind_pdfium(pdfium_path: &Option<String>) -> Result<Pdfium> {
    let bindings = if let Some(path) = pdfium_path {
        Pdfium::bind_to_library(path)
            .with_context(|| format!("failed to load pdfium from: {path}"))?
    } else {
        Pdfium::bind_to_system_library()
            .context("pdfium not found; install pdfium-binaries or use --pdfium-path")?
    };
    Ok(Pdfium::new(bindings))
}

/// Full text of a PDF, every page joined by newlines.
pub fn pdf_text(pdfium: &Pdfium, path: &Path) -> Result<String> {
    let document = pdfium
        .load_pdf_from_file(path, None)
        .with_context(|| format!("failed to load PDF: {}", path.display()))?;
    all_pages_text(&document)
}

fn all_pages_text(document: &PdfDocument<'_>) -> Result<String> {
    let mut pages_text = Vec::new();
    for (idx, page) in document.pages().iter().enumerate() {
        let text = page
            .text()
            .with_context(|| format!("failed to load text for page {}", idx + 1))?;
        pages_text.push(text.all());
    }
    Ok(pages_text.join("\n"))
}

/// Build one document-text corpus: identifier → normalized full text.
///
/// A file that cannot be read contributes no entry; the failure is logged
/// and the run continues (matching against it simply never succeeds).
pub fn load_corpus(pdfium: Option<&Pdfium>, paths: &[PathBuf]) -> Vec<(String, String)> {
    let mut corpus = Vec::new();
    for path in paths {
        match document_file_text(pdfium, path) {
            Ok(text) => corpus.push((path.display().to_string(), normalize(&text, true))),
            Err(e) => eprintln!(
                "{} no text for {}: {e:#}",
                "warning:".if_supports_color(Stream::Stderr, |t| t.yellow()),
                path.display()
            ),
        }
    }
    corpus
}

/// Document-text collaborator for the pipeline: given a local path or URL,
/// return the document's full raw text, or empty text on any failure.
pub fn document_text(pdfium: Option<&Pdfium>, id: &str) -> String {
    let looked_up = if id.starts_with("http://") || id.starts_with("https://") {
        remote_document_text(pdfium, id)
    } else {
        document_file_text(pdfium, Path::new(id))
    };
    looked_up.unwrap_or_else(|e| {
        eprintln!(
            "{} no text for {id}: {e:#}",
            "warning:".if_supports_color(Stream::Stderr, |t| t.yellow())
        );
        String::new()
    })
}

fn document_file_text(pdfium: Option<&Pdfium>, path: &Path) -> Result<String> {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    {
        let pdfium = pdfium.context("pdfium unavailable")?;
        pdf_text(pdfium, path)
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

fn remote_document_text(pdfium: Option<&Pdfium>, url: &str) -> Result<String> {
    let bytes = fetch_bytes(url)?;
    if bytes.starts_with(b"%PDF") {
        let pdfium = pdfium.context("pdfium unavailable")?;
        let document = pdfium
            .load_pdf_from_byte_vec(bytes, None)
            .with_context(|| format!("failed to load PDF from {url}"))?;
        all_pages_text(&document)
    } else {
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
