use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::Link;

/// Phrase-anchored repository pattern: "our code/data/implementation/dataset",
/// then at most 10 intervening words, then an HTTP(S) URL token.
static REPO_RE: Lazy<Regex> = Lazy::new(|| {
    // The `\S*` after the phrase word eats punctuation glued to it
    // ("our dataset: https://...").
    Regex::new(r"(?i)\bour\s+(code|implementation|data|dataset)\b\S*(?:\s+\S+){0,10}?\s+(https?://\S+)")
        .unwrap()
});

/// Locate a code/data repository URL in the text of the primary paper
/// document. First match in document order wins; trailing sentence
/// punctuation is stripped from the captured URL. No match is a normal
/// outcome, not an error.
pub fn find_repo_link(document_text: &str) -> Option<Link> {
    let caps = REPO_RE.captures(document_text)?;
    let phrase = caps.get(1)?.as_str().to_lowercase();
    let url = caps
        .get(2)?
        .as_str()
        .trim_end_matches(['.', ',', ';', ':'])
        .to_string();
    let label = if phrase == "code" || phrase == "implementation" {
        "Code"
    } else {
        "Data"
    };
    Some(Link {
        label: label.to_string(),
        url,
    })
}
