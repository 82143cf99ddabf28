use crate::matcher;
use crate::normalize::strip_accents;
use crate::record::Publication;
use crate::repolink;

/// Shared selection predicate for both sources: exact year, and
/// accent-and-case-insensitive substring containment on the author string.
/// Plain containment, not tokenized and not fuzzy.
pub fn author_year_matches(authors: &str, year: i32, author_query: &str, year_query: i32) -> bool {
    year == year_query
        && strip_accents(&authors.to_lowercase())
            .contains(&strip_accents(&author_query.to_lowercase()))
}

/// Attach supplementary links to every record, in the fixed order
/// repository → poster → slides (after the primary link from extraction).
///
/// `paper_text` is the document-text collaborator for the primary link's
/// target; it returns empty text on failure and is only consulted when a
/// primary link exists. No record is ever discarded here.
pub fn attach_links(
    records: &mut [Publication],
    paper_text: &dyn Fn(&str) -> String,
    posters: &[(String, String)],
    slides: &[(String, String)],
) {
    for record in records.iter_mut() {
        if let Some(primary_url) = record.links.first().map(|l| l.url.clone()) {
            let text = paper_text(&primary_url);
            if let Some(link) = repolink::find_repo_link(&text) {
                record.links.push(link);
            }
        }
        if let Some(link) = matcher::find_match(&record.title, posters, "Poster") {
            record.links.push(link);
        }
        if let Some(link) = matcher::find_match(&record.title, slides, "Slides") {
            record.links.push(link);
        }
    }
}
