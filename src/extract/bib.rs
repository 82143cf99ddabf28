use biblatex::{Bibliography, Chunk, Entry, Spanned};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::clean_whitespace;
use crate::pipeline::author_year_matches;
use crate::record::{Link, Publication, map_link_label};

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());

/// Pure field mapping from BibTeX entries to the unified record shape:
/// no markup walking and no text matching on this path.
pub fn matching_records(bib: &Bibliography, author: &str, year: i32) -> Vec<Publication> {
    bib.iter()
        .filter_map(|entry| {
            // Both sources filter on the same cleaned "First Last" form.
            let authors = reorder_authors(&field(entry, "author")?);
            let entry_year = entry_year(entry)?;
            if !author_year_matches(&authors, entry_year, author, year) {
                return None;
            }
            extract_entry(entry, authors)
        })
        .collect()
}

fn extract_entry(entry: &Entry, authors: String) -> Option<Publication> {
    let title = clean_whitespace(&strip_outer_braces(&field(entry, "title")?));
    if title.is_empty() {
        return None;
    }

    // Conference title wins over journal, journal over "howpublished".
    let venue = ["booktitle", "journal", "journaltitle", "howpublished"]
        .iter()
        .find_map(|name| field(entry, name))
        .unwrap_or_default();

    let mut links = Vec::new();
    if let Some(url) = field(entry, "url") {
        let label = map_link_label(&url).unwrap_or("Link").to_string();
        links.push(Link { label, url });
    }
    if let Some(id) = field(entry, "eprint").or_else(|| field(entry, "arxiv")) {
        links.push(Link {
            label: "ArXiv".to_string(),
            url: format!("https://arxiv.org/abs/{id}"),
        });
    }

    Some(Publication {
        authors,
        title,
        venue,
        links,
    })
}

fn field(entry: &Entry, name: &str) -> Option<String> {
    let text = clean_whitespace(&chunks_to_string(entry.get(name)?));
    if text.is_empty() { None } else { Some(text) }
}

fn chunks_to_string(chunks: &[Spanned<Chunk>]) -> String {
    chunks
        .iter()
        .map(|c| match &c.v {
            Chunk::Normal(s) => s.as_str(),
            Chunk::Verbatim(s) => s.as_str(),
            Chunk::Math(s) => s.as_str(),
        })
        .collect::<Vec<_>>()
        .join("")
}

/// Entries without a parseable 4-digit year are excluded: the year is a
/// required filter key.
fn entry_year(entry: &Entry) -> Option<i32> {
    let raw = field(entry, "year").or_else(|| field(entry, "date"))?;
    YEAR_RE.find(&raw)?.as_str().parse().ok()
}

/// Reorder "Last, First and Last, First ..." into "First Last, First Last".
/// Segments without a comma are already in display order and pass through.
fn reorder_authors(raw: &str) -> String {
    raw.split(" and ")
        .map(|segment| {
            let segment = segment.trim();
            match segment.split_once(',') {
                Some((family, given)) => {
                    clean_whitespace(&format!("{} {}", given.trim(), family.trim()))
                }
                None => segment.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strip one surrounding brace pair when it wraps the whole title.
fn strip_outer_braces(s: &str) -> String {
    let trimmed = s.trim();
    if let Some(inner) = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    {
        // "{A} and {B}" must keep its braces: the pair has to balance
        // across the whole string.
        let mut depth = 0i32;
        for ch in inner.chars() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth < 0 {
                        return trimmed.to_string();
                    }
                }
                _ => {}
            }
        }
        if depth == 0 {
            return inner.to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Bibliography {
        Bibliography::parse(src).expect("fixture parses")
    }

    const FIXTURE: &str = r#"
        @inproceedings{doe-roe-2023,
            author = {Doe, Jane and Roe, John},
            title = {A Great Paper},
            year = {2023},
            booktitle = {Proc. of ABC},
            url = {https://aclanthology.org/x},
            eprint = {2301.00001},
        }
        @article{solo2023,
            author = {Mary Major},
            title = {Journal Findings},
            year = {2023},
            journal = {Journal of Results},
        }
        @misc{doe2021,
            author = {Doe, Jane},
            title = {Older Notes},
            year = {2021},
            howpublished = {Tech report},
        }
        @misc{noyear,
            author = {Doe, Jane},
            title = {Undated Notes},
        }
    "#;

    #[test]
    fn maps_fields_and_reorders_authors() {
        let records = matching_records(&parse(FIXTURE), "Doe", 2023);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.authors, "Jane Doe, John Roe");
        assert_eq!(r.title, "A Great Paper");
        assert_eq!(r.venue, "Proc. of ABC");
    }

    #[test]
    fn url_then_eprint_links_in_order() {
        let records = matching_records(&parse(FIXTURE), "Doe", 2023);
        assert_eq!(
            records[0].links,
            vec![
                Link {
                    label: "Anthology".into(),
                    url: "https://aclanthology.org/x".into(),
                },
                Link {
                    label: "ArXiv".into(),
                    url: "https://arxiv.org/abs/2301.00001".into(),
                },
            ]
        );
    }

    #[test]
    fn journal_and_howpublished_serve_as_venue_fallbacks() {
        let records = matching_records(&parse(FIXTURE), "Major", 2023);
        assert_eq!(records[0].venue, "Journal of Results");
        let records = matching_records(&parse(FIXTURE), "Doe", 2021);
        assert_eq!(records[0].venue, "Tech report");
    }

    #[test]
    fn entries_without_year_are_excluded() {
        for year in [2021, 2023] {
            let records = matching_records(&parse(FIXTURE), "Doe", year);
            assert!(records.iter().all(|r| r.title != "Undated Notes"));
        }
    }

    #[test]
    fn already_ordered_author_passes_through() {
        assert_eq!(reorder_authors("Mary Major"), "Mary Major");
        assert_eq!(
            reorder_authors("Doe, Jane and Mary Major"),
            "Jane Doe, Mary Major"
        );
    }

    #[test]
    fn outer_braces_stripped_once() {
        assert_eq!(strip_outer_braces("{BLAKE2 in Practice}"), "BLAKE2 in Practice");
        assert_eq!(strip_outer_braces("{A} and {B}"), "{A} and {B}");
        assert_eq!(strip_outer_braces("No braces"), "No braces");
        assert_eq!(strip_outer_braces("{{Nested}}"), "{Nested}");
    }
}
