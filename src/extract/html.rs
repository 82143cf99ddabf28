use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::normalize::clean_whitespace;
use crate::pipeline::author_year_matches;
use crate::record::{Link, Publication, map_link_label};

static LI_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());
static AUTHORS_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("span.authors").unwrap());
static PUBTITLE_ANCHOR_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.pubtitle a[href]").unwrap());
static ANCHOR_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Tail pattern of the author-metadata text: authors, then "(YYYY):". The
/// year is required; items without it are not publication records.
static AUTHOR_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*)\((\d{4})\):\s*$").unwrap());
static VENUE_FALLBACK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"In:\s*([^()]+)").unwrap());

/// Case-insensitive keywords marking the primary paper link.
const LABEL_KEYWORDS: &[&str] = &["url", "pdf"];
/// Site-specific labels for locally mirrored copies, matched case-sensitively.
const SITE_LABELS: &[&str] = &["local PDF", "local ZIP"];

/// Walk every listing item on the page, keep those whose author string and
/// year match the query, and extract each into the unified record shape.
///
/// Items lacking the author/year metadata shape are silently excluded; the
/// page is heterogeneous and not every `<li>` is a publication.
pub fn matching_records(markup: &str, author: &str, year: i32) -> Vec<Publication> {
    let doc = Html::parse_document(markup);
    doc.select(&LI_SEL)
        .filter_map(|li| {
            let (authors, item_year) = authors_and_year(li)?;
            if !author_year_matches(&authors, item_year, author, year) {
                return None;
            }
            extract_item(li, authors)
        })
        .collect()
}

fn extract_item(li: ElementRef, authors: String) -> Option<Publication> {
    let title = title_text(li)?;
    let venue = venue_text(li);
    let links = primary_link(li).into_iter().collect();
    Some(Publication {
        authors,
        title,
        venue,
        links,
    })
}

fn authors_and_year(li: ElementRef) -> Option<(String, i32)> {
    let span = li.select(&AUTHORS_SEL).next()?;
    let raw = clean_whitespace(&text_of(span));
    let caps = AUTHOR_YEAR_RE.captures(&raw)?;
    let authors = clean_whitespace(&caps[1]);
    if authors.is_empty() {
        return None;
    }
    let year = caps[2].parse().ok()?;
    Some((authors, year))
}

/// Prefer the anchor inside the distinguished "pubtitle" marker; fall back
/// to the first anchor anywhere in the item. The anchor is used only for
/// the text it contains, its href is discarded.
fn title_text(li: ElementRef) -> Option<String> {
    let anchor = li
        .select(&PUBTITLE_ANCHOR_SEL)
        .next()
        .or_else(|| li.select(&ANCHOR_SEL).next())?;
    let title = clean_whitespace(&text_of(anchor));
    if title.is_empty() { None } else { Some(title) }
}

/// Venue is the text of the first italicized node that follows the literal
/// "In:" marker in document order. No "In:" at all means no venue, which is
/// a valid outcome on this page.
fn venue_text(li: ElementRef) -> String {
    let mut seen_in_marker = false;
    for node in li.descendants() {
        match node.value() {
            Node::Text(t) => {
                if !seen_in_marker && t.contains("In:") {
                    seen_in_marker = true;
                }
            }
            Node::Element(el) if seen_in_marker && el.name() == "i" => {
                if let Some(venue) = ElementRef::wrap(node) {
                    return clean_whitespace(&text_of(venue));
                }
            }
            _ => {}
        }
    }
    // Fallback: line-level pattern between "In:" and the next parenthesis.
    let raw = text_of(li);
    VENUE_FALLBACK_RE
        .captures(&raw)
        .map(|c| clean_whitespace(&c[1]))
        .unwrap_or_default()
}

/// First anchor whose visible label names the paper itself. The rendered
/// label is replaced by the canonical short name when the href points at a
/// known external-repository host.
fn primary_link(li: ElementRef) -> Option<Link> {
    for anchor in li.select(&ANCHOR_SEL) {
        let text = clean_whitespace(&text_of(anchor));
        let lower = text.to_lowercase();
        let selected = LABEL_KEYWORDS.iter().any(|k| lower.contains(k))
            || SITE_LABELS.iter().any(|k| text.contains(k));
        if !selected {
            continue;
        }
        let href = anchor.value().attr("href")?;
        let label = match map_link_label(href) {
            Some(canonical) => canonical.to_string(),
            None if text.is_empty() => "link".to_string(),
            None => text,
        };
        return Some(Link {
            label,
            url: href.to_string(),
        });
    }
    None
}

fn text_of(el: ElementRef) -> String {
    el.text().collect::<Vec<_>>().join(" ")
}
