use biblatex::Bibliography;

use crate::record::Publication;

pub mod bib;
pub mod html;

/// Raw material from one requested source, before per-item extraction.
///
/// Both variants converge on the same record shape; only the per-item field
/// extraction differs.
pub enum RawSource {
    /// Markup of the author-listing page.
    Listing(String),
    /// A parsed BibTeX bibliography.
    Bibliography(Bibliography),
}

impl RawSource {
    /// Filter candidate items by author substring and year, extracting each
    /// survivor into a [`Publication`]. Input order is preserved.
    pub fn matching_records(&self, author: &str, year: i32) -> Vec<Publication> {
        match self {
            RawSource::Listing(markup) => html::matching_records(markup, author, year),
            RawSource::Bibliography(bib) => bib::matching_records(bib, author, year),
        }
    }
}
