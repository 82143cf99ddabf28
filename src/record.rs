use url::Url;

/// A supplementary or primary link attached to a publication.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// The unified record both extractors produce.
///
/// `links` keeps insertion order: the primary paper link first, then
/// whatever the pipeline attaches (repository, poster, slides). URLs are
/// stored unescaped; escaping happens exactly once, in [`Publication::render`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Publication {
    pub authors: String,
    pub title: String,
    pub venue: String,
    pub links: Vec<Link>,
}

/// Canonical short names for known external-repository hosts.
///
/// Matches on the parsed host (subdomains included), not the raw string:
/// listing hrefs are heterogeneous, and a known host name appearing in a
/// path or query must not relabel a foreign link. Relative hrefs do not
/// parse and map to `None`.
pub fn map_link_label(url: &str) -> Option<&'static str> {
    const MAPPING: &[(&str, &str)] = &[
        ("arxiv.org", "ArXiv"),
        ("aclanthology.org", "Anthology"),
    ];
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    MAPPING
        .iter()
        .find(|(known, _)| host == *known || host.ends_with(&format!(".{known}")))
        .map(|(_, label)| *label)
}

/// HTML-entity escape for free text and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

impl Publication {
    /// Render the record as one `<li>` line.
    ///
    /// The venue clause is omitted when the venue is empty; the bracketed
    /// link list is omitted when no links were discovered.
    pub fn render(&self) -> String {
        let mut core = format!(
            "{}. <strong>{}</strong>",
            escape_html(&self.authors),
            escape_html(&self.title)
        );
        if !self.venue.is_empty() {
            core.push_str(&format!(", in: {}.", escape_html(&self.venue)));
        }
        for link in &self.links {
            core.push_str(&format!(
                " [<a href=\"{}\">{}</a>]",
                escape_html(&link.url),
                escape_html(&link.label)
            ));
        }
        format!("<li>{core}</li>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Publication {
        Publication {
            authors: "Jane Doe, John Roe".into(),
            title: "A Great Paper".into(),
            venue: "Proc. of ABC".into(),
            links: vec![Link {
                label: "Anthology".into(),
                url: "https://aclanthology.org/x".into(),
            }],
        }
    }

    #[test]
    fn render_full_record() {
        assert_eq!(
            record().render(),
            "<li>Jane Doe, John Roe. <strong>A Great Paper</strong>, \
             in: Proc. of ABC. [<a href=\"https://aclanthology.org/x\">Anthology</a>]</li>"
        );
    }

    #[test]
    fn render_omits_empty_venue_and_links() {
        let mut r = record();
        r.venue.clear();
        r.links.clear();
        assert_eq!(r.render(), "<li>Jane Doe, John Roe. <strong>A Great Paper</strong></li>");
    }

    #[test]
    fn render_escapes_exactly_once() {
        let mut r = record();
        r.title = "Q&A <at scale>".into();
        r.links[0].url = "https://example.org/?a=1&b=2".into();
        let line = r.render();
        assert!(line.contains("Q&amp;A &lt;at scale&gt;"));
        assert!(line.contains("href=\"https://example.org/?a=1&amp;b=2\""));
        assert!(!line.contains("&amp;amp;"));
        assert!(!line.contains("&amp;lt;"));
    }

    #[test]
    fn map_link_label_known_hosts() {
        assert_eq!(map_link_label("https://arxiv.org/abs/2401.00001"), Some("ArXiv"));
        assert_eq!(map_link_label("https://aclanthology.org/2023.acl-long.1/"), Some("Anthology"));
        assert_eq!(map_link_label("https://export.arxiv.org/abs/2401.00001"), Some("ArXiv"));
        assert_eq!(map_link_label("https://example.org/paper.pdf"), None);
    }

    #[test]
    fn map_link_label_matches_host_not_raw_string() {
        // A known host name in the path or query must not relabel the link.
        assert_eq!(map_link_label("https://example.org/mirror/arxiv.org/x"), None);
        assert_eq!(map_link_label("https://example.org/?from=aclanthology.org"), None);
        // Relative hrefs have no host at all.
        assert_eq!(map_link_label("/biblio/123"), None);
    }
}
