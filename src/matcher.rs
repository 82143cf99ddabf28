use crate::normalize::normalize;
use crate::record::Link;

/// Minimum length (in words) of a common contiguous run for the fallback
/// path to accept a match. Titles are long enough that a four-word run is
/// unlikely by chance; shorter runs are not.
const MIN_RUN_WORDS: usize = 4;

/// Decide whether some document in `corpus` is "about" `title`.
///
/// The corpus maps document identifiers to already-normalized full text, in
/// insertion order. Exact substring containment of the normalized title
/// short-circuits; otherwise the document with the longest common contiguous
/// word run wins, provided the run has at least [`MIN_RUN_WORDS`] words.
/// Ties go to the first document encountered.
pub fn find_match(title: &str, corpus: &[(String, String)], label: &str) -> Option<Link> {
    let norm_title = normalize(title, true);
    if norm_title.is_empty() {
        return None;
    }

    // Exact containment: strong, high-confidence, first hit wins.
    if let Some((id, _)) = corpus.iter().find(|(_, text)| text.contains(&norm_title)) {
        return Some(Link {
            label: label.to_string(),
            url: id.clone(),
        });
    }

    // Fallback: longest common contiguous run of whole words.
    let title_words: Vec<&str> = norm_title.split_whitespace().collect();
    let mut best_len = 0;
    let mut best_id: Option<&str> = None;
    for (id, text) in corpus {
        let doc_words: Vec<&str> = text.split_whitespace().collect();
        let run = longest_common_run(&title_words, &doc_words);
        if run > best_len {
            best_len = run;
            best_id = Some(id.as_str());
        }
    }

    if best_len >= MIN_RUN_WORDS {
        best_id.map(|id| Link {
            label: label.to_string(),
            url: id.to_string(),
        })
    } else {
        None
    }
}

/// Length of the longest contiguous sequence of words appearing identically,
/// in the same order, in both `a` and `b`.
///
/// Row-rolling scan over suffix-match lengths; word order matters and no
/// credit is given for non-contiguous overlap.
fn longest_common_run(a: &[&str], b: &[&str]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    let mut best = 0;
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            cur[j] = if a[i - 1] == b[j - 1] { prev[j - 1] + 1 } else { 0 };
            best = best.max(cur[j]);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}
