use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Return a version of `text` with diacritics removed (NFKD, then drop
/// combining marks). Punctuation is preserved, which matters for author-name
/// substring tests.
pub fn strip_accents(text: &str) -> String {
    text.nfkd().filter(|ch| !is_combining_mark(*ch)).collect()
}

/// Collapse runs of whitespace to a single space and trim the ends.
pub fn clean_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

static APOSTROPHES_RE: Lazy<Regex> = Lazy::new(|| Regex::new("[‘’´`]").unwrap());
static QUOTES_RE: Lazy<Regex> = Lazy::new(|| Regex::new("[“”„‟″]").unwrap());
static BULLETS_RE: Lazy<Regex> = Lazy::new(|| Regex::new("[●○•‣◦▪▫◆◇]").unwrap());
static PUNCT_SPACING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[:,;]\s+").unwrap());

/// Canonicalize noisy Unicode text for matching: strip accents, normalize
/// apostrophe and quotation-mark variants, replace bullet glyphs, collapse
/// whitespace, fix punctuation spacing, optionally fold case.
///
/// The punctuation-spacing step drops a `:`/`,`/`;` that is followed by
/// whitespace together with the surrounding spaces, so "Paper: A Study" and
/// "Paper : A Study" come out identical. Idempotent for a fixed `fold_case`.
pub fn normalize(text: &str, fold_case: bool) -> String {
    let text = strip_accents(text);
    let text = APOSTROPHES_RE.replace_all(&text, "'");
    let text = QUOTES_RE.replace_all(&text, "\"");
    let text = BULLETS_RE.replace_all(&text, " ");
    let mut text = clean_whitespace(&text);
    // Fixpoint: one replacement can expose another (",, x" takes two passes).
    loop {
        let fixed = PUNCT_SPACING_RE.replace_all(&text, " ").trim().to_string();
        if fixed == text {
            break;
        }
        text = fixed;
    }
    if fold_case { text.to_lowercase() } else { text }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_accents_removes_diacritics() {
        assert_eq!(strip_accents("Dušek"), "Dusek");
        assert_eq!(strip_accents("Dusek"), "Dusek");
        assert_eq!(strip_accents("Ondřej Dušek"), "Ondrej Dusek");
    }

    #[test]
    fn strip_accents_keeps_punctuation() {
        assert_eq!(strip_accents("Novák, J."), "Novak, J.");
    }

    #[test]
    fn normalize_canonicalizes_quotes_and_apostrophes() {
        assert_eq!(normalize("“it’s”", true), "\"it's\"");
    }

    #[test]
    fn normalize_replaces_bullets_and_collapses_whitespace() {
        assert_eq!(normalize("a •  b\n\tc", true), "a b c");
    }

    #[test]
    fn normalize_punctuation_spacing_variants_agree() {
        assert_eq!(normalize("Paper: A Study", true), normalize("Paper : A Study", true));
        assert_eq!(normalize("Paper: A Study", true), "paper a study");
    }

    #[test]
    fn normalize_keeps_tight_punctuation() {
        // No whitespace after the colon, so nothing to fix.
        assert_eq!(normalize("word:word", true), "word:word");
    }

    #[test]
    fn normalize_respects_fold_case_flag() {
        assert_eq!(normalize("A Great Paper", false), "A Great Paper");
        assert_eq!(normalize("A Great Paper", true), "a great paper");
    }

    #[test]
    fn normalize_is_idempotent_for_fixed_fold_case() {
        proptest::proptest!(|(s in "[ \\tA-Za-z0-9čřšžáéíóúůýČŘŠŽ‘’´“”„•◦:,;.()'\"-]{0,64}")| {
            let once = normalize(&s, true);
            proptest::prop_assert_eq!(normalize(&once, true), once.clone());
            let once = normalize(&s, false);
            proptest::prop_assert_eq!(normalize(&once, false), once);
        })
    }
}
