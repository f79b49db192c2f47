//! Highlighted excerpts for search results.

use regex::{Captures, Regex, RegexBuilder};

/// Characters of context kept before the first match.
pub const CONTEXT_BEFORE: usize = 40;

/// Characters of context kept after the end of the first match.
pub const CONTEXT_AFTER: usize = 100;

/// Length of the excerpt when the query does not occur in the text.
pub const FALLBACK_LENGTH: usize = 150;

/// Strings wrapped around matches and used for clipped ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcerptMarkers {
    pub open: String,
    pub close: String,
    pub ellipsis: String,
}

impl ExcerptMarkers {
    pub fn new(
        open: impl Into<String>,
        close: impl Into<String>,
        ellipsis: impl Into<String>,
    ) -> Self {
        Self { open: open.into(), close: close.into(), ellipsis: ellipsis.into() }
    }
}

impl Default for ExcerptMarkers {
    fn default() -> Self {
        Self::new("<mark>", "</mark>", "...")
    }
}

/// Excerpt of `text` around the first occurrence of `query`, with every
/// occurrence in the window wrapped in `<mark>` tags.
pub fn extract_excerpt(text: &str, query: &str) -> String {
    extract_excerpt_with(text, query, &ExcerptMarkers::default())
}

/// [`extract_excerpt`] with custom markers.
///
/// The query is matched literally and case-insensitively. Never panics: an
/// empty query, a query that is absent, or one too large to compile all
/// fall back to the leading [`FALLBACK_LENGTH`] characters.
pub fn extract_excerpt_with(text: &str, query: &str, markers: &ExcerptMarkers) -> String {
    let Some(pattern) = literal_pattern(query) else {
        return leading_excerpt(text, markers);
    };
    let Some(first) = pattern.find(text) else {
        return leading_excerpt(text, markers);
    };

    let total = text.chars().count();
    let match_start = text[..first.start()].chars().count();
    let match_end = match_start + first.as_str().chars().count();

    let start = match_start.saturating_sub(CONTEXT_BEFORE);
    let end = (match_end + CONTEXT_AFTER).min(total);
    let window = &text[byte_offset(text, start)..byte_offset(text, end)];

    let highlighted = pattern.replace_all(window, |caps: &Captures| {
        format!("{}{}{}", markers.open, &caps[0], markers.close)
    });

    let mut excerpt = String::with_capacity(highlighted.len() + 2 * markers.ellipsis.len());
    if start > 0 {
        excerpt.push_str(&markers.ellipsis);
    }
    excerpt.push_str(&highlighted);
    if end < total {
        excerpt.push_str(&markers.ellipsis);
    }
    excerpt
}

fn literal_pattern(query: &str) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(query)).case_insensitive(true).build().ok()
}

fn leading_excerpt(text: &str, markers: &ExcerptMarkers) -> String {
    let cut = byte_offset(text, FALLBACK_LENGTH);
    if cut < text.len() {
        format!("{}{}", &text[..cut], markers.ellipsis)
    } else {
        text.to_string()
    }
}

/// Byte offset of the `chars`-th character, or the text length past the end.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(offset, _)| offset)
}

#[cfg(test)]
mod tests {
    use super::{extract_excerpt, extract_excerpt_with, ExcerptMarkers};

    #[test]
    fn short_text_with_match_is_fully_highlighted() {
        let excerpt = extract_excerpt("Blue Zones are special. blue zones!", "blue zones");
        assert_eq!(excerpt, "<mark>Blue Zones</mark> are special. <mark>blue zones</mark>!");
    }

    #[test]
    fn window_is_clipped_around_first_match() {
        let text = format!("{}needle{}", "x".repeat(300), "y".repeat(300));
        let excerpt = extract_excerpt(&text, "NEEDLE");
        let expected =
            format!("...{}<mark>needle</mark>{}...", "x".repeat(40), "y".repeat(100));
        assert_eq!(excerpt, expected);
    }

    #[test]
    fn no_leading_ellipsis_near_start() {
        let text = format!("start needle{}", "z".repeat(200));
        let excerpt = extract_excerpt(&text, "needle");
        assert!(excerpt.starts_with("start <mark>needle</mark>"));
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn missing_query_truncates_to_150_chars() {
        let text = "a".repeat(200);
        let excerpt = extract_excerpt(&text, "zzz");
        assert_eq!(excerpt, format!("{}...", "a".repeat(150)));

        assert_eq!(extract_excerpt("short text", "zzz"), "short text");
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let excerpt = extract_excerpt("abbbc and axbc", "a.b*c");
        assert!(!excerpt.contains("<mark>"));
        assert_eq!(excerpt, "abbbc and axbc");

        let literal = extract_excerpt("the pattern a.b*c appears", "a.b*c");
        assert_eq!(literal, "the pattern <mark>a.b*c</mark> appears");

        for query in ["(", "[", "\\", "$^", "{2}", "a|b", "+?"] {
            let _ = extract_excerpt("plain text (with [brackets]) and $ signs", query);
        }
    }

    #[test]
    fn multibyte_text_is_sliced_on_char_boundaries() {
        let text = format!("{}Épigénétique{}", "é".repeat(60), "ü".repeat(120));
        let excerpt = extract_excerpt(&text, "épigénétique");
        assert!(excerpt.contains("<mark>Épigénétique</mark>"));
        assert!(excerpt.starts_with("..."));
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn empty_inputs_are_total() {
        assert_eq!(extract_excerpt("", ""), "");
        assert_eq!(extract_excerpt("", "query"), "");
        assert_eq!(extract_excerpt("some text", ""), "some text");
    }

    #[test]
    fn custom_markers_are_used() {
        let markers = ExcerptMarkers::new("[", "]", "…");
        let text = format!("{}match", "w".repeat(50));
        let excerpt = extract_excerpt_with(&text, "match", &markers);
        assert_eq!(excerpt, format!("…{}[match]", "w".repeat(40)));
    }
}
