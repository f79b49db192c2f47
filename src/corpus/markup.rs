//! HTML to plain text.

use crate::error::{BookError, Result};
use scraper::node::Node;
use scraper::Html;

/// Elements whose text never reaches the reader.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Strip tags and comments from `html`, keeping text nodes in document order.
///
/// Parsing goes through the HTML5 parser, so every named and numeric entity
/// is decoded and stray `<` characters stay text (`a < b`). Whitespace text
/// between elements is kept so callers can split paragraphs on blank lines.
///
/// The parser itself recovers from any input. Markup that is cut off inside
/// a tag or comment would silently lose its tail, so that case is reported
/// as [`BookError::MalformedContent`].
pub fn strip_markup(html: &str) -> Result<String> {
    if let Some(reason) = truncation(html) {
        return Err(BookError::MalformedContent(reason));
    }

    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());

    for node in fragment.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(|a| a.value().as_element())
            .any(|e| SKIPPED_ELEMENTS.contains(&e.name()));
        if !hidden {
            out.push_str(text);
        }
    }

    Ok(out.replace('\u{a0}', " "))
}

/// Why `html` ends inside an open comment or tag, if it does.
fn truncation(html: &str) -> Option<String> {
    if let Some(start) = html.rfind("<!--") {
        if !html[start + 4..].contains("-->") {
            return Some("unterminated comment".to_string());
        }
    }

    let open = html.rfind('<')?;
    let tail = &html[open + 1..];
    let starts_tag = tail
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!' || c == '?');
    if starts_tag && !tail.contains('>') {
        let preview: String = tail.chars().take(20).collect();
        return Some(format!("unterminated tag <{preview}"));
    }
    None
}
