//! Ranked full-text search over the index.
//!
//! Lexical scoring with fixed integer weights, a stable descending sort and
//! a per-chapter/per-term diversity cap. The chat responder in
//! [`crate::chat`] scores separately.

use crate::domain::{IndexedItem, ScoredResult};
use crate::index::SearchIndex;
use std::collections::HashSet;
use tracing::debug;

pub mod excerpt;

pub use excerpt::{extract_excerpt, extract_excerpt_with, ExcerptMarkers};

/// Upper bound on results returned by [`search`].
pub const MAX_RESULTS: usize = 10;

/// Scores above this bypass deduplication.
pub const HIGH_CONFIDENCE_SCORE: u32 = 80;

const EXACT_PHRASE_POINTS: u32 = 100;
const TOKEN_IN_TEXT_POINTS: u32 = 10;
const TOKEN_IN_KEYWORD_POINTS: u32 = 20;
const TITLE_PHRASE_POINTS: u32 = 50;
const EXACT_KEYWORD_POINTS: u32 = 30;

/// Key limiting how many results one chapter or knowledge term contributes.
#[derive(Debug, PartialEq, Eq, Hash)]
enum DedupKey<'a> {
    Term(&'a str),
    Chapter(i64),
}

impl<'a> DedupKey<'a> {
    fn for_item(item: &'a IndexedItem) -> Self {
        match (&item.term, item.is_knowledge()) {
            (Some(term), true) => DedupKey::Term(term),
            _ => DedupKey::Chapter(item.chapter_index),
        }
    }
}

/// Rank index items against a free-text query.
///
/// Returns at most [`MAX_RESULTS`] results, highest score first, never a
/// zero score. A blank query finds nothing. Beyond that there is no minimum
/// query length here; callers decide when a query is worth running.
pub fn search<'a>(index: &'a SearchIndex, query: &str) -> Vec<ScoredResult<'a>> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let query = query.to_lowercase();
    let tokens: Vec<&str> = query.split_whitespace().collect();

    let mut scored: Vec<ScoredResult<'a>> = index
        .items()
        .iter()
        .filter_map(|item| {
            let score = score_item(item, &query, &tokens);
            (score > 0).then_some(ScoredResult { item, score })
        })
        .collect();

    // `sort_by` is stable: equal scores keep index order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));

    let mut seen: HashSet<DedupKey<'a>> = HashSet::new();
    let mut results = Vec::with_capacity(MAX_RESULTS);
    for result in scored {
        let key = DedupKey::for_item(result.item);
        if seen.insert(key) || result.score > HIGH_CONFIDENCE_SCORE {
            results.push(result);
            if results.len() >= MAX_RESULTS {
                break;
            }
        }
    }

    debug!(query = %query, results = results.len(), "search complete");
    results
}

/// Lexical relevance of one item. `query` must already be lowercased and
/// `tokens` must be its whitespace-separated parts.
pub fn score_item(item: &IndexedItem, query: &str, tokens: &[&str]) -> u32 {
    let text = item.text.to_lowercase();
    let keywords: Vec<String> = item.keywords.iter().map(|k| k.to_lowercase()).collect();
    let phrase_match = text.contains(query);

    let mut score = 0;
    if phrase_match {
        score += EXACT_PHRASE_POINTS;
    }

    for token in tokens {
        if text.contains(token) {
            score += TOKEN_IN_TEXT_POINTS;
        }
        if keywords.iter().any(|k| k.contains(token)) {
            score += TOKEN_IN_KEYWORD_POINTS;
        }
    }

    if item.is_title() && phrase_match {
        score += TITLE_PHRASE_POINTS;
    }

    if keywords.iter().any(|k| k == query) {
        score += EXACT_KEYWORD_POINTS;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::{score_item, search, MAX_RESULTS};
    use crate::domain::{Chapter, Corpus, KnowledgeBase, KnowledgeEntry, SourceKind};
    use crate::index::{build_index, SearchIndex};

    fn blue_zones_index() -> SearchIndex {
        let corpus = Corpus {
            chapters: vec![Chapter {
                id: "blue-zones".to_string(),
                number: Some("4".to_string()),
                title: "Blue Zones".to_string(),
                html_content: "<p>Blue Zones are regions where people live much longer than average, over 24 characters.</p>".to_string(),
                keywords: vec!["longevity".to_string()],
                ..Chapter::default()
            }],
            ..Corpus::default()
        };
        build_index(&corpus)
    }

    fn many_chapters_index(count: usize) -> SearchIndex {
        let chapters = (0..count)
            .map(|i| Chapter {
                id: format!("c{i}"),
                title: format!("Chapter about stem cells {i}"),
                html_content: format!(
                    "<p>Stem cells repair tissue in part {i} of the book.</p>\n\n<p>More on stem cells and repair, section {i}.</p>"
                ),
                keywords: vec!["stem cells".to_string()],
                ..Chapter::default()
            })
            .collect();
        build_index(&Corpus { chapters, ..Corpus::default() })
    }

    #[test]
    fn title_phrase_match_ranks_first() {
        let index = blue_zones_index();
        let results = search(&index, "blue zones");

        let top = results.first().expect("at least one result");
        assert_eq!(top.item.source_kind, SourceKind::ChapterTitle);
        // 100 phrase + 50 title + 2 * 10 tokens
        assert!(top.score >= 150);
        assert_eq!(top.score, 170);
    }

    #[test]
    fn score_breakdown_matches_weights() {
        let index = blue_zones_index();
        let paragraph = &index.items()[0];
        assert_eq!(paragraph.source_kind, SourceKind::ChapterParagraph);

        // phrase (100) + two tokens in text (20)
        assert_eq!(score_item(paragraph, "blue zones", &["blue", "zones"]), 120);
        // keyword contains token (20) + exact keyword (30); absent from text
        assert_eq!(score_item(paragraph, "longevity", &["longevity"]), 50);
        assert_eq!(score_item(paragraph, "nothing", &["nothing"]), 0);
    }

    #[test]
    fn high_confidence_hits_bypass_dedup() {
        let index = blue_zones_index();
        let results = search(&index, "blue zones");
        // Title (170) and paragraph (120) share a chapter but both exceed 80.
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].item.source_kind, SourceKind::ChapterParagraph);
    }

    #[test]
    fn low_scores_are_deduplicated_per_chapter() {
        let index = many_chapters_index(1);
        // "repair" appears in both paragraphs (10 each) but not the title.
        let results = search(&index, "repair xyz");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 10);
        assert_eq!(results[0].item.text, "Stem cells repair tissue in part 0 of the book.");
    }

    #[test]
    fn never_more_than_ten_sorted_nonzero_results() {
        let index = many_chapters_index(15);
        let results = search(&index, "stem cells");
        assert_eq!(results.len(), MAX_RESULTS);
        assert!(results.iter().all(|r| r.score > 0));
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn equal_scores_keep_index_order() {
        let index = many_chapters_index(3);
        let results = search(&index, "repair xyz");
        let chapters: Vec<i64> = results.iter().map(|r| r.item.chapter_index).collect();
        assert_eq!(chapters, vec![0, 1, 2]);
    }

    #[test]
    fn search_is_idempotent() {
        let index = many_chapters_index(4);
        assert_eq!(search(&index, "stem repair"), search(&index, "stem repair"));
    }

    #[test]
    fn blank_query_returns_nothing() {
        let index = many_chapters_index(12);
        assert!(search(&index, "").is_empty());
        assert!(search(&index, "   ").is_empty());
        assert!(search(&index, "\t\n").is_empty());
    }

    #[test]
    fn single_character_query_does_not_panic() {
        let index = blue_zones_index();
        let results = search(&index, "a");
        assert!(results.iter().all(|r| r.score > 0));
        assert!(!results.is_empty());
    }

    #[test]
    fn knowledge_terms_dedupe_by_term() {
        let corpus = Corpus {
            knowledge_base: KnowledgeBase {
                concepts: vec![
                    KnowledgeEntry::new("telomeres", "protective caps on chromosomes"),
                    KnowledgeEntry::new("stem cells", "repair workforce of the body"),
                ],
                ..KnowledgeBase::default()
            },
            ..Corpus::default()
        };
        let index = build_index(&corpus);
        let results = search(&index, "telomeres");
        assert_eq!(results[0].item.term.as_deref(), Some("telomeres"));
        // phrase 100 + token 10 + keyword token 20 + exact keyword 30
        assert_eq!(results[0].score, 160);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn empty_index_returns_nothing() {
        assert!(search(&SearchIndex::default(), "anything").is_empty());
    }
}
