//! Single-best-match scoring over the knowledge base.

use crate::domain::{KnowledgeBase, KnowledgeCategory, KnowledgeEntry};

const TERM_OVERLAP_POINTS: u32 = 20;
const TOKEN_IN_TERM_POINTS: u32 = 10;
const TOKEN_IN_DEFINITION_POINTS: u32 = 2;
const WHAT_IS_POINTS: u32 = 15;
const HOW_DOES_POINTS: u32 = 10;
const EXPLAIN_POINTS: u32 = 15;

/// Tokens shorter than this are ignored when scoring
const MIN_TOKEN_CHARS: usize = 3;

/// The highest scoring knowledge entry for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnowledgeMatch<'a> {
    pub category: KnowledgeCategory,
    pub entry: &'a KnowledgeEntry,
    pub score: u32,
}

/// Relevance of one entry to a lowercased query.
pub fn relevance(query: &str, term: &str, definition: &str) -> u32 {
    let term = term.to_lowercase();
    let definition = definition.to_lowercase();
    let mentions_term = query.contains(term.as_str());

    let mut score = 0;
    if mentions_term || term.contains(query) {
        score += TERM_OVERLAP_POINTS;
    }

    for token in query.split_whitespace().filter(|t| t.chars().count() >= MIN_TOKEN_CHARS) {
        if term.contains(token) {
            score += TOKEN_IN_TERM_POINTS;
        }
        if definition.contains(token) {
            score += TOKEN_IN_DEFINITION_POINTS;
        }
    }

    if mentions_term {
        if query.starts_with("what is") || query.starts_with("what's") {
            score += WHAT_IS_POINTS;
        }
        // "how do" also covers "how does"
        if query.starts_with("how do") {
            score += HOW_DOES_POINTS;
        }
        if query.contains("explain") {
            score += EXPLAIN_POINTS;
        }
    }

    score
}

/// Best entry across all categories, or `None` when nothing scores.
///
/// Only a strictly higher score replaces the current best, so on ties the
/// first entry wins: concepts, then treatments, then lifestyle, each in file
/// order.
pub fn best_match<'a>(kb: &'a KnowledgeBase, query: &str) -> Option<KnowledgeMatch<'a>> {
    let mut best: Option<KnowledgeMatch<'a>> = None;
    for (category, entry) in kb.iter() {
        let score = relevance(query, &entry.term, &entry.definition);
        if score > best.map_or(0, |b| b.score) {
            best = Some(KnowledgeMatch { category, entry, score });
        }
    }
    best
}
