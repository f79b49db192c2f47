//! Flat search index over chapters and the knowledge base.

use crate::corpus::chapter_text;
use crate::domain::{Corpus, IndexedItem, SourceKind, KNOWLEDGE_BASE_TITLE};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use tracing::debug;

/// Paragraphs shorter than this (after trimming) are dropped as noise.
pub const MIN_PARAGRAPH_CHARS: usize = 20;

static BLANK_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t\r\f\v]*\n\s*").expect("valid paragraph regex"));

/// Immutable searchable representation of a corpus.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    items: Vec<IndexedItem>,
}

impl SearchIndex {
    pub fn items(&self) -> &[IndexedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Build the index once at startup.
///
/// Per chapter: one `ChapterParagraph` item per paragraph longer than
/// [`MIN_PARAGRAPH_CHARS`], followed by one `ChapterTitle` item. Then one
/// `KnowledgeEntry` item per knowledge-base entry, concepts first.
pub fn build_index(corpus: &Corpus) -> SearchIndex {
    let mut items = Vec::new();

    for (index, chapter) in corpus.chapters.iter().enumerate() {
        let chapter_index = index as i64;
        let keywords: BTreeSet<String> = chapter.keywords.iter().cloned().collect();

        for paragraph in split_paragraphs(&chapter_text(chapter)) {
            items.push(IndexedItem {
                source_kind: SourceKind::ChapterParagraph,
                chapter_index,
                chapter_title: chapter.title.clone(),
                chapter_number: chapter.number.clone(),
                text: paragraph.to_string(),
                keywords: keywords.clone(),
                term: None,
            });
        }

        items.push(IndexedItem {
            source_kind: SourceKind::ChapterTitle,
            chapter_index,
            chapter_title: chapter.title.clone(),
            chapter_number: chapter.number.clone(),
            text: format!("{} {}", chapter.title, chapter.subtitle),
            keywords,
            term: None,
        });
    }

    for (_, entry) in corpus.knowledge_base.iter() {
        items.push(IndexedItem {
            source_kind: SourceKind::KnowledgeEntry,
            chapter_index: -1,
            chapter_title: KNOWLEDGE_BASE_TITLE.to_string(),
            chapter_number: None,
            text: format!("{}: {}", entry.term, entry.definition),
            keywords: BTreeSet::from([entry.term.clone()]),
            term: Some(entry.term.clone()),
        });
    }

    debug!(
        items = items.len(),
        chapters = corpus.chapters.len(),
        knowledge_entries = corpus.knowledge_base.len(),
        "built search index"
    );
    SearchIndex { items }
}

/// Split plain text on blank lines, keeping trimmed paragraphs that are long
/// enough to be worth indexing.
pub fn split_paragraphs(text: &str) -> impl Iterator<Item = &str> {
    BLANK_LINE_RE
        .split(text)
        .map(str::trim)
        .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
}
