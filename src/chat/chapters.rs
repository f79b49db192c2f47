//! Chapter-context lookup for the chat assistant.

use crate::corpus::chapter_text;
use crate::domain::Corpus;
use crate::utils::truncate_chars;

const KEYWORD_POINTS: u32 = 10;
const TITLE_TOKEN_POINTS: u32 = 5;
const MAX_OCCURRENCE_POINTS: usize = 5;

/// A chapter is only offered as context above this score.
pub const MIN_CHAPTER_SCORE: u32 = 5;

const MIN_TOKEN_CHARS: usize = 3;
const PREFERRED_SENTENCE_CHARS: usize = 50;
const MAX_EXCERPT_CHARS: usize = 200;

/// Lowercased view of a chapter, computed once per corpus.
#[derive(Debug, Clone)]
pub struct ChapterProfile {
    pub index: usize,
    title: String,
    keywords: Vec<String>,
    text: String,
}

pub fn profile_chapters(corpus: &Corpus) -> Vec<ChapterProfile> {
    corpus
        .chapters
        .iter()
        .enumerate()
        .map(|(index, chapter)| ChapterProfile {
            index,
            title: chapter.title.to_lowercase(),
            keywords: chapter.keywords.iter().map(|k| k.to_lowercase()).collect(),
            text: chapter_text(chapter).to_lowercase(),
        })
        .collect()
}

/// Best chapter for a query, with a short lowercased excerpt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterMatch {
    pub index: usize,
    pub score: u32,
    pub excerpt: String,
}

impl ChapterProfile {
    fn score(&self, query: &str, tokens: &[&str]) -> u32 {
        let mut score = 0;
        for keyword in &self.keywords {
            if query.contains(keyword.as_str()) {
                score += KEYWORD_POINTS;
            }
        }
        for token in tokens {
            if self.title.contains(token) {
                score += TITLE_TOKEN_POINTS;
            }
            score += self.text.matches(token).count().min(MAX_OCCURRENCE_POINTS) as u32;
        }
        score
    }

    /// First matching sentence longer than 50 characters, else the last
    /// matching one; at most 200 characters.
    fn excerpt(&self, tokens: &[&str]) -> String {
        let mut excerpt = "";
        for sentence in self.text.split(['.', '!', '?']) {
            if tokens.iter().any(|token| sentence.contains(token)) {
                excerpt = sentence.trim();
                if excerpt.chars().count() > PREFERRED_SENTENCE_CHARS {
                    break;
                }
            }
        }
        truncate_chars(excerpt, MAX_EXCERPT_CHARS)
    }
}

/// Highest scoring chapter for a lowercased query, if it scores above
/// [`MIN_CHAPTER_SCORE`]. Earlier chapters win ties.
pub fn best_chapter(profiles: &[ChapterProfile], query: &str) -> Option<ChapterMatch> {
    let tokens: Vec<&str> =
        query.split_whitespace().filter(|t| t.chars().count() >= MIN_TOKEN_CHARS).collect();

    let mut best: Option<(&ChapterProfile, u32)> = None;
    for profile in profiles {
        let score = profile.score(query, &tokens);
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((profile, score));
        }
    }

    best.filter(|(_, score)| *score > MIN_CHAPTER_SCORE).map(|(profile, score)| ChapterMatch {
        index: profile.index,
        score,
        excerpt: profile.excerpt(&tokens),
    })
}
