//! Canned replies for questions nothing in the book answers.

use crate::domain::Corpus;
use crate::utils::capitalize;
use rand::Rng;

/// How many example topics a fallback reply suggests
pub const SUGGESTED_TOPICS: usize = 5;

struct FallbackTemplate {
    paragraphs: &'static [&'static str],
    /// Lead-in for the topic list; the template lists no topics without one.
    topics_intro: Option<&'static str>,
}

const TEMPLATES: &[FallbackTemplate] = &[
    FallbackTemplate {
        paragraphs: &[
            "I don't have specific information about \"{query}\" in my knowledge base, but I can help you explore the book content.",
        ],
        topics_intro: Some("Try asking about:"),
    },
    FallbackTemplate {
        paragraphs: &[
            "I couldn't find a direct answer to your question. The book covers many aspects of its subject.",
            "You can use the search feature to find specific topics, or browse the table of contents to explore different chapters.",
        ],
        topics_intro: None,
    },
    FallbackTemplate {
        paragraphs: &[
            "That's an interesting question! While I don't have that specific information readily available, the book discusses it from several angles.",
            "Would you like me to help you find information about a specific topic from the book?",
        ],
        topics_intro: None,
    },
];

/// A fallback reply: paragraphs followed by optional example topics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub paragraphs: Vec<String>,
    pub topics: Vec<String>,
}

/// Example topics: concept terms first, then chapter titles.
pub fn suggested_topics(corpus: &Corpus) -> Vec<String> {
    corpus
        .knowledge_base
        .concepts
        .iter()
        .map(|entry| capitalize(&entry.term))
        .chain(corpus.chapters.iter().map(|chapter| chapter.title.clone()))
        .take(SUGGESTED_TOPICS)
        .collect()
}

/// Pick one of the canned replies using `rng`.
///
/// The topic lead-in is left out when there are no topics to list.
pub fn pick_fallback<R: Rng + ?Sized>(query: &str, topics: &[String], rng: &mut R) -> Fallback {
    let template = &TEMPLATES[rng.gen_range(0..TEMPLATES.len())];
    let mut paragraphs: Vec<String> =
        template.paragraphs.iter().map(|p| p.replace("{query}", query)).collect();

    match template.topics_intro {
        Some(intro) if !topics.is_empty() => {
            paragraphs.push(intro.to_string());
            Fallback { paragraphs, topics: topics.to_vec() }
        }
        _ => Fallback { paragraphs, topics: Vec::new() },
    }
}
