//! Chat assistant: answers questions from the knowledge base and chapters.
//!
//! The knowledge responder looks for a single best answer. It scores
//! knowledge entries and chapters with its own weights (see [`knowledge`]
//! and [`chapters`]) and is independent of the ranked search in
//! [`crate::search`].

use crate::domain::{Corpus, KnowledgeCategory};
use crate::utils::{capitalize, escape_html};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

pub mod chapters;
pub mod fallback;
pub mod knowledge;
pub mod remote;

pub use chapters::{best_chapter, ChapterMatch, ChapterProfile};
pub use fallback::{pick_fallback, Fallback};
pub use knowledge::{best_match, KnowledgeMatch};
pub use remote::{ChatContext, RemoteBackend};

/// A knowledge entry must score above this to be used as the answer.
pub const MIN_KNOWLEDGE_SCORE: u32 = 5;

/// Shown when the remote backend fails; the cause is only logged.
pub const REMOTE_FAILURE_MESSAGE: &str =
    "I apologize, but I encountered an error. Please try asking your question differently.";

/// Link from an answer to a chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLink {
    pub chapter_index: usize,
    pub label: String,
}

/// What the assistant says back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResponsePayload {
    #[serde(rename_all = "camelCase")]
    Knowledge {
        category: KnowledgeCategory,
        term: String,
        definition: String,
        learn_more: Option<SourceLink>,
    },
    ChapterExcerpt {
        query: String,
        excerpt: String,
        source: SourceLink,
    },
    Fallback {
        paragraphs: Vec<String>,
        topics: Vec<String>,
    },
    Remote {
        message: String,
    },
    Failure {
        message: String,
    },
}

impl ResponsePayload {
    /// Plain text for terminals
    pub fn to_plain_text(&self) -> String {
        match self {
            ResponsePayload::Knowledge { term, definition, learn_more, .. } => {
                let mut out = format!("{}\n\n{}", capitalize(term), definition);
                if let Some(link) = learn_more {
                    out.push_str(&format!("\n\nLearn more: {}", link.label));
                }
                out
            }
            ResponsePayload::ChapterExcerpt { query, excerpt, source } => format!(
                "Based on the book content, here's what I found about \"{query}\":\n\n{excerpt}\n\nSource: {}",
                source.label
            ),
            ResponsePayload::Fallback { paragraphs, topics } => {
                let mut out = paragraphs.join("\n\n");
                for topic in topics {
                    out.push_str(&format!("\n  - {topic}"));
                }
                out
            }
            ResponsePayload::Remote { message } | ResponsePayload::Failure { message } => {
                message.clone()
            }
        }
    }

    /// Markup for the chat widget
    pub fn to_html(&self) -> String {
        match self {
            ResponsePayload::Knowledge { term, definition, learn_more, .. } => {
                let mut out = format!(
                    "<p><strong>{}</strong></p><p>{}</p>",
                    escape_html(&capitalize(term)),
                    escape_html(definition)
                );
                if let Some(link) = learn_more {
                    out.push_str(&sources_html("Learn more:", link));
                }
                out
            }
            ResponsePayload::ChapterExcerpt { query, excerpt, source } => format!(
                "<p>Based on the book content, here's what I found about \"{}\":</p><p>{}</p>{}",
                escape_html(query),
                escape_html(excerpt),
                sources_html("Source:", source)
            ),
            ResponsePayload::Fallback { paragraphs, topics } => {
                let mut out: String =
                    paragraphs.iter().map(|p| format!("<p>{}</p>", escape_html(p))).collect();
                if !topics.is_empty() {
                    out.push_str("<ul>");
                    for topic in topics {
                        out.push_str(&format!("<li>{}</li>", escape_html(topic)));
                    }
                    out.push_str("</ul>");
                }
                out
            }
            ResponsePayload::Remote { message } | ResponsePayload::Failure { message } => {
                format!("<p>{}</p>", escape_html(message))
            }
        }
    }
}

fn sources_html(title: &str, link: &SourceLink) -> String {
    format!(
        "<div class=\"chat-sources\"><div class=\"chat-sources-title\">{}</div><a class=\"chat-source-link\" href=\"#\" data-chapter=\"{}\">{}</a></div>",
        title,
        link.chapter_index,
        escape_html(&link.label)
    )
}

/// Knowledge responder over one corpus
pub struct Responder<'a> {
    corpus: &'a Corpus,
    chapters: Vec<ChapterProfile>,
    topics: Vec<String>,
}

impl<'a> Responder<'a> {
    pub fn new(corpus: &'a Corpus) -> Self {
        Self {
            corpus,
            chapters: chapters::profile_chapters(corpus),
            topics: fallback::suggested_topics(corpus),
        }
    }

    /// Answer from the remote backend when one is given, otherwise locally.
    ///
    /// Remote failures never propagate: they become
    /// [`ResponsePayload::Failure`] with [`REMOTE_FAILURE_MESSAGE`].
    pub async fn respond<R: Rng + ?Sized>(
        &self,
        query: &str,
        remote: Option<&RemoteBackend>,
        context: &ChatContext,
        rng: &mut R,
    ) -> ResponsePayload {
        let Some(backend) = remote else {
            return self.respond_locally(query, rng);
        };

        match backend.ask(query, context).await {
            Ok(message) => ResponsePayload::Remote { message },
            Err(err) => {
                warn!(endpoint = %backend.endpoint(), "{err}");
                ResponsePayload::Failure { message: REMOTE_FAILURE_MESSAGE.to_string() }
            }
        }
    }

    /// Answer from the built-in knowledge base and chapter text.
    pub fn respond_locally<R: Rng + ?Sized>(&self, query: &str, rng: &mut R) -> ResponsePayload {
        let query = query.trim();
        if query.is_empty() {
            return self.fallback(query, rng);
        }

        let lowered = query.to_lowercase();
        let knowledge = best_match(&self.corpus.knowledge_base, &lowered);
        let chapter = best_chapter(&self.chapters, &lowered);
        debug!(
            query = %lowered,
            knowledge_score = knowledge.map_or(0, |k| k.score),
            chapter_score = chapter.as_ref().map_or(0, |c| c.score),
            "scored chat question"
        );

        if let Some(found) = knowledge.filter(|k| k.score > MIN_KNOWLEDGE_SCORE) {
            return ResponsePayload::Knowledge {
                category: found.category,
                term: found.entry.term.clone(),
                definition: found.entry.definition.clone(),
                learn_more: chapter.map(|c| self.source_link(c.index)),
            };
        }

        if let Some(found) = chapter {
            return ResponsePayload::ChapterExcerpt {
                query: query.to_string(),
                source: self.source_link(found.index),
                excerpt: found.excerpt,
            };
        }

        self.fallback(query, rng)
    }

    fn fallback<R: Rng + ?Sized>(&self, query: &str, rng: &mut R) -> ResponsePayload {
        let Fallback { paragraphs, topics } = pick_fallback(query, &self.topics, rng);
        ResponsePayload::Fallback { paragraphs, topics }
    }

    fn source_link(&self, chapter_index: usize) -> SourceLink {
        let label = self
            .corpus
            .chapters
            .get(chapter_index)
            .map(|chapter| chapter.display_title())
            .unwrap_or_default();
        SourceLink { chapter_index, label }
    }
}
