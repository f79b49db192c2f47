//! Core domain types and models
//!
//! Defines the book corpus (chapters, knowledge base), the searchable
//! `IndexedItem`, and the runtime `Config`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Label shown as the "chapter" of knowledge-base search results.
pub const KNOWLEDGE_BASE_TITLE: &str = "Knowledge Base";

/// Video id used by the content authors for videos that are not yet published.
pub const PLACEHOLDER_VIDEO_ID: &str = "PLACEHOLDER";

/// A full book: metadata, ordered chapters and the chat knowledge base.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corpus {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub subtitle: String,

    #[serde(default)]
    pub authors: Vec<String>,

    #[serde(default)]
    pub publisher: String,

    /// Chapters in reading order. The position is the chapter index.
    #[serde(default)]
    pub chapters: Vec<Chapter>,

    #[serde(default)]
    pub knowledge_base: KnowledgeBase,
}

/// One chapter of the book
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(default)]
    pub id: String,

    /// Ordinal label ("1", "IV"); the prelude and appendices have none
    #[serde(default, deserialize_with = "deserialize_label")]
    pub number: Option<String>,

    pub title: String,

    #[serde(default)]
    pub subtitle: String,

    /// Raw HTML body
    #[serde(default, rename = "content", alias = "htmlContent")]
    pub html_content: String,

    #[serde(default, deserialize_with = "deserialize_keywords")]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub videos: Vec<VideoRef>,
}

impl Chapter {
    /// "Chapter 3: Title", or just the title when the chapter is unnumbered.
    pub fn display_title(&self) -> String {
        match &self.number {
            Some(number) => format!("Chapter {}: {}", number, self.title),
            None => self.title.clone(),
        }
    }
}

/// Video attached to a chapter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRef {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub thumbnail: Option<String>,

    #[serde(default)]
    pub video_id: String,
}

impl VideoRef {
    pub fn is_available(&self) -> bool {
        let id = self.video_id.trim();
        !id.is_empty() && id != PLACEHOLDER_VIDEO_ID
    }

    pub fn embed_url(&self) -> Option<String> {
        self.is_available()
            .then(|| format!("https://www.youtube.com/embed/{}", self.video_id.trim()))
    }
}

/// The three knowledge categories, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeCategory {
    Concept,
    Treatment,
    Lifestyle,
}

impl KnowledgeCategory {
    pub const ALL: [KnowledgeCategory; 3] =
        [KnowledgeCategory::Concept, KnowledgeCategory::Treatment, KnowledgeCategory::Lifestyle];

    /// Name of the category map in the corpus file.
    pub fn section_name(self) -> &'static str {
        match self {
            KnowledgeCategory::Concept => "concepts",
            KnowledgeCategory::Treatment => "treatments",
            KnowledgeCategory::Lifestyle => "lifestyle",
        }
    }
}

impl fmt::Display for KnowledgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KnowledgeCategory::Concept => "concept",
            KnowledgeCategory::Treatment => "treatment",
            KnowledgeCategory::Lifestyle => "lifestyle",
        };
        f.write_str(name)
    }
}

/// A `term -> definition` pair from the knowledge base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub term: String,
    pub definition: String,
}

impl KnowledgeEntry {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self { term: term.into(), definition: definition.into() }
    }
}

/// Structured Q&A used by the chat assistant (and indexed for search).
///
/// Each category keeps the order of the source file; that order decides
/// ties in the knowledge responder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default, deserialize_with = "deserialize_entries")]
    pub concepts: Vec<KnowledgeEntry>,

    #[serde(default, deserialize_with = "deserialize_entries")]
    pub treatments: Vec<KnowledgeEntry>,

    #[serde(default, deserialize_with = "deserialize_entries")]
    pub lifestyle: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn entries(&self, category: KnowledgeCategory) -> &[KnowledgeEntry] {
        match category {
            KnowledgeCategory::Concept => &self.concepts,
            KnowledgeCategory::Treatment => &self.treatments,
            KnowledgeCategory::Lifestyle => &self.lifestyle,
        }
    }

    /// All entries tagged with their category, concepts first.
    pub fn iter(&self) -> impl Iterator<Item = (KnowledgeCategory, &KnowledgeEntry)> {
        KnowledgeCategory::ALL
            .into_iter()
            .flat_map(move |category| self.entries(category).iter().map(move |e| (category, e)))
    }

    pub fn len(&self) -> usize {
        self.concepts.len() + self.treatments.len() + self.lifestyle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where an indexed item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    ChapterParagraph,
    ChapterTitle,
    KnowledgeEntry,
}

/// One atomic unit of searchable text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedItem {
    pub source_kind: SourceKind,

    /// Position of the source chapter, or -1 for knowledge entries
    pub chapter_index: i64,

    pub chapter_title: String,

    #[serde(default)]
    pub chapter_number: Option<String>,

    /// Plain text, markup already stripped
    pub text: String,

    #[serde(default)]
    pub keywords: BTreeSet<String>,

    /// Knowledge-base term (knowledge entries only)
    #[serde(default)]
    pub term: Option<String>,
}

impl IndexedItem {
    pub fn is_title(&self) -> bool {
        self.source_kind == SourceKind::ChapterTitle
    }

    pub fn is_knowledge(&self) -> bool {
        self.source_kind == SourceKind::KnowledgeEntry
    }

    /// Heading shown above a search result
    pub fn heading(&self) -> String {
        match &self.chapter_number {
            Some(number) => format!("Chapter {}: {}", number, self.chapter_title),
            None => self.chapter_title.clone(),
        }
    }
}

/// An indexed item with its relevance for one query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredResult<'a> {
    pub item: &'a IndexedItem,
    pub score: u32,
}

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message of the chat transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,

    /// Milliseconds since the Unix epoch on the wire
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Main configuration for book-lens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Corpus JSON file
    #[serde(default)]
    pub corpus: Option<PathBuf>,

    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Shortest query the CLI will hand to the scorer
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Optional chat backend that replaces the local knowledge responder
    #[serde(default, alias = "endpoint")]
    pub remote_endpoint: Option<String>,

    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default = "default_history_max_age_hours")]
    pub history_max_age_hours: i64,

    /// Messages of chat history forwarded to the remote backend
    #[serde(default = "default_recent_context_messages")]
    pub recent_context_messages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus: None,
            state_file: default_state_file(),
            min_query_chars: default_min_query_chars(),
            remote_endpoint: None,
            history_limit: default_history_limit(),
            history_max_age_hours: default_history_max_age_hours(),
            recent_context_messages: default_recent_context_messages(),
        }
    }
}

// Default value functions for serde
fn default_state_file() -> PathBuf {
    PathBuf::from(".book-lens/state.json")
}

fn default_min_query_chars() -> usize {
    2
}

fn default_history_limit() -> usize {
    50
}

fn default_history_max_age_hours() -> i64 {
    24
}

fn default_recent_context_messages() -> usize {
    5
}

/// Chapter numbers come in as strings or integers; "" means unnumbered.
fn deserialize_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct LabelVisitor;

    impl<'de> Visitor<'de> for LabelVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a chapter number as string or integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let trimmed = value.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(LabelVisitor)
}

/// Keywords: accepts an array or a comma-separated string, drops blanks.
fn deserialize_keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeywordsVisitor;

    impl<'de> Visitor<'de> for KeywordsVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or array of keywords")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut result = Vec::new();
            while let Some(keyword) = seq.next_element::<String>()? {
                let trimmed = keyword.trim();
                if !trimmed.is_empty() {
                    result.push(trimmed.to_string());
                }
            }
            Ok(result)
        }
    }

    deserializer.deserialize_any(KeywordsVisitor)
}

/// Knowledge categories are JSON objects; keep their entries in file order.
fn deserialize_entries<'de, D>(deserializer: D) -> Result<Vec<KnowledgeEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<KnowledgeEntry>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of term to definition")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: de::MapAccess<'de>,
        {
            let mut result = Vec::new();
            while let Some((term, definition)) = map.next_entry::<String, String>()? {
                result.push(KnowledgeEntry { term, definition });
            }
            Ok(result)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut result = Vec::new();
            while let Some(entry) = seq.next_element::<KnowledgeEntry>()? {
                result.push(entry);
            }
            Ok(result)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(EntriesVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knowledge_base_keeps_file_order() {
        let raw = r#"{
            "concepts": {"zeta": "last letter", "alpha": "first letter"},
            "lifestyle": {"sleep": "rest"}
        }"#;
        let kb: KnowledgeBase = serde_json::from_str(raw).expect("parse kb");
        let terms: Vec<&str> = kb.concepts.iter().map(|e| e.term.as_str()).collect();
        assert_eq!(terms, vec!["zeta", "alpha"]);
        assert!(kb.treatments.is_empty());
        assert_eq!(kb.len(), 3);

        let categories: Vec<KnowledgeCategory> = kb.iter().map(|(c, _)| c).collect();
        assert_eq!(
            categories,
            vec![
                KnowledgeCategory::Concept,
                KnowledgeCategory::Concept,
                KnowledgeCategory::Lifestyle
            ]
        );
    }

    #[test]
    fn chapter_accepts_original_content_shape() {
        let raw = r#"{
            "id": "prelude",
            "number": "",
            "title": "Prelude",
            "content": "<p>Hello</p>",
            "keywords": "conclusion, next steps",
            "videos": [{"id": "v", "title": "Intro", "videoId": "PLACEHOLDER"}]
        }"#;
        let chapter: Chapter = serde_json::from_str(raw).expect("parse chapter");
        assert!(chapter.number.is_none());
        assert_eq!(chapter.html_content, "<p>Hello</p>");
        assert_eq!(chapter.keywords, vec!["conclusion", "next steps"]);
        assert_eq!(chapter.display_title(), "Prelude");
        assert!(chapter.videos[0].embed_url().is_none());
    }

    #[test]
    fn numeric_chapter_labels_are_accepted() {
        let chapter: Chapter =
            serde_json::from_str(r#"{"title": "Blue Zones", "number": 4}"#).expect("parse");
        assert_eq!(chapter.display_title(), "Chapter 4: Blue Zones");
    }

    #[test]
    fn video_embed_url_uses_video_id() {
        let video = VideoRef { video_id: "abc123".to_string(), ..VideoRef::default() };
        assert_eq!(video.embed_url().as_deref(), Some("https://www.youtube.com/embed/abc123"));
    }
}
