//! Corpus loading and chapter text extraction

use crate::domain::{Chapter, Corpus};
use crate::error::{BookError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub mod markup;

pub use markup::strip_markup;

/// Load a corpus from a JSON file.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let raw = fs::read_to_string(path)
        .map_err(|source| BookError::CorpusLoad { path: path.to_path_buf(), source })?;
    let corpus: Corpus = serde_json::from_str(&raw)
        .map_err(|source| BookError::CorpusParse { path: path.to_path_buf(), source })?;

    debug!(
        chapters = corpus.chapters.len(),
        knowledge_entries = corpus.knowledge_base.len(),
        "loaded corpus from {}",
        path.display()
    );
    Ok(corpus)
}

/// Plain text of a chapter body; malformed markup yields an empty string.
pub fn chapter_text(chapter: &Chapter) -> String {
    match strip_markup(&chapter.html_content) {
        Ok(text) => text,
        Err(err) => {
            warn!(chapter = %chapter.id, "{err}; treating chapter body as empty");
            String::new()
        }
    }
}
