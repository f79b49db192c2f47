//! Info command implementation

use anyhow::Result;

use super::utils::{load_book, resolve_config};
use super::GlobalArgs;
use crate::config::CliOverrides;
use crate::domain::{KnowledgeCategory, SourceKind};
use crate::index::build_index;

pub fn run(global: &GlobalArgs) -> Result<()> {
    let config = resolve_config(global, CliOverrides::default())?;
    let corpus = load_book(&config)?;
    let index = build_index(&corpus);

    let count = |kind: SourceKind| index.items().iter().filter(|i| i.source_kind == kind).count();

    println!("Book: {}", if corpus.title.is_empty() { "(untitled)" } else { &corpus.title });
    if !corpus.authors.is_empty() {
        println!("Authors: {}", corpus.authors.join(", "));
    }
    println!();
    println!("Statistics:");
    println!("  Chapters: {}", corpus.chapters.len());
    println!(
        "  Videos: {} ({} available)",
        corpus.chapters.iter().map(|c| c.videos.len()).sum::<usize>(),
        corpus.chapters.iter().flat_map(|c| &c.videos).filter(|v| v.is_available()).count()
    );
    println!("  Knowledge entries: {}", corpus.knowledge_base.len());
    for category in KnowledgeCategory::ALL {
        println!(
            "    {}: {}",
            category.section_name(),
            corpus.knowledge_base.entries(category).len()
        );
    }
    println!("  Indexed items: {}", index.len());
    println!("    paragraphs: {}", count(SourceKind::ChapterParagraph));
    println!("    titles: {}", count(SourceKind::ChapterTitle));
    println!("    knowledge: {}", count(SourceKind::KnowledgeEntry));

    Ok(())
}
