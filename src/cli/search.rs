//! Search command implementation

use anyhow::Result;
use clap::Args;
use console::style;
use serde_json::json;

use super::utils::{load_book, resolve_config};
use super::GlobalArgs;
use crate::config::CliOverrides;
use crate::index::build_index;
use crate::search::{extract_excerpt_with, search, ExcerptMarkers};
use crate::utils::squash_whitespace;

#[derive(Args)]
pub struct SearchArgs {
    /// Search terms
    #[arg(required = true, num_args = 1.., value_name = "QUERY")]
    pub query: Vec<String>,

    /// Emit results as JSON
    #[arg(long, conflicts_with = "html")]
    pub json: bool,

    /// Highlight matches with <mark> tags instead of terminal styling
    #[arg(long)]
    pub html: bool,

    /// Shortest query accepted
    #[arg(long, value_name = "CHARS")]
    pub min_chars: Option<usize>,
}

pub fn run(global: &GlobalArgs, args: SearchArgs) -> Result<()> {
    let config = resolve_config(
        global,
        CliOverrides { min_query_chars: args.min_chars, ..CliOverrides::default() },
    )?;

    let query = args.query.join(" ");
    let query = query.trim();
    if query.chars().count() < config.min_query_chars {
        anyhow::bail!("Query must be at least {} characters long", config.min_query_chars);
    }

    let corpus = load_book(&config)?;
    let index = build_index(&corpus);
    let results = search(&index, query);

    let markers = if args.html || args.json {
        ExcerptMarkers::default()
    } else if console::colors_enabled() {
        let open = style("\u{0}").yellow().bold().to_string();
        let (open, close) = open.split_once('\u{0}').unwrap_or(("", ""));
        ExcerptMarkers::new(open, close, "...")
    } else {
        ExcerptMarkers::new("**", "**", "...")
    };

    if args.json {
        let rows: Vec<_> = results
            .iter()
            .map(|r| {
                json!({
                    "score": r.score,
                    "sourceKind": r.item.source_kind,
                    "chapterIndex": r.item.chapter_index,
                    "heading": r.item.heading(),
                    "term": r.item.term,
                    "excerpt": extract_excerpt_with(&r.item.text, query, &markers),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results found");
        println!("Try different keywords or browse the table of contents.");
        return Ok(());
    }

    for result in &results {
        let icon = if result.item.is_knowledge() { "📚 " } else { "" };
        println!(
            "{}{} {}",
            icon,
            style(result.item.heading()).bold(),
            style(format!("({})", result.score)).dim()
        );
        let excerpt = extract_excerpt_with(&result.item.text, query, &markers);
        println!("  {}", squash_whitespace(&excerpt));
        println!();
    }

    Ok(())
}
