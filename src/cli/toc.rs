//! Table of contents command

use anyhow::Result;
use console::style;

use super::utils::{load_book, resolve_config};
use super::GlobalArgs;
use crate::config::CliOverrides;
use crate::session::ReaderState;

pub fn run(global: &GlobalArgs) -> Result<()> {
    let config = resolve_config(global, CliOverrides::default())?;
    let corpus = load_book(&config)?;
    let state = ReaderState::load(&config.state_file)?;

    if !corpus.title.is_empty() {
        println!("{}", style(&corpus.title).bold());
        println!();
    }

    for (index, chapter) in corpus.chapters.iter().enumerate() {
        let marker = if index == state.current_chapter { ">" } else { " " };
        let number = chapter.number.as_deref().unwrap_or("");
        println!("{marker} {index:>3}  {number:<4} {}", chapter.title);
    }

    println!();
    println!("{} chapters", corpus.chapters.len());
    Ok(())
}
