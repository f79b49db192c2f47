//! Read command implementation

use anyhow::Result;
use clap::Args;
use console::style;

use super::utils::{load_book, resolve_config};
use super::GlobalArgs;
use crate::config::CliOverrides;
use crate::corpus::chapter_text;
use crate::session::ReaderState;

#[derive(Args)]
pub struct ReadArgs {
    /// Chapter index, `next`, or `prev` (defaults to the current chapter)
    #[arg(value_name = "CHAPTER")]
    pub target: Option<String>,
}

pub fn run(global: &GlobalArgs, args: ReadArgs) -> Result<()> {
    let config = resolve_config(global, CliOverrides::default())?;
    let corpus = load_book(&config)?;
    let mut state = ReaderState::load(&config.state_file)?;
    let total = corpus.chapters.len();

    if total == 0 {
        anyhow::bail!("The corpus has no chapters");
    }

    let moved = match args.target.as_deref() {
        None => true,
        Some("next") => state.next_chapter(total),
        Some("prev") => state.prev_chapter(total),
        Some(raw) => {
            let index: usize = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid chapter '{raw}': expected an index, `next`, or `prev`"))?;
            if !state.go_to(index, total) {
                anyhow::bail!("Chapter {index} does not exist (the book has {total} chapters)");
            }
            true
        }
    };
    if !moved {
        eprintln!("Already at the {} chapter", if args.target.as_deref() == Some("next") { "last" } else { "first" });
    }

    // A saved index can outlive a shorter corpus.
    if state.current_chapter >= total {
        state.current_chapter = 0;
    }
    let chapter = &corpus.chapters[state.current_chapter];

    println!("{}", style(chapter.display_title()).bold());
    if !chapter.subtitle.is_empty() {
        println!("{}", style(&chapter.subtitle).italic());
    }
    println!();

    let mut blank = true;
    for line in chapter_text(chapter).lines().map(str::trim) {
        if line.is_empty() {
            if !blank {
                println!();
            }
            blank = true;
        } else {
            println!("{line}");
            blank = false;
        }
    }

    for video in &chapter.videos {
        match video.embed_url() {
            Some(url) => println!("Video: {} ({url})", video.title),
            None => println!("Video: {} (coming soon)", video.title),
        }
    }

    println!();
    println!("[{}/{}]", state.current_chapter + 1, total);
    state.save(&config.state_file)?;
    Ok(())
}
