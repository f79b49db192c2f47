//! Command-line interface for book-lens
//!
//! Provides `search`, `ask`, `toc`, `read`, `settings`, and `info` subcommands.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod ask;
mod info;
mod read;
mod search;
mod settings;
mod toc;
mod utils;

/// Search and chat over interactive e-books
#[derive(Parser)]
#[command(name = "book-lens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    global: GlobalArgs,
}

/// Options shared by every subcommand
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to config file (book-lens.toml or .yml)
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Corpus JSON file
    #[arg(long, value_name = "FILE", global = true, env = "BOOK_LENS_CORPUS")]
    pub corpus: Option<PathBuf>,

    /// Where reader state and chat history are kept
    #[arg(long, value_name = "FILE", global = true)]
    pub state_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Full-text search over chapters and the knowledge base
    Search(search::SearchArgs),

    /// Ask the chat assistant a question
    Ask(ask::AskArgs),

    /// Show the table of contents
    Toc,

    /// Print a chapter as plain text
    Read(read::ReadArgs),

    /// Show or change reader preferences
    Settings(settings::SettingsArgs),

    /// Display corpus statistics
    Info,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Search(args) => search::run(&cli.global, args),
        Commands::Ask(args) => ask::run(&cli.global, args),
        Commands::Toc => toc::run(&cli.global),
        Commands::Read(args) => read::run(&cli.global, args),
        Commands::Settings(args) => settings::run(&cli.global, args),
        Commands::Info => info::run(&cli.global),
    }
}
