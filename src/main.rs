//! book-lens: search and chat over interactive e-books
//!
//! Reads a book corpus and offers ranked full-text search, a knowledge-base
//! chat assistant, and simple reading commands from the terminal.

use anyhow::Result;

mod chat;
mod cli;
mod config;
mod corpus;
mod domain;
mod error;
mod index;
mod search;
mod session;
mod utils;

fn main() -> Result<()> {
    cli::run()
}
