//! Book-Lens: full-text search and knowledge-base chat for interactive e-books
//!
//! This library loads a book corpus (HTML chapters plus a knowledge base),
//! builds a flat search index, ranks results for free-text queries, and
//! answers chat questions from the same content.

pub mod chat;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod domain;
pub mod error;
pub mod index;
pub mod search;
pub mod session;
pub mod utils;
