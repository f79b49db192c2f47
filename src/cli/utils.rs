//! Shared CLI helpers

use anyhow::{Context, Result};

use super::GlobalArgs;
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::corpus::load_corpus;
use crate::domain::{Config, Corpus};

/// Config from file/env with the global flags and `extra` applied on top.
pub fn resolve_config(global: &GlobalArgs, extra: CliOverrides) -> Result<Config> {
    let base = load_config(global.config.as_deref())?;
    let overrides = CliOverrides {
        corpus: global.corpus.clone().or(extra.corpus),
        state_file: global.state_file.clone().or(extra.state_file),
        ..extra
    };
    Ok(merge_cli_with_config(base, overrides))
}

pub fn load_book(config: &Config) -> Result<Corpus> {
    let Some(path) = config.corpus.as_deref() else {
        anyhow::bail!("No corpus configured. Pass --corpus <FILE> or set `corpus` in book-lens.toml");
    };
    load_corpus(path).with_context(|| format!("Failed to load corpus from {}", path.display()))
}
