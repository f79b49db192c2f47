//! Configuration loading
//!
//! Layers, lowest priority first: built-in defaults, a config file
//! (`book-lens.toml` in the working directory unless `--config` names one),
//! then `BOOK_LENS_*` environment variables. CLI flags are applied last via
//! [`merge_cli_with_config`].

use crate::domain::Config;
use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use std::path::Path;
use tracing::debug;

mod merge;

pub use merge::{merge_cli_with_config, CliOverrides};

pub const DEFAULT_CONFIG_FILE: &str = "book-lens.toml";
pub const ENV_PREFIX: &str = "BOOK_LENS_";

pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            debug!("loading config from {}", path.display());
            figment = match path.extension().and_then(|e| e.to_str()) {
                Some("yml" | "yaml") => figment.merge(Yaml::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }
        None => figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE)),
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .context("Failed to load configuration")
}

#[cfg(test)]
mod tests {
    use super::load_config;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("book-lens.toml");
        fs::write(
            &path,
            "corpus = \"book.json\"\nmin_query_chars = 3\nremote_endpoint = \"http://localhost:9000/chat\"\n",
        )
        .expect("write config");

        let config = load_config(Some(&path)).expect("load");
        assert_eq!(config.corpus, Some(PathBuf::from("book.json")));
        assert_eq!(config.min_query_chars, 3);
        assert_eq!(config.remote_endpoint.as_deref(), Some("http://localhost:9000/chat"));
        assert_eq!(config.history_limit, 50);
    }

    #[test]
    fn yaml_file_is_supported() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("book-lens.yml");
        fs::write(&path, "history_max_age_hours: 12\nstate_file: /tmp/state.json\n")
            .expect("write config");

        let config = load_config(Some(&path)).expect("load");
        assert_eq!(config.history_max_age_hours, 12);
        assert_eq!(config.state_file, PathBuf::from("/tmp/state.json"));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let err = load_config(Some(&dir.path().join("nope.toml"))).expect_err("missing");
        assert!(err.to_string().contains("Config file not found"));
    }
}
