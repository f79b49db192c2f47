//! CLI argument merging with config

use crate::domain::Config;
use std::path::PathBuf;

#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub corpus: Option<PathBuf>,
    pub state_file: Option<PathBuf>,
    pub remote_endpoint: Option<String>,
    pub offline: bool,
    pub min_query_chars: Option<usize>,
}

pub fn merge_cli_with_config(mut base_config: Config, cli: CliOverrides) -> Config {
    if let Some(corpus) = cli.corpus {
        base_config.corpus = Some(corpus);
    }
    if let Some(state_file) = cli.state_file {
        base_config.state_file = state_file;
    }

    if let Some(remote_endpoint) = cli.remote_endpoint {
        base_config.remote_endpoint = Some(remote_endpoint);
    }
    // --offline wins over any configured endpoint
    if cli.offline {
        base_config.remote_endpoint = None;
    }

    if let Some(min_query_chars) = cli.min_query_chars {
        base_config.min_query_chars = min_query_chars;
    }

    base_config
}
