use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use wavefront_autoconfigure::ApiTokenFile;
use wavefront_config::{DEFAULT_CONFIG_PATH, PropertySource, expand_tilde, properties};

pub const COMMAND_LINE_SOURCE: &str = "command_line";

#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
/// Resolves the Wavefront api token of an application, provisioning a new
/// account when none is configured.
pub struct Cli {
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_PATH)]
    /// Path to the application configuration file
    pub config_path: String,

    #[arg(long, default_value = "info")]
    /// Log filter, in `RUST_LOG` syntax
    pub log_level: String,

    #[arg(long, conflicts_with = "no_token_file")]
    /// Location of the local api token copy
    /// Default: ~/.wavefront_token
    pub token_file: Option<String>,

    #[arg(long)]
    /// Neither read nor write a local api token copy
    pub no_token_file: bool,

    #[arg(long)]
    /// Wavefront api token, skips auto-negotiation when set
    pub api_token: Option<String>,

    #[arg(long)]
    /// Base uri of the Wavefront cluster
    pub uri: Option<String>,

    #[arg(long)]
    /// Application name reported when provisioning an account
    pub application: Option<String>,

    #[arg(long)]
    /// Service name reported when provisioning an account
    pub service: Option<String>,
}

impl Cli {
    /// Properties given on the command line, to be layered above every other
    /// source.
    pub fn command_line_source(&self) -> Result<PropertySource> {
        let pairs = [
            (properties::API_TOKEN, &self.api_token),
            (properties::URI, &self.uri),
            (properties::APPLICATION_NAME, &self.application),
            (properties::APPLICATION_SERVICE, &self.service),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|value| (key, value)));

        Ok(PropertySource::from_pairs(COMMAND_LINE_SOURCE, pairs)?)
    }

    pub fn token_file_path(&self) -> Option<PathBuf> {
        if self.no_token_file {
            return None;
        }
        match &self.token_file {
            Some(path) => Some(PathBuf::from(expand_tilde(path))),
            None => ApiTokenFile::default_path(),
        }
    }
}
