use config::{Config, Environment, File};
use dirs::home_dir;
use wavefront_errors::ConfigError;

use crate::{ConfigContext, PropertySource};

pub const DEFAULT_CONFIG_PATH: &str = "~/.wavefront/application.toml";

/// Prefix of environment variables mapped onto properties, e.g.
/// `APP__WAVEFRONT__API_TOKEN` becomes `wavefront.api_token`.
pub const ENV_PREFIX: &str = "APP";

const ENVIRONMENT_SOURCE: &str = "environment";
const FILE_SOURCE: &str = "application_config";

impl ConfigContext {
    /// Loads the prefixed environment followed by the optional TOML file at
    /// `config_path`, so environment variables override the file.
    pub fn load(config_path: &str, env_prefix: &str) -> Result<Self, ConfigError> {
        let environment = Config::builder()
            .add_source(Environment::with_prefix(env_prefix).separator("__"))
            .build()
            .map_err(|e| ConfigError::Load(format!("environment: {}", e)))?;

        let expanded_path = expand_tilde(config_path);
        let file = Config::builder()
            .add_source(File::with_name(&expanded_path).required(false))
            .build()
            .map_err(|e| ConfigError::Load(format!("{}: {}", expanded_path, e)))?;

        Ok(Self::new()
            .with_source(PropertySource::new(ENVIRONMENT_SOURCE, environment))
            .with_source(PropertySource::new(FILE_SOURCE, file)))
    }
}

pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/")
        && let Some(home) = home_dir()
    {
        return path.replacen("~", &home.to_string_lossy(), 1);
    }
    path.to_string()
}
