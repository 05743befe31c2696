use config::Config;
use wavefront_errors::ConfigError;

/// A named layer of configuration properties.
#[derive(Debug, Clone)]
pub struct PropertySource {
    name: String,
    properties: Config,
}

impl PropertySource {
    pub fn new(name: impl Into<String>, properties: Config) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    /// Builds a source holding exactly the given dotted keys.
    pub fn from_pairs<I, K, V>(name: impl Into<String>, pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut builder = Config::builder();
        for (key, value) in pairs {
            let key = key.as_ref();
            builder = builder.set_override(key, value.into()).map_err(|e| {
                ConfigError::InvalidProperty {
                    key: key.to_string(),
                    reason: e.to_string(),
                }
            })?;
        }
        let properties = builder.build().map_err(|e| ConfigError::Load(e.to_string()))?;
        Ok(Self::new(name, properties))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.properties.get_string(key).ok()
    }
}

/// Ordered configuration layers, highest precedence first.
#[derive(Debug, Clone, Default)]
pub struct ConfigContext {
    sources: Vec<PropertySource>,
}

impl ConfigContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: PropertySource) -> Self {
        self.add_last(source);
        self
    }

    /// Appends `source` at the lowest precedence. Existing sources are left
    /// untouched, so any value they hold keeps winning.
    pub fn add_last(&mut self, source: PropertySource) {
        self.sources.push(source);
    }

    /// Value of the first source holding `key`, blank or not.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|source| source.get_string(key))
    }

    /// Value of the first source holding a non-blank `key`. Blank values are
    /// treated as unset so that they cannot mask a lower layer.
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.sources
            .iter()
            .filter_map(|source| source.get_string(key))
            .find(|value| !value.trim().is_empty())
    }

    pub fn has_text(&self, key: &str) -> bool {
        self.get_text(key).is_some()
    }

    pub fn source(&self, name: &str) -> Option<&PropertySource> {
        self.sources.iter().find(|source| source.name() == name)
    }

    pub fn sources(&self) -> &[PropertySource] {
        &self.sources
    }
}
