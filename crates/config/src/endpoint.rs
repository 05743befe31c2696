use std::fmt::{Display, Formatter};

use url::Url;
use wavefront_errors::ConfigError;

use crate::{ConfigContext, properties};

pub const DEFAULT_URI: &str = "https://wavefront.surf";

/// Base URI of the Wavefront cluster to provision accounts against.
///
/// Always an absolute URI with a host, stored without a trailing `/` so that
/// paths returned by the service can be appended verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn parse(uri: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidEndpoint {
            uri: uri.to_string(),
            reason,
        };

        let url = Url::parse(uri.trim()).map_err(|e| invalid(e.to_string()))?;
        if url.cannot_be_a_base() || url.host().is_none() {
            return Err(invalid("expected an absolute uri with a host".to_string()));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("query and fragment are not supported".to_string()));
        }

        Ok(Self(uri.trim().trim_end_matches('/').to_string()))
    }

    /// The configured uri, or [`DEFAULT_URI`] when none is set. Returned
    /// unvalidated so that failures can still name what the operator
    /// configured.
    pub fn configured_uri(context: &ConfigContext) -> String {
        context.get_text(properties::URI).unwrap_or_else(|| DEFAULT_URI.to_string())
    }

    pub fn resolve(context: &ConfigContext) -> Result<Self, ConfigError> {
        Self::parse(&Self::configured_uri(context))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Concatenates `path` to the endpoint, inserting a `/` only when `path`
    /// lacks one.
    pub fn join(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.0, path)
        } else {
            format!("{}/{}", self.0, path)
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self(DEFAULT_URI.to_string())
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
