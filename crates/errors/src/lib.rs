use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("loading configuration: {0}")]
    Load(String),
    #[error("invalid property {key}: {reason}")]
    InvalidProperty { key: String, reason: String },
    #[error("invalid wavefront uri {uri}: {reason}")]
    InvalidEndpoint { uri: String, reason: String },
}

#[derive(Error, Debug)]
pub enum TokenFileError {
    #[error("reading api token from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("writing api token to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure to negotiate an account with the remote service.
#[derive(Error, Debug)]
pub enum AccountProvisioningError {
    /// The service answered with a non-success status. `body` is the response
    /// text exactly as it was received.
    #[error("account provisioning rejected with status {status}: {body}")]
    Provisioning { status: u16, body: String },
    /// The service could not be reached, or the exchange timed out.
    #[error("transport: {0}")]
    Transport(String),
    #[error("decoding account response: {0}")]
    Decode(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AccountProvisioningError {
    /// Text suitable for the operator report. For rejections this is the
    /// remote body verbatim, and `None` when the service sent no body.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Provisioning { body, .. } => {
                if body.trim().is_empty() {
                    None
                } else {
                    Some(body.clone())
                }
            }
            Self::Transport(message) | Self::Decode(message) => Some(message.clone()),
            Self::Config(err) => Some(err.to_string()),
        }
    }
}
