use std::{
    fmt::{Display, Formatter},
    path::PathBuf,
};

use wavefront_config::{Endpoint, properties};

/// Operator-facing summary of an auto-negotiation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningReport {
    Provisioned {
        endpoint: Endpoint,
        api_token: String,
        login_url: Option<String>,
        saved_to: Option<PathBuf>,
    },
    Failed {
        uri: String,
        detail: Option<String>,
    },
}

impl Display for ProvisioningReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provisioned {
                endpoint,
                api_token,
                login_url,
                saved_to,
            } => {
                write!(f, "A Wavefront account has been provisioned successfully")?;
                match saved_to {
                    Some(path) => {
                        writeln!(f, " and the API token has been saved to {}.", path.display())?
                    }
                    None => writeln!(f, ".")?,
                }
                writeln!(f)?;
                writeln!(
                    f,
                    "To share this account, make sure the following is added to your configuration:"
                )?;
                writeln!(f)?;
                writeln!(f, "\t{}={}", properties::API_TOKEN, api_token)?;
                writeln!(f, "\t{}={}", properties::URI, endpoint)?;
                if let Some(login_url) = login_url {
                    writeln!(f)?;
                    writeln!(
                        f,
                        "Connect to your Wavefront dashboard using this one-time use link:"
                    )?;
                    writeln!(f, "{}", endpoint.join(login_url))?;
                }
                Ok(())
            }
            Self::Failed { uri, detail } => {
                write!(f, "Failed to auto-negotiate a Wavefront api token from {}.", uri)?;
                if let Some(detail) = detail {
                    writeln!(f, " The error was:")?;
                    writeln!(f)?;
                    writeln!(f, "{}", detail)?;
                } else {
                    writeln!(f)?;
                }
                writeln!(f)?;
                write!(
                    f,
                    "Set {} to use an existing account; metrics will not be exported until then.",
                    properties::API_TOKEN
                )
            }
        }
    }
}
