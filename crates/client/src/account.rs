use mockall::automock;
use wavefront_config::{ApplicationInfo, Endpoint};
use wavefront_errors::AccountProvisioningError;

/// Account handed out by a successful negotiation.
///
/// Both fields mirror what the service sent; a field missing from the
/// response is `None` and is not validated further.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountInfo {
    api_token: Option<String>,
    login_url: Option<String>,
}

impl AccountInfo {
    pub fn new(api_token: Option<String>, login_url: Option<String>) -> Self {
        Self {
            api_token,
            login_url,
        }
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    /// Path of the one-time dashboard login link, relative to the endpoint.
    pub fn login_url(&self) -> Option<&str> {
        self.login_url.as_deref()
    }
}

#[automock]
pub trait AccountProvisioner {
    /// Provisions an account on the Wavefront cluster at `endpoint` for the
    /// given application.
    fn provision_account(
        &self,
        endpoint: &Endpoint,
        application: &ApplicationInfo,
    ) -> Result<AccountInfo, AccountProvisioningError>;
}
