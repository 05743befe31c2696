use std::path::PathBuf;

use wavefront_client::{AccountInfo, AccountProvisioner, HttpAccountProvisioner};
use wavefront_config::{ApplicationInfo, ConfigContext, Endpoint, PropertySource, properties};
use wavefront_errors::AccountProvisioningError;

use crate::{
    deferred_log::DeferredLog,
    report::ProvisioningReport,
    token_file::{ApiTokenFile, TokenFileWrite},
};

/// Name of the configuration layer holding an auto-provisioned token.
pub const PROPERTY_SOURCE_NAME: &str = "wavefront";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningOutcome {
    /// The operator configured a token; nothing was touched.
    TokenAlreadyConfigured,
    /// A token from a previous negotiation was found on disk.
    RestoredFromCache,
    /// A new account was negotiated and its token registered.
    Provisioned,
    /// No token could be obtained. Startup continues without one.
    Failed,
}

impl ProvisioningOutcome {
    pub const fn has_token(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

type TokenFileLocator = Box<dyn Fn() -> Option<PathBuf>>;

/// Makes sure a Wavefront api token is available before metrics export
/// starts.
///
/// Must run once, before anything reads [`properties::API_TOKEN`]. Messages
/// are buffered in a [`DeferredLog`] since the host's logging is usually not
/// set up yet at that point.
pub struct AccountProvisioning<P = HttpAccountProvisioner> {
    provisioner: P,
    locate_token_file: TokenFileLocator,
    log: DeferredLog,
}

impl AccountProvisioning<HttpAccountProvisioner> {
    pub fn new() -> Self {
        Self::with_provisioner(HttpAccountProvisioner::new())
    }
}

impl Default for AccountProvisioning<HttpAccountProvisioner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: AccountProvisioner> AccountProvisioning<P> {
    pub fn with_provisioner(provisioner: P) -> Self {
        Self {
            provisioner,
            locate_token_file: Box::new(ApiTokenFile::default_path),
            log: DeferredLog::new(),
        }
    }

    /// Replaces the lookup of the local token file. Returning `None` disables
    /// the local copy entirely.
    pub fn with_token_file_locator(
        mut self,
        locate: impl Fn() -> Option<PathBuf> + 'static,
    ) -> Self {
        self.locate_token_file = Box::new(locate);
        self
    }

    pub fn log(&self) -> &DeferredLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut DeferredLog {
        &mut self.log
    }

    /// Registers an api token in `context` unless one is already configured.
    ///
    /// The token comes from the local token file if present, and is
    /// negotiated with the Wavefront cluster otherwise. Failures are reported
    /// through the deferred log and never returned.
    pub fn provision(&mut self, context: &mut ConfigContext) -> ProvisioningOutcome {
        if context.has_text(properties::API_TOKEN) {
            self.log.debug("Wavefront api token already set, no need to auto-negotiate one");
            return ProvisioningOutcome::TokenAlreadyConfigured;
        }

        let token_file = (self.locate_token_file)().map(ApiTokenFile::new);
        if let Some(token_file) = &token_file
            && let Some(api_token) = self.read_existing_api_token(token_file)
        {
            self.log.debug(format!(
                "Existing Wavefront api token found from {}",
                token_file.path().display()
            ));
            return if self.register_api_token(context, &api_token) {
                ProvisioningOutcome::RestoredFromCache
            } else {
                ProvisioningOutcome::Failed
            };
        }

        let uri = Endpoint::configured_uri(context);
        match self.auto_negotiate_account(context, &uri) {
            Ok((endpoint, api_token, account)) => {
                if !self.register_api_token(context, &api_token) {
                    return ProvisioningOutcome::Failed;
                }
                let saved_to = token_file
                    .as_ref()
                    .filter(|token_file| self.write_api_token(token_file, &api_token))
                    .map(|token_file| token_file.path().to_path_buf());

                let report = ProvisioningReport::Provisioned {
                    endpoint,
                    api_token,
                    login_url: account.login_url().map(str::to_string),
                    saved_to,
                };
                self.log.info(report.to_string());
                ProvisioningOutcome::Provisioned
            }
            Err(err) => {
                let report = ProvisioningReport::Failed {
                    uri,
                    detail: err.detail(),
                };
                self.log.warn(report.to_string());
                ProvisioningOutcome::Failed
            }
        }
    }

    fn read_existing_api_token(&mut self, token_file: &ApiTokenFile) -> Option<String> {
        match token_file.read() {
            Ok(api_token) => api_token,
            Err(e) => {
                self.log.warn(format!("Failed to read Wavefront api token: {}", e));
                None
            }
        }
    }

    fn auto_negotiate_account(
        &mut self,
        context: &ConfigContext,
        uri: &str,
    ) -> Result<(Endpoint, String, AccountInfo), AccountProvisioningError> {
        let endpoint = Endpoint::parse(uri)?;
        let application = ApplicationInfo::resolve(context);
        self.log.debug(format!(
            "Auto-negotiating Wavefront credentials from: {} (application={}, service={})",
            endpoint,
            application.name(),
            application.service()
        ));

        let account = self.provisioner.provision_account(&endpoint, &application)?;
        let api_token = account
            .api_token()
            .filter(|api_token| !api_token.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                AccountProvisioningError::Decode("response did not contain an api token".to_string())
            })?;

        Ok((endpoint, api_token, account))
    }

    /// Appends a lowest-precedence layer holding `api_token`.
    fn register_api_token(&mut self, context: &mut ConfigContext, api_token: &str) -> bool {
        match PropertySource::from_pairs(PROPERTY_SOURCE_NAME, [(properties::API_TOKEN, api_token)]) {
            Ok(source) => {
                context.add_last(source);
                true
            }
            Err(e) => {
                self.log.error(format!("Failed to register Wavefront api token: {}", e));
                false
            }
        }
    }

    fn write_api_token(&mut self, token_file: &ApiTokenFile, api_token: &str) -> bool {
        match token_file.write(api_token) {
            Ok(TokenFileWrite::Written) => true,
            Ok(TokenFileWrite::Skipped) => {
                self.log.debug(format!(
                    "{} is not a regular file, api token not saved",
                    token_file.path().display()
                ));
                false
            }
            Err(e) => {
                self.log.warn(format!("Failed to save Wavefront api token: {}", e));
                false
            }
        }
    }
}
