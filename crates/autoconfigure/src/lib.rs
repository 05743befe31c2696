//! # Wavefront Autoconfigure
//!
//! Provisions a Wavefront api token for applications that did not configure
//! one, before their metrics export starts.
//!
//! [`AccountProvisioning::provision`] settles on the first of:
//! - an api token configured by the operator, left as is;
//! - a token saved by a previous run in `~/.wavefront_token`;
//! - a freshly negotiated account, whose token is saved for the next run.
//!
//! A resolved token is registered as the lowest-precedence layer of the
//! [`ConfigContext`](wavefront_config::ConfigContext), so explicit settings
//! always win. Failures never abort startup; they are reported to the
//! operator once logging is available.
//!
//! ```rust,no_run
//! use wavefront_autoconfigure::AccountProvisioning;
//! use wavefront_config::{ConfigContext, DEFAULT_CONFIG_PATH, ENV_PREFIX};
//!
//! let mut context = ConfigContext::load(DEFAULT_CONFIG_PATH, ENV_PREFIX).unwrap_or_default();
//! let mut provisioning = AccountProvisioning::new();
//! provisioning.provision(&mut context);
//!
//! // once the logging sink is installed
//! provisioning.log_mut().replay();
//! ```

mod deferred_log;
mod provisioning;
mod report;
mod token_file;

pub use deferred_log::{DeferredLog, DeferredRecord, LogLevel};
pub use provisioning::{AccountProvisioning, PROPERTY_SOURCE_NAME, ProvisioningOutcome};
pub use report::ProvisioningReport;
pub use token_file::{ApiTokenFile, TOKEN_FILE_NAME, TokenFileWrite};

#[cfg(test)]
mod tests;
