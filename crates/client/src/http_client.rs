use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use tracing::trace;
use url::Url;
use wavefront_config::{ApplicationInfo, Endpoint};
use wavefront_errors::{AccountProvisioningError, ConfigError};

use crate::account::{AccountInfo, AccountProvisioner};

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_PRODUCT: &str = "rust";

#[derive(Debug, Deserialize)]
struct AccountResponse {
    token: Option<String>,
    url: Option<String>,
}

/// Negotiates accounts over HTTP with `POST /api/v2/trial/<product>-autoconfigure`.
///
/// The underlying client is blocking and must not be driven from within an
/// async runtime.
#[derive(Debug, Clone)]
pub struct HttpAccountProvisioner {
    product: String,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl HttpAccountProvisioner {
    pub fn new() -> Self {
        Self::with_product(DEFAULT_PRODUCT)
    }

    pub fn with_product(product: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            connect_timeout: CONNECT_TIMEOUT,
            read_timeout: READ_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, connect_timeout: Duration, read_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.read_timeout = read_timeout;
        self
    }

    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub const fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Request uri for `application`. `cluster` and `shard` are only sent
    /// when present.
    pub fn request_url(
        &self,
        endpoint: &Endpoint,
        application: &ApplicationInfo,
    ) -> Result<Url, AccountProvisioningError> {
        let path = format!("/api/v2/trial/{}-autoconfigure", self.product);
        let mut url = Url::parse(&endpoint.join(&path)).map_err(|e| ConfigError::InvalidEndpoint {
            uri: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("application", application.name())
                .append_pair("service", application.service());
            if let Some(cluster) = application.cluster() {
                query.append_pair("cluster", cluster);
            }
            if let Some(shard) = application.shard() {
                query.append_pair("shard", shard);
            }
        }

        Ok(url)
    }

    fn client(&self) -> Result<Client, AccountProvisioningError> {
        // The blocking client only exposes an overall deadline, so the read
        // allowance is added on top of the connect ceiling.
        Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.connect_timeout + self.read_timeout)
            .build()
            .map_err(from_reqwest)
    }

    fn read_account(response: Response) -> Result<AccountInfo, AccountProvisioningError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().map_err(from_reqwest)?;
            return Err(AccountProvisioningError::Provisioning {
                status: status.as_u16(),
                body,
            });
        }

        let account = response.json::<AccountResponse>().map_err(from_reqwest)?;
        Ok(AccountInfo::new(account.token, account.url))
    }
}

impl Default for HttpAccountProvisioner {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountProvisioner for HttpAccountProvisioner {
    fn provision_account(
        &self,
        endpoint: &Endpoint,
        application: &ApplicationInfo,
    ) -> Result<AccountInfo, AccountProvisioningError> {
        let url = self.request_url(endpoint, application)?;
        trace!("POST {}", url);

        let response = self.client()?.post(url).send().map_err(from_reqwest)?;
        Self::read_account(response)
    }
}

fn from_reqwest(err: reqwest::Error) -> AccountProvisioningError {
    if err.is_decode() {
        AccountProvisioningError::Decode(err.to_string())
    } else {
        AccountProvisioningError::Transport(err.to_string())
    }
}
