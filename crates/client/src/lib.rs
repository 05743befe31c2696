mod account;
mod http_client;

pub use account::{AccountInfo, AccountProvisioner, MockAccountProvisioner};
pub use http_client::{CONNECT_TIMEOUT, DEFAULT_PRODUCT, HttpAccountProvisioner, READ_TIMEOUT};
