//! Property keys read and written by the account provisioning flow.

pub const API_TOKEN: &str = "wavefront.api_token";
pub const URI: &str = "wavefront.uri";

pub const APPLICATION_NAME: &str = "wavefront.application.name";
pub const APPLICATION_SERVICE: &str = "wavefront.application.service";
pub const APPLICATION_CLUSTER: &str = "wavefront.application.cluster";
pub const APPLICATION_SHARD: &str = "wavefront.application.shard";

/// Host-wide application name, only consulted when
/// [`APPLICATION_NAME`] is not set.
pub const LEGACY_APPLICATION_NAME: &str = "application.name";
