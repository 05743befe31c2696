use crate::{ConfigContext, properties};

const DEFAULT_APPLICATION_NAME: &str = "unnamed_application";
const DEFAULT_SERVICE_NAME: &str = "unnamed_service";

/// Identity of the running application, as reported to Wavefront when an
/// account is provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationInfo {
    name: String,
    service: String,
    cluster: Option<String>,
    shard: Option<String>,
}

impl ApplicationInfo {
    pub fn new(
        name: impl Into<String>,
        service: impl Into<String>,
        cluster: Option<String>,
        shard: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            service: service.into(),
            cluster,
            shard,
        }
    }

    /// Resolves the identity from `context`, falling back to the legacy
    /// application name and then to fixed defaults. Blank values count as
    /// unset, so `cluster` and `shard` are either absent or non-empty.
    pub fn resolve(context: &ConfigContext) -> Self {
        let name = context
            .get_text(properties::APPLICATION_NAME)
            .or_else(|| context.get_text(properties::LEGACY_APPLICATION_NAME))
            .unwrap_or_else(|| DEFAULT_APPLICATION_NAME.to_string());
        let service = context
            .get_text(properties::APPLICATION_SERVICE)
            .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());

        Self {
            name,
            service,
            cluster: context.get_text(properties::APPLICATION_CLUSTER),
            shard: context.get_text(properties::APPLICATION_SHARD),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    pub fn shard(&self) -> Option<&str> {
        self.shard.as_deref()
    }
}
