//! # Wavefront Config
//!
//! Layered configuration for applications exporting metrics to Wavefront.
//!
//! A [`ConfigContext`] is an ordered list of [`PropertySource`]s. Lookups walk
//! the sources from first to last and the first source holding a value wins,
//! so appending a source with [`ConfigContext::add_last`] can never shadow a
//! value the operator set anywhere else.
//!
//! ```rust
//! use wavefront_config::{ConfigContext, PropertySource, properties};
//!
//! let mut context = ConfigContext::new().with_source(
//!     PropertySource::from_pairs("operator", [(properties::API_TOKEN, "explicit")]).unwrap(),
//! );
//! context.add_last(
//!     PropertySource::from_pairs("wavefront", [(properties::API_TOKEN, "provisioned")]).unwrap(),
//! );
//!
//! assert_eq!(context.get_text(properties::API_TOKEN).as_deref(), Some("explicit"));
//! ```

mod application_info;
mod context;
mod endpoint;
mod loader;

pub mod properties;

pub use application_info::ApplicationInfo;
pub use context::{ConfigContext, PropertySource};
pub use endpoint::Endpoint;
pub use loader::{DEFAULT_CONFIG_PATH, ENV_PREFIX, expand_tilde};
