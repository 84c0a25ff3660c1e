//! Binding and object registry core for spreadsheet hosts.
//!
//! Host change notifications keyed by cell address are routed to typed
//! property setters on in-memory objects, and objects can be published under
//! generated handles for typed retrieval.

pub mod binding;
pub mod config;
pub mod global;
pub mod host;
pub mod logging;
pub mod object;

pub use binding::accessor::PropertyAccessor;
pub use binding::registry::{BindingInfo, BindingRegistry, HostEventOutcome};
pub use binding::typed::{ErasedBinding, TypedBinding};
pub use binding::{BindingError, NotifyOutcome};
pub use config::{ConfigError, CoreConfig, LoggingConfig, RegistryConfig};
pub use host::dispatch::{dispatch_host_events, DispatchReport, HostEvent};
pub use host::{HostLocation, LocationError};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use object::registry::{ObjectRegistry, RegistryResult};
pub use object::xml::to_xml;
pub use object::{PublicObject, RegistryError};

/// Minimal health-check API for host integration probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
