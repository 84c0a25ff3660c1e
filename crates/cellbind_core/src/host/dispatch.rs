//! Batch delivery of host change events.
//!
//! A bad event is logged and counted; it never stops the rest of the batch.

use crate::binding::registry::BindingRegistry;
use crate::binding::{BindingError, NotifyOutcome};
use crate::host::HostLocation;
use log::warn;
use std::any::Any;

/// One change raised by the host.
pub struct HostEvent {
    pub location: HostLocation,
    pub value: Box<dyn Any + Send>,
}

impl HostEvent {
    pub fn new<V: Any + Send>(location: HostLocation, value: V) -> Self {
        Self {
            location,
            value: Box::new(value),
        }
    }
}

/// Per-batch delivery summary.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub applied: usize,
    pub unbound: usize,
    /// Canonical key and error of every failed event, in arrival order.
    pub failed: Vec<(String, BindingError)>,
}

impl DispatchReport {
    pub fn total(&self) -> usize {
        self.applied + self.unbound + self.failed.len()
    }
}

/// Delivers `events` in order through `registry`.
pub fn dispatch_host_events(
    registry: &BindingRegistry,
    events: impl IntoIterator<Item = HostEvent>,
) -> DispatchReport {
    let mut report = DispatchReport::default();
    for event in events {
        match registry.translate_host_event(&event.location, event.value) {
            Ok(result) => match result.outcome {
                NotifyOutcome::Applied => report.applied += 1,
                NotifyOutcome::Unbound => report.unbound += 1,
            },
            Err(err) => {
                let key = event.location.canonical_key();
                warn!(
                    "event=host_event_failed module=host key={} error={}",
                    key, err
                );
                report.failed.push((key, err));
            }
        }
    }
    report
}
