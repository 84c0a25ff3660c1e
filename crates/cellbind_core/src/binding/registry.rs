//! Key-indexed binding registry.
//!
//! # Responsibility
//! - Store one type-erased binding per key.
//! - Translate host change events into key lookups and setter calls.
//!
//! # Invariants
//! - Unknown keys are a normal, silent outcome (`NotifyOutcome::Unbound`).
//! - Key derivation for host events never consults registry state.

use crate::binding::accessor::PropertyAccessor;
use crate::binding::typed::{ErasedBinding, TypedBinding};
use crate::binding::{BindingError, NotifyOutcome};
use crate::host::HostLocation;
use log::{debug, info};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Read-only snapshot of one registered binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingInfo {
    pub key: String,
    pub property: String,
    pub value_type: &'static str,
    pub live: bool,
}

/// Outcome of one translated host event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEventOutcome {
    /// Canonical key derived from the host location.
    pub key: String,
    pub outcome: NotifyOutcome,
}

/// Single-writer map from key to binding.
#[derive(Default)]
pub struct BindingRegistry {
    bindings: BTreeMap<String, Box<dyn ErasedBinding>>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `key` to one property of `target`.
    ///
    /// An existing binding under the same key is replaced.
    ///
    /// # Errors
    /// - `InvalidKey` when `key` is blank.
    pub fn bind<T, P>(
        &mut self,
        key: &str,
        target: &Arc<Mutex<T>>,
        accessor: PropertyAccessor<T, P>,
    ) -> Result<(), BindingError>
    where
        T: Send + 'static,
        P: Send + 'static,
    {
        let key = normalize_key(key)?;
        let binding = TypedBinding::new(key.clone(), target, accessor);
        debug!(
            "event=binding_bound module=binding key={} property={}",
            key,
            binding.property()
        );
        if let Some(previous) = self.bindings.insert(key, Box::new(binding)) {
            debug!(
                "event=binding_replaced module=binding key={} previous_property={}",
                previous.key(),
                previous.property()
            );
        }
        Ok(())
    }

    /// Delivers an untyped value to the binding registered under `key`.
    ///
    /// # Errors
    /// - `TypeMismatch` when `value` is not of the bound property type.
    /// - `TargetReleased` when the bound target no longer exists.
    pub fn notify(
        &self,
        key: &str,
        value: Box<dyn Any + Send>,
    ) -> Result<NotifyOutcome, BindingError> {
        let Some(binding) = self.bindings.get(key.trim()) else {
            return Ok(NotifyOutcome::Unbound);
        };
        binding.set(value)?;
        Ok(NotifyOutcome::Applied)
    }

    /// Boxing convenience over [`notify`](Self::notify).
    pub fn notify_value<V>(&self, key: &str, value: V) -> Result<NotifyOutcome, BindingError>
    where
        V: Any + Send,
    {
        self.notify(key, Box::new(value))
    }

    /// Derives the canonical key for `location` and forwards to `notify`.
    pub fn translate_host_event(
        &self,
        location: &HostLocation,
        value: Box<dyn Any + Send>,
    ) -> Result<HostEventOutcome, BindingError> {
        let key = location.canonical_key();
        let outcome = self.notify(&key, value)?;
        Ok(HostEventOutcome { key, outcome })
    }

    /// Removes the binding under `key`; returns whether one existed.
    pub fn unbind(&mut self, key: &str) -> bool {
        self.bindings.remove(key.trim()).is_some()
    }

    /// Drops bindings whose target has been released; returns how many.
    pub fn prune_released(&mut self) -> usize {
        let before = self.bindings.len();
        self.bindings.retain(|_, binding| binding.is_live());
        let pruned = before - self.bindings.len();
        if pruned > 0 {
            info!(
                "event=bindings_pruned module=binding count={} remaining={}",
                pruned,
                self.bindings.len()
            );
        }
        pruned
    }

    pub fn contains(&self, key: &str) -> bool {
        self.bindings.contains_key(key.trim())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns bound keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.bindings.keys().cloned().collect()
    }

    pub fn binding_info(&self, key: &str) -> Option<BindingInfo> {
        self.bindings.get(key.trim()).map(|binding| BindingInfo {
            key: binding.key().to_string(),
            property: binding.property().to_string(),
            value_type: binding.value_type(),
            live: binding.is_live(),
        })
    }
}

fn normalize_key(key: &str) -> Result<String, BindingError> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(BindingError::InvalidKey(key.to_string()));
    }
    Ok(trimmed.to_string())
}
