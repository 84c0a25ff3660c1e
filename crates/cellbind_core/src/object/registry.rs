//! In-process handle table.
//!
//! # Responsibility
//! - Store registered objects under generated handles.
//! - Narrow stored objects back to a concrete type on lookup.
//! - Bound growth through explicit removal, age eviction and a capacity.
//!
//! # Invariants
//! - Registration never silently drops an object; it either stores it or
//!   returns an error.
//! - Capacity eviction removes the oldest registration first.

use crate::config::RegistryConfig;
use crate::object::handle::{generate_handle, is_valid_name, type_discriminator};
use crate::object::xml::to_xml;
use crate::object::{PublicObject, RegistryError};
use log::{debug, warn};
use parking_lot::Mutex;
use serde::Serialize;
use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub type RegistryResult<T> = Result<T, RegistryError>;

struct RegistryEntry {
    object: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
    registered_at: Instant,
    order: u64,
}

/// Handle-addressed object table.
pub struct ObjectRegistry {
    entries: BTreeMap<String, RegistryEntry>,
    // Registration order -> handle, oldest first.
    order_index: BTreeMap<u64, String>,
    next_order: u64,
    config: RegistryConfig,
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::with_config(RegistryConfig::default())
    }
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry; a capacity of zero is raised to one.
    pub fn with_config(mut config: RegistryConfig) -> Self {
        if config.max_entries == Some(0) {
            warn!("event=registry_config_clamped module=object field=max_entries from=0 to=1");
            config.max_entries = Some(1);
        }
        Self {
            entries: BTreeMap::new(),
            order_index: BTreeMap::new(),
            next_order: 0,
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Registers `object` under a new handle derived from `name`.
    pub fn register<V>(&mut self, name: &str, object: V) -> RegistryResult<String>
    where
        V: Any + Send + Sync,
    {
        self.register_shared(name, Arc::new(object))
    }

    /// Registers an already shared object, e.g. an `Arc<Mutex<T>>` that is
    /// also used as a binding target.
    pub fn register_shared<V>(&mut self, name: &str, object: Arc<V>) -> RegistryResult<String>
    where
        V: Any + Send + Sync,
    {
        let name = validate_name(name)?;
        let handle = generate_handle(name, type_discriminator(type_name::<V>()));
        self.insert(handle, object, type_name::<V>())
    }

    /// Registers a self-describing object and writes the handle into it
    /// before it is stored.
    pub fn register_public<V>(&mut self, name: &str, mut object: V) -> RegistryResult<String>
    where
        V: PublicObject + Any + Send + Sync,
    {
        let name = validate_name(name)?;
        let handle = generate_handle(name, object.type_tag());
        if self.entries.contains_key(&handle) {
            return Err(RegistryError::HandleCollision(handle));
        }
        object.set_handle(handle.clone());
        self.insert(handle, Arc::new(object), type_name::<V>())
    }

    /// Returns the object behind `handle` narrowed to `V`.
    ///
    /// # Errors
    /// - `ObjectMissing` when no entry exists.
    /// - `TypeMismatch` when the entry holds a different type.
    pub fn resolve<V>(&self, handle: &str) -> RegistryResult<Arc<V>>
    where
        V: Any + Send + Sync,
    {
        let entry = self
            .entries
            .get(handle)
            .ok_or_else(|| RegistryError::ObjectMissing(handle.to_string()))?;
        Arc::clone(&entry.object)
            .downcast::<V>()
            .map_err(|_| RegistryError::TypeMismatch {
                handle: handle.to_string(),
                expected: type_name::<V>(),
                actual: entry.type_name,
            })
    }

    /// Like [`resolve`](Self::resolve), but a missing handle is `Ok(None)`.
    pub fn try_resolve<V>(&self, handle: &str) -> RegistryResult<Option<Arc<V>>>
    where
        V: Any + Send + Sync,
    {
        match self.resolve(handle) {
            Ok(object) => Ok(Some(object)),
            Err(RegistryError::ObjectMissing(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Untyped lookup.
    pub fn get(&self, handle: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        self.entries
            .get(handle)
            .map(|entry| Arc::clone(&entry.object))
    }

    /// Serializes the entry under `handle` as XML.
    ///
    /// Works for entries stored as `V` or as `Mutex<V>`.
    pub fn serialize_handle<V>(&self, handle: &str) -> RegistryResult<String>
    where
        V: Serialize + Any + Send + Sync,
    {
        let entry = self
            .entries
            .get(handle)
            .ok_or_else(|| RegistryError::ObjectMissing(handle.to_string()))?;
        let object = entry.object.as_ref();
        if let Some(value) = object.downcast_ref::<V>() {
            return to_xml(value);
        }
        if let Some(shared) = object.downcast_ref::<Mutex<V>>() {
            let guard = shared.lock();
            return to_xml(&*guard);
        }
        Err(RegistryError::TypeMismatch {
            handle: handle.to_string(),
            expected: type_name::<V>(),
            actual: entry.type_name,
        })
    }

    /// Removes the entry under `handle`.
    pub fn unregister(&mut self, handle: &str) -> RegistryResult<()> {
        let entry = self
            .entries
            .remove(handle)
            .ok_or_else(|| RegistryError::ObjectMissing(handle.to_string()))?;
        self.order_index.remove(&entry.order);
        debug!("event=object_unregistered module=object handle={handle}");
        Ok(())
    }

    /// Removes entries registered at least `max_age` ago; returns how many.
    pub fn evict_older_than(&mut self, max_age: Duration) -> usize {
        let now = Instant::now();
        let expired = self
            .entries
            .iter()
            .filter(|(_, entry)| now.saturating_duration_since(entry.registered_at) >= max_age)
            .map(|(handle, _)| handle.clone())
            .collect::<Vec<_>>();
        for handle in &expired {
            if let Some(entry) = self.entries.remove(handle) {
                self.order_index.remove(&entry.order);
            }
        }
        if !expired.is_empty() {
            warn!(
                "event=objects_evicted module=object reason=age count={} remaining={}",
                expired.len(),
                self.entries.len()
            );
        }
        expired.len()
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.entries.contains_key(handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns handles in registration order.
    pub fn handles(&self) -> Vec<String> {
        self.order_index.values().cloned().collect()
    }

    fn insert(
        &mut self,
        handle: String,
        object: Arc<dyn Any + Send + Sync>,
        type_name: &'static str,
    ) -> RegistryResult<String> {
        if self.entries.contains_key(&handle) {
            return Err(RegistryError::HandleCollision(handle));
        }
        if let Some(max_age_secs) = self.config.max_age_secs {
            self.evict_older_than(Duration::from_secs(max_age_secs));
        }
        if let Some(max_entries) = self.config.max_entries {
            self.evict_to_capacity(max_entries.saturating_sub(1));
        }

        let order = self.next_order;
        self.next_order += 1;
        self.order_index.insert(order, handle.clone());
        self.entries.insert(
            handle.clone(),
            RegistryEntry {
                object,
                type_name,
                registered_at: Instant::now(),
                order,
            },
        );
        debug!("event=object_registered module=object handle={handle}");
        Ok(handle)
    }

    fn evict_to_capacity(&mut self, capacity: usize) {
        let mut evicted = 0usize;
        while self.entries.len() > capacity {
            let Some((_, handle)) = self.order_index.pop_first() else {
                break;
            };
            self.entries.remove(&handle);
            evicted += 1;
        }
        if evicted > 0 {
            warn!(
                "event=objects_evicted module=object reason=capacity count={} capacity={}",
                evicted,
                capacity + 1
            );
        }
    }
}

fn validate_name(name: &str) -> RegistryResult<&str> {
    if !is_valid_name(name) {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(name.trim())
}

#[cfg(test)]
mod tests {
    use super::ObjectRegistry;
    use crate::config::RegistryConfig;
    use crate::object::RegistryError;
    use std::time::Duration;

    #[test]
    fn register_rejects_invalid_names() {
        let mut registry = ObjectRegistry::new();
        for name in ["", "   ", "quote::v2", "quote:", ":quote", "a:b"] {
            let err = registry.register(name, 1_u8).expect_err("invalid name");
            assert_eq!(err, RegistryError::InvalidName(name.to_string()));
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let mut registry = ObjectRegistry::with_config(RegistryConfig {
            max_entries: Some(2),
            max_age_secs: None,
        });
        let first = registry.register("a", 1_u32).expect("first");
        let second = registry.register("b", 2_u32).expect("second");
        let third = registry.register("c", 3_u32).expect("third");

        assert_eq!(registry.len(), 2);
        assert!(!registry.contains(&first));
        assert_eq!(registry.handles(), vec![second, third]);
    }

    #[test]
    fn evict_older_than_respects_age() {
        let mut registry = ObjectRegistry::new();
        registry.register("a", 1_u32).expect("register");
        assert_eq!(registry.evict_older_than(Duration::from_secs(3600)), 0);
        assert_eq!(registry.evict_older_than(Duration::ZERO), 1);
        assert!(registry.is_empty());
        assert!(registry.handles().is_empty());
    }

    #[test]
    fn configured_max_age_evicts_on_registration() {
        let mut registry = ObjectRegistry::with_config(RegistryConfig {
            max_entries: None,
            max_age_secs: Some(0),
        });
        let first = registry.register("a", 1_u32).expect("first");
        let second = registry.register("b", 2_u32).expect("second");

        assert!(matches!(
            registry.resolve::<u32>(&first),
            Err(RegistryError::ObjectMissing(_))
        ));
        assert_eq!(*registry.resolve::<u32>(&second).expect("second"), 2);
        assert_eq!(registry.handles(), vec![second]);
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut registry = ObjectRegistry::with_config(RegistryConfig {
            max_entries: Some(0),
            max_age_secs: None,
        });
        assert_eq!(registry.config().max_entries, Some(1));

        let first = registry.register("a", 1_u32).expect("first");
        let second = registry.register("b", 2_u32).expect("second");
        assert!(!registry.contains(&first));
        assert!(registry.contains(&second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_returns_untyped_object() {
        let mut registry = ObjectRegistry::new();
        let handle = registry.register("n", 7_i64).expect("register");
        let object = registry.get(&handle).expect("present");
        assert_eq!(object.downcast_ref::<i64>(), Some(&7));
        assert!(registry.get("missing").is_none());
    }
}
