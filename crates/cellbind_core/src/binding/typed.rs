//! Typed binding and its type-erased dispatch contract.

use crate::binding::accessor::{PropertyAccessor, Setter};
use crate::binding::BindingError;
use parking_lot::Mutex;
use std::any::{type_name, Any};
use std::sync::{Arc, Weak};

/// Untyped view of a binding, as stored by the registry.
///
/// The strongly typed setter is captured once when the binding is built;
/// dispatch is one virtual call plus one `downcast`.
pub trait ErasedBinding: Send + Sync {
    fn key(&self) -> &str;
    fn property(&self) -> &str;
    /// Name of the value type the setter accepts.
    fn value_type(&self) -> &'static str;
    /// Whether the bound target is still alive.
    fn is_live(&self) -> bool;
    /// Downcasts `value` to the property type and writes it into the target.
    fn set(&self, value: Box<dyn Any + Send>) -> Result<(), BindingError>;
}

/// Binding of one key to one property of one externally owned target.
///
/// # Invariants
/// - Target and property are fixed at construction.
/// - The target is held through a `Weak`, so the binding never keeps it alive.
pub struct TypedBinding<T, P> {
    key: String,
    property: String,
    target: Weak<Mutex<T>>,
    setter: Setter<T, P>,
}

impl<T, P> TypedBinding<T, P> {
    pub fn new(
        key: impl Into<String>,
        target: &Arc<Mutex<T>>,
        accessor: PropertyAccessor<T, P>,
    ) -> Self {
        let (property, setter) = accessor.into_parts();
        Self {
            key: key.into(),
            property,
            target: Arc::downgrade(target),
            setter,
        }
    }
}

impl<T, P> ErasedBinding for TypedBinding<T, P>
where
    T: Send + 'static,
    P: Send + 'static,
{
    fn key(&self) -> &str {
        &self.key
    }

    fn property(&self) -> &str {
        &self.property
    }

    fn value_type(&self) -> &'static str {
        type_name::<P>()
    }

    fn is_live(&self) -> bool {
        self.target.strong_count() > 0
    }

    fn set(&self, value: Box<dyn Any + Send>) -> Result<(), BindingError> {
        let value = value
            .downcast::<P>()
            .map_err(|_| BindingError::TypeMismatch {
                key: self.key.clone(),
                expected: type_name::<P>(),
            })?;
        let target = self
            .target
            .upgrade()
            .ok_or_else(|| BindingError::TargetReleased {
                key: self.key.clone(),
            })?;
        let mut guard = target.lock();
        (self.setter)(&mut *guard, *value);
        Ok(())
    }
}
