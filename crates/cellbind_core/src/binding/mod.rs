//! Key-to-setter bindings.
//!
//! # Responsibility
//! - Pair an externally owned target with one typed property setter.
//! - Dispatch untyped `(key, value)` notifications to the matching setter.
//!
//! # Invariants
//! - At most one binding exists per key; rebinding replaces the previous one.
//! - Bindings never own their target; dropping the target releases it.
//! - Values are downcast strictly; no implicit coercion between types.

pub mod accessor;
pub mod registry;
pub mod typed;

use crate::host::LocationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Binding construction and dispatch errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// Binding key is blank after trimming.
    InvalidKey(String),
    /// Accessor property name is not a plain identifier.
    InvalidAccessor(String),
    /// Notified value is not of the bound property's type.
    TypeMismatch { key: String, expected: &'static str },
    /// Bound target was dropped by its owner.
    TargetReleased { key: String },
    /// Host location could not be turned into a canonical key.
    InvalidLocation(LocationError),
}

impl Display for BindingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(value) => write!(f, "binding key is invalid: `{value}`"),
            Self::InvalidAccessor(value) => {
                write!(f, "accessor must name a direct property, got `{value}`")
            }
            Self::TypeMismatch { key, expected } => {
                write!(f, "value for `{key}` is not of type `{expected}`")
            }
            Self::TargetReleased { key } => {
                write!(f, "target bound to `{key}` has been released")
            }
            Self::InvalidLocation(err) => write!(f, "invalid host location: {err}"),
        }
    }
}

impl Error for BindingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLocation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LocationError> for BindingError {
    fn from(value: LocationError) -> Self {
        Self::InvalidLocation(value)
    }
}

/// Result of delivering one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// A binding existed and its setter ran.
    Applied,
    /// No binding is registered for the key.
    Unbound,
}
