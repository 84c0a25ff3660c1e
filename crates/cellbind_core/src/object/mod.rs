//! Handle-addressed object registry.
//!
//! # Responsibility
//! - Issue unique, human-traceable handles for registered objects.
//! - Return registered objects narrowed to the caller's expected type.
//! - Render registered objects as XML documents.
//!
//! # Invariants
//! - A handle is never issued twice within one process.
//! - Missing handles and type mismatches are distinct errors.

pub mod handle;
pub mod registry;
pub mod xml;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Object registry errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Logical name is blank or contains `:`.
    InvalidName(String),
    ObjectMissing(String),
    TypeMismatch {
        handle: String,
        expected: &'static str,
        actual: &'static str,
    },
    /// Generated handle already exists; the registration was refused.
    HandleCollision(String),
    UnserializableFieldType {
        type_name: &'static str,
        reason: String,
    },
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(value) => write!(f, "object name is invalid: `{value}`"),
            Self::ObjectMissing(handle) => write!(f, "Object missing : {handle}"),
            Self::TypeMismatch {
                handle,
                expected,
                actual,
            } => write!(
                f,
                "object `{handle}` is `{actual}`, not the requested `{expected}`"
            ),
            Self::HandleCollision(handle) => write!(f, "handle already registered: {handle}"),
            Self::UnserializableFieldType { type_name, reason } => {
                write!(f, "cannot serialize `{type_name}`: {reason}")
            }
        }
    }
}

impl Error for RegistryError {}

/// Self-describing object that stores its own registry handle.
pub trait PublicObject {
    fn handle(&self) -> &str;
    fn set_handle(&mut self, handle: String);

    /// Type discriminator embedded in generated handles.
    fn type_tag(&self) -> &'static str {
        handle::type_discriminator(std::any::type_name::<Self>())
    }
}
