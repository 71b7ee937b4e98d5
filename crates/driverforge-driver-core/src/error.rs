//! Error types for the driver registry.

use crate::kind::DriverKind;
use thiserror::Error;

/// A driver's own activation logic failed.
///
/// Raised from [`crate::Driver::activate`]; the registry wraps it in
/// [`RegistryError::Activation`] with the kind and name attached.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ActivationError(String);

impl ActivationError {
    /// Create an activation error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Errors that can occur in the driver registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No driver with the given name is registered for the kind.
    #[error("no driver named '{name}' is registered for {kind}")]
    NotFound { kind: DriverKind, name: String },

    /// A driver with the given name is already registered for the kind.
    #[error("a driver named '{name}' is already registered for {kind}")]
    DuplicateName { kind: DriverKind, name: String },

    /// The named driver is the kind's protected fallback.
    #[error("'{name}' is the protected fallback driver for {kind} and cannot be removed")]
    ProtectedEntry { kind: DriverKind, name: String },

    /// Kind inference was asked about a contract outside the known set.
    #[error("unknown capability contract '{0}'")]
    UnknownContract(String),

    /// The selected driver's activation hook failed.
    #[error("activation of driver '{name}' for {kind} failed: {source}")]
    Activation {
        kind: DriverKind,
        name: String,
        #[source]
        source: ActivationError,
    },
}

/// Result type for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
