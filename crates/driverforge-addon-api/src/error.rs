//! Error types for addon instantiation and lifecycle.

use driverforge_driver_core::RegistryError;
use driverforge_runtime::RuntimeError;
use std::fmt;
use thiserror::Error;

/// An addon lifecycle hook failed.
#[derive(Error, Debug)]
pub enum AddonError {
    /// The hook's own logic failed.
    #[error("lifecycle hook failed: {0}")]
    Lifecycle(String),

    /// A registry call made by the hook failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors that can occur while turning a bundle into a live addon.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// None of the artifact's exported entry types could be linked.
    #[error("no addon entry type could be linked from artifact '{artifact}'")]
    NoAddonType { artifact: String },

    /// The underlying bundle runtime failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Aggregated failures from a finalize or stop sweep.
///
/// Raised once at the end of the sweep so the caller sees every failure,
/// not just the first; the sweep itself always visits every addon.
#[derive(Debug)]
pub struct ShutdownError {
    failures: Vec<(String, AddonError)>,
}

impl ShutdownError {
    pub(crate) fn from_failures(failures: Vec<(String, AddonError)>) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(Self { failures })
        }
    }

    /// Every (addon name, error) pair collected during the sweep.
    pub fn failures(&self) -> &[(String, AddonError)] {
        &self.failures
    }
}

impl fmt::Display for ShutdownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} addon shutdown failure(s):", self.failures.len())?;
        for (name, err) in &self.failures {
            write!(f, " {name}: {err};")?;
        }
        Ok(())
    }
}

impl std::error::Error for ShutdownError {}
