//! The driver contract.
//!
//! A driver is one swappable implementation of a capability kind. What the
//! capability actually computes (what a hash driver hashes, what a console
//! driver renders) is defined by capability-specific traits layered on top
//! of [`Driver`] by the host; this crate only fixes the surface the
//! registry needs.

use crate::error::ActivationError;
use crate::kind::DriverKind;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// One swappable implementation of a capability kind.
pub trait Driver: Send + Sync {
    /// The kind this driver implements.
    fn kind(&self) -> DriverKind;

    /// Hook invoked when this driver becomes the active selection.
    ///
    /// A driver that needs runtime support (a console driver requiring a
    /// terminal feature, say) probes for it here and fails if it is
    /// missing. The registry guarantees a failed activation leaves the
    /// previous selection in place.
    fn activate(&self) -> Result<(), ActivationError> {
        Ok(())
    }

    /// Downcast support for capability-specific traits.
    fn as_any(&self) -> &dyn Any;
}

/// A driver registered under a name within its kind.
///
/// The name is unique within the kind; the same instance may be shared
/// between the registered set and the current-selection channels.
#[derive(Clone)]
pub struct NamedDriver {
    name: String,
    kind: DriverKind,
    driver: Arc<dyn Driver>,
}

impl NamedDriver {
    /// Bind a driver instance to its registered name.
    pub fn new(name: impl Into<String>, kind: DriverKind, driver: Arc<dyn Driver>) -> Self {
        Self {
            name: name.into(),
            kind,
            driver,
        }
    }

    /// The name the driver was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind the driver belongs to.
    pub fn kind(&self) -> DriverKind {
        self.kind
    }

    /// The driver instance.
    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    /// Whether this entry wraps the given instance.
    pub fn is_instance(&self, other: &Arc<dyn Driver>) -> bool {
        Arc::ptr_eq(&self.driver, other)
    }
}

impl fmt::Debug for NamedDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedDriver")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullDriver;

    impl Driver for NullDriver {
        fn kind(&self) -> DriverKind {
            DriverKind::Console
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_named_driver_identity() {
        let driver: Arc<dyn Driver> = Arc::new(NullDriver);
        let named = NamedDriver::new("Null", DriverKind::Console, Arc::clone(&driver));

        assert_eq!(named.name(), "Null");
        assert_eq!(named.kind(), DriverKind::Console);
        assert!(named.is_instance(&driver));

        let other: Arc<dyn Driver> = Arc::new(NullDriver);
        assert!(!named.is_instance(&other));
    }

    #[test]
    fn test_default_activation_succeeds() {
        let driver = NullDriver;
        assert!(driver.activate().is_ok());
    }
}
