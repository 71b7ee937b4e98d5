//! Built-in fallback drivers.
//!
//! Every kind needs one driver that is always present and whose activation
//! cannot fail, so the registry is never without a valid selection. The
//! built-ins carry no capability logic of their own; hosts layer concrete
//! capability traits over [`Driver`] separately.

use driverforge_driver_core::{Driver, DriverKind};
use std::any::Any;
use std::sync::Arc;

/// The always-available built-in driver for a kind.
pub struct BuiltinDriver {
    kind: DriverKind,
}

impl BuiltinDriver {
    /// Create the built-in driver for the given kind.
    pub fn new(kind: DriverKind) -> Self {
        Self { kind }
    }
}

impl Driver for BuiltinDriver {
    fn kind(&self) -> DriverKind {
        self.kind
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Construct the fallback driver instance for a kind.
pub fn fallback_driver(kind: DriverKind) -> Arc<dyn Driver> {
    Arc::new(BuiltinDriver::new(kind))
}
