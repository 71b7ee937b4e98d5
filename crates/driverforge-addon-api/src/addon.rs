//! The addon contract.

use crate::error::AddonError;
use driverforge_registry::DriverRegistry;
use std::fmt;

/// Ordering tier controlling in which loader pass an addon is started.
///
/// The loader starts addons in one pass per class, in declaration order:
/// core addons first, optional addons after them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadPriority {
    /// Started in the first pass; other addons may rely on its drivers.
    Core,

    /// Started after every core addon.
    Optional,
}

impl LoadPriority {
    /// Every class, in pass order.
    pub const PASSES: [LoadPriority; 2] = [LoadPriority::Core, LoadPriority::Optional];

    /// Lowercase name of the class.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadPriority::Core => "core",
            LoadPriority::Optional => "optional",
        }
    }
}

impl fmt::Display for LoadPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A live addon instance produced from a bundle's entry point.
///
/// Hooks are invoked only by the [`AddonLoader`](crate::AddonLoader), in
/// this order: `start` once at load, `finalize` once late in the host's
/// shutdown-adjacent sequence, `stop` once at shutdown (in reverse start
/// order across addons).
pub trait Addon: Send {
    /// Name of the addon, for logs and the active list.
    fn name(&self) -> &str;

    /// The pass this addon is started in.
    fn priority(&self) -> LoadPriority;

    /// Register this addon's drivers.
    ///
    /// An error here means the addon never becomes active: it is dropped
    /// and neither `finalize` nor `stop` will run for it.
    fn start(&mut self, registry: &DriverRegistry) -> Result<(), AddonError>;

    /// Late hook for work that needs every addon started (flushes, cross-
    /// addon wiring). Runs before any `stop`.
    fn finalize(&mut self) -> Result<(), AddonError> {
        Ok(())
    }

    /// Unregister this addon's drivers and release its resources.
    fn stop(&mut self, _registry: &DriverRegistry) -> Result<(), AddonError> {
        Ok(())
    }
}
