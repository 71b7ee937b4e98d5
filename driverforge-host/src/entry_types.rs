//! Entry types compiled into the host.
//!
//! The in-process linker resolves artifact exports against this table.
//! Shipping hosts register their compiled-in addon entry points here; the
//! stock table carries the null-console pack used for output capture.

use driverforge_addon_api::{Addon, AddonError, InProcessLinker, LoadPriority};
use driverforge_driver_core::{Driver, DriverKind};
use driverforge_registry::DriverRegistry;
use std::any::Any;
use std::sync::Arc;

/// Console driver that discards everything written to it.
///
/// Selected locally (via a registry scope) while capturing output that
/// should not reach the terminal.
pub struct NullConsole;

impl Driver for NullConsole {
    fn kind(&self) -> DriverKind {
        DriverKind::Console
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Addon registering the null console driver.
pub struct NullConsoleAddon;

impl Addon for NullConsoleAddon {
    fn name(&self) -> &str {
        "null-console"
    }

    fn priority(&self) -> LoadPriority {
        LoadPriority::Optional
    }

    fn start(&mut self, registry: &DriverRegistry) -> Result<(), AddonError> {
        registry.register(DriverKind::Console, "Null", Arc::new(NullConsole))?;
        Ok(())
    }

    fn stop(&mut self, registry: &DriverRegistry) -> Result<(), AddonError> {
        registry.unregister(DriverKind::Console, "Null")?;
        Ok(())
    }
}

/// Build the linker with every compiled-in entry type registered.
pub fn builtin_linker() -> InProcessLinker {
    let mut linker = InProcessLinker::new();
    linker.register_entry_type("null_console_entry", || Box::new(NullConsoleAddon));
    linker
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_linker_has_entry_types() {
        assert!(builtin_linker().entry_type_count() > 0);
    }

    #[test]
    fn test_null_console_addon_lifecycle() {
        let registry = DriverRegistry::new();
        let mut addon = NullConsoleAddon;

        addon.start(&registry).unwrap();
        assert!(registry.is_registered(DriverKind::Console, "Null"));

        addon.stop(&registry).unwrap();
        assert!(!registry.is_registered(DriverKind::Console, "Null"));
    }
}
