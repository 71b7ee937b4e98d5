//! RAII guard for local driver overrides.
//!
//! `begin_local`/`end_local` form a caller contract: every begin must be
//! paired with exactly one end before the kind is reused in another scope.
//! [`LocalScope`] encodes that pairing in the type system so an early
//! return or panic cannot leave the local channel diverged.

use crate::registry::DriverRegistry;
use driverforge_driver_core::{DriverKind, NamedDriver, RegistryResult};

/// An active local override for one kind.
///
/// Ends the override when dropped, collapsing the local channel back onto
/// the global selection.
///
/// # Example
///
/// ```
/// use driverforge_registry::{fallback_driver, DriverKind, DriverRegistry};
///
/// let registry = DriverRegistry::new();
/// registry
///     .register(DriverKind::Console, "Null", fallback_driver(DriverKind::Console))
///     .unwrap();
///
/// {
///     let scope = registry.local_scope(DriverKind::Console, "Null").unwrap();
///     assert_eq!(scope.driver().name(), "Null");
/// }
/// // Override ended with the scope.
/// assert_eq!(
///     registry.current_local(DriverKind::Console).name(),
///     registry.current(DriverKind::Console).name()
/// );
/// ```
#[must_use = "the override ends as soon as the scope is dropped"]
pub struct LocalScope<'a> {
    registry: &'a DriverRegistry,
    kind: DriverKind,
}

impl LocalScope<'_> {
    /// The kind this scope overrides.
    pub fn kind(&self) -> DriverKind {
        self.kind
    }

    /// The driver locally selected by this scope.
    pub fn driver(&self) -> NamedDriver {
        self.registry.current_local(self.kind)
    }
}

impl Drop for LocalScope<'_> {
    fn drop(&mut self) {
        self.registry.end_local(self.kind);
    }
}

impl DriverRegistry {
    /// Begin a local override that ends automatically when the returned
    /// guard drops.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`begin_local`](Self::begin_local); on error
    /// no scope is opened.
    pub fn local_scope<'a>(
        &'a self,
        kind: DriverKind,
        name: &str,
    ) -> RegistryResult<LocalScope<'a>> {
        self.begin_local(kind, name)?;
        Ok(LocalScope {
            registry: self,
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::fallback_driver;

    #[test]
    fn test_scope_restores_on_drop() {
        let registry = DriverRegistry::new();
        let kind = DriverKind::Console;
        registry
            .register(kind, "Null", fallback_driver(kind))
            .unwrap();

        {
            let scope = registry.local_scope(kind, "Null").unwrap();
            assert_eq!(scope.driver().name(), "Null");
            assert_eq!(registry.current(kind).name(), kind.fallback_name());
        }

        assert_eq!(registry.current_local(kind).name(), kind.fallback_name());
    }

    #[test]
    fn test_scope_restores_on_early_return() {
        fn render_captured(registry: &DriverRegistry) -> RegistryResult<()> {
            let _scope = registry.local_scope(DriverKind::Console, "Null")?;
            // Early exit still ends the override.
            Err(driverforge_driver_core::RegistryError::NotFound {
                kind: DriverKind::Console,
                name: "whatever".to_string(),
            })
        }

        let registry = DriverRegistry::new();
        registry
            .register(DriverKind::Console, "Null", fallback_driver(DriverKind::Console))
            .unwrap();

        let _ = render_captured(&registry);
        assert_eq!(
            registry.current_local(DriverKind::Console).name(),
            DriverKind::Console.fallback_name()
        );
    }

    #[test]
    fn test_scope_open_fails_for_unknown_name() {
        let registry = DriverRegistry::new();
        assert!(registry.local_scope(DriverKind::Console, "Ghost").is_err());
        // No override was opened.
        assert_eq!(
            registry.current_local(DriverKind::Console).name(),
            DriverKind::Console.fallback_name()
        );
    }
}
