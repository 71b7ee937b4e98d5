//! # Driver Registry
//!
//! Manages the registered drivers for every capability kind and tracks the
//! active selection per kind on two channels: the shared *global* channel
//! and the scratch *local* channel.
//!
//! Drivers are stored as trait objects to enable runtime polymorphism.
//! Registration order is preserved, so listing queries are stable within a
//! process run.
//!
//! # Example
//!
//! ```
//! use driverforge_registry::{fallback_driver, DriverKind, DriverRegistry};
//!
//! let registry = DriverRegistry::new();
//!
//! registry
//!     .register(
//!         DriverKind::Encryption,
//!         "SHA384",
//!         fallback_driver(DriverKind::Encryption),
//!     )
//!     .unwrap();
//! registry.set_current(DriverKind::Encryption, "SHA384").unwrap();
//!
//! assert_eq!(registry.current(DriverKind::Encryption).name(), "SHA384");
//! ```

use crate::builtin::fallback_driver;
use driverforge_driver_core::{
    infer_kind, ContractId, Driver, DriverKind, NamedDriver, RegistryError, RegistryResult,
};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

const KIND_COUNT: usize = DriverKind::ALL.len();

/// Per-kind registry state. Guarded by one lock per kind.
struct KindSlot {
    /// Registered drivers in registration order. Names are unique.
    registered: Vec<NamedDriver>,

    /// The protected fallback entry. Also present in `registered`.
    fallback: NamedDriver,

    /// The shared ambient selection.
    current_global: NamedDriver,

    /// The scratch selection for local overrides.
    current_local: NamedDriver,
}

impl KindSlot {
    fn new(kind: DriverKind) -> Self {
        let fallback = NamedDriver::new(kind.fallback_name(), kind, fallback_driver(kind));
        Self {
            registered: vec![fallback.clone()],
            current_global: fallback.clone(),
            current_local: fallback.clone(),
            fallback,
        }
    }

    fn get(&self, name: &str) -> Option<&NamedDriver> {
        self.registered.iter().find(|d| d.name() == name)
    }
}

/// Snapshot of a kind's two selection channels, taken under one lock.
#[derive(Debug, Clone)]
pub struct Selection {
    /// The shared ambient selection.
    pub global: NamedDriver,

    /// The local-override selection. Equals `global` outside a scope.
    pub local: NamedDriver,
}

/// Registry of capability drivers with per-kind selection state.
///
/// One instance per process (or per test). All methods take `&self`; each
/// kind's state sits behind its own `RwLock`, so mutating one kind never
/// blocks queries or mutations on another.
pub struct DriverRegistry {
    slots: [RwLock<KindSlot>; KIND_COUNT],
}

impl DriverRegistry {
    /// Create a registry with every kind's fallback driver registered and
    /// selected on both channels.
    pub fn new() -> Self {
        Self {
            slots: DriverKind::ALL.map(|kind| RwLock::new(KindSlot::new(kind))),
        }
    }

    fn slot(&self, kind: DriverKind) -> &RwLock<KindSlot> {
        &self.slots[kind as usize]
    }

    // Every update assigns whole values, so a slot can never be observed
    // torn; recover the guard from a poisoned lock instead of propagating.
    fn read(&self, kind: DriverKind) -> RwLockReadGuard<'_, KindSlot> {
        self.slot(kind).read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, kind: DriverKind) -> RwLockWriteGuard<'_, KindSlot> {
        self.slot(kind)
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a driver under `name` for `kind`.
    ///
    /// # Errors
    ///
    /// Fails with [`RegistryError::DuplicateName`] if the name is taken;
    /// there is no silent overwrite.
    pub fn register(
        &self,
        kind: DriverKind,
        name: impl Into<String>,
        driver: Arc<dyn Driver>,
    ) -> RegistryResult<()> {
        let name = name.into();
        let mut slot = self.write(kind);

        if slot.get(&name).is_some() {
            return Err(RegistryError::DuplicateName { kind, name });
        }

        debug!(%kind, %name, "driver registered");
        slot.registered.push(NamedDriver::new(name, kind, driver));
        Ok(())
    }

    /// Remove the driver registered under `name` for `kind`.
    ///
    /// If the removed driver is currently selected, the affected channel(s)
    /// revert to the kind's fallback so the selection never dangles.
    ///
    /// # Errors
    ///
    /// Fails with [`RegistryError::NotFound`] for an unknown name and
    /// [`RegistryError::ProtectedEntry`] for the fallback name.
    pub fn unregister(&self, kind: DriverKind, name: &str) -> RegistryResult<()> {
        let mut slot = self.write(kind);

        if name == kind.fallback_name() {
            return Err(RegistryError::ProtectedEntry {
                kind,
                name: name.to_string(),
            });
        }

        let index = slot
            .registered
            .iter()
            .position(|d| d.name() == name)
            .ok_or_else(|| RegistryError::NotFound {
                kind,
                name: name.to_string(),
            })?;
        slot.registered.remove(index);

        if slot.current_global.name() == name {
            debug!(%kind, %name, "active driver unregistered, reverting global selection to fallback");
            slot.current_global = slot.fallback.clone();
        }
        if slot.current_local.name() == name {
            slot.current_local = slot.fallback.clone();
        }

        debug!(%kind, %name, "driver unregistered");
        Ok(())
    }

    /// Whether a driver named `name` is registered for `kind`.
    pub fn is_registered(&self, kind: DriverKind, name: &str) -> bool {
        self.read(kind).get(name).is_some()
    }

    /// Whether the given instance is registered for `kind` under any name.
    pub fn is_registered_instance(&self, kind: DriverKind, driver: &Arc<dyn Driver>) -> bool {
        self.read(kind)
            .registered
            .iter()
            .any(|d| d.is_instance(driver))
    }

    /// Names of all drivers registered for `kind`, in registration order.
    ///
    /// Never empty: the fallback is always present.
    pub fn names(&self, kind: DriverKind) -> Vec<String> {
        self.read(kind)
            .registered
            .iter()
            .map(|d| d.name().to_string())
            .collect()
    }

    /// All drivers registered for `kind`, in registration order.
    pub fn drivers(&self, kind: DriverKind) -> Vec<NamedDriver> {
        self.read(kind).registered.clone()
    }

    /// Number of drivers registered for `kind`.
    pub fn len(&self, kind: DriverKind) -> usize {
        self.read(kind).registered.len()
    }

    /// Look up the driver registered under `name` for `kind`.
    ///
    /// # Errors
    ///
    /// Fails with [`RegistryError::NotFound`] for an unknown name.
    pub fn get(&self, kind: DriverKind, name: &str) -> RegistryResult<NamedDriver> {
        self.read(kind)
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                kind,
                name: name.to_string(),
            })
    }

    /// The protected fallback driver for `kind`. Always present.
    pub fn fallback(&self, kind: DriverKind) -> NamedDriver {
        self.read(kind).fallback.clone()
    }

    /// The current global selection for `kind`.
    pub fn current(&self, kind: DriverKind) -> NamedDriver {
        self.read(kind).current_global.clone()
    }

    /// The current local selection for `kind`.
    pub fn current_local(&self, kind: DriverKind) -> NamedDriver {
        self.read(kind).current_local.clone()
    }

    /// Both selection channels for `kind`, read under one lock.
    pub fn selection(&self, kind: DriverKind) -> Selection {
        let slot = self.read(kind);
        Selection {
            global: slot.current_global.clone(),
            local: slot.current_local.clone(),
        }
    }

    /// Select the driver named `name` on both channels.
    ///
    /// The driver's activation hook runs first; if it fails, the error
    /// propagates and the previous selection stays in place. Setting the
    /// global selection collapses any active local override.
    ///
    /// # Errors
    ///
    /// Fails with [`RegistryError::NotFound`] for an unknown name and
    /// [`RegistryError::Activation`] when the activation hook fails.
    pub fn set_current(&self, kind: DriverKind, name: &str) -> RegistryResult<()> {
        let mut slot = self.write(kind);

        let entry = slot
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                kind,
                name: name.to_string(),
            })?;

        entry
            .driver()
            .activate()
            .map_err(|source| RegistryError::Activation {
                kind,
                name: entry.name().to_string(),
                source,
            })?;

        debug!(%kind, name = entry.name(), "driver selected");
        slot.current_global = entry.clone();
        slot.current_local = entry;
        Ok(())
    }

    /// Select the driver named `name` on both channels, never failing.
    ///
    /// For interactive callers that must not propagate a bad selection: an
    /// unknown name is logged and the selection stays unchanged; a failed
    /// activation is logged and both channels revert to the fallback.
    /// Returns the driver that is globally selected after the call.
    pub fn set_current_safe(&self, kind: DriverKind, name: &str) -> NamedDriver {
        let mut slot = self.write(kind);

        let Some(entry) = slot.get(name).cloned() else {
            warn!(%kind, %name, "unknown driver name, keeping current selection");
            return slot.current_global.clone();
        };

        match entry.driver().activate() {
            Ok(()) => {
                debug!(%kind, name = entry.name(), "driver selected");
                slot.current_global = entry.clone();
                slot.current_local = entry.clone();
                entry
            }
            Err(err) => {
                warn!(%kind, %name, %err, "driver activation failed, reverting to fallback");
                let fallback = slot.fallback.clone();
                slot.current_global = fallback.clone();
                slot.current_local = fallback.clone();
                fallback
            }
        }
    }

    /// Select the driver named `name` on the local channel only.
    ///
    /// The global selection is untouched. Callers must pair each
    /// `begin_local` with exactly one [`end_local`](Self::end_local) for
    /// the same kind before opening another local scope on it; prefer
    /// [`local_scope`](Self::local_scope), which enforces the pairing.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`set_current`](Self::set_current).
    pub fn begin_local(&self, kind: DriverKind, name: &str) -> RegistryResult<()> {
        let mut slot = self.write(kind);

        let entry = slot
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                kind,
                name: name.to_string(),
            })?;

        entry
            .driver()
            .activate()
            .map_err(|source| RegistryError::Activation {
                kind,
                name: entry.name().to_string(),
                source,
            })?;

        debug!(%kind, name = entry.name(), "local override begun");
        slot.current_local = entry;
        Ok(())
    }

    /// Never-failing variant of [`begin_local`](Self::begin_local).
    ///
    /// An unknown name keeps the local selection unchanged; a failed
    /// activation reverts the local channel to the fallback. Returns the
    /// driver locally selected after the call.
    pub fn begin_local_safe(&self, kind: DriverKind, name: &str) -> NamedDriver {
        let mut slot = self.write(kind);

        let Some(entry) = slot.get(name).cloned() else {
            warn!(%kind, %name, "unknown driver name, keeping local selection");
            return slot.current_local.clone();
        };

        match entry.driver().activate() {
            Ok(()) => {
                debug!(%kind, name = entry.name(), "local override begun");
                slot.current_local = entry.clone();
                entry
            }
            Err(err) => {
                warn!(%kind, %name, %err, "local activation failed, reverting local channel to fallback");
                let fallback = slot.fallback.clone();
                slot.current_local = fallback.clone();
                fallback
            }
        }
    }

    /// End a local override: the local channel collapses back onto the
    /// global selection as it stands *now*, whatever was local before.
    pub fn end_local(&self, kind: DriverKind) {
        let mut slot = self.write(kind);
        debug!(%kind, name = slot.current_global.name(), "local override ended");
        slot.current_local = slot.current_global.clone();
    }

    /// Map a capability contract to its kind.
    ///
    /// # Errors
    ///
    /// Fails with [`RegistryError::UnknownContract`] for a contract outside
    /// the known set.
    pub fn kind_for_contract(&self, contract: ContractId) -> RegistryResult<DriverKind> {
        infer_kind(contract)
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driverforge_driver_core::ActivationError;
    use std::any::Any;

    struct TestDriver {
        kind: DriverKind,
        fail_activation: bool,
    }

    impl TestDriver {
        fn new(kind: DriverKind) -> Arc<dyn Driver> {
            Arc::new(Self {
                kind,
                fail_activation: false,
            })
        }

        fn failing(kind: DriverKind) -> Arc<dyn Driver> {
            Arc::new(Self {
                kind,
                fail_activation: true,
            })
        }
    }

    impl Driver for TestDriver {
        fn kind(&self) -> DriverKind {
            self.kind
        }

        fn activate(&self) -> Result<(), ActivationError> {
            if self.fail_activation {
                Err(ActivationError::new("required feature unavailable"))
            } else {
                Ok(())
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_new_registry_has_fallbacks_selected() {
        let registry = DriverRegistry::new();

        for kind in DriverKind::ALL {
            let names = registry.names(kind);
            assert_eq!(names, vec![kind.fallback_name().to_string()]);
            assert_eq!(registry.current(kind).name(), kind.fallback_name());
            assert_eq!(registry.current_local(kind).name(), kind.fallback_name());
        }
    }

    #[test]
    fn test_register_duplicate_name() {
        let registry = DriverRegistry::new();
        let kind = DriverKind::Sorting;

        registry
            .register(kind, "QuickSort", TestDriver::new(kind))
            .unwrap();
        let result = registry.register(kind, "QuickSort", TestDriver::new(kind));

        assert!(matches!(result, Err(RegistryError::DuplicateName { .. })));
    }

    #[test]
    fn test_unregister_fallback_is_protected() {
        let registry = DriverRegistry::new();

        for kind in DriverKind::ALL {
            let result = registry.unregister(kind, kind.fallback_name());
            assert!(matches!(result, Err(RegistryError::ProtectedEntry { .. })));
        }
    }

    #[test]
    fn test_unregister_active_reverts_to_fallback() {
        let registry = DriverRegistry::new();
        let kind = DriverKind::Encryption;

        registry
            .register(kind, "SHA384", TestDriver::new(kind))
            .unwrap();
        registry.set_current(kind, "SHA384").unwrap();
        assert_eq!(registry.current(kind).name(), "SHA384");

        registry.unregister(kind, "SHA384").unwrap();

        assert_eq!(registry.current(kind).name(), "SHA256");
        assert_eq!(registry.current_local(kind).name(), "SHA256");
        assert!(!registry.is_registered(kind, "SHA384"));
    }

    #[test]
    fn test_set_current_unknown_name() {
        let registry = DriverRegistry::new();
        let result = registry.set_current(DriverKind::Console, "Ghost");
        assert!(matches!(result, Err(RegistryError::NotFound { .. })));
    }

    #[test]
    fn test_set_current_activation_failure_is_atomic() {
        let registry = DriverRegistry::new();
        let kind = DriverKind::Console;

        registry
            .register(kind, "Fancy", TestDriver::failing(kind))
            .unwrap();
        let result = registry.set_current(kind, "Fancy");

        assert!(matches!(result, Err(RegistryError::Activation { .. })));
        assert_eq!(registry.current(kind).name(), kind.fallback_name());
        assert_eq!(registry.current_local(kind).name(), kind.fallback_name());
    }

    #[test]
    fn test_set_current_safe_unknown_name_keeps_selection() {
        let registry = DriverRegistry::new();
        let kind = DriverKind::Network;

        registry
            .register(kind, "Offline", TestDriver::new(kind))
            .unwrap();
        registry.set_current(kind, "Offline").unwrap();

        let active = registry.set_current_safe(kind, "nonexistent-name");

        assert_eq!(active.name(), "Offline");
        assert_eq!(registry.current(kind).name(), "Offline");
    }

    #[test]
    fn test_set_current_safe_activation_failure_reverts() {
        let registry = DriverRegistry::new();
        let kind = DriverKind::Console;

        registry
            .register(kind, "Fancy", TestDriver::failing(kind))
            .unwrap();
        let active = registry.set_current_safe(kind, "Fancy");

        assert_eq!(active.name(), kind.fallback_name());
        assert_eq!(registry.current(kind).name(), kind.fallback_name());
    }

    #[test]
    fn test_local_override_and_collapse() {
        let registry = DriverRegistry::new();
        let kind = DriverKind::Console;

        registry.register(kind, "Null", TestDriver::new(kind)).unwrap();
        registry.register(kind, "Rich", TestDriver::new(kind)).unwrap();

        registry.set_current(kind, "Rich").unwrap();
        registry.begin_local(kind, "Null").unwrap();

        assert_eq!(registry.current(kind).name(), "Rich");
        assert_eq!(registry.current_local(kind).name(), "Null");

        registry.end_local(kind);
        assert_eq!(registry.current_local(kind).name(), "Rich");
    }

    #[test]
    fn test_set_current_collapses_local() {
        let registry = DriverRegistry::new();
        let kind = DriverKind::Console;

        registry.register(kind, "Null", TestDriver::new(kind)).unwrap();
        registry.register(kind, "Rich", TestDriver::new(kind)).unwrap();

        registry.begin_local(kind, "Null").unwrap();
        registry.set_current(kind, "Rich").unwrap();

        assert_eq!(registry.current(kind).name(), "Rich");
        assert_eq!(registry.current_local(kind).name(), "Rich");
    }

    #[test]
    fn test_begin_local_safe_unknown_name_keeps_local() {
        let registry = DriverRegistry::new();
        let kind = DriverKind::DebugLogger;

        let active = registry.begin_local_safe(kind, "Ghost");
        assert_eq!(active.name(), kind.fallback_name());
        assert_eq!(registry.current_local(kind).name(), kind.fallback_name());
    }

    #[test]
    fn test_begin_local_safe_activation_failure_reverts_local_only() {
        let registry = DriverRegistry::new();
        let kind = DriverKind::Console;

        registry.register(kind, "Rich", TestDriver::new(kind)).unwrap();
        registry.register(kind, "Fancy", TestDriver::failing(kind)).unwrap();
        registry.set_current(kind, "Rich").unwrap();

        let active = registry.begin_local_safe(kind, "Fancy");

        assert_eq!(active.name(), kind.fallback_name());
        assert_eq!(registry.current_local(kind).name(), kind.fallback_name());
        // The global channel never moved.
        assert_eq!(registry.current(kind).name(), "Rich");
    }

    #[test]
    fn test_is_registered_instance() {
        let registry = DriverRegistry::new();
        let kind = DriverKind::Encoding;

        let driver = TestDriver::new(kind);
        registry.register(kind, "Utf16", Arc::clone(&driver)).unwrap();

        assert!(registry.is_registered_instance(kind, &driver));
        assert!(!registry.is_registered_instance(kind, &TestDriver::new(kind)));
    }

    #[test]
    fn test_selection_snapshot() {
        let registry = DriverRegistry::new();
        let kind = DriverKind::Input;

        registry.register(kind, "Vi", TestDriver::new(kind)).unwrap();
        registry.begin_local(kind, "Vi").unwrap();

        let selection = registry.selection(kind);
        assert_eq!(selection.global.name(), kind.fallback_name());
        assert_eq!(selection.local.name(), "Vi");
    }

    #[test]
    fn test_kinds_do_not_interfere() {
        let registry = DriverRegistry::new();

        registry
            .register(DriverKind::Sorting, "MergeSort", TestDriver::new(DriverKind::Sorting))
            .unwrap();
        registry.set_current(DriverKind::Sorting, "MergeSort").unwrap();

        assert_eq!(
            registry.current(DriverKind::Encryption).name(),
            DriverKind::Encryption.fallback_name()
        );
        assert_eq!(registry.len(DriverKind::Encryption), 1);
    }
}
