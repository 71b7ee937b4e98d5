//! The addon loader.
//!
//! Owns the list of started addons and drives every lifecycle hook. Load
//! failures are per-addon: a bundle that fails to link or whose `start`
//! hook errors is logged and dropped, and the load of everything else
//! continues. The host boots even if every addon fails.

use crate::addon::{Addon, LoadPriority};
use crate::error::{LoaderError, ShutdownError};
use crate::linker::AddonLinker;
use driverforge_registry::DriverRegistry;
use driverforge_runtime::{
    scan_bundles, AddonBundle, Ed25519Verifier, RuntimeResult, ScanReport, SignatureVerifier,
    SigningIdentity,
};
use std::path::Path;
use tracing::{error, info, warn};

/// A started addon tracked by the loader.
struct ActiveAddon {
    name: String,
    priority: LoadPriority,
    addon: Box<dyn Addon>,
}

/// Summary of a started addon.
#[derive(Debug, Clone)]
pub struct AddonInfo {
    pub name: String,
    pub priority: LoadPriority,
}

/// Loader for addon bundles.
///
/// The loader is the sole owner of started addons and the only component
/// that invokes their lifecycle hooks. Startup order is recorded so
/// shutdown can stop addons in reverse (LIFO) order.
pub struct AddonLoader {
    host_identity: SigningIdentity,
    verifier: Box<dyn SignatureVerifier>,
    linker: Box<dyn AddonLinker>,

    /// Started addons, in start order.
    active: Vec<ActiveAddon>,
}

impl AddonLoader {
    /// Create a loader trusting `host_identity`, with the default Ed25519
    /// verification strategy.
    pub fn new(host_identity: SigningIdentity, linker: Box<dyn AddonLinker>) -> Self {
        Self {
            host_identity,
            verifier: Box::new(Ed25519Verifier),
            linker,
            active: Vec::new(),
        }
    }

    /// Replace the signature verification strategy.
    pub fn with_verifier(mut self, verifier: Box<dyn SignatureVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    /// The identity addon signatures must match.
    pub fn host_identity(&self) -> &SigningIdentity {
        &self.host_identity
    }

    /// Scan an extensions root for valid bundles.
    ///
    /// Synchronous and not cancellable mid-bundle; see the crate docs for
    /// the validation chain.
    pub fn scan(&self, root: &Path) -> RuntimeResult<ScanReport> {
        scan_bundles(root, self.verifier.as_ref(), &self.host_identity)
    }

    /// Instantiate a validated bundle's entry point.
    pub fn instantiate(&self, bundle: &AddonBundle) -> Result<Box<dyn Addon>, LoaderError> {
        self.linker.link(bundle)
    }

    /// Instantiate every accepted bundle, logging and skipping failures.
    pub fn instantiate_all(&self, bundles: &[AddonBundle]) -> Vec<Box<dyn Addon>> {
        let mut instances = Vec::new();
        for bundle in bundles {
            match self.instantiate(bundle) {
                Ok(addon) => instances.push(addon),
                Err(e) => warn!("failed to instantiate addon '{}': {}", bundle.id(), e),
            }
        }
        instances
    }

    /// Offer an addon to the pass currently being loaded.
    ///
    /// An addon whose declared class differs from `pass` is handed back
    /// untouched for a later pass. A matching addon has its `start` hook
    /// invoked: on success it joins the active list; on failure it is
    /// logged and dropped, and its `finalize`/`stop` will never run.
    pub fn start(
        &mut self,
        mut addon: Box<dyn Addon>,
        pass: LoadPriority,
        registry: &DriverRegistry,
    ) -> Option<Box<dyn Addon>> {
        if addon.priority() != pass {
            return Some(addon);
        }

        let name = addon.name().to_string();
        match addon.start(registry) {
            Ok(()) => {
                info!(%name, %pass, "addon started");
                self.active.push(ActiveAddon {
                    name,
                    priority: pass,
                    addon,
                });
                None
            }
            Err(e) => {
                error!(%name, "addon start failed, dropping: {}", e);
                None
            }
        }
    }

    /// Run one priority pass over `addons`, returning those left for later
    /// passes.
    pub fn start_pass(
        &mut self,
        addons: Vec<Box<dyn Addon>>,
        pass: LoadPriority,
        registry: &DriverRegistry,
    ) -> Vec<Box<dyn Addon>> {
        let mut remaining = Vec::new();
        for addon in addons {
            if let Some(addon) = self.start(addon, pass, registry) {
                remaining.push(addon);
            }
        }
        remaining
    }

    /// Instantiate and start every accepted bundle, one pass per priority
    /// class. Returns the number of addons started.
    pub fn load_all(&mut self, bundles: &[AddonBundle], registry: &DriverRegistry) -> usize {
        let before = self.active.len();

        let mut pending = self.instantiate_all(bundles);
        for pass in LoadPriority::PASSES {
            pending = self.start_pass(pending, pass, registry);
        }

        self.active.len() - before
    }

    /// Summaries of every started addon, in start order.
    pub fn active_addons(&self) -> Vec<AddonInfo> {
        self.active
            .iter()
            .map(|a| AddonInfo {
                name: a.name.clone(),
                priority: a.priority,
            })
            .collect()
    }

    /// Number of started addons.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Invoke every started addon's `finalize` hook.
    ///
    /// Runs once, late in the host's shutdown-adjacent sequence, before
    /// [`stop_all`](Self::stop_all). Every addon is visited; failures are
    /// collected and raised together at the end.
    pub fn finalize_all(&mut self) -> Result<(), ShutdownError> {
        let mut failures = Vec::new();

        for active in &mut self.active {
            if let Err(e) = active.addon.finalize() {
                warn!(name = %active.name, "addon finalize failed: {}", e);
                failures.push((active.name.clone(), e));
            }
        }

        match ShutdownError::from_failures(failures) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Stop every started addon in reverse start order.
    ///
    /// Each addon is removed from the active list as it is stopped, failed
    /// hooks included; failures are collected and raised together once the
    /// list is drained.
    pub fn stop_all(&mut self, registry: &DriverRegistry) -> Result<(), ShutdownError> {
        let mut failures = Vec::new();

        while let Some(mut active) = self.active.pop() {
            info!(name = %active.name, "stopping addon");
            if let Err(e) = active.addon.stop(registry) {
                warn!(name = %active.name, "addon stop failed: {}", e);
                failures.push((active.name, e));
            }
        }

        match ShutdownError::from_failures(failures) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
