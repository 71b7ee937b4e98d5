//! Entry-point linking.
//!
//! A validated artifact declares the entry types it exports; something has
//! to turn one of those into a live [`Addon`]. That mechanism differs per
//! target (dynamic library loading on desktop platforms, static
//! registration in a single-binary build), so it sits behind the
//! [`AddonLinker`] trait. [`InProcessLinker`] is the static-registration
//! implementation.

use crate::addon::Addon;
use crate::error::LoaderError;
use driverforge_runtime::AddonBundle;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Constructor for a linkable entry type.
pub type EntryTypeConstructor = Box<dyn Fn() -> Box<dyn Addon> + Send + Sync>;

/// Turns a validated bundle into a live addon.
pub trait AddonLinker: Send + Sync {
    /// Resolve the bundle artifact's exported entry types and instantiate
    /// the addon.
    ///
    /// # Errors
    ///
    /// Fails with [`LoaderError::NoAddonType`] when none of the exports
    /// resolves to a known entry type.
    fn link(&self, bundle: &AddonBundle) -> Result<Box<dyn Addon>, LoaderError>;
}

/// Linker backed by an in-process table of entry-type constructors.
#[derive(Default)]
pub struct InProcessLinker {
    entry_types: HashMap<String, EntryTypeConstructor>,
}

impl InProcessLinker {
    /// Create an empty linker.
    pub fn new() -> Self {
        Self {
            entry_types: HashMap::new(),
        }
    }

    /// Register a constructor for an entry type name.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register_entry_type(
        &mut self,
        name: impl Into<String>,
        constructor: impl Fn() -> Box<dyn Addon> + Send + Sync + 'static,
    ) {
        let name = name.into();
        debug!(%name, "entry type registered");
        self.entry_types.insert(name, Box::new(constructor));
    }

    /// Number of registered entry types.
    pub fn entry_type_count(&self) -> usize {
        self.entry_types.len()
    }
}

impl AddonLinker for InProcessLinker {
    fn link(&self, bundle: &AddonBundle) -> Result<Box<dyn Addon>, LoaderError> {
        let mut linkable = bundle
            .artifact
            .exports
            .iter()
            .filter(|export| self.entry_types.contains_key(*export));

        let chosen = linkable.next().ok_or_else(|| LoaderError::NoAddonType {
            artifact: bundle.artifact_path.to_string_lossy().into_owned(),
        })?;

        // More than one linkable export is ambiguous; first in export
        // order wins.
        if let Some(ignored) = linkable.next() {
            warn!(
                bundle = bundle.id(),
                %chosen,
                %ignored,
                "multiple linkable entry types, taking the first"
            );
        }

        debug!(bundle = bundle.id(), entry_type = chosen, "addon linked");
        Ok(self.entry_types[chosen]())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addon::LoadPriority;
    use crate::error::AddonError;
    use driverforge_registry::DriverRegistry;
    use driverforge_runtime::{AddonManifest, Artifact, ArtifactMetadata};
    use std::path::PathBuf;

    struct NoopAddon {
        name: &'static str,
    }

    impl Addon for NoopAddon {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> LoadPriority {
            LoadPriority::Optional
        }

        fn start(&mut self, _registry: &DriverRegistry) -> Result<(), AddonError> {
            Ok(())
        }
    }

    fn bundle_with_exports(exports: Vec<&str>) -> AddonBundle {
        let manifest = AddonManifest::from_str(
            r#"
[addon]
id = "test-addon"
name = "Test Addon"
version = "0.1.0"
"#,
        )
        .unwrap();

        AddonBundle {
            path: PathBuf::from("/addons/test-addon"),
            manifest,
            artifact_path: PathBuf::from("/addons/test-addon/test-addon.dfa"),
            artifact: Artifact {
                version: 1,
                metadata: ArtifactMetadata {
                    addon_id: "test-addon".to_string(),
                    addon_version: "0.1.0".to_string(),
                    built_at: None,
                    toolchain: None,
                },
                exports: exports.into_iter().map(String::from).collect(),
            },
        }
    }

    #[test]
    fn test_link_known_entry_type() {
        let mut linker = InProcessLinker::new();
        linker.register_entry_type("alpha_entry", || Box::new(NoopAddon { name: "alpha" }));

        let bundle = bundle_with_exports(vec!["alpha_entry"]);
        let addon = linker.link(&bundle).unwrap();
        assert_eq!(addon.name(), "alpha");
    }

    #[test]
    fn test_link_no_entry_type() {
        let linker = InProcessLinker::new();
        let bundle = bundle_with_exports(vec!["alpha_entry"]);

        let result = linker.link(&bundle);
        assert!(matches!(result, Err(LoaderError::NoAddonType { .. })));
    }

    #[test]
    fn test_ambiguous_exports_take_first() {
        let mut linker = InProcessLinker::new();
        linker.register_entry_type("alpha_entry", || Box::new(NoopAddon { name: "alpha" }));
        linker.register_entry_type("beta_entry", || Box::new(NoopAddon { name: "beta" }));

        let bundle = bundle_with_exports(vec!["beta_entry", "alpha_entry"]);
        let addon = linker.link(&bundle).unwrap();
        assert_eq!(addon.name(), "beta");
    }
}
