//! Addon bundle manifest parsing.
//!
//! Each bundle has a `manifest.toml` file that describes its metadata and
//! names the entry-point artifact.

use crate::error::{RuntimeError, RuntimeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File extension of the host's artifact format.
pub const ARTIFACT_EXT: &str = ".dfa";

/// Addon manifest structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonManifest {
    /// Addon metadata.
    pub addon: AddonMetadata,
}

/// Addon metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonMetadata {
    /// Unique identifier for the addon.
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Version string (semver).
    pub version: String,

    /// Addon description.
    #[serde(default)]
    pub description: Option<String>,

    /// Addon author(s).
    #[serde(default)]
    pub authors: Vec<String>,

    /// Entry-point artifact file. Defaults to `<bundle-name>.dfa`.
    #[serde(default)]
    pub entry_point: Option<String>,
}

impl AddonManifest {
    /// Load a manifest from a TOML file.
    pub fn from_file(path: &Path) -> RuntimeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a manifest from a TOML string.
    pub fn from_str(content: &str) -> RuntimeResult<Self> {
        let manifest: AddonManifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate the manifest.
    fn validate(&self) -> RuntimeResult<()> {
        if self.addon.id.is_empty() {
            return Err(RuntimeError::InvalidManifest(
                "addon ID cannot be empty".to_string(),
            ));
        }

        if self.addon.name.is_empty() {
            return Err(RuntimeError::InvalidManifest(
                "addon name cannot be empty".to_string(),
            ));
        }

        if self.addon.version.is_empty() {
            return Err(RuntimeError::InvalidManifest(
                "addon version cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Name of the entry-point artifact for a bundle directory called
    /// `bundle_name`.
    pub fn entry_point_for(&self, bundle_name: &str) -> String {
        self.addon
            .entry_point
            .clone()
            .unwrap_or_else(|| format!("{bundle_name}{ARTIFACT_EXT}"))
    }
}
