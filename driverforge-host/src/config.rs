//! Configuration file loading and management
//!
//! This module handles loading and parsing the host configuration from
//! `$XDG_CONFIG_HOME/driverforge/config.toml`. If the configuration file
//! doesn't exist, a default configuration is created with documented
//! comments.

use anyhow::{Context, Result};
use driverforge_driver_core::DriverKind;
use driverforge_registry::DriverRegistry;
use driverforge_runtime::SigningIdentity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Main host configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    /// Host-wide settings
    #[serde(default)]
    pub host: HostConfig,

    /// Persisted driver selections, keyed by kind name
    #[serde(default)]
    pub drivers: BTreeMap<String, String>,

    /// Addon loading configuration
    #[serde(default)]
    pub addons: AddonConfig,
}

/// Host-wide settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostConfig {
    /// Log level (trace, debug, info, warn, error)
    /// Default: "info"
    pub log_level: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Addon loading configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AddonConfig {
    /// Extensions root directory
    /// If None, uses XDG_DATA_HOME/driverforge/addons
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Hex-encoded signing identity addons must match.
    /// If None, addon loading is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_anchor: Option<String>,
}

/// Default configuration file written on first run.
const DEFAULT_CONFIG: &str = r#"# driverforge host configuration

[host]
# Log level: trace, debug, info, warn, error
log_level = "info"

# Persisted driver selections, applied at boot. Unknown kinds and unknown
# driver names are ignored and the built-in fallback stays selected.
[drivers]
# console = "Default"
# encryption = "SHA256"

[addons]
# Extensions root directory. Defaults to the user data directory.
# root = "/path/to/addons"

# Hex-encoded signing identity addon bundles must be signed with.
# Without it, addon loading is disabled.
# trust_anchor = ""
"#;

impl Config {
    /// Default path of the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "raibid-labs", "driverforge")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default path, creating a documented
    /// default file if none exists.
    pub fn load_default() -> Result<Self> {
        let Some(path) = Self::default_path() else {
            return Ok(Self::default());
        };
        Self::load_or_create(&path)
    }

    /// Load configuration from `path`, creating the default file if absent.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating config directory {parent:?}"))?;
            }
            fs::write(path, DEFAULT_CONFIG)
                .with_context(|| format!("writing default config to {path:?}"))?;
        }
        Self::load(path)
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading config from {path:?}"))?;
        toml::from_str(&content).with_context(|| format!("parsing config from {path:?}"))
    }

    /// Apply the persisted `[drivers]` selections to a registry.
    ///
    /// Uses the never-failing setter throughout: a stale kind or driver
    /// name must not abort boot, it just leaves the fallback selected.
    pub fn apply_driver_selections(&self, registry: &DriverRegistry) {
        for (kind_name, driver_name) in &self.drivers {
            let Some(kind) = DriverKind::parse(kind_name) else {
                warn!(%kind_name, "ignoring persisted selection for unknown kind");
                continue;
            };
            registry.set_current_safe(kind, driver_name);
        }
    }

    /// Parse the configured trust anchor, if any.
    pub fn trust_anchor(&self) -> Result<Option<SigningIdentity>> {
        self.addons
            .trust_anchor
            .as_deref()
            .map(|hex| SigningIdentity::from_hex(hex).context("parsing addons.trust_anchor"))
            .transpose()
    }

    /// The extensions root directory to scan.
    pub fn addons_root(&self) -> Option<PathBuf> {
        self.addons.root.clone().or_else(|| {
            directories::ProjectDirs::from("com", "raibid-labs", "driverforge")
                .map(|dirs| dirs.data_dir().join("addons"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_or_create_writes_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("driverforge/config.toml");

        let config = Config::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.host.log_level, "info");
        assert!(config.drivers.is_empty());
        assert!(config.addons.trust_anchor.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[host]
log_level = "debug"

[drivers]
console = "Null"
encryption = "SHA384"

[addons]
root = "/opt/driverforge/addons"
trust_anchor = "2a2a"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.host.log_level, "debug");
        assert_eq!(config.drivers["console"], "Null");
        assert_eq!(
            config.addons.root.as_deref(),
            Some(Path::new("/opt/driverforge/addons"))
        );
        // Truncated anchor parses as hex but fails identity validation.
        assert!(config.trust_anchor().is_err());
    }

    #[test]
    fn test_apply_driver_selections_is_fault_tolerant() {
        let config: Config = toml::from_str(
            r#"
[drivers]
console = "NoSuchDriver"
not_a_kind = "Whatever"
"#,
        )
        .unwrap();

        let registry = DriverRegistry::new();
        config.apply_driver_selections(&registry);

        // Boot completed with fallbacks still selected everywhere.
        for kind in DriverKind::ALL {
            assert_eq!(registry.current(kind).name(), kind.fallback_name());
        }
    }

    #[test]
    fn test_valid_trust_anchor_roundtrip() {
        let identity = SigningIdentity::from_bytes([7; 32]);
        let config: Config = toml::from_str(&format!(
            "[addons]\ntrust_anchor = \"{}\"\n",
            identity.to_hex()
        ))
        .unwrap();

        assert_eq!(config.trust_anchor().unwrap(), Some(identity));
    }
}
