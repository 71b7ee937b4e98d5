//! Artifact format and loader.
//!
//! An artifact (`.dfa`) is the linked form of an addon in the host's own
//! runtime format: a magic prefix followed by a JSON payload describing the
//! artifact and the entry types it exports. A file without the magic prefix
//! is not an artifact, whatever else it may be.
//!
//! ## Format
//!
//! ```text
//! +----------------+
//! | Magic (4 bytes)|  "DFA\x01" (version 1)
//! +----------------+
//! | JSON payload   |  metadata + exported entry types
//! +----------------+
//! ```

use crate::error::{RuntimeError, RuntimeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Magic bytes for driverforge artifact files.
pub const MAGIC: &[u8; 4] = b"DFA\x01";

/// A parsed addon artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    /// Version of the artifact format.
    pub version: u8,

    /// Addon metadata embedded in the artifact.
    pub metadata: ArtifactMetadata,

    /// Entry types exported by this artifact, in export order.
    ///
    /// Exactly one of these is expected to resolve to an addon entry point
    /// at link time.
    pub exports: Vec<String>,
}

/// Metadata embedded in an artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Addon ID.
    pub addon_id: String,

    /// Addon version.
    pub addon_version: String,

    /// Build timestamp.
    #[serde(default)]
    pub built_at: Option<String>,

    /// Toolchain that produced the artifact.
    #[serde(default)]
    pub toolchain: Option<String>,
}

/// Artifact loader.
pub struct ArtifactLoader;

impl ArtifactLoader {
    /// Load an artifact from a file.
    pub fn load(path: &Path) -> RuntimeResult<Artifact> {
        let content = std::fs::read(path)?;
        Self::parse(&content)
    }

    /// Parse an artifact from bytes.
    pub fn parse(bytes: &[u8]) -> RuntimeResult<Artifact> {
        if bytes.len() < MAGIC.len() {
            return Err(RuntimeError::Artifact(
                "file too small to be a valid artifact".to_string(),
            ));
        }

        if &bytes[..MAGIC.len()] != MAGIC {
            return Err(RuntimeError::Artifact(
                "missing artifact magic; not a host runtime artifact".to_string(),
            ));
        }

        let payload = std::str::from_utf8(&bytes[MAGIC.len()..])
            .map_err(|e| RuntimeError::Artifact(format!("invalid UTF-8 payload: {e}")))?;

        serde_json::from_str(payload)
            .map_err(|e| RuntimeError::Artifact(format!("invalid artifact payload: {e}")))
    }

    /// Validate artifact structure.
    pub fn validate(artifact: &Artifact) -> RuntimeResult<()> {
        if artifact.version != 1 {
            return Err(RuntimeError::Artifact(format!(
                "unsupported artifact version: {}",
                artifact.version
            )));
        }

        if artifact.metadata.addon_id.is_empty() {
            return Err(RuntimeError::Artifact(
                "artifact has no addon ID".to_string(),
            ));
        }

        if artifact.exports.iter().any(|e| e.is_empty()) {
            return Err(RuntimeError::Artifact(
                "artifact exports an empty entry type name".to_string(),
            ));
        }

        Ok(())
    }

    /// Serialize an artifact back to its on-disk byte form.
    ///
    /// Used by build tooling and tests; the loader itself only reads.
    pub fn encode(artifact: &Artifact) -> RuntimeResult<Vec<u8>> {
        let mut bytes = MAGIC.to_vec();
        bytes.extend(serde_json::to_vec(artifact)?);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_artifact() -> Artifact {
        Artifact {
            version: 1,
            metadata: ArtifactMetadata {
                addon_id: "extra-hashes".to_string(),
                addon_version: "0.1.0".to_string(),
                built_at: None,
                toolchain: None,
            },
            exports: vec!["extra_hashes_entry".to_string()],
        }
    }

    #[test]
    fn test_encode_parse_roundtrip() {
        let artifact = sample_artifact();
        let bytes = ArtifactLoader::encode(&artifact).unwrap();

        assert_eq!(&bytes[..4], MAGIC);

        let parsed = ArtifactLoader::parse(&bytes).unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.metadata.addon_id, "extra-hashes");
        assert_eq!(parsed.exports, vec!["extra_hashes_entry"]);
    }

    #[test]
    fn test_parse_rejects_missing_magic() {
        let artifact = sample_artifact();
        let json = serde_json::to_vec(&artifact).unwrap();

        let result = ArtifactLoader::parse(&json);
        assert!(matches!(result, Err(RuntimeError::Artifact(_))));
    }

    #[test]
    fn test_parse_rejects_truncated_file() {
        assert!(ArtifactLoader::parse(b"DF").is_err());
    }

    #[test]
    fn test_validate_version() {
        let mut artifact = sample_artifact();
        artifact.version = 2;
        assert!(ArtifactLoader::validate(&artifact).is_err());
    }

    #[test]
    fn test_validate_empty_export_name() {
        let mut artifact = sample_artifact();
        artifact.exports.push(String::new());
        assert!(ArtifactLoader::validate(&artifact).is_err());
    }
}
