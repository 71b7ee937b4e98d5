//! Addon bundle discovery and validation.
//!
//! The loader scans the immediate subdirectories of an extensions root.
//! Each candidate runs the validation chain below, short-circuiting on the
//! first failure; a failed candidate is recorded as rejected and the scan
//! moves on. One broken bundle never aborts the rest.
//!
//! 1. Platform filter: a candidate tagged for another OS is skipped
//!    silently; a plain candidate with a `<name>.<host-os>` sibling is
//!    superseded by it.
//! 2. The candidate must be a directory.
//! 3. It must contain a parseable `manifest.toml`.
//! 4. The named entry-point artifact must exist and parse as the host's
//!    runtime format.
//! 5. The artifact must carry a valid signature whose signing identity is
//!    byte-for-byte the host's own.
//! 6. The resolved entry-point path must not already be accepted in this
//!    scan.

use crate::artifact::{Artifact, ArtifactLoader};
use crate::error::{RejectReason, RuntimeError, RuntimeResult};
use crate::manifest::AddonManifest;
use crate::signature::{SignatureVerifier, SigningIdentity};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory-name suffixes recognized as platform tags.
const PLATFORM_TAGS: &[&str] = &["linux", "macos", "windows"];

/// A validated addon bundle, ready for instantiation.
#[derive(Debug, Clone)]
pub struct AddonBundle {
    /// Path to the bundle directory.
    pub path: PathBuf,

    /// Parsed manifest.
    pub manifest: AddonManifest,

    /// Resolved path of the entry-point artifact.
    pub artifact_path: PathBuf,

    /// Parsed and validated artifact.
    pub artifact: Artifact,
}

impl AddonBundle {
    /// The addon ID.
    pub fn id(&self) -> &str {
        &self.manifest.addon.id
    }

    /// The addon name.
    pub fn name(&self) -> &str {
        &self.manifest.addon.name
    }

    /// The addon version.
    pub fn version(&self) -> &str {
        &self.manifest.addon.version
    }
}

/// A candidate that failed the validation chain.
#[derive(Debug)]
pub struct RejectedBundle {
    /// Path of the rejected candidate.
    pub path: PathBuf,

    /// The step that failed.
    pub reason: RejectReason,
}

/// Outcome of scanning an extensions root.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Bundles that passed the full validation chain, in scan order.
    pub accepted: Vec<AddonBundle>,

    /// Candidates that failed, with the step that failed them.
    pub rejected: Vec<RejectedBundle>,
}

/// Strip a recognized platform tag from a candidate directory name.
///
/// `"netdrivers.linux"` yields `("netdrivers", Some("linux"))`;
/// `"netdrivers"` yields `("netdrivers", None)`.
fn split_platform_tag(name: &str) -> (&str, Option<&str>) {
    if let Some((base, tag)) = name.rsplit_once('.') {
        if PLATFORM_TAGS.contains(&tag) {
            return (base, Some(tag));
        }
    }
    (name, None)
}

/// Scan the immediate subdirectories of `root` for addon bundles.
///
/// Returns the accepted bundles and the per-candidate rejection reasons. A
/// missing or unreadable root yields an empty report rather than an error;
/// the host boots fine with zero addons.
pub fn scan_bundles(
    root: &Path,
    verifier: &dyn SignatureVerifier,
    host_identity: &SigningIdentity,
) -> RuntimeResult<ScanReport> {
    let mut report = ScanReport::default();

    if !root.exists() {
        debug!("extensions root {:?} does not exist, skipping scan", root);
        return Ok(report);
    }

    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("failed to read extensions root {:?}: {}", root, e);
            return Ok(report);
        }
    };

    let mut candidates: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    candidates.sort();

    let names: HashSet<String> = candidates
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();

    let host_os = std::env::consts::OS;
    let mut seen_artifacts: HashSet<PathBuf> = HashSet::new();

    for path in candidates {
        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };

        let (bundle_name, tag) = split_platform_tag(&file_name);

        match tag {
            Some(tag) if tag != host_os => {
                debug!("skipping {:?}: tagged for platform '{}'", path, tag);
                continue;
            }
            None if names.contains(&format!("{bundle_name}.{host_os}")) => {
                debug!(
                    "skipping {:?}: superseded by platform variant '{}.{}'",
                    path, bundle_name, host_os
                );
                continue;
            }
            _ => {}
        }

        match validate_candidate(&path, bundle_name, verifier, host_identity, &mut seen_artifacts)
        {
            Ok(bundle) => {
                info!(
                    "discovered addon: {} v{} at {:?}",
                    bundle.name(),
                    bundle.version(),
                    path
                );
                report.accepted.push(bundle);
            }
            Err(reason) => {
                warn!("rejected addon candidate {:?}: {}", path, reason);
                report.rejected.push(RejectedBundle { path, reason });
            }
        }
    }

    info!(
        "addon scan complete: {} accepted, {} rejected",
        report.accepted.len(),
        report.rejected.len()
    );
    Ok(report)
}

/// Run the validation chain on one candidate directory.
fn validate_candidate(
    path: &Path,
    bundle_name: &str,
    verifier: &dyn SignatureVerifier,
    host_identity: &SigningIdentity,
    seen_artifacts: &mut HashSet<PathBuf>,
) -> Result<AddonBundle, RejectReason> {
    if !path.is_dir() {
        return Err(RejectReason::NotADirectory);
    }

    let manifest_path = path.join("manifest.toml");
    if !manifest_path.exists() {
        return Err(RejectReason::MissingManifest);
    }
    let manifest = AddonManifest::from_file(&manifest_path)
        .map_err(|e| RejectReason::InvalidManifest(e.to_string()))?;

    let artifact_path = path.join(manifest.entry_point_for(bundle_name));
    if !artifact_path.exists() {
        return Err(RejectReason::MissingArtifact(artifact_path));
    }
    let artifact_bytes = std::fs::read(&artifact_path)
        .map_err(|e| RejectReason::InvalidArtifact(e.to_string()))?;
    let artifact = ArtifactLoader::parse(&artifact_bytes)
        .map_err(|e| RejectReason::InvalidArtifact(e.to_string()))?;
    ArtifactLoader::validate(&artifact).map_err(|e| RejectReason::InvalidArtifact(e.to_string()))?;

    let signature_path = signature_path_for(&artifact_path);
    if !signature_path.exists() {
        return Err(RejectReason::MissingSignature(signature_path));
    }
    let signature_file = std::fs::read_to_string(&signature_path)
        .map_err(|e| RejectReason::InvalidSignature(e.to_string()))?;
    let signer = verifier
        .verify(&artifact_bytes, &signature_file)
        .map_err(|e| RejectReason::InvalidSignature(e.to_string()))?;

    if signer != *host_identity {
        return Err(RejectReason::UntrustedSigner);
    }

    // Resolve symlinks and relative segments so two manifests cannot smuggle
    // the same artifact in twice under different spellings.
    let resolved = artifact_path
        .canonicalize()
        .unwrap_or_else(|_| artifact_path.clone());
    if !seen_artifacts.insert(resolved.clone()) {
        return Err(RejectReason::DuplicateEntryPoint(resolved));
    }

    Ok(AddonBundle {
        path: path.to_path_buf(),
        manifest,
        artifact_path,
        artifact,
    })
}

/// Path of the detached signature for an artifact.
pub fn signature_path_for(artifact_path: &Path) -> PathBuf {
    let mut os_string = artifact_path.as_os_str().to_owned();
    os_string.push(".sig");
    PathBuf::from(os_string)
}

/// Validate a single bundle directory outside a scan.
pub fn discover_bundle(
    path: &Path,
    verifier: &dyn SignatureVerifier,
    host_identity: &SigningIdentity,
) -> RuntimeResult<AddonBundle> {
    let bundle_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (bundle_name, _) = split_platform_tag(&bundle_name);

    let mut seen = HashSet::new();
    validate_candidate(path, bundle_name, verifier, host_identity, &mut seen).map_err(|reason| {
        RuntimeError::Rejected {
            bundle: bundle_name.to_string(),
            reason,
        }
    })
}
