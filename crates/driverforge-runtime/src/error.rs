//! Error types for the addon runtime.

use std::path::PathBuf;
use thiserror::Error;

/// Why a candidate bundle was rejected during a scan.
///
/// Rejection is terminal for the candidate and never aborts the scan of
/// the remaining candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The candidate is a stray file, not a bundle directory.
    NotADirectory,

    /// The bundle has no manifest descriptor.
    MissingManifest,

    /// The manifest failed to parse or validate.
    InvalidManifest(String),

    /// The entry-point artifact named by the manifest does not exist.
    MissingArtifact(PathBuf),

    /// The entry-point file is not a valid artifact of the host's runtime format.
    InvalidArtifact(String),

    /// The artifact has no detached signature file.
    MissingSignature(PathBuf),

    /// The signature failed to parse or verify.
    InvalidSignature(String),

    /// The signature verified but the signer is not the host's identity.
    UntrustedSigner,

    /// The resolved entry-point path was already accepted earlier in the scan.
    DuplicateEntryPoint(PathBuf),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::NotADirectory => write!(f, "not a directory"),
            RejectReason::MissingManifest => write!(f, "no manifest.toml"),
            RejectReason::InvalidManifest(e) => write!(f, "invalid manifest: {e}"),
            RejectReason::MissingArtifact(p) => write!(f, "entry-point artifact missing: {p:?}"),
            RejectReason::InvalidArtifact(e) => write!(f, "invalid artifact: {e}"),
            RejectReason::MissingSignature(p) => write!(f, "signature file missing: {p:?}"),
            RejectReason::InvalidSignature(e) => write!(f, "invalid signature: {e}"),
            RejectReason::UntrustedSigner => {
                write!(f, "signing identity does not match the host identity")
            }
            RejectReason::DuplicateEntryPoint(p) => {
                write!(f, "entry point already loaded in this scan: {p:?}")
            }
        }
    }
}

/// Errors that can occur in the addon runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A candidate bundle failed the validation chain.
    #[error("addon bundle '{bundle}' rejected: {reason}")]
    Rejected { bundle: String, reason: RejectReason },

    /// Failed to parse a bundle manifest.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// Failed to load or validate an artifact.
    #[error("artifact error: {0}")]
    Artifact(String),

    /// Failed to parse or verify a signature.
    #[error("signature error: {0}")]
    Signature(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;
