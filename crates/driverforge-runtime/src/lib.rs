//! # driverforge-runtime
//!
//! Addon bundle handling for the driverforge host.
//!
//! This crate provides:
//! - Addon bundle discovery from an extensions directory
//! - Bundle manifest parsing
//! - Artifact (linked binary) loading and validation
//! - Signature verification against the host's trust anchor
//!
//! ## Bundle Structure
//!
//! Addons are directories containing:
//! - `manifest.toml` - Addon metadata naming the entry-point artifact
//! - `<bundle-name>.dfa` - The linked artifact (name overridable in the manifest)
//! - `<bundle-name>.dfa.sig` - Detached signature over the artifact bytes
//!
//! An optional sibling directory named `<bundle>.<os>` (`.linux`, `.macos`,
//! `.windows`) overrides the plain bundle when running on that platform.
//!
//! ## Trust Model
//!
//! Every artifact must be signed, and the signing identity must equal the
//! host's own identity byte for byte. This is a trust-anchor check, not a
//! general PKI check: addons signed by anyone else are rejected before
//! instantiation is ever attempted.

pub mod artifact;
pub mod discovery;
pub mod error;
pub mod manifest;
pub mod signature;

pub use artifact::{Artifact, ArtifactLoader, ArtifactMetadata, MAGIC};
pub use discovery::{
    discover_bundle, scan_bundles, signature_path_for, AddonBundle, RejectedBundle, ScanReport,
};
pub use error::{RejectReason, RuntimeError, RuntimeResult};
pub use manifest::{AddonManifest, AddonMetadata, ARTIFACT_EXT};
pub use signature::{Ed25519Verifier, SignatureVerifier, SigningIdentity};
