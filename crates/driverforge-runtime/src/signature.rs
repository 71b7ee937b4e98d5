//! Artifact signatures and trust-anchor verification.
//!
//! Every artifact ships with a detached signature file (`<artifact>.sig`)
//! holding the signer's Ed25519 public key and a signature over the
//! artifact bytes, both hex-encoded, one per line. The verification
//! *strategy* is behind [`SignatureVerifier`] so hosts can swap the
//! mechanism per platform; the trust decision itself (signer must equal
//! the host identity) stays with the loader.

use crate::error::{RuntimeError, RuntimeResult};
use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};
use std::fmt;

/// The identity that signed an artifact: an Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SigningIdentity([u8; 32]);

impl SigningIdentity {
    /// Create from raw public key bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Try to create from a slice.
    pub fn try_from_slice(slice: &[u8]) -> RuntimeResult<Self> {
        let bytes: [u8; 32] = slice.try_into().map_err(|_| {
            RuntimeError::Signature(format!(
                "signing identity must be 32 bytes, got {}",
                slice.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// The raw public key bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Encode as a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode from a hex string.
    pub fn from_hex(s: &str) -> RuntimeResult<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| RuntimeError::Signature(format!("invalid hex identity: {e}")))?;
        Self::try_from_slice(&bytes)
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Identities show up in logs constantly; keep them short.
        write!(f, "SigningIdentity({}...)", &self.to_hex()[..12])
    }
}

impl fmt::Display for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Verification strategy for artifact signatures.
///
/// Implementations parse a detached signature file, check the signature
/// over the artifact bytes, and return the identity that produced it. They
/// do not decide whether that identity is trusted; the loader compares it
/// against the host's own identity.
pub trait SignatureVerifier: Send + Sync {
    /// Verify `signature_file` over `artifact` and return the signer.
    fn verify(&self, artifact: &[u8], signature_file: &str) -> RuntimeResult<SigningIdentity>;
}

/// Default Ed25519 verification strategy.
pub struct Ed25519Verifier;

impl Ed25519Verifier {
    fn parse_signature_file(content: &str) -> RuntimeResult<(SigningIdentity, [u8; 64])> {
        let mut lines = content.lines().filter(|l| !l.trim().is_empty());

        let identity_line = lines
            .next()
            .ok_or_else(|| RuntimeError::Signature("signature file is empty".to_string()))?;
        let signature_line = lines.next().ok_or_else(|| {
            RuntimeError::Signature("signature file has no signature line".to_string())
        })?;

        let identity = SigningIdentity::from_hex(identity_line)?;

        let sig_bytes = hex::decode(signature_line.trim())
            .map_err(|e| RuntimeError::Signature(format!("invalid hex signature: {e}")))?;
        let signature: [u8; 64] = sig_bytes.as_slice().try_into().map_err(|_| {
            RuntimeError::Signature(format!(
                "signature must be 64 bytes, got {}",
                sig_bytes.len()
            ))
        })?;

        Ok((identity, signature))
    }
}

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, artifact: &[u8], signature_file: &str) -> RuntimeResult<SigningIdentity> {
        let (identity, signature) = Self::parse_signature_file(signature_file)?;

        let key = VerifyingKey::from_bytes(identity.as_bytes())
            .map_err(|e| RuntimeError::Signature(format!("invalid public key: {e}")))?;

        key.verify(artifact, &DalekSignature::from_bytes(&signature))
            .map_err(|_| RuntimeError::Signature("signature verification failed".to_string()))?;

        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn test_key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    fn signature_file_for(key: &SigningKey, artifact: &[u8]) -> String {
        let signature = key.sign(artifact);
        format!(
            "{}\n{}\n",
            hex::encode(key.verifying_key().to_bytes()),
            hex::encode(signature.to_bytes())
        )
    }

    #[test]
    fn test_verify_valid_signature() {
        let key = test_key(1);
        let artifact = b"artifact bytes";
        let sig_file = signature_file_for(&key, artifact);

        let identity = Ed25519Verifier.verify(artifact, &sig_file).unwrap();
        assert_eq!(identity.as_bytes(), &key.verifying_key().to_bytes());
    }

    #[test]
    fn test_verify_tampered_artifact() {
        let key = test_key(1);
        let sig_file = signature_file_for(&key, b"original bytes");

        let result = Ed25519Verifier.verify(b"tampered bytes", &sig_file);
        assert!(matches!(result, Err(RuntimeError::Signature(_))));
    }

    #[test]
    fn test_verify_reports_actual_signer() {
        let signer = test_key(2);
        let other = test_key(3);
        let artifact = b"artifact bytes";
        let sig_file = signature_file_for(&signer, artifact);

        let identity = Ed25519Verifier.verify(artifact, &sig_file).unwrap();
        assert_ne!(identity.as_bytes(), &other.verifying_key().to_bytes());
    }

    #[test]
    fn test_malformed_signature_file() {
        assert!(Ed25519Verifier.verify(b"x", "").is_err());
        assert!(Ed25519Verifier.verify(b"x", "deadbeef\n").is_err());
        assert!(Ed25519Verifier.verify(b"x", "not-hex\nnot-hex\n").is_err());
    }

    #[test]
    fn test_identity_hex_roundtrip() {
        let identity = SigningIdentity::from_bytes([7; 32]);
        let decoded = SigningIdentity::from_hex(&identity.to_hex()).unwrap();
        assert_eq!(identity, decoded);
    }

    #[test]
    fn test_identity_rejects_wrong_length() {
        assert!(SigningIdentity::try_from_slice(&[0u8; 31]).is_err());
        assert!(SigningIdentity::from_hex("abcd").is_err());
    }
}
