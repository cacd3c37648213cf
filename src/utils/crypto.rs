//! # Identity Keys
//!
//! Keypair generation, message signing and signature verification.
//!
//! The protocol only needs three capabilities from asymmetric cryptography:
//! generate a keypair, sign bytes, and verify a signature against a public
//! key. They are provided here over Ed25519; the primitive itself comes
//! from `ed25519-dalek`, never reimplemented.
//!
//! Private keys never leave an [`Identity`]. Public keys travel once per
//! connection, as base64 text written during the handshake.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey, PUBLIC_KEY_LENGTH};
use rand::rngs::OsRng;

use crate::error::{ProtocolError, Result};

/// A signing identity: one keypair, generated at client construction and
/// held for the client's lifetime.
pub struct Identity {
    signing: SigningKey,
}

impl Identity {
    /// Generate a fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        let mut csprng = OsRng;
        Self {
            signing: SigningKey::generate(&mut csprng),
        }
    }

    /// Sign raw bytes with the private key.
    pub fn sign(&self, data: &[u8]) -> Vec<u8> {
        self.signing.sign(data).to_vec()
    }

    /// The public half of this identity.
    pub fn public_key(&self) -> PeerKey {
        PeerKey {
            verifying: self.signing.verifying_key(),
        }
    }

    /// Export the public key as transmissible text.
    pub fn export_public_key(&self) -> String {
        self.public_key().export()
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose key material, even in debug output.
        f.debug_struct("Identity").finish_non_exhaustive()
    }
}

/// A peer's public key, as stored by the server for each connected client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerKey {
    verifying: VerifyingKey,
}

impl PeerKey {
    /// Parse a key from its exported text form.
    pub fn from_exported(text: &str) -> Result<Self> {
        let raw = BASE64
            .decode(text.trim())
            .map_err(|e| ProtocolError::InvalidKey(format!("invalid base64: {e}")))?;
        let raw: [u8; PUBLIC_KEY_LENGTH] = raw.try_into().map_err(|raw: Vec<u8>| {
            ProtocolError::InvalidKey(format!(
                "expected {PUBLIC_KEY_LENGTH} key bytes, got {}",
                raw.len()
            ))
        })?;
        let verifying = VerifyingKey::from_bytes(&raw)
            .map_err(|e| ProtocolError::InvalidKey(e.to_string()))?;
        Ok(Self { verifying })
    }

    /// Export as base64 text, the form sent over the wire.
    pub fn export(&self) -> String {
        BASE64.encode(self.verifying.as_bytes())
    }

    /// Check a signature over `data`.
    ///
    /// Never fails: a malformed, truncated or mismatched signature is
    /// simply `false`, so callers can treat it as an authentication
    /// outcome rather than a transport error.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        self.verifying.verify(data, &signature).is_ok()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn sign_and_verify() {
        let identity = Identity::generate();
        let signature = identity.sign(b"hello");
        assert!(identity.public_key().verify(b"hello", &signature));
    }

    #[test]
    fn verify_rejects_tampered_content() {
        let identity = Identity::generate();
        let signature = identity.sign(b"hello");
        assert!(!identity.public_key().verify(b"hell0", &signature));
    }

    #[test]
    fn verify_rejects_foreign_key() {
        let identity = Identity::generate();
        let other = Identity::generate();
        let signature = identity.sign(b"hello");
        assert!(!other.public_key().verify(b"hello", &signature));
    }

    #[test]
    fn verify_never_errors_on_garbage() {
        let identity = Identity::generate();
        assert!(!identity.public_key().verify(b"hello", &[]));
        assert!(!identity.public_key().verify(b"hello", &[0u8; 7]));
        assert!(!identity.public_key().verify(b"hello", &[0u8; 64]));
    }

    #[test]
    fn export_import_roundtrip() {
        let identity = Identity::generate();
        let text = identity.export_public_key();
        let imported = PeerKey::from_exported(&text).unwrap();
        assert_eq!(imported, identity.public_key());
    }

    #[test]
    fn import_rejects_malformed_text() {
        assert!(matches!(
            PeerKey::from_exported("not base64 !!!"),
            Err(ProtocolError::InvalidKey(_))
        ));
        assert!(matches!(
            PeerKey::from_exported("AAAA"),
            Err(ProtocolError::InvalidKey(_))
        ));
    }
}
