//! Ed25519 message signatures keyed by hex addresses.
//!
//! An address is the hex-encoded Ed25519 public key. Signatures over
//! registration challenges travel as hex strings.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl Ed25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Convert to hex string. This is the key's address form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidHex(hex::FromHexError::InvalidStringLength))?;
        Ok(Self(arr))
    }

    /// Verify a signature over a message.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CoreError> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| CoreError::InvalidPublicKey)?;

        let sig = Signature::from_bytes(&signature.0);

        verifying_key
            .verify(message, &sig)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Pub({})", &self.to_hex()[..16])
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; 64]);

impl Ed25519Signature {
    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidHex(hex::FromHexError::InvalidStringLength))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Sig({}...)", &self.to_hex()[..16])
    }
}

/// A keypair that signs registration challenges.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Get the public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// The hex address identifying this keypair.
    pub fn address(&self) -> String {
        self.public_key().to_hex()
    }

    /// Sign raw bytes.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(message).to_bytes())
    }

    /// Sign a text challenge and return the hex signature.
    pub fn sign_message(&self, message: &str) -> String {
        self.sign(message.as_bytes()).to_hex()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.public_key())
    }
}

/// Verify a hex signature over `message` by the holder of hex `address`.
pub fn verify_message(message: &str, address: &str, signature: &str) -> Result<(), CoreError> {
    let public_key = Ed25519PublicKey::from_hex(address)?;
    let signature = Ed25519Signature::from_hex(signature)?;
    public_key.verify(message.as_bytes(), &signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_sign_verify() {
        let keypair = Keypair::generate();
        let signature = keypair.sign_message("addr:1:starRegistry");

        verify_message("addr:1:starRegistry", &keypair.address(), &signature)
            .expect("valid signature should verify");

        assert!(verify_message("addr:2:starRegistry", &keypair.address(), &signature).is_err());
    }

    #[test]
    fn test_wrong_address_rejected() {
        let alice = Keypair::from_seed(&[1; 32]);
        let bob = Keypair::from_seed(&[2; 32]);
        let signature = alice.sign_message("challenge");

        let result = verify_message("challenge", &bob.address(), &signature);
        assert!(matches!(result, Err(CoreError::InvalidSignature)));
    }

    #[test]
    fn test_malformed_inputs() {
        let keypair = Keypair::from_seed(&[3; 32]);
        let signature = keypair.sign_message("challenge");

        assert!(matches!(
            verify_message("challenge", "not-hex", &signature),
            Err(CoreError::InvalidHex(_))
        ));
        assert!(matches!(
            verify_message("challenge", &keypair.address(), "abcd"),
            Err(CoreError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_keypair_deterministic_from_seed() {
        let seed = [0x42u8; 32];
        assert_eq!(
            Keypair::from_seed(&seed).address(),
            Keypair::from_seed(&seed).address()
        );
    }
}
