//! Signature verification capability.

use starchain_core::verify_message;

/// Checks that `signature` over `message` was produced by `address`.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool;
}

impl<F> SignatureVerifier for F
where
    F: Fn(&str, &str, &str) -> bool + Send + Sync,
{
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool {
        self(message, address, signature)
    }
}

/// Treats addresses as hex Ed25519 public keys and signatures as hex.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool {
        match verify_message(message, address, signature) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(address, error = %err, "signature rejected");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starchain_core::Keypair;

    #[test]
    fn test_ed25519_verifier() {
        let keypair = Keypair::from_seed(&[7u8; 32]);
        let address = keypair.address();
        let signature = keypair.sign_message("hello");

        assert!(Ed25519Verifier.verify("hello", &address, &signature));
        assert!(!Ed25519Verifier.verify("goodbye", &address, &signature));
        assert!(!Ed25519Verifier.verify("hello", "not-hex", &signature));
        assert!(!Ed25519Verifier.verify("hello", &address, "zz"));

        let other = Keypair::from_seed(&[8u8; 32]);
        assert!(!Ed25519Verifier.verify("hello", &other.address(), &signature));
    }

    #[test]
    fn test_closure_verifier() {
        let verifier = |_: &str, _: &str, signature: &str| signature == "ok";
        assert!(verifier.verify("m", "a", "ok"));
        assert!(!SignatureVerifier::verify(&verifier, "m", "a", "nope"));
    }
}
