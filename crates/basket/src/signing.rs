//! # Signed Basket References
//!
//! Clients that carry neither a session nor an authenticated user can still
//! reclaim a basket by presenting its id together with a signature derived
//! from a server-side secret. The signature is SHA-1 over the decimal id
//! concatenated with the first [`SECRET_PREFIX_LEN`] characters of the
//! secret, hex-encoded lowercase.
//!
//! Verification failure is never an error - the caller just falls through
//! to a fresh basket.

use sha1::{Digest, Sha1};

/// How much of the server secret participates in the signature.
const SECRET_PREFIX_LEN: usize = 10;

/// Computes the signature for a basket id.
pub fn basket_signature(basket_id: i64, secret: &str) -> String {
    let prefix: String = secret.chars().take(SECRET_PREFIX_LEN).collect();

    let mut hasher = Sha1::new();
    hasher.update(basket_id.to_string().as_bytes());
    hasher.update(prefix.as_bytes());

    hex::encode(hasher.finalize())
}

/// An inbound basket reference: a claimed id plus its signature, as taken
/// from the transport layer (typically a header pair).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedBasketRef {
    pub id: i64,
    pub signature: String,
}

impl SignedBasketRef {
    /// Creates a reference from raw transport values.
    pub fn new(id: i64, signature: impl Into<String>) -> Self {
        SignedBasketRef {
            id,
            signature: signature.into(),
        }
    }

    /// Checks the signature against the server secret.
    pub fn verify(&self, secret: &str) -> bool {
        self.signature == basket_signature(self.id, secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_deterministic() {
        assert_eq!(
            basket_signature(42, "server-secret"),
            basket_signature(42, "server-secret")
        );
    }

    #[test]
    fn test_only_the_secret_prefix_matters() {
        // Secrets sharing their first 10 characters sign identically.
        assert_eq!(
            basket_signature(42, "0123456789-alpha"),
            basket_signature(42, "0123456789-beta")
        );
        assert_ne!(
            basket_signature(42, "0123456789"),
            basket_signature(42, "9876543210")
        );
    }

    #[test]
    fn test_verify_round_trip() {
        let reference = SignedBasketRef::new(42, basket_signature(42, "server-secret"));
        assert!(reference.verify("server-secret"));
        assert!(!reference.verify("another-secret"));
    }

    #[test]
    fn test_tampered_id_fails_verification() {
        let mut reference = SignedBasketRef::new(42, basket_signature(42, "server-secret"));
        reference.id = 43;
        assert!(!reference.verify("server-secret"));
    }

    #[test]
    fn test_short_secret_is_usable() {
        let reference = SignedBasketRef::new(7, basket_signature(7, "abc"));
        assert!(reference.verify("abc"));
    }
}
