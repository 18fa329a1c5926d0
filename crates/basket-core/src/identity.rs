//! # Line-Item Identity
//!
//! Two `add` calls for the same product with the same validated options must
//! land on the same basket row. The merge check runs on a deterministic
//! fingerprint of (buyable type, buyable id, validated options) rather than
//! on row ids, so it works before the second item is ever persisted.
//!
//! The digest is SHA-1 over the id, the type tag, and the canonical JSON
//! serialization of the option map. `OptionMap` is a `BTreeMap`, so the
//! serialization is already sorted by key; no extra normalization pass is
//! needed. Collision resistance at basket scale is the only requirement
//! here - the fingerprint is an equality token, not a security boundary.

use sha1::{Digest, Sha1};
use std::fmt;

use crate::options::OptionMap;

/// The identity fingerprint of a basket line (lowercase hex SHA-1).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Returns the hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the identity fingerprint for a (buyable, validated options) pair.
///
/// Identical inputs always produce identical fingerprints; any difference in
/// the type tag, the id, or any option key or value changes the digest.
///
/// ## Example
/// ```rust
/// use basket_core::identity::compute_identifier;
/// use basket_core::options::OptionMap;
///
/// let mut options = OptionMap::new();
/// options.insert("size".into(), "M".into());
///
/// let a = compute_identifier("product", 7, &options);
/// let b = compute_identifier("product", 7, &options);
/// assert_eq!(a, b);
/// ```
pub fn compute_identifier(
    buyable_type: &str,
    buyable_id: i64,
    options: &OptionMap,
) -> Fingerprint {
    // BTreeMap serialization is key-sorted, which makes the JSON canonical.
    let serialized =
        serde_json::to_string(options).unwrap_or_else(|_| String::from("{}"));

    let mut hasher = Sha1::new();
    hasher.update(buyable_id.to_string().as_bytes());
    hasher.update(buyable_type.as_bytes());
    hasher.update(serialized.as_bytes());

    Fingerprint(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionValue;

    fn options(entries: &[(&str, OptionValue)]) -> OptionMap {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_identical_inputs_hash_identically() {
        let opts = options(&[("size", "M".into()), ("color", "red".into())]);
        assert_eq!(
            compute_identifier("product", 1, &opts),
            compute_identifier("product", 1, &opts)
        );
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let forward = options(&[("color", "red".into()), ("size", "M".into())]);
        let reversed = options(&[("size", "M".into()), ("color", "red".into())]);
        assert_eq!(
            compute_identifier("product", 1, &forward),
            compute_identifier("product", 1, &reversed)
        );
    }

    #[test]
    fn test_option_value_changes_the_fingerprint() {
        let medium = options(&[("size", "M".into())]);
        let large = options(&[("size", "L".into())]);
        assert_ne!(
            compute_identifier("product", 1, &medium),
            compute_identifier("product", 1, &large)
        );
    }

    #[test]
    fn test_buyable_reference_changes_the_fingerprint() {
        let opts = OptionMap::new();
        let a = compute_identifier("product", 1, &opts);
        let b = compute_identifier("product", 2, &opts);
        let c = compute_identifier("bundle", 1, &opts);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_digest_is_lowercase_hex() {
        let fingerprint = compute_identifier("product", 1, &OptionMap::new());
        assert_eq!(fingerprint.as_str().len(), 40);
        assert!(fingerprint
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
