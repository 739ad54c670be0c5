//! Content fingerprinting
//!
//! A fingerprint is a truncated hex SHA-256 digest of the final output
//! bytes. Identical content always yields the identical fingerprint; any
//! byte difference yields a different one for all practical purposes. The
//! digest choice is an internal detail — only determinism and collision
//! resistance are part of the contract.

use std::fmt;

use sha2::{Digest, Sha256};

/// Hex length of the full SHA-256 digest
pub const FULL_LEN: usize = 64;

/// Default number of hex digits kept in output file names
pub const DEFAULT_LEN: usize = 32;

/// Minimum number of hex digits a caller may request
pub const MIN_LEN: usize = 8;

/// Content-derived fingerprint embedded in output file names
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute a fingerprint of `bytes`, keeping `len` hex digits.
    ///
    /// `len` is clamped to `MIN_LEN..=FULL_LEN`.
    pub fn from_bytes(bytes: &[u8], len: usize) -> Self {
        let digest = Sha256::digest(bytes);
        let mut hex = format!("{digest:x}");
        hex.truncate(len.clamp(MIN_LEN, FULL_LEN));
        Self(hex)
    }

    /// Full-length fingerprint, used as the raw-content cache key
    pub fn full(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes, FULL_LEN)
    }

    /// Hex digits of the fingerprint
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_content_same_fingerprint() {
        let a = Fingerprint::from_bytes(b"hello", DEFAULT_LEN);
        let b = Fingerprint::from_bytes(b"hello", DEFAULT_LEN);
        assert_eq!(a, b);
    }

    #[test]
    fn different_content_different_fingerprint() {
        let a = Fingerprint::from_bytes(b"hello", DEFAULT_LEN);
        let b = Fingerprint::from_bytes(b"hello!", DEFAULT_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn truncates_to_requested_length() {
        let fp = Fingerprint::from_bytes(b"content", 16);
        assert_eq!(fp.as_str().len(), 16);
    }

    #[test]
    fn length_is_clamped() {
        assert_eq!(Fingerprint::from_bytes(b"x", 2).as_str().len(), MIN_LEN);
        assert_eq!(Fingerprint::from_bytes(b"x", 999).as_str().len(), FULL_LEN);
    }

    #[test]
    fn full_is_whole_digest() {
        let fp = Fingerprint::full(b"content");
        assert_eq!(fp.as_str().len(), FULL_LEN);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn truncation_is_a_prefix_of_the_full_digest() {
        let short = Fingerprint::from_bytes(b"content", DEFAULT_LEN);
        let full = Fingerprint::full(b"content");
        assert!(full.as_str().starts_with(short.as_str()));
    }

    proptest! {
        #[test]
        fn deterministic_across_invocations(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let a = Fingerprint::from_bytes(&bytes, DEFAULT_LEN);
            let b = Fingerprint::from_bytes(&bytes, DEFAULT_LEN);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn single_byte_mutation_changes_fingerprint(
            bytes in proptest::collection::vec(any::<u8>(), 1..512),
            index in any::<prop::sample::Index>(),
            delta in 1u8..=255,
        ) {
            let mut mutated = bytes.clone();
            let i = index.index(mutated.len());
            mutated[i] = mutated[i].wrapping_add(delta);
            let a = Fingerprint::from_bytes(&bytes, DEFAULT_LEN);
            let b = Fingerprint::from_bytes(&mutated, DEFAULT_LEN);
            prop_assert_ne!(a, b);
        }
    }
}
