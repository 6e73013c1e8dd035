//! Digest engine: SHA-256 and SHA-512 fingerprints of raw bytes
//!
//! All digests are lowercase hex over the exact input bytes. Both functions
//! are total: the empty input hashes like any other.

use sha2::{Digest, Sha256, Sha512};

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha256,
    Sha512,
}

impl DigestAlgorithm {
    /// Compute the lowercase hex digest of `bytes`
    pub fn digest(&self, bytes: &[u8]) -> String {
        match self {
            DigestAlgorithm::Sha256 => digest256(bytes),
            DigestAlgorithm::Sha512 => digest512(bytes),
        }
    }

    /// Length of the hex string this algorithm produces
    pub fn hex_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha256 => 64,
            DigestAlgorithm::Sha512 => 128,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha512 => "SHA-512",
        }
    }
}

/// SHA-256 of `bytes` as 64 lowercase hex characters
pub fn digest256(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-512 of `bytes` as 128 lowercase hex characters
pub fn digest512(bytes: &[u8]) -> String {
    let mut hasher = Sha512::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors_empty() {
        assert_eq!(
            digest256(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            digest512(b""),
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
             47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
        );
    }

    #[test]
    fn test_known_vectors_abc() {
        assert_eq!(
            digest256(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            digest512(b"abc"),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_deterministic_and_lowercase() {
        let data = "Contrato de licencia · anexo técnico".as_bytes();
        for algo in [DigestAlgorithm::Sha256, DigestAlgorithm::Sha512] {
            let first = algo.digest(data);
            let second = algo.digest(data);
            assert_eq!(first, second);
            assert_eq!(first.len(), algo.hex_len());
            assert!(first.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn test_single_byte_change_changes_digest() {
        assert_ne!(digest256(b"contract v1"), digest256(b"contract v2"));
        assert_ne!(digest512(b"contract v1"), digest512(b"contract v2"));
    }
}
