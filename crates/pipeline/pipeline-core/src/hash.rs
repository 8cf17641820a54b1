//! Upload identity

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the uploaded bytes
pub fn file_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            file_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_distinct_inputs() {
        assert_ne!(file_hash(b"ds,y\n"), file_hash(b"ds;y\n"));
        assert_eq!(file_hash(b"abc").len(), 64);
    }
}
