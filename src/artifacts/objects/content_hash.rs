//! Content hash (SHA-1 digest)
//!
//! Content hashes are 40-character lowercase hexadecimal strings. They address
//! file contents, directory nodes, whole-tree snapshots and therefore commits.
//!
//! ## Storage
//!
//! Records are stored under `<store>/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::CONTENT_HASH_LENGTH;
use crate::errors::{Result, SavitError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha1::{Digest, Sha1};
use std::path::PathBuf;

/// SHA-1 content hash
///
/// Ordering is lexicographic on the hex string, which is the ordering used to
/// aggregate sibling hashes into node and root hashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl ContentHash {
    /// Parse and validate a content hash from a string
    pub fn try_parse(id: String) -> Result<Self> {
        if id.len() != CONTENT_HASH_LENGTH {
            return Err(SavitError::InvalidHash(format!(
                "expected {} characters, got {}",
                CONTENT_HASH_LENGTH,
                id.len()
            )));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SavitError::InvalidHash(id));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Digest arbitrary bytes
    pub fn digest(data: impl AsRef<[u8]>) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data.as_ref());

        Self(format!("{:x}", hasher.finalize()))
    }

    /// Digest the concatenation of the given hashes, in iteration order
    pub fn digest_concat<'h>(hashes: impl IntoIterator<Item = &'h ContentHash>) -> Self {
        let mut hasher = Sha1::new();
        for hash in hashes {
            hasher.update(hash.0.as_bytes());
        }

        Self(format!("{:x}", hasher.finalize()))
    }

    /// Convert to the sharded storage path
    ///
    /// For example, `abc123...` becomes `ab/c123...`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the hash
    pub fn to_short(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ContentHash::try_parse(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn digest_matches_known_sha1() {
        assert_eq!(
            ContentHash::digest("").as_ref(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
        assert_eq!(
            ContentHash::digest("File Content 0").as_ref().len(),
            CONTENT_HASH_LENGTH
        );
    }

    #[test]
    fn digest_concat_equals_digest_of_joined_strings() {
        let a = ContentHash::digest("a");
        let b = ContentHash::digest("b");

        assert_eq!(
            ContentHash::digest_concat([&a, &b]),
            ContentHash::digest(format!("{a}{b}"))
        );
    }

    #[test]
    fn sharded_path_splits_after_two_characters() {
        let hash = ContentHash::digest("hello");
        let path = hash.to_path();

        assert_eq!(path, PathBuf::from(&hash.as_ref()[..2]).join(&hash.as_ref()[2..]));
    }

    #[test]
    fn rejects_malformed_hashes() {
        assert!(ContentHash::try_parse("abc".to_string()).is_err());
        assert!(ContentHash::try_parse("z".repeat(CONTENT_HASH_LENGTH)).is_err());
        assert!(ContentHash::try_parse("A".repeat(CONTENT_HASH_LENGTH)).is_ok());
    }
}
