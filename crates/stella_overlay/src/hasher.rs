//! Content fingerprints for mod, game and backup files.
//!
//! Every decision the engine makes is driven by comparing SHA-256 digests of
//! file bytes. Digests are carried around as lowercase hex strings wrapped in
//! [`ContentHash`] so they serialize directly into the status side-car.

use crate::error::Result;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Read;

const READ_BUFFER_SIZE: usize = 8192;
const DIGEST_HEX_LEN: usize = 64;

/// Lowercase hex SHA-256 digest of a file's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Wrap an existing hex digest (e.g. read back from the status file).
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into().to_ascii_lowercase())
    }

    /// Like [`from_hex`](Self::from_hex), but only accepts a full 64-digit
    /// hex SHA-256 digest.
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        if hex.len() == DIGEST_HEX_LEN && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self::from_hex(hex))
        } else {
            None
        }
    }

    /// Placeholder for a digest that could not be read back. Never equal to
    /// a real digest, so the next sync replaces it.
    pub fn unknown() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits, for log lines.
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash an in-memory buffer.
pub fn hash_bytes(bytes: &[u8]) -> ContentHash {
    ContentHash(hex::encode(Sha256::digest(bytes)))
}

/// Hash a file on disk, streaming it in fixed-size chunks.
///
/// Fails with [`Error::Io`](crate::Error::Io) if the file cannot be opened or
/// read (permissions, deleted mid-scan). Callers decide whether to skip the
/// file or abort.
pub fn hash_file(path: &Utf8Path) -> Result<ContentHash> {
    let mut file = std::fs::File::open(path.as_std_path())?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; READ_BUFFER_SIZE];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(ContentHash(hex::encode(hasher.finalize())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn test_hash_bytes_known_vector() {
        let hash = hash_bytes(b"abc");
        assert_eq!(
            hash.as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hash_file_matches_hash_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("char.unity3d")).unwrap();
        // Larger than one read buffer so the streaming loop runs more than once
        let content: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &content).unwrap();

        assert_eq!(hash_file(&path).unwrap(), hash_bytes(&content));
    }

    #[test]
    fn test_hash_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("gone.unity3d")).unwrap();
        assert!(hash_file(&path).is_err());
    }

    #[test]
    fn test_parse_hex_rejects_malformed_digests() {
        let digest = hash_bytes(b"abc");
        assert_eq!(
            ContentHash::parse_hex(&digest.as_str().to_ascii_uppercase()),
            Some(digest)
        );
        assert_eq!(ContentHash::parse_hex("abcdef"), None);
        assert_eq!(ContentHash::parse_hex(&"g".repeat(64)), None);
        assert_eq!(ContentHash::parse_hex("aéééééé"), None);
    }

    #[test]
    fn test_short_never_splits_characters() {
        assert_eq!(ContentHash::from_hex("aéééééé").short(), "aéééééé");
        assert_eq!(ContentHash::unknown().short(), "");
    }

    #[test]
    fn test_from_hex_normalizes_case() {
        let hash = ContentHash::from_hex("ABCDEF");
        assert_eq!(hash.as_str(), "abcdef");
        assert_eq!(hash.short(), "abcdef");
    }
}
