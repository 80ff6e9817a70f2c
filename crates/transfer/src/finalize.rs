//! Session finalization: digest the assembled content file.

use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::HASH_BUF_SIZE;

/// Computes SHA-256 of `data` and returns the hex-encoded digest.
pub fn checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Path of the hash sidecar for a session's content file.
pub fn hash_sidecar_path(dir: &Path, content_name: &str) -> PathBuf {
    dir.join(format!("{content_name}.Hash"))
}

/// Streams the content file through SHA-256 and persists the digest
/// as lowercase hex into the `.Hash` sidecar (truncate-and-write, so
/// the latest finalize wins).
///
/// Finalization is best-effort observability, never a correctness gate
/// for closing a session:
/// - an unopenable content file (no fragment ever arrived) is logged
///   and skipped, returning `None`;
/// - a mid-stream read error truncates the digest computation, which
///   is logged, and the truncated digest is still persisted;
/// - a sidecar write failure is logged and the digest still returned.
pub fn finalize(dir: &Path, content_name: &str) -> Option<String> {
    let mut file = match std::fs::File::open(dir.join(content_name)) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("hash skipped, content file unreadable: {e}");
            return None;
        }
    };

    let mut hasher = Sha256::new();
    let mut buf = [0u8; HASH_BUF_SIZE];
    loop {
        match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buf[..n]),
            Err(e) => {
                tracing::warn!("hash truncated by read error: {e}");
                break;
            }
        }
    }

    let digest = hex::encode(hasher.finalize());
    if let Err(e) = std::fs::write(hash_sidecar_path(dir, content_name), &digest) {
        tracing::warn!("hash sidecar write failed: {e}");
    }
    Some(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONTENT: &str = "content.bin";

    #[test]
    fn checksum_bytes_is_sha256_hex() {
        let c = checksum_bytes(b"hello world");
        assert_eq!(c.len(), 64);
        assert_eq!(
            c,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn digest_matches_independent_checksum() {
        let dir = TempDir::new().unwrap();
        let data = b"The quick brown fox jumps over the lazy dog";
        std::fs::write(dir.path().join(CONTENT), data).unwrap();

        let digest = finalize(dir.path(), CONTENT).unwrap();
        assert_eq!(digest, checksum_bytes(data));

        let sidecar =
            std::fs::read_to_string(hash_sidecar_path(dir.path(), CONTENT)).unwrap();
        assert_eq!(sidecar, digest);
    }

    #[test]
    fn missing_content_skips_digest() {
        let dir = TempDir::new().unwrap();
        assert!(finalize(dir.path(), CONTENT).is_none());
        assert!(!hash_sidecar_path(dir.path(), CONTENT).exists());
    }

    #[test]
    fn empty_content_digests_empty_string() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONTENT), b"").unwrap();
        let digest = finalize(dir.path(), CONTENT).unwrap();
        assert_eq!(digest, checksum_bytes(b""));
    }

    #[test]
    fn repeated_finalize_overwrites_sidecar() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONTENT), b"v1").unwrap();
        finalize(dir.path(), CONTENT).unwrap();

        std::fs::write(dir.path().join(CONTENT), b"v2").unwrap();
        let digest = finalize(dir.path(), CONTENT).unwrap();

        let sidecar =
            std::fs::read_to_string(hash_sidecar_path(dir.path(), CONTENT)).unwrap();
        // Single digest, no appended history.
        assert_eq!(sidecar, digest);
        assert_eq!(sidecar.len(), 64);
    }

    #[test]
    fn content_larger_than_one_buffer() {
        let dir = TempDir::new().unwrap();
        let data = vec![0xA5u8; HASH_BUF_SIZE * 3 + 17];
        std::fs::write(dir.path().join(CONTENT), &data).unwrap();
        let digest = finalize(dir.path(), CONTENT).unwrap();
        assert_eq!(digest, checksum_bytes(&data));
    }
}
