//! Fragment assembly and finalization for BITS upload sessions.
//!
//! Everything here operates on a session directory handle supplied by
//! the store; no session paths are derived in this crate. All functions
//! are synchronous filesystem code, intended to run under
//! `spawn_blocking` in the server.

mod finalize;
mod fragment;
mod sidecar;

pub use finalize::{checksum_bytes, finalize, hash_sidecar_path};
pub use fragment::write_fragment;
pub use sidecar::{SidecarKind, write_sidecar};

/// Digest streaming buffer size: 16 KiB.
pub const HASH_BUF_SIZE: usize = 16 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
