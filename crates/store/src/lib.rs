//! Sharded on-disk session storage.
//!
//! Maps a session identifier to its directory under the storage base.
//! The mapping is derived purely from the identifier string (no lookup
//! table): two fixed 2-character substrings of the hex digits form two
//! levels of sharding, then a directory named with the bare identifier:
//!
//! ```text
//! <base>/<s1>/<s2>/<bare-id>/
//! ```
//!
//! where `s1` is bare-id chars `[0,2)` and `s2` is chars `[3,5)`. The
//! sharding exists purely to bound directory fan-out.
//!
//! This crate exclusively owns path derivation; fragment assembly and
//! finalization act on a directory handle handed out from here and never
//! construct session paths themselves.

use std::path::{Path, PathBuf};

use bitsd_protocol::SessionId;

/// Errors produced by the session store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolves session identifiers to sharded directories under a base path.
#[derive(Debug, Clone)]
pub struct SessionStore {
    base: PathBuf,
}

impl SessionStore {
    /// Creates a store rooted at `base`. The base directory itself is
    /// expected to exist (created at startup).
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Returns the storage base path.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Generates a fresh session identifier.
    pub fn generate(&self) -> SessionId {
        SessionId::generate()
    }

    /// Derives the session directory for `id`. Pure path computation;
    /// does not touch the filesystem.
    fn session_dir(&self, id: &SessionId) -> PathBuf {
        let bare = id.bare();
        self.base.join(&bare[0..2]).join(&bare[3..5]).join(bare)
    }

    /// Resolves `id` to its directory, or `None` if the session was
    /// never created.
    pub fn resolve(&self, id: &SessionId) -> Option<PathBuf> {
        let dir = self.session_dir(id);
        dir.is_dir().then_some(dir)
    }

    /// Materializes the sharded directory tree for a fresh session and
    /// returns its directory.
    pub fn create(&self, id: &SessionId) -> Result<PathBuf, StoreError> {
        let dir = self.session_dir(id);
        std::fs::create_dir_all(&dir)?;
        tracing::debug!(session = %id, dir = %dir.display(), "session directory created");
        Ok(dir)
    }
}
