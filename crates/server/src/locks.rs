//! Per-session write locks.
//!
//! The protocol keeps no in-memory session table, so without these two
//! concurrent fragment requests for the same session would interleave
//! at the filesystem with undefined relative write ordering. Fragment
//! and close transitions hold the session's lock across their
//! filesystem work. Entries are never reclaimed: abandoned-session
//! clean-up is out of scope, and a lock entry is a few dozen bytes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// An arena of per-session `tokio::sync::Mutex` handles keyed by the
/// bare session identifier.
#[derive(Clone, Default)]
pub struct SessionLocks {
    inner: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl SessionLocks {
    /// Returns the lock handle for `session`, creating it on first use.
    pub fn lock_for(&self, session: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().unwrap();
        map.entry(session.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}
