//! Learned per-venue wait state, persisted across runs.
//!
//! The poller waits before first checking a venue's pending menu job. That
//! wait is learned: every fetch failure lengthens it, a READY document
//! resets it. The state lives behind the [`BackoffStore`] trait so the
//! fetch path never touches a concrete file, and the file-backed store
//! treats a missing or corrupt file as an empty map rather than an error.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::warn;

/// First-poll wait in seconds when nothing has been learned for a venue.
pub const DEFAULT_WAIT_SECS: u64 = 30;

/// Seconds added to a venue's learned wait on every fetch failure.
pub const WAIT_INCREMENT_SECS: u64 = 5;

pub trait BackoffStore {
    /// Learned wait for a venue in seconds, never below the default.
    fn get(&self, venue_id: &str) -> u64;

    /// Lengthen the learned wait after a failed fetch and return the new
    /// value. The stored value becomes `max(stored, default) + increment`
    /// (saturating), so a stale entry below the default cannot shorten the
    /// next wait.
    fn increase(&mut self, venue_id: &str) -> u64;

    /// Forget the learned wait so the next `get` yields the default.
    fn reset(&mut self, venue_id: &str);
}

/// JSON-file-backed store shared by consecutive runs.
///
/// Every operation reloads the file, so concurrent runs see each other's
/// writes at operation granularity. Reads that fail for any reason fall
/// back to an empty map; failed writes are logged and swallowed because
/// losing a learned wait only costs a slightly-off first poll.
pub struct FileBackoffStore {
    path: PathBuf,
    default_wait: u64,
    increment: u64,
}

impl FileBackoffStore {
    pub fn new(path: impl Into<PathBuf>, default_wait: u64, increment: u64) -> Self {
        Self {
            path: path.into(),
            default_wait,
            increment,
        }
    }

    /// All learned waits currently on disk, keyed by venue id.
    pub fn entries(&self) -> BTreeMap<String, u64> {
        self.load()
    }

    /// Drop every learned wait.
    pub fn clear(&self) {
        self.save(&BTreeMap::new());
    }

    fn load(&self) -> BTreeMap<String, u64> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => BTreeMap::new(),
        }
    }

    fn save(&self, entries: &BTreeMap<String, u64>) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(entries) {
            Ok(json) => {
                if let Err(err) = std::fs::write(&self.path, json) {
                    warn!(path = %self.path.display(), error = %err, "could not persist backoff state");
                }
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "could not serialize backoff state");
            }
        }
    }
}

impl BackoffStore for FileBackoffStore {
    fn get(&self, venue_id: &str) -> u64 {
        self.load()
            .get(venue_id)
            .map_or(self.default_wait, |wait| (*wait).max(self.default_wait))
    }

    fn increase(&mut self, venue_id: &str) -> u64 {
        let mut entries = self.load();
        let current = entries.get(venue_id).copied().unwrap_or(self.default_wait);
        let next = current.max(self.default_wait).saturating_add(self.increment);
        entries.insert(venue_id.to_string(), next);
        self.save(&entries);
        next
    }

    fn reset(&mut self, venue_id: &str) {
        let mut entries = self.load();
        if entries.remove(venue_id).is_some() {
            self.save(&entries);
        }
    }
}

/// In-memory store with the same arithmetic, for exercising the fetch
/// path in tests without touching the filesystem.
#[cfg(test)]
pub struct MemoryBackoffStore {
    entries: BTreeMap<String, u64>,
    default_wait: u64,
    increment: u64,
}

#[cfg(test)]
impl MemoryBackoffStore {
    pub fn new(default_wait: u64, increment: u64) -> Self {
        Self {
            entries: BTreeMap::new(),
            default_wait,
            increment,
        }
    }
}

#[cfg(test)]
impl BackoffStore for MemoryBackoffStore {
    fn get(&self, venue_id: &str) -> u64 {
        self.entries
            .get(venue_id)
            .map_or(self.default_wait, |wait| (*wait).max(self.default_wait))
    }

    fn increase(&mut self, venue_id: &str) -> u64 {
        let current = self
            .entries
            .get(venue_id)
            .copied()
            .unwrap_or(self.default_wait);
        let next = current.max(self.default_wait).saturating_add(self.increment);
        self.entries.insert(venue_id.to_string(), next);
        next
    }

    fn reset(&mut self, venue_id: &str) {
        self.entries.remove(venue_id);
    }
}
