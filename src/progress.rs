//! Resumable-progress persistence, one record per tour identity.
//!
//! Persistence is best-effort: a failing or unavailable backend degrades
//! every operation to a logged no-op or `None`, and playback carries on
//! without it. Records expire after a fixed retention window so a tour
//! abandoned months ago starts fresh instead of resuming mid-way.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use jiff::SignedDuration;

use crate::clock::{Clock, SystemClock};
use crate::model::ProgressRecord;

/// Errors a persistence backend can report.
///
/// Callers of [`ProgressStore`] never see these; the store logs and degrades.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// String key/value persistence, the shape of a browser's local storage.
pub trait ProgressBackend {
    fn read(&self, key: &str) -> Result<Option<String>, BackendError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), BackendError>;
    fn remove(&mut self, key: &str) -> Result<(), BackendError>;
}

/// In-process backend. Clones share the same underlying map, so a host (or a
/// test) can hold a handle to storage the store also owns.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryBackend {
    /// Whether any value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl ProgressBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// File-backed backend: one JSON file per key under a root directory.
#[derive(Debug)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the default storage root: `~/.waypoint/progress/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".waypoint").join("progress"))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl ProgressBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, BackendError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), BackendError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Persists and retrieves one tour's progress record.
pub struct ProgressStore {
    key: String,
    backend: Box<dyn ProgressBackend>,
    clock: Box<dyn Clock>,
}

impl ProgressStore {
    /// How long a record stays resumable after its last write.
    pub const RETENTION: SignedDuration = SignedDuration::from_hours(7 * 24);

    /// A store for `tour_id` over the given backend, using the system clock.
    pub fn new(tour_id: &str, backend: Box<dyn ProgressBackend>) -> Self {
        Self::with_clock(tour_id, backend, Box::new(SystemClock))
    }

    /// A store with an explicit clock, for hosts and tests that control time.
    pub fn with_clock(
        tour_id: &str,
        backend: Box<dyn ProgressBackend>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            key: format!("tour_progress_{tour_id}"),
            backend,
            clock,
        }
    }

    /// Saves the current step index as resumable progress, replacing any
    /// prior record.
    pub fn save_progress(&mut self, index: usize) {
        let record = ProgressRecord::InProgress {
            step_index: index,
            timestamp: self.clock.now(),
        };
        self.write_record(&record);
    }

    /// The resumable step index, if any.
    ///
    /// A record older than [`Self::RETENTION`] is expired: it is cleared as a
    /// side effect and `None` is returned. A live completion record also
    /// yields `None`; completion is not a resumable position.
    pub fn get_progress(&mut self) -> Option<usize> {
        let record = self.read_record()?;

        if self.clock.now().duration_since(record.timestamp()) > Self::RETENTION {
            self.clear_progress();
            return None;
        }

        match record {
            ProgressRecord::InProgress { step_index, .. } => Some(step_index),
            ProgressRecord::Completed { .. } => None,
        }
    }

    /// Marks the tour finished, replacing any in-progress record.
    pub fn mark_completed(&mut self) {
        let record = ProgressRecord::Completed {
            completed: true,
            timestamp: self.clock.now(),
        };
        self.write_record(&record);
    }

    /// Whether the stored record marks the tour completed.
    ///
    /// Reads without any expiry side effect.
    pub fn is_completed(&self) -> bool {
        matches!(
            self.read_record(),
            Some(ProgressRecord::Completed {
                completed: true,
                ..
            })
        )
    }

    /// Removes the record entirely.
    pub fn clear_progress(&mut self) {
        if let Err(e) = self.backend.remove(&self.key) {
            log::warn!("unable to clear tour progress: {e}");
        }
    }

    fn read_record(&self) -> Option<ProgressRecord> {
        let raw = match self.backend.read(&self.key) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("unable to read tour progress: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("malformed tour progress record: {e}");
                None
            }
        }
    }

    fn write_record(&mut self, record: &ProgressRecord) {
        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("unable to serialize tour progress: {e}");
                return;
            }
        };
        if let Err(e) = self.backend.write(&self.key, &json) {
            log::warn!("unable to save tour progress: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::clock::fake::FakeClock;

    /// A backend that refuses every operation, like storage under a denied
    /// quota.
    struct FailingBackend;

    impl ProgressBackend for FailingBackend {
        fn read(&self, _key: &str) -> Result<Option<String>, BackendError> {
            Err(BackendError::Unavailable("storage disabled".into()))
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<(), BackendError> {
            Err(BackendError::Unavailable("storage disabled".into()))
        }

        fn remove(&mut self, _key: &str) -> Result<(), BackendError> {
            Err(BackendError::Unavailable("storage disabled".into()))
        }
    }

    fn test_store() -> (MemoryBackend, FakeClock, ProgressStore) {
        let backend = MemoryBackend::default();
        let clock = FakeClock::default();
        let store = ProgressStore::with_clock(
            "onboarding",
            Box::new(backend.clone()),
            Box::new(clock.clone()),
        );
        (backend, clock, store)
    }

    #[test]
    fn progress_round_trips() {
        let (_backend, _clock, mut store) = test_store();

        store.save_progress(3);
        assert_eq!(store.get_progress(), Some(3));
    }

    #[test]
    fn absent_record_is_none() {
        let (_backend, _clock, mut store) = test_store();
        assert_eq!(store.get_progress(), None);
    }

    #[test]
    fn expired_record_is_cleared_and_none() {
        let (backend, clock, mut store) = test_store();

        store.save_progress(3);
        clock.advance(ProgressStore::RETENTION + SignedDuration::from_hours(1));

        assert_eq!(store.get_progress(), None);
        assert!(!store.is_completed());
        assert!(!backend.contains("tour_progress_onboarding"));
    }

    #[test]
    fn record_exactly_at_the_retention_boundary_still_resumes() {
        let (_backend, clock, mut store) = test_store();

        store.save_progress(2);
        clock.advance(ProgressStore::RETENTION);

        assert_eq!(store.get_progress(), Some(2));
    }

    #[test]
    fn completion_replaces_progress() {
        let (_backend, _clock, mut store) = test_store();

        store.save_progress(3);
        store.mark_completed();

        assert!(store.is_completed());
        assert_eq!(store.get_progress(), None);
    }

    #[test]
    fn progress_replaces_completion() {
        let (_backend, _clock, mut store) = test_store();

        store.mark_completed();
        store.save_progress(1);

        assert!(!store.is_completed());
        assert_eq!(store.get_progress(), Some(1));
    }

    #[test]
    fn expired_completion_is_cleared_by_get_progress() {
        let (backend, clock, mut store) = test_store();

        store.mark_completed();
        clock.advance(ProgressStore::RETENTION + SignedDuration::from_hours(1));

        assert_eq!(store.get_progress(), None);
        assert!(!backend.contains("tour_progress_onboarding"));
        assert!(!store.is_completed());
    }

    #[test]
    fn clear_removes_the_record() {
        let (backend, _clock, mut store) = test_store();

        store.save_progress(5);
        store.clear_progress();

        assert_eq!(store.get_progress(), None);
        assert!(!backend.contains("tour_progress_onboarding"));
    }

    #[test]
    fn malformed_record_reads_as_absent() {
        let (mut backend, _clock, mut store) = test_store();

        backend
            .write("tour_progress_onboarding", "not json at all")
            .unwrap();

        assert_eq!(store.get_progress(), None);
        assert!(!store.is_completed());
    }

    #[test]
    fn failing_backend_degrades_to_noops() {
        let mut store = ProgressStore::new("onboarding", Box::new(FailingBackend));

        store.save_progress(2);
        assert_eq!(store.get_progress(), None);
        store.mark_completed();
        assert!(!store.is_completed());
        store.clear_progress();
    }

    #[test]
    fn stores_are_keyed_per_tour() {
        let backend = MemoryBackend::default();
        let mut first = ProgressStore::new("first-tour", Box::new(backend.clone()));
        let mut second = ProgressStore::new("second-tour", Box::new(backend.clone()));

        first.save_progress(4);

        assert_eq!(first.get_progress(), Some(4));
        assert_eq!(second.get_progress(), None);
        assert!(backend.contains("tour_progress_first-tour"));
    }

    #[test]
    fn file_backend_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut backend = FileBackend::new(dir.path().join("progress")).unwrap();

        assert_eq!(backend.read("tour_progress_x").unwrap(), None);
        backend.write("tour_progress_x", "{\"a\":1}").unwrap();
        assert_eq!(
            backend.read("tour_progress_x").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        backend.remove("tour_progress_x").unwrap();
        assert_eq!(backend.read("tour_progress_x").unwrap(), None);

        // Removing a missing key is idempotent.
        backend.remove("tour_progress_x").unwrap();
    }

    #[test]
    fn file_backend_backs_a_store() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::new(dir.path().join("progress")).unwrap();
        let mut store = ProgressStore::new("onboarding", Box::new(backend));

        store.save_progress(2);
        assert_eq!(store.get_progress(), Some(2));
        assert!(
            dir.path()
                .join("progress")
                .join("tour_progress_onboarding.json")
                .is_file()
        );
    }
}
