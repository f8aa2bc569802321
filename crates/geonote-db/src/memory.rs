//! In-memory note store for tests and local tooling.
//!
//! Implements [`NoteRepository`] over a vector guarded by a lock, with the same
//! projections, owner exclusion and per-call deadline as the PostGIS store.
//! Distances use the haversine formula rather than the WGS 84 spheroid, so
//! results can differ from PostGIS for points sitting right on the radius.
//!
//! ```
//! use geonote_core::{NearbyQuery, Note, NoteRepository};
//! use geonote_db::InMemoryNoteRepository;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let repo = InMemoryNoteRepository::new();
//! let mut note = Note::new(2, 37.0001, -122.0001, "Nice view");
//! repo.insert(&mut note).await.unwrap();
//!
//! let found = repo
//!     .find_nearby_for_user(1, &NearbyQuery::new(37.0, -122.0, 1000.0))
//!     .await
//!     .unwrap();
//! assert_eq!(found, vec![note]);
//! # });
//! ```

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use geonote_core::defaults::QUERY_TIMEOUT_SECS;
use geonote_core::logging::{COMPONENT_MEMORY_NOTES, SUBSYSTEM_DATABASE};
use geonote_core::{with_deadline, Error, NearbyQuery, Note, NoteRepository, Result};

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    notes: Vec<Note>,
}

/// Note store held entirely in process memory. Clones share the same notes.
#[derive(Debug, Clone)]
pub struct InMemoryNoteRepository {
    state: Arc<RwLock<MemoryState>>,
    timeout: Duration,
    latency: Duration,
}

impl Default for InMemoryNoteRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState::default())),
            timeout: Duration::from_secs(QUERY_TIMEOUT_SECS),
            latency: Duration::ZERO,
        }
    }

    /// Bound every call by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Delay every call by `latency`, to simulate a slow store.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of stored notes.
    pub fn len(&self) -> usize {
        self.read().notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave a half-written note behind,
    // so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    async fn insert_note(&self, note: &mut Note) -> Result<()> {
        self.simulate_latency().await;
        if note.user_id.is_none() {
            return Err(Error::InvalidInput(
                "note has no owner (user_id)".to_string(),
            ));
        }

        let mut state = self.write();
        state.last_id += 1;
        note.id = Some(state.last_id);
        note.created_at = Some(Utc::now());
        state.notes.push(note.clone());

        debug!(
            subsystem = SUBSYSTEM_DATABASE,
            component = COMPONENT_MEMORY_NOTES,
            op = "insert",
            note_id = note.id,
            "Note inserted"
        );
        Ok(())
    }

    async fn select<P>(&self, op: &'static str, project_owner: bool, predicate: P) -> Vec<Note>
    where
        P: Fn(&Note) -> bool + Send,
    {
        self.simulate_latency().await;
        let notes: Vec<Note> = self
            .read()
            .notes
            .iter()
            .filter(|n| predicate(*n))
            .cloned()
            .map(|n| if project_owner { n } else { n.without_owner() })
            .collect();

        debug!(
            subsystem = SUBSYSTEM_DATABASE,
            component = COMPONENT_MEMORY_NOTES,
            op,
            result_count = notes.len(),
            "Query finished"
        );
        notes
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn insert(&self, note: &mut Note) -> Result<()> {
        with_deadline("insert", self.timeout, self.insert_note(note)).await
    }

    async fn list_all(&self) -> Result<Vec<Note>> {
        with_deadline("list_all", self.timeout, async {
            Ok(self.select("list_all", false, |_| true).await)
        })
        .await
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Note>> {
        with_deadline("list_by_user", self.timeout, async {
            Ok(self
                .select("list_by_user", false, |n| n.user_id == Some(user_id))
                .await)
        })
        .await
    }

    async fn find_nearby_for_user(
        &self,
        excluded_user_id: i64,
        query: &NearbyQuery,
    ) -> Result<Vec<Note>> {
        query.validate()?;
        let center = query.center();
        let radius_m = query.radius_m;
        with_deadline("find_nearby_for_user", self.timeout, async {
            Ok(self
                .select("find_nearby_for_user", true, |n| {
                    n.user_id != Some(excluded_user_id) && center.within(&n.location(), radius_m)
                })
                .await)
        })
        .await
    }

    async fn find_nearby(&self, query: &NearbyQuery) -> Result<Vec<Note>> {
        query.validate()?;
        let center = query.center();
        let radius_m = query.radius_m;
        with_deadline("find_nearby", self.timeout, async {
            Ok(self
                .select("find_nearby", true, |n| {
                    center.within(&n.location(), radius_m)
                })
                .await)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_are_assigned_sequentially() {
        let repo = InMemoryNoteRepository::new();
        let mut a = Note::new(1, 0.0, 0.0, "a");
        let mut b = Note::new(1, 0.0, 0.0, "b");
        repo.insert(&mut a).await.unwrap();
        repo.insert(&mut b).await.unwrap();

        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert!(a.is_persisted() && b.is_persisted());
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_without_owner_leaves_nothing_behind() {
        let repo = InMemoryNoteRepository::new();
        let mut note = Note::new(1, 0.0, 0.0, "a");
        note.user_id = None;

        assert!(matches!(
            repo.insert(&mut note).await,
            Err(Error::InvalidInput(_))
        ));
        assert!(note.id.is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let repo = InMemoryNoteRepository::new();
        let other = repo.clone();
        repo.insert(&mut Note::new(1, 0.0, 0.0, "a")).await.unwrap();
        assert_eq!(other.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_store_times_out() {
        let repo = InMemoryNoteRepository::new()
            .with_timeout(Duration::from_secs(3))
            .with_latency(Duration::from_secs(5));

        let mut note = Note::new(1, 0.0, 0.0, "a");
        assert!(matches!(
            repo.insert(&mut note).await,
            Err(Error::Timeout(_))
        ));
        assert!(note.id.is_none());
        assert!(repo.is_empty());

        assert!(matches!(repo.list_all().await, Err(Error::Timeout(_))));
        assert!(matches!(
            repo.find_nearby(&NearbyQuery::new(0.0, 0.0, 10.0)).await,
            Err(Error::Timeout(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_under_deadline_succeeds() {
        let repo = InMemoryNoteRepository::new()
            .with_timeout(Duration::from_secs(3))
            .with_latency(Duration::from_secs(1));
        repo.insert(&mut Note::new(1, 0.0, 0.0, "a")).await.unwrap();
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }
}
