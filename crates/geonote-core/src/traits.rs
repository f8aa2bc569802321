//! Core traits for geonotes abstractions.
//!
//! The note store is a trait so callers can be handed the PostGIS-backed
//! repository in production and an in-memory one in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NearbyQuery, Note};

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Persistence and spatial queries for notes.
///
/// The store trusts its callers: `insert` does not validate, run
/// [`validate_note`](crate::validation::validate_note) first. Every call is
/// bounded by the repository's deadline. Reads have no side effects and are
/// safe to retry; the store itself never retries.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Persist `note`, then fill in its store-assigned `id` and `created_at`.
    ///
    /// `note.user_id` must be set.
    async fn insert(&self, note: &mut Note) -> Result<()>;

    /// Every note, owner not projected. Order is unspecified.
    async fn list_all(&self) -> Result<Vec<Note>>;

    /// Notes owned by `user_id`, owner not projected. Empty when there are none.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Note>>;

    /// Notes within `query.radius_m` meters of the center whose owner is not
    /// `excluded_user_id`. Owner is projected.
    async fn find_nearby_for_user(
        &self,
        excluded_user_id: i64,
        query: &NearbyQuery,
    ) -> Result<Vec<Note>>;

    /// Notes within `query.radius_m` meters of the center, any owner.
    async fn find_nearby(&self, query: &NearbyQuery) -> Result<Vec<Note>>;
}
