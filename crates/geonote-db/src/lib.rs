//! # geonote-db
//!
//! PostgreSQL + PostGIS database layer for geonotes.
//!
//! This crate provides:
//! - Connection pool management
//! - Environment-driven [`DatabaseConfig`]
//! - [`PgNoteRepository`], the spatially indexed note store
//! - [`InMemoryNoteRepository`], a drop-in store for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use geonote_db::{Database, DatabaseConfig};
//! use geonote_core::{validate_note, NearbyQuery, Note, NoteRepository, Validator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect_with_config(&DatabaseConfig::from_env()?).await?;
//!
//!     let mut note = Note::new(1, 37.0, -122.0, "Best tacos in town");
//!     let mut v = Validator::new();
//!     validate_note(&mut v, &note);
//!     v.into_result()?;
//!
//!     db.notes.insert(&mut note).await?;
//!     let nearby = db
//!         .notes
//!         .find_nearby_for_user(2, &NearbyQuery::new(37.0, -122.0, 1000.0))
//!         .await?;
//!     println!("{} notes nearby", nearby.len());
//!     Ok(())
//! }
//! ```
pub mod config;
pub mod memory;
pub mod notes;
pub mod pool;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use geonote_core::*;

pub use config::DatabaseConfig;
pub use memory::InMemoryNoteRepository;
pub use notes::PgNoteRepository;
pub use pool::{
    create_pool, create_pool_with_config, create_pool_with_options, log_pool_metrics, PoolConfig,
};

/// Database context: the connection pool plus the repositories built on it.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note repository for inserts and spatial queries.
    pub notes: PgNoteRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a Database whose store calls are bounded by `query_timeout`.
    pub fn with_query_timeout(
        pool: sqlx::Pool<sqlx::Postgres>,
        query_timeout: std::time::Duration,
    ) -> Self {
        Self {
            notes: PgNoteRepository::with_timeout(pool.clone(), query_timeout),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Connect using a full [`DatabaseConfig`].
    pub async fn connect_with_config(config: &DatabaseConfig) -> Result<Self> {
        let pool = create_pool_with_config(&config.url, config.pool.clone()).await?;
        Ok(Self::with_query_timeout(pool, config.query_timeout))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        tracing::info!(
            subsystem = logging::SUBSYSTEM_DATABASE,
            op = "migrate",
            "Migrations applied"
        );
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
