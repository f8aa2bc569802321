//! Centralized default constants for geonotes.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates and the CLI reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// NOTE CONTENT
// =============================================================================

/// Maximum note text length, counted in characters (not bytes).
pub const TEXT_MAX_CHARS: usize = 500;

// =============================================================================
// COORDINATES
// =============================================================================

/// Fractional digits kept when rendering a coordinate for the precision check.
pub const COORDINATE_PRECISION: usize = 6;

pub const LATITUDE_MIN: f64 = -90.0;
pub const LATITUDE_MAX: f64 = 90.0;
pub const LONGITUDE_MIN: f64 = -180.0;
pub const LONGITUDE_MAX: f64 = 180.0;

/// Spatial reference id of stored points (WGS 84).
pub const SRID: i32 = 4326;

// =============================================================================
// NEARBY SEARCH
// =============================================================================

/// Radius for "notes left by others near me" searches, in meters.
pub const NEARBY_RADIUS_M: f64 = 1000.0;

/// Radius for searches around explicitly supplied coordinates, in meters.
pub const AROUND_RADIUS_M: f64 = 100.0;

// =============================================================================
// DATABASE
// =============================================================================

/// Deadline applied to every store call, in seconds.
pub const QUERY_TIMEOUT_SECS: u64 = 3;

/// Database URL used when `DATABASE_URL` is unset.
pub const DATABASE_URL: &str = "postgres://localhost/geonotes";

/// Maximum number of pooled connections.
pub const DB_MAX_CONNECTIONS: u32 = 10;

/// Store calls slower than this are logged at WARN even when they succeed.
pub const SLOW_QUERY_MS: u64 = 500;
