//! Structured logging values shared by every geonotes crate.
//!
//! Events carry `subsystem`, `component` and `op` fields so log aggregation can
//! filter by origin. The values live here to keep them consistent.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Deadline exceeded, slow store call, pool exhaustion |
//! | INFO  | Lifecycle events (pool created, migrations applied) |
//! | DEBUG | Per-call completions with result counts and timings |
//! | TRACE | Per-row detail |

// ─── Subsystems ────────────────────────────────────────────────────────────

pub const SUBSYSTEM_DATABASE: &str = "database";

pub const SUBSYSTEM_CLI: &str = "cli";

// ─── Components ────────────────────────────────────────────────────────────

pub const COMPONENT_POOL: &str = "pool";

/// PostGIS-backed note store.
pub const COMPONENT_NOTES: &str = "notes";

/// In-memory note store.
pub const COMPONENT_MEMORY_NOTES: &str = "memory_notes";

pub const COMPONENT_DEADLINE: &str = "deadline";
