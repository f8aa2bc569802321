//! # geonote-core
//!
//! Core types, traits, and validation for geonotes.
//!
//! This crate holds the note model, the field-keyed [`Validator`] and the note
//! validation rules, the [`NoteRepository`] trait that store implementations
//! satisfy, and the small geo and deadline helpers they share.

pub mod deadline;
pub mod defaults;
pub mod error;
pub mod geo;
pub mod logging;
pub mod models;
pub mod traits;
pub mod validation;
pub mod validator;

// Re-export commonly used types at crate root
pub use deadline::with_deadline;
pub use error::{Error, Result};
pub use geo::{haversine_distance_m, GeoPoint};
pub use models::*;
pub use traits::*;
pub use validation::{validate_latitude, validate_longitude, validate_note};
pub use validator::{ValidationErrors, Validator};
