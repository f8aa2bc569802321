//! Validation rules for candidate notes.
//!
//! Coordinates get two independent checks: a numeric range check, and a
//! precision check that renders the value with six fixed decimals and matches
//! the result against [`COORDINATE_PATTERN`]. For finite values the rendering
//! always has six fractional digits, so the pattern effectively bounds the
//! integer part to three digits. Non-finite values render as `NaN`/`inf` and
//! fail it; they are also reported explicitly.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::defaults::{COORDINATE_PRECISION, TEXT_MAX_CHARS};
use crate::geo::{latitude_in_range, longitude_in_range};
use crate::models::Note;
use crate::validator::Validator;

/// Optional sign, 1-3 integer digits, 1-6 fractional digits.
pub const COORDINATE_PATTERN: &str = r"^-?[0-9]{1,3}\.[0-9]{1,6}$";

static COORDINATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(COORDINATE_PATTERN).expect("coordinate pattern is valid"));

/// Check every constraint on `note`, recording each failure in `v`.
///
/// Pure: neither the note nor any store is touched.
pub fn validate_note(v: &mut Validator, note: &Note) {
    v.check(!note.text.is_empty(), "text", "must be provided");
    v.check(
        note.text.chars().count() <= TEXT_MAX_CHARS,
        "text",
        "must not be more than 500 characters",
    );

    validate_latitude(v, note.latitude);
    validate_longitude(v, note.longitude);
}

/// Range and precision checks for a latitude.
pub fn validate_latitude(v: &mut Validator, latitude: f64) {
    v.check(latitude.is_finite(), "latitude", "must be a finite number");
    v.check(
        latitude_in_range(latitude),
        "latitude",
        "must be between -90 and 90",
    );
    v.check(
        has_coordinate_precision(latitude),
        "latitude",
        "must have up to 6 decimal places",
    );
}

/// Range and precision checks for a longitude.
pub fn validate_longitude(v: &mut Validator, longitude: f64) {
    v.check(longitude.is_finite(), "longitude", "must be a finite number");
    v.check(
        longitude_in_range(longitude),
        "longitude",
        "must be between -180 and 180",
    );
    v.check(
        has_coordinate_precision(longitude),
        "longitude",
        "must have up to 6 decimal places",
    );
}

/// Render `value` with exactly six decimals.
pub fn format_coordinate(value: f64) -> String {
    format!("{:.*}", COORDINATE_PRECISION, value)
}

/// Whether the six-decimal rendering of `value` matches [`COORDINATE_PATTERN`].
pub fn has_coordinate_precision(value: f64) -> bool {
    COORDINATE_RE.is_match(&format_coordinate(value))
}
