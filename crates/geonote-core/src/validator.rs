//! Field-keyed accumulator for validation failures.
//!
//! Validation functions call [`Validator::check`] once per constraint and never
//! stop early, so a caller can report every problem with a candidate at once.
//!
//! ```
//! use geonote_core::Validator;
//!
//! let mut v = Validator::new();
//! v.check(!"".is_empty(), "text", "must be provided");
//! v.check(12.5 <= 90.0, "latitude", "must be between -90 and 90");
//!
//! assert!(!v.valid());
//! assert_eq!(v.errors().get("text"), Some(&["must be provided".to_string()][..]));
//! assert!(v.errors().get("latitude").is_none());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Messages recorded per field, in the order the checks ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one failure.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Accumulates validation failures keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no failure has been recorded.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record `message` under `field`.
    pub fn add_error(&mut self, field: &str, message: &str) {
        let messages = self.errors.0.entry(field.to_string()).or_default();
        if !messages.iter().any(|m| m == message) {
            messages.push(message.to_string());
        }
    }

    /// Record `message` under `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_error(field, message);
        }
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// `Ok(())` when valid, otherwise [`Error::Validation`] carrying every failure.
    pub fn into_result(self) -> Result<()> {
        if self.valid() {
            Ok(())
        } else {
            Err(Error::Validation(self.errors))
        }
    }
}
