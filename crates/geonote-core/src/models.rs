//! Domain models for geonotes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::{latitude_in_range, longitude_in_range, GeoPoint};

/// A user-authored, geotagged text note.
///
/// `id` and `created_at` are `None` until the store assigns them on insert.
/// `user_id` is `None` on notes returned by the listing queries, which do not
/// project the owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub latitude: f64,
    pub longitude: f64,
    pub text: String,
}

impl Note {
    /// A candidate note owned by `user_id`, not yet persisted.
    pub fn new(user_id: i64, latitude: f64, longitude: f64, text: impl Into<String>) -> Self {
        Self {
            id: None,
            created_at: None,
            user_id: Some(user_id),
            latitude,
            longitude,
            text: text.into(),
        }
    }

    /// The point the store derives its `location` column from.
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// True once the store has assigned an id and creation time.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some() && self.created_at.is_some()
    }

    /// The same note with the owner stripped, as the listing queries return it.
    pub fn without_owner(mut self) -> Self {
        self.user_id = None;
        self
    }
}

/// Center and radius of a nearby search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in meters, boundary inclusive.
    pub radius_m: f64,
}

impl NearbyQuery {
    pub fn new(latitude: f64, longitude: f64, radius_m: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_m,
        }
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Reject centers outside the coordinate ranges and negative or non-finite radii.
    ///
    /// Query coordinates get the same range checks as note coordinates, but no
    /// precision check: a device may report more than six decimals.
    pub fn validate(&self) -> Result<()> {
        if !latitude_in_range(self.latitude) {
            return Err(Error::InvalidInput(format!(
                "latitude must be between -90 and 90, got {}",
                self.latitude
            )));
        }
        if !longitude_in_range(self.longitude) {
            return Err(Error::InvalidInput(format!(
                "longitude must be between -180 and 180, got {}",
                self.longitude
            )));
        }
        if !self.radius_m.is_finite() || self.radius_m < 0.0 {
            return Err(Error::InvalidInput(format!(
                "radius must be a non-negative number of meters, got {}",
                self.radius_m
            )));
        }
        Ok(())
    }
}
