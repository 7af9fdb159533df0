use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::PassError;
use crate::geometry::compass_point;

/// Elevations this far outside `[0, 90]` are still accepted from the
/// prediction service.
pub const ELEVATION_TOLERANCE_DEG: f64 = 0.5;

/// A single visibility window as reported by the prediction service.
///
/// Field names follow the service's JSON (`startAz`, `startUTC`, ...).
/// Azimuths are passed through unnormalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PassRecord {
    #[serde(rename = "startAz")]
    pub start_azimuth: f64,
    #[serde(rename = "startEl")]
    pub start_elevation: f64,
    #[serde(rename = "startUTC")]
    pub start_time: i64,
    #[serde(rename = "maxAz")]
    pub max_azimuth: f64,
    #[serde(rename = "maxEl")]
    pub max_elevation: f64,
    #[serde(rename = "maxUTC")]
    pub max_time: i64,
    #[serde(rename = "endAz")]
    pub end_azimuth: f64,
    #[serde(rename = "endEl")]
    pub end_elevation: f64,
    #[serde(rename = "endUTC")]
    pub end_time: i64,
}

/// Identity of a pass record, used to memoize derived geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassKey([u64; 9]);

impl PassRecord {
    pub fn key(&self) -> PassKey {
        PassKey([
            self.start_azimuth.to_bits(),
            self.start_elevation.to_bits(),
            self.start_time as u64,
            self.max_azimuth.to_bits(),
            self.max_elevation.to_bits(),
            self.max_time as u64,
            self.end_azimuth.to_bits(),
            self.end_elevation.to_bits(),
            self.end_time as u64,
        ])
    }

    pub fn span_seconds(&self) -> i64 {
        self.end_time.saturating_sub(self.start_time)
    }

    pub fn start_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.start_time, 0)
    }

    pub fn end_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.end_time, 0)
    }

    /// Reject records that cannot be turned into a trajectory.
    pub fn validate(&self) -> Result<(), PassError> {
        let angles = [
            ("startAz", self.start_azimuth),
            ("startEl", self.start_elevation),
            ("maxAz", self.max_azimuth),
            ("maxEl", self.max_elevation),
            ("endAz", self.end_azimuth),
            ("endEl", self.end_elevation),
        ];
        if let Some((field, _)) = angles.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PassError::NonFinite { field });
        }

        let span = self.span_seconds();
        if span <= 0 {
            return Err(PassError::EmptySpan { seconds: span });
        }
        if self.max_time < self.start_time || self.max_time > self.end_time {
            return Err(PassError::NonMonotonic {
                start: self.start_time,
                max: self.max_time,
                end: self.end_time,
            });
        }

        let elevations = [
            ("startEl", self.start_elevation),
            ("maxEl", self.max_elevation),
            ("endEl", self.end_elevation),
        ];
        for (field, value) in elevations {
            if value < -ELEVATION_TOLERANCE_DEG || value > 90.0 + ELEVATION_TOLERANCE_DEG {
                return Err(PassError::ElevationOutOfRange { field, value });
            }
        }

        for time in [self.start_time, self.end_time] {
            if DateTime::from_timestamp(time, 0).is_none() {
                return Err(PassError::TimestampOutOfRange(time));
            }
        }

        Ok(())
    }

    pub fn summary(&self) -> Result<PassSummary, PassError> {
        self.validate()?;
        let at = |t: i64| DateTime::from_timestamp(t, 0).ok_or(PassError::TimestampOutOfRange(t));
        Ok(PassSummary {
            start: at(self.start_time)?,
            max: at(self.max_time)?,
            end: at(self.end_time)?,
            max_elevation_deg: self.max_elevation,
            duration_minutes: (self.span_seconds() as f64 / 60.0).round() as i64,
            start_compass: compass_point(self.start_azimuth).to_string(),
            max_compass: compass_point(self.max_azimuth).to_string(),
            end_compass: compass_point(self.end_azimuth).to_string(),
        })
    }
}

/// Human-facing description of a pass.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PassSummary {
    pub start: DateTime<Utc>,
    pub max: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub duration_minutes: i64,
    pub start_compass: String,
    pub max_compass: String,
    pub end_compass: String,
}

/// Geodetic location of the observing ground station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ObserverCoordinates {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, alias = "altitude_m")]
    pub altitude: f64,
}

impl Default for ObserverCoordinates {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
        }
    }
}

impl ObserverCoordinates {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Result<Self, PassError> {
        let coords = Self {
            latitude,
            longitude,
            altitude,
        };
        coords.validate()?;
        Ok(coords)
    }

    pub fn validate(&self) -> Result<(), PassError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(PassError::InvalidObserver(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(PassError::InvalidObserver(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        if !(self.altitude >= 0.0 && self.altitude.is_finite()) {
            return Err(PassError::InvalidObserver(format!(
                "altitude {} must be a non-negative number",
                self.altitude
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn reference_pass() -> PassRecord {
    PassRecord {
        start_azimuth: 0.0,
        start_elevation: 0.0,
        start_time: 0,
        max_azimuth: 90.0,
        max_elevation: 45.0,
        max_time: 50,
        end_azimuth: 180.0,
        end_elevation: 0.0,
        end_time: 100,
    }
}
