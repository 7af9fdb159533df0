use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::error::PassError;
use super::types::PassRecord;
use crate::geometry::{interpolate_azimuth, normalize_azimuth};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAngle {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

/// A time-stepped look angle along a pass.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PathSample {
    pub timestamp: DateTime<Utc>,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    /// Milliseconds since the previous sample, 0 for the first.
    pub delta_ms: i64,
}

#[derive(Clone, Copy)]
struct KeyPoint {
    time: f64,
    azimuth: f64,
    elevation: f64,
}

/// Look angle at `time` (seconds since epoch, clamped to the pass).
///
/// Interpolates piecewise between the start/max and max/end key points:
/// azimuth the short way around, elevation linearly.
pub fn look_angle_at(pass: &PassRecord, time: f64) -> LookAngle {
    let start = KeyPoint {
        time: pass.start_time as f64,
        azimuth: pass.start_azimuth,
        elevation: pass.start_elevation,
    };
    let max = KeyPoint {
        time: pass.max_time as f64,
        azimuth: pass.max_azimuth,
        elevation: pass.max_elevation,
    };
    let end = KeyPoint {
        time: pass.end_time as f64,
        azimuth: pass.end_azimuth,
        elevation: pass.end_elevation,
    };

    let time = time.clamp(start.time, end.time.max(start.time));
    let (from, to) = if time < max.time || end.time <= max.time {
        (start, max)
    } else {
        (max, end)
    };
    let u = if to.time > from.time {
        ((time - from.time) / (to.time - from.time)).clamp(0.0, 1.0)
    } else {
        1.0
    };

    LookAngle {
        azimuth_deg: interpolate_azimuth(from.azimuth, to.azimuth, u),
        elevation_deg: from.elevation + u * (to.elevation - from.elevation),
    }
}

/// Look angle at normalized progress `t` across the full pass.
pub fn look_angle_at_progress(pass: &PassRecord, t: f64) -> LookAngle {
    let time = pass.start_time as f64 + t * pass.span_seconds() as f64;
    look_angle_at(pass, time)
}

/// Sample the pass every `step` from start to end, rounding angles to
/// `decimals` places.
pub fn sample_path(
    pass: &PassRecord,
    step: Duration,
    decimals: u32,
) -> Result<Vec<PathSample>, PassError> {
    pass.validate()?;
    if step <= Duration::zero() {
        return Err(PassError::InvalidStep);
    }

    let start = pass
        .start_at()
        .ok_or(PassError::TimestampOutOfRange(pass.start_time))?;
    let end = pass
        .end_at()
        .ok_or(PassError::TimestampOutOfRange(pass.end_time))?;

    let mut cursor = start;
    let mut previous: Option<DateTime<Utc>> = None;
    let mut samples = Vec::new();

    while cursor <= end {
        let angle = look_angle_at(pass, cursor.timestamp_millis() as f64 / 1000.0);
        let delta_ms = previous
            .map(|p| (cursor - p).num_milliseconds())
            .unwrap_or(0);

        samples.push(PathSample {
            timestamp: cursor,
            azimuth_deg: normalize_azimuth(round_to(angle.azimuth_deg, decimals)),
            elevation_deg: round_to(angle.elevation_deg, decimals),
            delta_ms,
        });

        previous = Some(cursor);
        cursor += step;
    }

    Ok(samples)
}

/// Halves go to the even neighbour.
fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round_ties_even() / scale
}
