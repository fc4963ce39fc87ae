//! Flight track model and CSV ingest.
//!
//! A track is an ordered sequence of GPS samples taken from a normalized
//! flight log. The sample's position in the recording is its canonical key;
//! all windowing downstream is sample-count based, never time based.

use crate::error::AnalysisError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One recorded instant of flight. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    #[serde(rename = "timestamp [UTC]")]
    pub timestamp: String,
    #[serde(rename = "relative altitude [m]")]
    pub altitude: f64,
    #[serde(rename = "horizontal velocity [m/s]")]
    pub horizontal_velocity: f64,
    #[serde(rename = "vertical velocity [m/s]")]
    pub vertical_velocity: f64,
    #[serde(rename = "distance to takeoff [km]")]
    pub distance_to_takeoff: f64,
    pub longitude: f64,
    pub latitude: f64,
}

/// Reads a normalized flight track from a CSV file.
///
/// # Errors
/// Will return `Err` if the file cannot be opened or any row does not match
/// the expected column schema. Malformed upstream files are fatal; no row is
/// silently skipped.
pub fn read_track<P: AsRef<Path>>(path: P) -> Result<Vec<TrackPoint>, AnalysisError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;
    let mut points = vec![];
    for record in reader.deserialize() {
        let point: TrackPoint = record.map_err(|e| AnalysisError::InvalidTrack {
            path: path.to_path_buf(),
            source: e,
        })?;
        points.push(point);
    }
    Ok(points)
}

/// Recording summary derived from the timestamp column, for reporting only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSummary {
    pub samples: usize,
    pub duration_s: i64,
    pub sampling_interval_s: f64,
}

/// Summarizes the recording span of a track.
///
/// Returns `None` if the track holds fewer than two samples or the first or
/// last timestamp does not parse as `%Y-%m-%d %H:%M:%S`.
pub fn summarize(points: &[TrackPoint]) -> Option<TrackSummary> {
    let first = points.first()?;
    let last = points.last()?;
    if points.len() < 2 {
        return None;
    }
    let start = NaiveDateTime::parse_from_str(&first.timestamp, TIMESTAMP_FORMAT).ok()?;
    let end = NaiveDateTime::parse_from_str(&last.timestamp, TIMESTAMP_FORMAT).ok()?;
    let duration_s = (end - start).num_seconds();
    Some(TrackSummary {
        samples: points.len(),
        duration_s,
        sampling_interval_s: duration_s as f64 / (points.len() - 1) as f64,
    })
}
