//! Past/future window extraction.
//!
//! A window is a contiguous slice of the track anchored at an analyzed point.
//! Past windows end at and include the anchor, future windows start at and
//! include it. Windows shrink at the edges of the track rather than erroring;
//! only an out-of-bounds anchor is an error.

use crate::error::AnalysisError;
use crate::track::TrackPoint;

/// Extracts the window of up to `size` samples ending at index `i` inclusive.
///
/// # Errors
/// Will return `Err` if `i` is outside the track.
pub fn past_window(
    points: &[TrackPoint],
    i: usize,
    size: usize,
) -> Result<&[TrackPoint], AnalysisError> {
    if i >= points.len() {
        return Err(AnalysisError::IndexOutOfRange {
            index: i,
            len: points.len(),
        });
    }
    if i < size {
        Ok(&points[0..=i])
    } else {
        Ok(&points[i - size + 1..=i])
    }
}

/// Extracts the window of up to `size` samples starting at index `i` inclusive.
///
/// # Errors
/// Will return `Err` if `i` is outside the track.
pub fn future_window(
    points: &[TrackPoint],
    i: usize,
    size: usize,
) -> Result<&[TrackPoint], AnalysisError> {
    if i >= points.len() {
        return Err(AnalysisError::IndexOutOfRange {
            index: i,
            len: points.len(),
        });
    }
    if i + size >= points.len() {
        Ok(&points[i..])
    } else {
        Ok(&points[i..i + size])
    }
}
