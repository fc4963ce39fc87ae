//! Slides the point classifier over an entire track.

use crate::error::AnalysisError;
use crate::segmentation::angles::{deviation_angles, is_straight_by_angle};
use crate::segmentation::classifier::{classify, Position};
use crate::segmentation::config::AnalysisConfig;
use crate::segmentation::regression::{fit_line, is_straight_by_regression};
use crate::segmentation::window::{future_window, past_window};
use crate::track::TrackPoint;
use serde::Serialize;
use std::path::Path;

/// One labeled output row: the original sample fields plus the verdict and
/// the averaged past/future fit statistics. The sample fields are spelled
/// out rather than nested so the row maps onto a flat CSV record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledPoint {
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
    pub status: bool,
    pub position_str: &'static str,
    pub position_int: u8,
    pub average_r_value: f64,
    pub average_p_value: f64,
    pub average_std_err: f64,
}

impl LabeledPoint {
    pub fn position(&self) -> Position {
        match self.position_int {
            0 => Position::Straight,
            1 => Position::StraightEnd,
            2 => Position::StraightStart,
            _ => Position::Curve,
        }
    }
}

/// Labels every analyzable point of a track.
///
/// Points closer than one full window to either edge of the track cannot be
/// classified and are excluded from the output. The result is fully
/// determined by the track and the configuration; re-running is byte
/// identical.
///
/// # Errors
/// Will return `Err` if the track is too short to hold a single full
/// past-plus-future window pair.
pub fn label_track(
    points: &[TrackPoint],
    config: &AnalysisConfig,
) -> Result<Vec<LabeledPoint>, AnalysisError> {
    let past = config.past_window_size;
    let future = config.future_window_size;
    if points.len() < past + future {
        return Err(AnalysisError::TrackTooShort {
            len: points.len(),
            past,
            future,
        });
    }

    let mut labeled = Vec::with_capacity(points.len() - past - future + 1);
    for i in past..points.len() - future {
        let past_points = past_window(points, i, past)?;
        let future_points = future_window(points, i, future)?;

        let status_angle_past =
            is_straight_by_angle(&deviation_angles(past_points), config.angle_threshold);
        let status_angle_future =
            is_straight_by_angle(&deviation_angles(future_points), config.angle_threshold);

        let fit_past = fit_line(past_points);
        let fit_future = fit_line(future_points);
        let status_regression_past = is_straight_by_regression(&fit_past, config.r_value_threshold);
        let status_regression_future =
            is_straight_by_regression(&fit_future, config.r_value_threshold);

        let verdict = classify(
            status_angle_past,
            status_regression_past,
            status_angle_future,
            status_regression_future,
        );

        let point = &points[i];
        labeled.push(LabeledPoint {
            timestamp: point.timestamp.clone(),
            altitude: point.altitude,
            horizontal_velocity: point.horizontal_velocity,
            vertical_velocity: point.vertical_velocity,
            distance_to_takeoff: point.distance_to_takeoff,
            longitude: point.longitude,
            latitude: point.latitude,
            status: verdict.status,
            position_str: verdict.position.label(),
            position_int: verdict.position.code(),
            average_r_value: (fit_past.r_value + fit_future.r_value) / 2.0,
            average_p_value: (fit_past.p_value + fit_future.p_value) / 2.0,
            average_std_err: (fit_past.std_err + fit_future.std_err) / 2.0,
        });
    }
    Ok(labeled)
}

/// Writes labeled rows to a CSV file with the input columns plus the verdict
/// and statistics columns.
///
/// # Errors
/// Will return `Err` if the file cannot be created or a row fails to encode.
pub fn write_labeled<P: AsRef<Path>>(
    labeled: &[LabeledPoint],
    path: P,
) -> Result<(), AnalysisError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in labeled {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lon: f64, lat: f64) -> TrackPoint {
        TrackPoint {
            timestamp: "2024-02-11 14:13:53".to_string(),
            altitude: 1000.0,
            horizontal_velocity: 10.0,
            vertical_velocity: -1.0,
            distance_to_takeoff: 1.0,
            longitude: lon,
            latitude: lat,
        }
    }

    fn straight_track(n: usize) -> Vec<TrackPoint> {
        (0..n)
            .map(|k| point(7.0 + 0.0001 * k as f64, 46.0 + 0.0002 * k as f64))
            .collect()
    }

    #[test]
    fn edge_points_are_excluded_not_errored() {
        let points = straight_track(100);
        let config = AnalysisConfig {
            past_window_size: 10,
            future_window_size: 15,
            ..Default::default()
        };
        let labeled = label_track(&points, &config).unwrap();
        assert_eq!(labeled.len(), 100 - 10 - 15);
        assert_eq!(labeled[0].longitude, points[10].longitude);
        assert_eq!(labeled.last().unwrap().longitude, points[84].longitude);
    }

    #[test]
    fn a_straight_track_labels_straight() {
        let points = straight_track(80);
        let config = AnalysisConfig {
            past_window_size: 10,
            future_window_size: 10,
            ..Default::default()
        };
        let labeled = label_track(&points, &config).unwrap();
        for row in &labeled {
            assert!(row.status);
            assert_eq!(row.position_int, 0);
            assert_eq!(row.position_str, "straight line");
            assert!(row.average_r_value > 0.99);
        }
    }

    #[test]
    fn too_short_tracks_are_an_error() {
        let points = straight_track(19);
        let config = AnalysisConfig {
            past_window_size: 10,
            future_window_size: 10,
            ..Default::default()
        };
        assert!(matches!(
            label_track(&points, &config),
            Err(AnalysisError::TrackTooShort { len: 19, .. })
        ));
    }

    #[test]
    fn labeling_is_deterministic() {
        let points = straight_track(60);
        let config = AnalysisConfig {
            past_window_size: 12,
            future_window_size: 12,
            ..Default::default()
        };
        let first = label_track(&points, &config).unwrap();
        let second = label_track(&points, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn labeled_rows_serialize_with_the_output_columns() {
        let points = straight_track(40);
        let config = AnalysisConfig {
            past_window_size: 10,
            future_window_size: 10,
            ..Default::default()
        };
        let labeled = label_track(&points, &config).unwrap();

        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&labeled[0]).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "timestamp [UTC],relative altitude [m],horizontal velocity [m/s],\
             vertical velocity [m/s],distance to takeoff [km],longitude,latitude,\
             status,position_str,position_int,average_r_value,average_p_value,\
             average_std_err"
        );
    }
}
