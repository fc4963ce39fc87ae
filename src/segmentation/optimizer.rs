//! Window-size grid search.
//!
//! Re-runs the track labeler over the full cross product of past/future
//! window sizes and ranks each configuration by a weighted scalarization of
//! its regression statistics over straight-labeled rows. The companion
//! `preferred` helper trades the score off against the data loss, the
//! fraction of rows a configuration spends on straight-run endpoints.

use crate::error::AnalysisError;
use crate::segmentation::classifier::Position;
use crate::segmentation::config::{AnalysisConfig, OptimizerConfig};
use crate::segmentation::labeler::{label_track, LabeledPoint};
use crate::track::TrackPoint;
use itertools::iproduct;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// One tested window-size configuration. The first two columns keep the
/// historical `angle_*_threshold` names of the output schema even though
/// they hold window sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    #[serde(rename = "angle_past_threshold")]
    pub past_window_size: usize,
    #[serde(rename = "angle_future_threshold")]
    pub future_window_size: usize,
    pub average_r_value: f64,
    pub average_p_value: f64,
    pub average_std_err: f64,
    pub score: f64,
    pub data_loss: f64,
}

/// Advisory progress report emitted between sequential grid iterations.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub last_duration: Duration,
    pub estimated_remaining: Duration,
}

/// Remaining wall-clock estimate: the most recent iteration's duration
/// multiplied by the iterations still to run.
pub fn estimate_remaining(last_duration: Duration, completed: usize, total: usize) -> Duration {
    last_duration * total.saturating_sub(completed) as u32
}

/// Weighted scalarization of the three regression statistics. Rewards strong
/// correlation, penalizes statistical noise and fit uncertainty.
pub fn score(config: &OptimizerConfig, mean_r: f64, mean_p: f64, mean_std_err: f64) -> f64 {
    mean_r * config.r_value_weight
        - mean_p * config.p_value_weight
        - mean_std_err * config.std_error_weight
}

fn mean<I: Iterator<Item = f64>>(values: I) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    // 0/0 deliberately yields NaN; candidates with no straight rows are
    // dropped before ranking.
    sum / count as f64
}

fn straight_rows(labeled: &[LabeledPoint]) -> impl Iterator<Item = &LabeledPoint> {
    labeled
        .iter()
        .filter(|row| row.position() == Position::Straight)
}

/// Labels the track with one window-size pair and reduces it to a candidate.
///
/// # Errors
/// Will return `Err` if the track cannot be labeled with these window sizes.
pub fn evaluate(
    points: &[TrackPoint],
    analysis: &AnalysisConfig,
    optimizer: &OptimizerConfig,
    past_window_size: usize,
    future_window_size: usize,
) -> Result<Candidate, AnalysisError> {
    let labeled = label_track(
        points,
        &analysis.with_windows(past_window_size, future_window_size),
    )?;

    let mean_r = mean(straight_rows(&labeled).map(|row| row.average_r_value));
    let mean_p = mean(straight_rows(&labeled).map(|row| row.average_p_value));
    let mean_std_err = mean(straight_rows(&labeled).map(|row| row.average_std_err));

    let endpoint_rows = labeled
        .iter()
        .filter(|row| row.position() == Position::StraightEnd)
        .count();
    let data_loss = endpoint_rows as f64 / labeled.len() as f64;

    Ok(Candidate {
        past_window_size,
        future_window_size,
        average_r_value: mean_r,
        average_p_value: mean_p,
        average_std_err: mean_std_err,
        score: score(optimizer, mean_r, mean_p, mean_std_err),
        data_loss,
    })
}

/// Drops unusable candidates and sorts the rest by score descending.
///
/// Candidates with a non-finite score (a configuration that produced no
/// straight rows) are excluded. The sort is stable, so equal scores keep
/// grid insertion order; that is the documented tiebreak.
fn rank(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.retain(|candidate| {
        if candidate.score.is_finite() {
            true
        } else {
            warn!(
                past = candidate.past_window_size,
                future = candidate.future_window_size,
                "dropping candidate without straight rows"
            );
            false
        }
    });
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).expect("finite scores"));
    candidates
}

/// Runs the full grid search sequentially, reporting progress between
/// configurations.
///
/// A configuration that fails to label (for example window sizes exceeding
/// the track) is skipped with a warning instead of aborting the search. When
/// the optimizer deadline passes, the configurations not yet started are
/// skipped and the partial ranking is returned.
pub fn search(
    points: &[TrackPoint],
    analysis: &AnalysisConfig,
    optimizer: &OptimizerConfig,
    mut progress: Option<&mut dyn FnMut(Progress)>,
) -> Vec<Candidate> {
    let axis = optimizer.grid_axis();
    let total = axis.len() * axis.len();
    let mut candidates = Vec::with_capacity(total);
    let mut completed = 0usize;

    'grid: for (&past, &future) in iproduct!(axis.iter(), axis.iter()) {
        if let Some(deadline) = optimizer.deadline {
            if Instant::now() >= deadline {
                warn!(completed, total, "deadline reached, returning partial results");
                break 'grid;
            }
        }

        let started = Instant::now();
        match evaluate(points, analysis, optimizer, past, future) {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => warn!(past, future, error = %e, "skipping configuration"),
        }
        completed += 1;

        let last_duration = started.elapsed();
        debug!(past, future, completed, total, "configuration tested");
        if let Some(callback) = progress.as_deref_mut() {
            callback(Progress {
                completed,
                total,
                last_duration,
                estimated_remaining: estimate_remaining(last_duration, completed, total),
            });
        }
    }
    rank(candidates)
}

/// Runs the grid search across all configurations in parallel.
///
/// Configurations are independent, so ordering does not affect the result;
/// candidates are re-sorted after the parallel pass. Progress reporting and
/// the deadline apply to the sequential `search` only.
pub fn par_search(
    points: &[TrackPoint],
    analysis: &AnalysisConfig,
    optimizer: &OptimizerConfig,
) -> Vec<Candidate> {
    let axis = optimizer.grid_axis();
    let grid: Vec<(usize, usize)> = iproduct!(axis.iter().copied(), axis.iter().copied()).collect();

    let candidates: Vec<Candidate> = grid
        .into_par_iter()
        .filter_map(
            |(past, future)| match evaluate(points, analysis, optimizer, past, future) {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    warn!(past, future, error = %e, "skipping configuration");
                    None
                }
            },
        )
        .collect();
    rank(candidates)
}

/// The top `n` candidates of a ranked list.
pub fn best(candidates: &[Candidate], n: usize) -> &[Candidate] {
    &candidates[..n.min(candidates.len())]
}

/// Index of the candidate with the most favorable score-to-loss tradeoff.
///
/// Score and data loss are min-max normalized independently; among rows
/// whose normalized score exceeds their normalized loss in magnitude, the
/// largest |score - loss| wins. Returns `None` for an empty list or when
/// either column's range collapses, in which case no normalization is
/// attempted.
pub fn preferred(candidates: &[Candidate]) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
        values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
    }
    let (score_min, score_max) = min_max(candidates.iter().map(|c| c.score));
    let (loss_min, loss_max) = min_max(candidates.iter().map(|c| c.data_loss));
    if is_close::is_close!(score_min, score_max) || is_close::is_close!(loss_min, loss_max) {
        return None;
    }

    let mut preferred_index = None;
    let mut preferred_gap = f64::NEG_INFINITY;
    for (index, candidate) in candidates.iter().enumerate() {
        let normalized_score = (candidate.score - score_min) / (score_max - score_min);
        let normalized_loss = (candidate.data_loss - loss_min) / (loss_max - loss_min);
        if normalized_score.abs() > normalized_loss.abs() {
            let gap = (normalized_score - normalized_loss).abs();
            if gap > preferred_gap {
                preferred_gap = gap;
                preferred_index = Some(index);
            }
        }
    }
    preferred_index
}

/// Writes ranked candidates to a CSV file, score descending.
///
/// # Errors
/// Will return `Err` if the file cannot be created or a row fails to encode.
pub fn write_candidates<P: AsRef<Path>>(
    candidates: &[Candidate],
    path: P,
) -> Result<(), AnalysisError> {
    let mut writer = csv::Writer::from_path(path)?;
    for candidate in candidates {
        writer.serialize(candidate)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(past: usize, future: usize, score: f64, data_loss: f64) -> Candidate {
        Candidate {
            past_window_size: past,
            future_window_size: future,
            average_r_value: 0.0,
            average_p_value: 0.0,
            average_std_err: 0.0,
            score,
            data_loss,
        }
    }

    #[test]
    fn score_is_the_weighted_scalarization() {
        let config = OptimizerConfig::default();
        let result = score(&config, 0.5, 0.3, 0.2);
        assert_eq!(result, 0.5 * 0.6 - 0.3 * 0.3 - 0.2 * 0.1);
    }

    #[test]
    fn ranking_drops_nan_scores_and_sorts_descending() {
        let ranked = rank(vec![
            candidate(10, 10, 0.2, 0.1),
            candidate(10, 20, f64::NAN, 0.1),
            candidate(20, 10, 0.5, 0.1),
            candidate(20, 20, 0.3, 0.1),
        ]);
        let scores: Vec<f64> = ranked.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![0.5, 0.3, 0.2]);
    }

    #[test]
    fn equal_scores_keep_insertion_order() {
        let ranked = rank(vec![
            candidate(10, 10, 0.4, 0.1),
            candidate(10, 20, 0.4, 0.2),
            candidate(20, 10, 0.4, 0.3),
        ]);
        let order: Vec<(usize, usize)> = ranked
            .iter()
            .map(|c| (c.past_window_size, c.future_window_size))
            .collect();
        assert_eq!(order, vec![(10, 10), (10, 20), (20, 10)]);
    }

    #[test]
    fn best_clamps_to_the_candidate_count() {
        let ranked = vec![candidate(10, 10, 0.4, 0.1), candidate(10, 20, 0.3, 0.2)];
        assert_eq!(best(&ranked, 5).len(), 2);
        assert_eq!(best(&ranked, 1).len(), 1);
        assert_eq!(best(&ranked, 1)[0].score, 0.4);
    }

    #[test]
    fn preferred_picks_the_widest_favorable_gap() {
        let candidates = vec![
            candidate(10, 10, 1.0, 1.0),  // normalized (1, 1): gap 0
            candidate(10, 20, 0.9, 0.0),  // normalized (0.8, 0): gap 0.8
            candidate(20, 10, 0.5, 0.5),  // normalized (0, 0.5): loss dominates
        ];
        assert_eq!(preferred(&candidates), Some(1));
    }

    #[test]
    fn preferred_refuses_collapsed_ranges() {
        assert_eq!(preferred(&[]), None);
        let flat_score = vec![candidate(10, 10, 0.4, 0.1), candidate(10, 20, 0.4, 0.5)];
        assert_eq!(preferred(&flat_score), None);
        let flat_loss = vec![candidate(10, 10, 0.4, 0.1), candidate(10, 20, 0.6, 0.1)];
        assert_eq!(preferred(&flat_loss), None);
    }

    #[test]
    fn remaining_time_scales_with_iterations_left() {
        let estimate = estimate_remaining(Duration::from_secs(2), 10, 100);
        assert_eq!(estimate, Duration::from_secs(180));
        assert_eq!(
            estimate_remaining(Duration::from_secs(2), 100, 100),
            Duration::ZERO
        );
    }
}
