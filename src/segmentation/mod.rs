//! Trajectory segmentation engine.
//!
//! Labels every sample of a GPS track as lying on a straight glide segment
//! or on a turn, by running two independent straightness criteria over a
//! past and a future window at each point and combining the four verdicts
//! through a fixed decision table. The optimizer calibrates the window
//! sizes against a scored objective.

pub mod angles;
pub mod classifier;
pub mod config;
pub mod labeler;
pub mod optimizer;
pub mod regression;
pub mod window;
