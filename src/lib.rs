//! Trajectory segmentation and glide-quality analysis for paraglider
//! flight tracks.
//!
//! The input is a normalized flight log: one CSV row per GPS sample with
//! timestamp, altitude, speeds, distance to takeoff and coordinates. The
//! segmentation engine labels each sample as straight flight or turning,
//! the threshold optimizer searches the window-size grid for the labeling
//! configuration with the best regression statistics, and the physics
//! module checks the stationary-glide force balance against the labeled
//! straight segments.

pub mod error;
pub mod physics;
pub mod segmentation;
pub mod track;

pub use error::AnalysisError;
pub use segmentation::config::{AnalysisConfig, OptimizerConfig};
pub use segmentation::labeler::{label_track, write_labeled, LabeledPoint};
pub use segmentation::optimizer::{best, par_search, preferred, search, write_candidates, Candidate};
pub use track::{read_track, TrackPoint};
