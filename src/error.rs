use std::path::PathBuf;
use thiserror::Error;

/// Enum of the possible error variants that may be encountered
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A window was requested at an index outside the track
    #[error("index {index} out of range for track of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The track does not contain enough samples for the requested analysis
    #[error("track of length {len} is too short for window sizes {past}/{future}")]
    TrackTooShort {
        len: usize,
        past: usize,
        future: usize,
    },

    /// A track file could not be read or contained malformed rows
    #[error("invalid track file {path}: {source}")]
    InvalidTrack {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Represents a bad CSV record, for any reason
    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
