//! Point classification from the four straightness verdicts.
//!
//! The decision table is the central business rule of the segmentation
//! engine: a point is straight only when both criteria agree on both the
//! past and the future window. A point whose past is straight but whose
//! future is not closes a straight run; the mirror case opens one.

/// Categorical label of an analyzed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Point lies on a straight line
    Straight,
    /// Trailing end of a straight run
    StraightEnd,
    /// Leading edge of an upcoming straight run
    StraightStart,
    /// Point lies on a curve, an overlap, or could not be resolved
    Curve,
}

impl Position {
    pub fn code(&self) -> u8 {
        match self {
            Position::Straight => 0,
            Position::StraightEnd => 1,
            Position::StraightStart => 2,
            Position::Curve => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Position::Straight => "straight line",
            Position::StraightEnd => "straight line end",
            Position::StraightStart => "straight line start",
            Position::Curve => "curve/overlap",
        }
    }
}

/// Verdict of one analyzed point. A pure function of the four classifier
/// booleans; identical inputs always produce the identical verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointVerdict {
    pub status: bool,
    pub position: Position,
}

/// Combines the four straightness verdicts into the final point label.
pub fn classify(
    status_angle_past: bool,
    status_regression_past: bool,
    status_angle_future: bool,
    status_regression_future: bool,
) -> PointVerdict {
    let past = status_angle_past && status_regression_past;
    let future = status_angle_future && status_regression_future;
    let position = match (past, future) {
        (true, true) => Position::Straight,
        (true, false) => Position::StraightEnd,
        (false, true) => Position::StraightStart,
        (false, false) => Position::Curve,
    };
    PointVerdict {
        status: position == Position::Straight,
        position,
    }
}
