//! Stationary-glide force model.
//!
//! Closed-form checks of how well the power-law lift/drag coefficient
//! approximations reproduce the force balance of a stationary glide. The
//! coefficient exponents come from fitting measured speed-polar data; the
//! expected resultant force at the wing is simply the pilot-plus-wing
//! weight.

use crate::segmentation::classifier::Position;
use crate::segmentation::labeler::LabeledPoint;

/// Physical constants of the modeled glider. Explicit value, no globals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    /// Air density [kg/m^3]
    pub air_density: f64,
    /// Projected wing area [m^2]
    pub wing_area: f64,
    /// Static air pressure at flight altitude [Pa]
    pub static_pressure: f64,
    /// Takeoff mass of pilot and wing [kg]
    pub mass: f64,
    /// Gravitational acceleration [m/s^2]
    pub gravity: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            air_density: 1.225,
            wing_area: 23.1,
            static_pressure: 101_325.0,
            mass: 90.0,
            gravity: 9.81,
        }
    }
}

/// Lift coefficient approximation cA(v) = 35.86 * v^-1.99.
pub fn lift_coefficient(airspeed: f64) -> f64 {
    35.86 * airspeed.powf(-1.99)
}

/// Drag coefficient approximation cW(v) = 15.56 * v^-2.51.
pub fn drag_coefficient(airspeed: f64) -> f64 {
    15.56 * airspeed.powf(-2.51)
}

/// Resultant aerodynamic force at the wing [N].
pub fn resultant_force(config: &PhysicsConfig, airspeed: f64, ca: f64, cw: f64) -> f64 {
    (config.air_density * config.wing_area * airspeed.powi(2) * (ca.powi(2) + cw.powi(2))).sqrt()
}

/// Dynamic pressure at the wing [N/m^2].
pub fn dynamic_pressure(config: &PhysicsConfig, airspeed: f64, ca: f64, cw: f64) -> f64 {
    resultant_force(config, airspeed, ca, cw)
        / (config.wing_area * (ca.powi(2) + cw.powi(2)).sqrt())
}

/// Total pressure at the wing: static plus dynamic [N/m^2].
pub fn total_pressure(config: &PhysicsConfig, dynamic_pressure: f64) -> f64 {
    config.static_pressure + dynamic_pressure
}

/// Deviation of the modeled force balance from the expected weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlideQuality {
    /// Mean of (expected - modeled) resultant force [N]
    pub mean_deviation: f64,
    /// Mean modeled force as a percentage of expected, minus 100
    pub mean_deviation_percent: f64,
}

/// Compares the modeled resultant force against the expected `m * g` for a
/// set of airspeed samples. Returns `None` for an empty input.
pub fn glide_quality(config: &PhysicsConfig, airspeeds: &[f64]) -> Option<GlideQuality> {
    if airspeeds.is_empty() {
        return None;
    }
    let expected = config.mass * config.gravity;
    let mut deviation_sum = 0.0;
    let mut percent_sum = 0.0;
    for &airspeed in airspeeds {
        let force = resultant_force(
            config,
            airspeed,
            lift_coefficient(airspeed),
            drag_coefficient(airspeed),
        );
        deviation_sum += expected - force;
        percent_sum += force / expected * 100.0;
    }
    let n = airspeeds.len() as f64;
    Some(GlideQuality {
        mean_deviation: deviation_sum / n,
        mean_deviation_percent: percent_sum / n - 100.0,
    })
}

/// Horizontal-speed band accepted by the glide-point filter [m/s].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedBand {
    pub min_horizontal: f64,
    pub max_horizontal: f64,
}

impl Default for SpeedBand {
    fn default() -> Self {
        // The usable speed range of the measured polar.
        SpeedBand {
            min_horizontal: 8.0,
            max_horizontal: 15.5,
        }
    }
}

/// Selects labeled points usable for the glide model: straight-line points
/// inside the speed band that are actually sinking.
pub fn filter_glide_points<'a>(
    labeled: &'a [LabeledPoint],
    band: &SpeedBand,
) -> Vec<&'a LabeledPoint> {
    labeled
        .iter()
        .filter(|row| {
            row.position() == Position::Straight
                && row.horizontal_velocity > band.min_horizontal
                && row.horizontal_velocity < band.max_horizontal
                && row.vertical_velocity < 0.0
        })
        .collect()
}
