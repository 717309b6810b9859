use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Rider saddle position shared by every frame of a resolved catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaddleConfig {
    /// Distance from the bottom-bracket axle to the saddle along the seat tube (cm).
    pub saddle_height: f64,
    /// Horizontal setback of the saddle behind the bottom-bracket axle (cm).
    pub saddle_fore_aft: f64,
}

impl Default for SaddleConfig {
    fn default() -> Self {
        Self {
            saddle_height: 74.5,
            saddle_fore_aft: 20.5,
        }
    }
}

impl SaddleConfig {
    pub fn new(saddle_height: f64, saddle_fore_aft: f64) -> Self {
        Self {
            saddle_height,
            saddle_fore_aft,
        }
    }

    /// Both lengths are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.saddle_height.is_finite() && self.saddle_fore_aft.is_finite()
    }
}

/// Fixed dimensions and tolerances used by the geometry resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConstants {
    /// Tyre circumference (cm).
    pub wheel_circumference: f64,
    /// Crank length used when the catalog leaves it unset (cm).
    pub default_crank_length: f64,
    /// Head-tube distance from the stem base down to the top-tube junction
    /// when walking back from reach/stack.
    pub reach_stack_top_tube_offset: f64,
    /// Head-tube distance from the top-tube junction up to the stem base
    /// when walking forward from the virtual tubes.
    pub virtual_tube_top_tube_offset: f64,
    /// Relative tolerance of the wheel-diameter consistency check.
    pub wheel_diameter_tolerance: f64,
    /// Relative tolerance of the wheelbase / front-center consistency check.
    pub wheelbase_tolerance: f64,
}

impl Default for GeometryConstants {
    fn default() -> Self {
        Self {
            wheel_circumference: 211.0,
            default_crank_length: 17.25,
            reach_stack_top_tube_offset: 4.25,
            virtual_tube_top_tube_offset: 3.77,
            wheel_diameter_tolerance: 0.03,
            wheelbase_tolerance: 0.01,
        }
    }
}

impl GeometryConstants {
    #[inline]
    pub fn wheel_diameter(&self) -> f64 {
        self.wheel_circumference / PI
    }

    #[inline]
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_diameter() / 2.0
    }
}
