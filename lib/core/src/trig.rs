//! Angle and plane-geometry primitives.
//!
//! All frame coordinates live in a 2D plane with the bottom-bracket axle at
//! the origin, X pointing forward and Y pointing up. Angles are in degrees and
//! are normalized into `[0, 360)` before conversion to radians.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Normalize an angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let d = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

/// Convert degrees to radians after normalization.
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    normalize_degrees(degrees) / 360.0 * 2.0 * PI
}

/// Convert radians to degrees, normalized into `[0, 360)`.
#[inline]
pub fn radians_to_degrees(radians: f64) -> f64 {
    normalize_degrees(radians * 360.0 / (2.0 * PI))
}

/// Euclidean distance between two points given by their coordinates.
#[inline]
pub fn point_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
}

/// `|a - b| / max(a, b)`; used by the consistency cross-checks.
#[inline]
pub fn relative_difference(a: f64, b: f64) -> f64 {
    (a - b).abs() / a.max(b)
}

/// `true` when `a` and `b` agree within `tolerance` (relative).
/// Non-finite inputs never agree.
#[inline]
pub fn within_tolerance(a: f64, b: f64, tolerance: f64) -> bool {
    relative_difference(a, b) <= tolerance
}

/// A point in the frame plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Move `length` along the direction `angle_deg` (counter-clockwise from +X).
    /// Negative lengths walk backwards along the same line.
    #[inline]
    #[must_use]
    pub fn along(self, angle_deg: f64, length: f64) -> Self {
        let a = degrees_to_radians(angle_deg);
        Self {
            x: self.x + length * a.cos(),
            y: self.y + length * a.sin(),
        }
    }

    #[inline]
    #[must_use]
    pub fn offset_x(self, dx: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y,
        }
    }

    #[inline]
    pub fn distance(&self, other: &Point2) -> f64 {
        point_distance(self.x, self.y, other.x, other.y)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
