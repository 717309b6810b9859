//! Catalog-wide ratio statistics.
//!
//! Reporting only: the distance function never reads these.

use crate::frame::ResolvedFrame;
use serde::Serialize;

/// Scale of the normalized ratio score.
pub const NORMALIZED_SCALE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatioSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: usize,
}

impl RatioSummary {
    /// Summary over the finite values only. `None` when there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }
        (count > 0).then(|| Self {
            min,
            max,
            mean: sum / count as f64,
            count,
        })
    }

    /// `10 × (v − min) / (max − min)`; undefined when every value is equal
    /// or `value` is not finite.
    pub fn normalize(&self, value: f64) -> Option<f64> {
        let span = self.max - self.min;
        (value.is_finite() && span > 0.0).then(|| NORMALIZED_SCALE * (value - self.min) / span)
    }

    pub fn score(&self, value: f64) -> RatioScore {
        RatioScore {
            value,
            mean: self.mean,
            normalized: self.normalize(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatioScore {
    pub value: f64,
    pub mean: f64,
    pub normalized: Option<f64>,
}

/// Per-frame ratios placed against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameIndicators {
    pub stack_reach: RatioScore,
    pub dsd_drop: RatioScore,
    pub dsd_saddle_height: RatioScore,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CatalogStats {
    pub frames: usize,
    pub resolved: usize,
    pub stack_reach: Option<RatioSummary>,
    pub dsd_drop: Option<RatioSummary>,
    pub dsd_saddle_height: Option<RatioSummary>,
}

impl CatalogStats {
    /// Unresolved frames are counted but contribute no ratios.
    pub fn compute(frames: &[ResolvedFrame]) -> Self {
        let resolved = || frames.iter().filter(|f| f.is_resolved());
        Self {
            frames: frames.len(),
            resolved: resolved().count(),
            stack_reach: RatioSummary::from_values(resolved().map(ResolvedFrame::ratio_stack_reach)),
            dsd_drop: RatioSummary::from_values(resolved().map(ResolvedFrame::ratio_dsd_drop)),
            dsd_saddle_height: RatioSummary::from_values(
                resolved().map(ResolvedFrame::ratio_dsd_saddle_height),
            ),
        }
    }

    pub fn indicators(&self, frame: &ResolvedFrame) -> Option<FrameIndicators> {
        if !frame.is_resolved() {
            return None;
        }
        Some(FrameIndicators {
            stack_reach: self.stack_reach?.score(frame.ratio_stack_reach()),
            dsd_drop: self.dsd_drop?.score(frame.ratio_dsd_drop()),
            dsd_saddle_height: self.dsd_saddle_height?.score(frame.ratio_dsd_saddle_height()),
        })
    }
}
