use crate::config::SaddleConfig;
use crate::diagnostic::Diagnostic;
use crate::geometry::{BracketPath, FrameGeometry, HeadSetPath, WheelbasePath};
use crate::record::RawFrameRecord;
use crate::stats::FrameIndicators;
use crate::trig::{degrees_to_radians, Point2};
use serde::Serialize;

/// How a frame was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResolutionStatus {
    Resolved {
        bracket: BracketPath,
        head_set: HeadSetPath,
        wheelbase: WheelbasePath,
    },
    /// A required input group was missing or the measurements contradict
    /// each other; geometry is zeroed.
    Unresolved,
}

/// Rider saddle position in the frame plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SaddlePlacement {
    /// Saddle height along the seat tube this placement was computed for.
    pub height: f64,
    pub x: f64,
    pub y: f64,
    /// Saddle height above the stem base.
    pub drop: f64,
    /// Seat-tube line X at saddle height.
    pub seat_tube_x: f64,
}

impl SaddlePlacement {
    pub fn compute(saddle: &SaddleConfig, geometry: &FrameGeometry) -> Self {
        let sta = degrees_to_radians(geometry.seat_tube_angle);
        let y = saddle.saddle_height * sta.sin();
        Self {
            height: saddle.saddle_height,
            x: -saddle.saddle_fore_aft,
            y,
            drop: y - geometry.stem_base.y,
            seat_tube_x: saddle.saddle_height * sta.cos(),
        }
    }

    pub fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Positive when the saddle sits ahead of the seat-tube line.
    pub fn setback_from_seat_tube(&self) -> f64 {
        self.x - self.seat_tube_x
    }
}

/// A catalog row together with its resolved geometry and saddle placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFrame {
    pub record: RawFrameRecord,
    pub geometry: FrameGeometry,
    pub saddle: SaddlePlacement,
    pub status: ResolutionStatus,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<FrameIndicators>,
}

impl ResolvedFrame {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// `brand model size year`
    pub fn label(&self) -> String {
        format!(
            "{} {} {} {}",
            self.record.brand, self.record.model, self.record.size, self.record.year
        )
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.status, ResolutionStatus::Resolved { .. })
    }

    /// Saddle to stem-base distance.
    pub fn dsd(&self) -> f64 {
        self.saddle.position().distance(&self.geometry.stem_base)
    }

    pub fn drop(&self) -> f64 {
        self.saddle.drop
    }

    pub fn ratio_dsd_drop(&self) -> f64 {
        self.dsd() / self.drop()
    }

    pub fn fork_rate(&self) -> f64 {
        self.geometry.fork_rate
    }

    pub fn ratio_stack_reach(&self) -> f64 {
        self.geometry.stack / self.geometry.reach
    }

    pub fn ratio_dsd_saddle_height(&self) -> f64 {
        self.dsd() / self.saddle.height
    }

    pub fn saddle_height_above_ground(&self) -> f64 {
        self.saddle.y + self.geometry.bracket_height
    }

    pub fn head_set_height_above_ground(&self) -> f64 {
        self.geometry.stem_base.y + self.geometry.bracket_height
    }

    #[must_use]
    pub fn with_indicators(mut self, indicators: FrameIndicators) -> Self {
        self.indicators = Some(indicators);
        self
    }
}
