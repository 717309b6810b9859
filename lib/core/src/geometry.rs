//! Geometry resolver.
//!
//! Turns a sparse [`RawFrameRecord`] into a complete [`FrameGeometry`]. The
//! work is split into pure stages, each fed only the fields it needs:
//!
//! ```text
//! inputs ──> bracket ──> head set ──> wheelbase ──> fork rate ──> saddle
//!            (bh/bbd)    (stem base)  (wb/fc)       (offset)      (x, y, drop)
//! ```
//!
//! The bracket, head-set and wheelbase stages each pick a derivation path from
//! an ordered rule table (see [`crate::rules`]). Cross-checks never reject a
//! frame: they add a [`Diagnostic`] and the supplied values are kept.

use crate::config::{GeometryConstants, SaddleConfig};
use crate::diagnostic::Diagnostic;
use crate::frame::{ResolutionStatus, ResolvedFrame, SaddlePlacement};
use crate::record::{FrameInputs, Measurement, RawFrameRecord};
use crate::rules::{first_applicable, Rule};
use crate::trig::{degrees_to_radians, within_tolerance, Point2};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Resolved frame coordinates and lengths. Origin is the bottom-bracket axle.
///
/// Angles are stored as `180° - catalog angle`, i.e. measured from the
/// horizontal opening backwards, so the head and seat tubes can be walked
/// with plain `cos`/`sin`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub head_tube_angle: f64,
    pub seat_tube_angle: f64,
    pub head_tube_length: f64,
    pub chain_stay_length: f64,
    pub crank_length: f64,
    pub bracket_height: f64,
    pub bottom_bracket_drop: f64,
    pub virtual_seat_tube: f64,
    pub virtual_top_tube: f64,
    pub stem_base: Point2,
    pub stack: f64,
    pub reach: f64,
    pub wheelbase: f64,
    pub front_center: f64,
    pub fork_rate: f64,
    pub rear_wheel: Point2,
    pub front_wheel: Point2,
    pub fork_base: Point2,
}

impl FrameGeometry {
    /// First non-finite field, if any.
    fn first_non_finite(&self) -> Option<&'static str> {
        let scalars = [
            ("bracketHeight", self.bracket_height),
            ("bottomBracketDrop", self.bottom_bracket_drop),
            ("virtualSeatTube", self.virtual_seat_tube),
            ("virtualTopTube", self.virtual_top_tube),
            ("stack", self.stack),
            ("reach", self.reach),
            ("wheelbase", self.wheelbase),
            ("frontCenter", self.front_center),
            ("forkRate", self.fork_rate),
        ];
        let points = [
            ("stemBase", self.stem_base),
            ("rearWheel", self.rear_wheel),
            ("frontWheel", self.front_wheel),
            ("forkBase", self.fork_base),
        ];
        scalars
            .iter()
            .find(|(_, v)| !v.is_finite())
            .map(|(name, _)| *name)
            .or_else(|| {
                points
                    .iter()
                    .find(|(_, p)| !p.is_finite())
                    .map(|(name, _)| *name)
            })
    }
}

// ---------------------------------------------------------------------------
// Bracket height / bottom-bracket drop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketPath {
    Supplied,
    FromBracketHeight,
    FromBottomBracketDrop,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketInputs {
    pub bracket_height: Option<f64>,
    pub bottom_bracket_drop: Option<f64>,
    pub wheel_radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketGeometry {
    pub bracket_height: f64,
    pub bottom_bracket_drop: f64,
}

fn bracket_supplied(i: &BracketInputs) -> Option<BracketGeometry> {
    Some(BracketGeometry {
        bracket_height: i.bracket_height?,
        bottom_bracket_drop: i.bottom_bracket_drop?,
    })
}

fn bracket_from_height(i: &BracketInputs) -> Option<BracketGeometry> {
    let bracket_height = i.bracket_height?;
    Some(BracketGeometry {
        bracket_height,
        bottom_bracket_drop: i.wheel_radius - bracket_height,
    })
}

fn bracket_from_drop(i: &BracketInputs) -> Option<BracketGeometry> {
    let bottom_bracket_drop = i.bottom_bracket_drop?;
    Some(BracketGeometry {
        bracket_height: i.wheel_radius - bottom_bracket_drop,
        bottom_bracket_drop,
    })
}

pub const BRACKET_RULES: [Rule<BracketInputs, BracketGeometry, BracketPath>; 3] = [
    Rule::new(BracketPath::Supplied, bracket_supplied),
    Rule::new(BracketPath::FromBracketHeight, bracket_from_height),
    Rule::new(BracketPath::FromBottomBracketDrop, bracket_from_drop),
];

/// Wheel diameter implied by the bracket pair must match the tyre.
pub fn check_wheel_diameter(
    bracket: &BracketGeometry,
    constants: &GeometryConstants,
) -> Option<Diagnostic> {
    let expected = constants.wheel_diameter();
    let computed = 2.0 * (bracket.bracket_height + bracket.bottom_bracket_drop);
    (!within_tolerance(expected, computed, constants.wheel_diameter_tolerance))
        .then_some(Diagnostic::WheelDiameterMismatch { expected, computed })
}

// ---------------------------------------------------------------------------
// Head set: stem base and virtual tubes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadSetPath {
    ReachStack,
    VirtualTubes,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadSetInputs {
    pub reach: Option<f64>,
    pub stack: Option<f64>,
    pub virtual_seat_tube: Option<f64>,
    pub virtual_top_tube: Option<f64>,
    pub head_tube_angle: f64,
    pub seat_tube_angle: f64,
    pub reach_stack_offset: f64,
    pub virtual_tube_offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadSet {
    pub stem_base: Point2,
    /// Where a horizontal top tube would meet the head tube.
    pub top_tube_junction: Point2,
    pub virtual_seat_tube: f64,
    pub virtual_top_tube: f64,
    pub stack: f64,
    pub reach: f64,
}

fn head_set_from_reach_stack(i: &HeadSetInputs) -> Option<HeadSet> {
    let (reach, stack) = (i.reach?, i.stack?);
    let stem_base = Point2::new(reach, stack);
    let junction = stem_base.along(i.head_tube_angle, -i.reach_stack_offset);

    // seat tube top sits at the junction height
    let virtual_seat_tube = junction.y / degrees_to_radians(i.seat_tube_angle).sin();
    let seat_tube_top = Point2::ORIGIN.along(i.seat_tube_angle, virtual_seat_tube);

    Some(HeadSet {
        stem_base,
        top_tube_junction: junction,
        virtual_seat_tube,
        virtual_top_tube: junction.x - seat_tube_top.x,
        stack,
        reach,
    })
}

fn head_set_from_virtual_tubes(i: &HeadSetInputs) -> Option<HeadSet> {
    let (virtual_seat_tube, virtual_top_tube) = (i.virtual_seat_tube?, i.virtual_top_tube?);
    let seat_tube_top = Point2::ORIGIN.along(i.seat_tube_angle, virtual_seat_tube);
    let junction = seat_tube_top.offset_x(virtual_top_tube);
    let stem_base = junction.along(i.head_tube_angle, i.virtual_tube_offset);

    Some(HeadSet {
        stem_base,
        top_tube_junction: junction,
        virtual_seat_tube,
        virtual_top_tube,
        stack: stem_base.y,
        reach: stem_base.x,
    })
}

pub const HEAD_SET_RULES: [Rule<HeadSetInputs, HeadSet, HeadSetPath>; 2] = [
    Rule::new(HeadSetPath::ReachStack, head_set_from_reach_stack),
    Rule::new(HeadSetPath::VirtualTubes, head_set_from_virtual_tubes),
];

// ---------------------------------------------------------------------------
// Wheelbase / front center / fork rate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelbasePath {
    Supplied,
    FromFrontCenter,
    FromWheelbase,
    FromForkRate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelbaseInputs {
    pub wheelbase: Option<f64>,
    pub front_center: Option<f64>,
    pub fork_rate: Option<f64>,
    pub chain_stay_length: f64,
    pub bottom_bracket_drop: f64,
    /// `wheel radius - bracket height`: wheel axles relative to the bottom bracket.
    pub axle_height: f64,
    pub head_tube_angle: f64,
    pub fork_base: Point2,
    pub rear_wheel_x: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wheelbase {
    pub wheelbase: f64,
    pub front_center: f64,
}

/// Horizontal span of the chain stay.
#[inline]
pub fn chain_stay_horizontal(chain_stay_length: f64, bottom_bracket_drop: f64) -> f64 {
    chain_stay_length * (bottom_bracket_drop / chain_stay_length).asin().cos()
}

/// `frontCenter² = bbd² + (wheelbase - cs·cos(asin(bbd/cs)))²`, solved for wheelbase.
#[inline]
pub fn wheelbase_from_front_center(front_center: f64, bottom_bracket_drop: f64, chain_stay_length: f64) -> f64 {
    (front_center.powi(2) - bottom_bracket_drop.powi(2)).sqrt()
        + chain_stay_horizontal(chain_stay_length, bottom_bracket_drop)
}

/// Same relation, solved for front center.
#[inline]
pub fn front_center_from_wheelbase(wheelbase: f64, bottom_bracket_drop: f64, chain_stay_length: f64) -> f64 {
    (bottom_bracket_drop.powi(2)
        + (wheelbase - chain_stay_horizontal(chain_stay_length, bottom_bracket_drop)).powi(2))
    .sqrt()
}

/// X where the steering axis (head-tube line through the fork base) crosses height `y`.
#[inline]
pub fn steering_axis_x_at(fork_base: Point2, head_tube_angle: f64, y: f64) -> f64 {
    let a = degrees_to_radians(head_tube_angle);
    let l = -(y - fork_base.y) / a.sin();
    fork_base.x - l * a.cos()
}

fn wheelbase_supplied(i: &WheelbaseInputs) -> Option<Wheelbase> {
    Some(Wheelbase {
        wheelbase: i.wheelbase?,
        front_center: i.front_center?,
    })
}

fn wheelbase_from_fc(i: &WheelbaseInputs) -> Option<Wheelbase> {
    let front_center = i.front_center?;
    Some(Wheelbase {
        wheelbase: wheelbase_from_front_center(front_center, i.bottom_bracket_drop, i.chain_stay_length),
        front_center,
    })
}

fn wheelbase_from_wb(i: &WheelbaseInputs) -> Option<Wheelbase> {
    let wheelbase = i.wheelbase?;
    Some(Wheelbase {
        wheelbase,
        front_center: front_center_from_wheelbase(wheelbase, i.bottom_bracket_drop, i.chain_stay_length),
    })
}

fn wheelbase_from_fork_rate(i: &WheelbaseInputs) -> Option<Wheelbase> {
    let fork_rate = i.fork_rate?;
    let front_wheel_x = steering_axis_x_at(i.fork_base, i.head_tube_angle, i.axle_height) + fork_rate;
    let wheelbase = front_wheel_x - i.rear_wheel_x;
    Some(Wheelbase {
        wheelbase,
        front_center: front_center_from_wheelbase(wheelbase, i.bottom_bracket_drop, i.chain_stay_length),
    })
}

pub const WHEELBASE_RULES: [Rule<WheelbaseInputs, Wheelbase, WheelbasePath>; 4] = [
    Rule::new(WheelbasePath::Supplied, wheelbase_supplied),
    Rule::new(WheelbasePath::FromFrontCenter, wheelbase_from_fc),
    Rule::new(WheelbasePath::FromWheelbase, wheelbase_from_wb),
    Rule::new(WheelbasePath::FromForkRate, wheelbase_from_fork_rate),
];

/// Wheelbase recomputed from front center must match the one kept.
pub fn check_wheelbase(
    wheelbase: &Wheelbase,
    bottom_bracket_drop: f64,
    chain_stay_length: f64,
    constants: &GeometryConstants,
) -> Option<Diagnostic> {
    let computed = wheelbase_from_front_center(wheelbase.front_center, bottom_bracket_drop, chain_stay_length);
    (!within_tolerance(wheelbase.wheelbase, computed, constants.wheelbase_tolerance)).then_some(
        Diagnostic::WheelbaseMismatch {
            supplied: wheelbase.wheelbase,
            computed,
        },
    )
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

struct Tubes {
    head_tube_angle: f64,
    seat_tube_angle: f64,
    head_tube_length: f64,
    chain_stay_length: f64,
}

impl Tubes {
    /// Applies the `180 - angle` transform; the only place it happens.
    fn from_inputs(inputs: &FrameInputs) -> Result<Self, Vec<Measurement>> {
        match (
            inputs.head_tube_angle,
            inputs.seat_tube_angle,
            inputs.head_tube_length,
            inputs.chain_stay_length,
        ) {
            (Some(hta), Some(sta), Some(htl), Some(cs)) => Ok(Self {
                head_tube_angle: 180.0 - hta,
                seat_tube_angle: 180.0 - sta,
                head_tube_length: htl,
                chain_stay_length: cs,
            }),
            _ => Err(inputs.missing_tubes()),
        }
    }
}

/// Resolves raw catalog rows into [`ResolvedFrame`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryResolver {
    constants: GeometryConstants,
}

impl GeometryResolver {
    pub fn new(constants: GeometryConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &GeometryConstants {
        &self.constants
    }

    /// Resolve one record for the given rider. Never fails: a record that
    /// cannot be resolved yields a zeroed, [`ResolutionStatus::Unresolved`] frame.
    pub fn resolve(&self, record: &RawFrameRecord, saddle: &SaddleConfig) -> ResolvedFrame {
        let inputs = record.inputs();
        let (status, geometry, diagnostics) = match self.resolve_geometry(&inputs) {
            Ok((status, geometry, diagnostics)) => (status, geometry, diagnostics),
            Err(diagnostics) => (ResolutionStatus::Unresolved, FrameGeometry::default(), diagnostics),
        };

        for diagnostic in &diagnostics {
            warn!(frame = %record.id, brand = %record.brand, model = %record.model, "{}", diagnostic);
        }

        let saddle = match status {
            ResolutionStatus::Unresolved => SaddlePlacement::default(),
            ResolutionStatus::Resolved { .. } => SaddlePlacement::compute(saddle, &geometry),
        };

        ResolvedFrame {
            record: record.clone(),
            geometry,
            saddle,
            status,
            diagnostics,
            indicators: None,
        }
    }

    /// All derivation stages. `Err` carries every diagnostic collected so far,
    /// at least one of which is fatal.
    pub fn resolve_geometry(
        &self,
        inputs: &FrameInputs,
    ) -> Result<(ResolutionStatus, FrameGeometry, Vec<Diagnostic>), Vec<Diagnostic>> {
        let c = &self.constants;
        let mut diagnostics = Vec::new();

        // report every missing group up front, not just the first
        let tubes = Tubes::from_inputs(inputs)
            .map_err(|fields| diagnostics.push(Diagnostic::MissingTubes { fields }))
            .ok();
        if !inputs.has_bracket_reference() {
            diagnostics.push(Diagnostic::MissingBracketReference);
        }
        if !inputs.has_head_set_reference() {
            diagnostics.push(Diagnostic::MissingHeadSetReference);
        }
        if !inputs.has_wheelbase_reference() {
            diagnostics.push(Diagnostic::MissingWheelbaseReference);
        }
        let Some(tubes) = tubes.filter(|_| diagnostics.is_empty()) else {
            return Err(diagnostics);
        };
        // presence of each group is checked above

        let bracket_inputs = BracketInputs {
            bracket_height: inputs.bracket_height,
            bottom_bracket_drop: inputs.bottom_bracket_drop,
            wheel_radius: c.wheel_radius(),
        };
        let Some((bracket_path, bracket)) = first_applicable(&BRACKET_RULES, &bracket_inputs) else {
            return Err(diagnostics);
        };
        diagnostics.extend(check_wheel_diameter(&bracket, c));

        let head_set_inputs = HeadSetInputs {
            reach: inputs.reach,
            stack: inputs.stack,
            virtual_seat_tube: inputs.virtual_seat_tube,
            virtual_top_tube: inputs.virtual_top_tube,
            head_tube_angle: tubes.head_tube_angle,
            seat_tube_angle: tubes.seat_tube_angle,
            reach_stack_offset: c.reach_stack_top_tube_offset,
            virtual_tube_offset: c.virtual_tube_top_tube_offset,
        };
        let Some((head_set_path, head_set)) = first_applicable(&HEAD_SET_RULES, &head_set_inputs) else {
            return Err(diagnostics);
        };

        let axle_height = c.wheel_radius() - bracket.bracket_height;
        let rear_wheel = Point2::new(
            -(tubes.chain_stay_length.powi(2) - axle_height.powi(2)).sqrt(),
            axle_height,
        );
        let fork_base = head_set
            .stem_base
            .along(tubes.head_tube_angle, -tubes.head_tube_length);

        let wheelbase_inputs = WheelbaseInputs {
            wheelbase: inputs.wheelbase,
            front_center: inputs.front_center,
            fork_rate: inputs.fork_rate,
            chain_stay_length: tubes.chain_stay_length,
            bottom_bracket_drop: bracket.bottom_bracket_drop,
            axle_height,
            head_tube_angle: tubes.head_tube_angle,
            fork_base,
            rear_wheel_x: rear_wheel.x,
        };
        let Some((wheelbase_path, wheelbase)) = first_applicable(&WHEELBASE_RULES, &wheelbase_inputs) else {
            return Err(diagnostics);
        };
        diagnostics.extend(check_wheelbase(
            &wheelbase,
            bracket.bottom_bracket_drop,
            tubes.chain_stay_length,
            c,
        ));

        let front_wheel = Point2::new(
            (wheelbase.front_center.powi(2) - axle_height.powi(2)).sqrt(),
            axle_height,
        );
        let fork_rate = inputs.fork_rate.unwrap_or_else(|| {
            front_wheel.x - steering_axis_x_at(fork_base, tubes.head_tube_angle, front_wheel.y)
        });

        let geometry = FrameGeometry {
            head_tube_angle: tubes.head_tube_angle,
            seat_tube_angle: tubes.seat_tube_angle,
            head_tube_length: tubes.head_tube_length,
            chain_stay_length: tubes.chain_stay_length,
            crank_length: inputs.crank_length.unwrap_or(c.default_crank_length),
            bracket_height: bracket.bracket_height,
            bottom_bracket_drop: bracket.bottom_bracket_drop,
            virtual_seat_tube: head_set.virtual_seat_tube,
            virtual_top_tube: head_set.virtual_top_tube,
            stem_base: head_set.stem_base,
            stack: head_set.stack,
            reach: head_set.reach,
            wheelbase: wheelbase.wheelbase,
            front_center: wheelbase.front_center,
            fork_rate,
            rear_wheel,
            front_wheel,
            fork_base,
        };

        if let Some(field) = geometry.first_non_finite() {
            diagnostics.push(Diagnostic::NonFiniteGeometry { field });
            return Err(diagnostics);
        }

        let status = ResolutionStatus::Resolved {
            bracket: bracket_path,
            head_set: head_set_path,
            wheelbase: wheelbase_path,
        };
        Ok((status, geometry, diagnostics))
    }
}

/// Resolve with the default [`GeometryConstants`].
pub fn resolve(record: &RawFrameRecord, saddle: &SaddleConfig) -> ResolvedFrame {
    GeometryResolver::default().resolve(record, saddle)
}
