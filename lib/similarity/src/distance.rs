//! Directional distance between two resolved frames
//!
//! The distance is a weighted sum of squared deltas over four terms. Each
//! delta is `candidate − reference`, so the function is not symmetric once
//! a signed mode is involved.
//!
//! A violated term does not add: it *sets* the running total to
//! [`SENTINEL`]. Terms after it keep adding on top, so the sentinel is a
//! floor for a broken candidate rather than a cap.
//!
//! A candidate that is unresolved, or whose enabled terms cannot be computed,
//! is not comparable to the reference at all; see [`is_comparable`].

use crate::schema::{DistanceModes, TermMode};
use framefit_core::ResolvedFrame;
use serde::Serialize;

/// Weight applied to each squared delta.
pub const WEIGHT: f64 = 100.0;
/// Running total assigned when a term breaks its mode.
pub const SENTINEL: f64 = 1000.0;

/// The four distance terms, in accumulation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Term {
    Dsd,
    Drop,
    RatioDsdDrop,
    ForkRate,
}

impl Term {
    pub const ALL: [Term; 4] = [Term::Dsd, Term::Drop, Term::RatioDsdDrop, Term::ForkRate];

    pub fn value(&self, frame: &ResolvedFrame) -> f64 {
        match self {
            Term::Dsd => frame.dsd(),
            Term::Drop => frame.drop(),
            Term::RatioDsdDrop => frame.ratio_dsd_drop(),
            Term::ForkRate => frame.fork_rate(),
        }
    }

    pub fn mode(&self, modes: &DistanceModes) -> TermMode {
        match self {
            Term::Dsd => modes.dsd,
            Term::Drop => modes.drop,
            Term::RatioDsdDrop => modes.ratio_dsd_drop,
            Term::ForkRate => modes.fork_rate,
        }
    }
}

/// `candidate − reference` for each term, in [`Term::ALL`] order.
pub fn deltas(reference: &ResolvedFrame, candidate: &ResolvedFrame) -> [f64; 4] {
    Term::ALL.map(|t| t.value(candidate) - t.value(reference))
}

/// Fold one term into the running total.
#[inline]
pub fn accumulate(total: f64, mode: TermMode, delta: f64) -> f64 {
    if !mode.is_enabled() {
        total
    } else if mode.is_violated_by(delta) {
        SENTINEL
    } else {
        total + WEIGHT * delta * delta
    }
}

/// Distance from `reference` to `candidate`. Never fails; always `≥ 0`.
pub fn distance(reference: &ResolvedFrame, candidate: &ResolvedFrame, modes: &DistanceModes) -> f64 {
    Term::ALL
        .iter()
        .zip(deltas(reference, candidate))
        .fold(0.0, |total, (term, delta)| accumulate(total, term.mode(modes), delta))
}

/// `false` when `candidate` is unresolved or an enabled term has a
/// non-finite delta. Its [`distance`] then says nothing about closeness.
pub fn is_comparable(reference: &ResolvedFrame, candidate: &ResolvedFrame, modes: &DistanceModes) -> bool {
    candidate.is_resolved()
        && Term::ALL
            .iter()
            .zip(deltas(reference, candidate))
            .all(|(term, delta)| !term.mode(modes).is_enabled() || delta.is_finite())
}

/// One term's share of a distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TermContribution {
    pub term: Term,
    pub mode: TermMode,
    pub reference: f64,
    pub candidate: f64,
    pub delta: f64,
    pub violated: bool,
    /// Running total after this term.
    pub total: f64,
}

/// Per-term breakdown of [`distance`]. The last `total` equals the distance.
pub fn explain_distance(
    reference: &ResolvedFrame,
    candidate: &ResolvedFrame,
    modes: &DistanceModes,
) -> Vec<TermContribution> {
    let mut total = 0.0;
    Term::ALL
        .iter()
        .map(|&term| {
            let mode = term.mode(modes);
            let (a, b) = (term.value(reference), term.value(candidate));
            let delta = b - a;
            total = accumulate(total, mode, delta);
            TermContribution {
                term,
                mode,
                reference: a,
                candidate: b,
                delta,
                violated: mode.is_enabled() && mode.is_violated_by(delta),
                total,
            }
        })
        .collect()
}
