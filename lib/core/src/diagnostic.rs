//! Structured warnings produced while resolving a frame.
//!
//! Resolution never fails; anything worth telling the caller ends up here,
//! attached to the [`ResolvedFrame`](crate::ResolvedFrame), and is also
//! logged through `tracing`.

use crate::record::Measurement;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("cannot compute geometry: please give at least bracketHeight or bottomBracketDrop")]
    MissingBracketReference,

    #[error("cannot compute head set position: please give reach/stack or horizontal tube length and virtual seat tube height")]
    MissingHeadSetReference,

    #[error("cannot compute geometry: please give at least wheelbase, front center length or fork rate")]
    MissingWheelbaseReference,

    #[error("cannot compute geometry: missing {}", join(.fields))]
    MissingTubes { fields: Vec<Measurement> },

    #[error("bracketHeight and bottomBracketDrop are not compatible: wheel diameter = {expected:.2}, computed wheel diameter = {computed:.2}")]
    WheelDiameterMismatch { expected: f64, computed: f64 },

    #[error("front center and wheelbase are not compatible: wheelbase = {supplied:.2}, computed wheelbase = {computed:.2}")]
    WheelbaseMismatch { supplied: f64, computed: f64 },

    #[error("geometry is not finite ({field}); measurements are inconsistent")]
    NonFiniteGeometry { field: &'static str },
}

impl Diagnostic {
    /// `true` for diagnostics that leave the frame unresolved.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Diagnostic::WheelDiameterMismatch { .. } | Diagnostic::WheelbaseMismatch { .. }
        )
    }
}

fn join(fields: &[Measurement]) -> String {
    fields
        .iter()
        .map(|m| m.name())
        .collect::<Vec<_>>()
        .join(", ")
}
