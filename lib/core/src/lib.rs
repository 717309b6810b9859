//! # FrameFit Core
//!
//! Geometry resolution for bicycle frames described by sparse, inconsistently
//! filled catalog rows.
//!
//! - [`RawFrameRecord`] - one catalog row, measurements still unparsed
//! - [`GeometryResolver`] - derives a complete [`FrameGeometry`] from whichever inputs exist
//! - [`ResolvedFrame`] - record + geometry + saddle placement + diagnostics
//! - [`CatalogIndex`] - brand → model → size → year lookup
//! - [`ResolvedCatalog`] - every record resolved for one rider
//!
//! ## Example
//!
//! ```rust
//! use framefit_core::{resolve, Measurement, RawFrameRecord, SaddleConfig};
//!
//! let record = RawFrameRecord::new("1", "Time", "Skylon", "M", "2015")
//!     .with(Measurement::HeadTubeAngle, "73")
//!     .with(Measurement::SeatTubeAngle, "73.5")
//!     .with(Measurement::HeadTubeLength, "15")
//!     .with(Measurement::ChainStayLength, "40.5")
//!     .with(Measurement::BracketHeight, "26")
//!     .with(Measurement::Reach, "38.5")
//!     .with(Measurement::Stack, "55")
//!     .with(Measurement::ForkRate, "4.5");
//!
//! let frame = resolve(&record, &SaddleConfig::default());
//! assert!(frame.is_resolved());
//! assert!((frame.geometry.bottom_bracket_drop - 7.58).abs() < 0.01);
//! ```

pub mod catalog;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod record;
pub mod rules;
pub mod stats;
pub mod trig;

pub use catalog::{CatalogIndex, ResolvedCatalog};
pub use config::{GeometryConstants, SaddleConfig};
pub use diagnostic::Diagnostic;
pub use error::{Error, Result};
pub use frame::{ResolutionStatus, ResolvedFrame, SaddlePlacement};
pub use geometry::{resolve, BracketPath, FrameGeometry, GeometryResolver, HeadSetPath, WheelbasePath};
pub use record::{FrameInputs, Measurement, RawFrameRecord, RawValue, UNSET_MARKER};
pub use stats::{CatalogStats, FrameIndicators, RatioScore, RatioSummary};
pub use trig::Point2;
