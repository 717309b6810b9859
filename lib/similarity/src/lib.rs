//! # FrameFit Similarity
//!
//! Directional distance between resolved frames and catalog ranking.
//!
//! ## Features
//!
//! - **Term modes**: each distance term is ignored, unsigned, or constrained to a direction
//! - **Distance**: weighted squared deltas with a violation sentinel
//! - **Ranking**: stable top-n over a resolved catalog
//! - **Explainability**: per-term contributions and display percentages
//!
//! ## Example
//!
//! ```rust
//! use framefit_core::{resolve, Measurement, RawFrameRecord, SaddleConfig};
//! use framefit_similarity::{distance, DistanceModes, Ranker};
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
//! let frame = resolve(&record, &SaddleConfig::default());
//!
//! assert_eq!(distance(&frame, &frame, &DistanceModes::default()), 0.0);
//!
//! let catalog = vec![frame.clone()];
//! let ranked = Ranker::catalog_default().top_n(&frame, &catalog, 10);
//! assert_eq!(ranked.len(), 1);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Modes    │────>│  Distance   │────>│   Ranker    │
//! │ (per term)  │     │ (ref → cand)│     │  (top n)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                         ┌─────────────┐
//!                                         │  Explain    │
//!                                         │ (percent)   │
//!                                         └─────────────┘
//! ```

pub mod distance;
pub mod explain;
pub mod rank;
pub mod schema;

pub use distance::{distance, explain_distance, is_comparable, Term, TermContribution, SENTINEL, WEIGHT};
pub use explain::{match_percent, relative_distances, ExplainedFrame, RankingResponse, RankingStats};
pub use rank::{top_n, RankedFrame, Ranker, DEFAULT_TOP_N};
pub use schema::{DistanceModes, ModeParseError, TermMode};
