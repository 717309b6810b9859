//! # FrameFit
//!
//! Bicycle frame geometry resolution and fit-based frame ranking.
//!
//! Catalog rows describe frames with whatever subset of measurements the
//! manufacturer published. FrameFit derives a complete geometry for each row
//! (stack, reach, virtual tubes, wheelbase, fork offset), places the rider's
//! saddle on it, and ranks the catalog by how close each frame puts the
//! handlebar relative to a frame the rider already knows.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install framefit
//! framefit --source frames.json --http-port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use framefit::prelude::*;
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
//! let manager = CatalogManager::new(None, SaddleConfig::default());
//! manager.load_records(vec![record]);
//!
//! let reference = manager.get_frame("Time", "Skylon", "M", "2015").unwrap();
//! let ranked = manager.rank_nearest(&reference, &DistanceModes::catalog_default(), 10);
//! assert_eq!(ranked[0].distance, 0.0);
//! ```
//!
//! ## Crate Structure
//!
//! - [`framefit-core`](https://docs.rs/framefit-core) - Records, geometry resolver, catalog index
//! - [`framefit-similarity`](https://docs.rs/framefit-similarity) - Distance modes, ranking, explanations
//! - [`framefit-storage`](https://docs.rs/framefit-storage) - Catalog source and manager
//! - [`framefit-api`](https://docs.rs/framefit-api) - REST API

// Re-export core types
pub use framefit_core::{
    resolve, CatalogIndex, CatalogStats, Diagnostic, Error, FrameGeometry, GeometryConstants,
    GeometryResolver, Measurement, RawFrameRecord, ResolvedCatalog, ResolvedFrame, Result,
    SaddleConfig,
};

// Re-export similarity
pub use framefit_similarity::{distance, DistanceModes, RankedFrame, Ranker, RankingResponse, TermMode};

// Re-export storage
pub use framefit_storage::{CatalogManager, CatalogSource};

// Re-export API
pub use framefit_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        distance, resolve, CatalogIndex, CatalogManager, CatalogSource, Diagnostic, DistanceModes,
        Error, GeometryResolver, Measurement, RankedFrame, Ranker, RawFrameRecord, ResolvedFrame,
        Result, SaddleConfig, TermMode,
    };
}
