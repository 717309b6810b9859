use crate::source::CatalogSource;
use anyhow::{anyhow, Result};
use framefit_core::{
    CatalogIndex, CatalogStats, Error, GeometryResolver, RawFrameRecord, ResolvedCatalog, ResolvedFrame,
    SaddleConfig,
};
use framefit_similarity::{DistanceModes, RankedFrame, Ranker};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{error, info};

/// One published version of the catalog. Never mutated after publication.
#[derive(Debug, Default)]
pub struct CatalogState {
    pub records: Vec<RawFrameRecord>,
    pub index: CatalogIndex,
    pub catalog: ResolvedCatalog,
}

impl CatalogState {
    pub fn build(records: Vec<RawFrameRecord>, saddle: SaddleConfig, resolver: &GeometryResolver) -> Self {
        let index = CatalogIndex::build(&records);
        let catalog = ResolvedCatalog::resolve_all(&records, saddle, resolver);
        Self {
            records,
            index,
            catalog,
        }
    }

    pub fn get_frame(&self, brand: &str, model: &str, size: &str, year: &str) -> framefit_core::Result<&ResolvedFrame> {
        let position = self.index.position_of(brand, model, size, year)?;
        self.catalog
            .frame_at(position)
            .ok_or_else(|| Error::FrameNotFound(format!("{brand}/{model}/{size}/{year}")))
    }
}

/// Owns the raw catalog and its resolved form.
///
/// Readers take a cheap [`Arc`] snapshot; writers build a complete new
/// [`CatalogState`] and swap it in, so a reader never sees a half-built
/// catalog.
pub struct CatalogManager {
    source: Option<CatalogSource>,
    resolver: GeometryResolver,
    state: RwLock<Arc<CatalogState>>,
    writer: Mutex<()>,
}

impl CatalogManager {
    pub fn new(source: Option<CatalogSource>, saddle: SaddleConfig) -> Self {
        Self::with_resolver(source, saddle, GeometryResolver::default())
    }

    pub fn with_resolver(source: Option<CatalogSource>, saddle: SaddleConfig, resolver: GeometryResolver) -> Self {
        let empty = CatalogState {
            catalog: ResolvedCatalog::resolve_all(&[], saddle, &resolver),
            ..Default::default()
        };
        Self {
            source,
            resolver,
            state: RwLock::new(Arc::new(empty)),
            writer: Mutex::new(()),
        }
    }

    pub fn source(&self) -> Option<&CatalogSource> {
        self.source.as_ref()
    }

    /// Fetch every record from the source and publish the resolved catalog.
    /// On failure the error is logged and an empty catalog is published.
    pub async fn populate(&self) -> Result<usize> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| anyhow!("No catalog source configured"))?;

        match source.fetch().await {
            Ok(records) => Ok(self.load_records(records)),
            Err(e) => {
                error!(source = %source, "Request failed: {:#}", e);
                self.load_records(Vec::new());
                Err(e)
            }
        }
    }

    /// Replace the raw catalog and resolve it for the current saddle.
    /// Returns the number of records.
    pub fn load_records(&self, records: Vec<RawFrameRecord>) -> usize {
        let _writer = self.writer.lock();
        let saddle = *self.snapshot().catalog.saddle();
        let count = records.len();
        self.publish(CatalogState::build(records, saddle, &self.resolver));
        count
    }

    /// Re-resolve the whole catalog for a new rider saddle position.
    pub fn set_saddle(&self, saddle: SaddleConfig) {
        let _writer = self.writer.lock();
        let current = self.snapshot();
        let index = current.index.clone();
        let catalog = ResolvedCatalog::resolve_all(&current.records, saddle, &self.resolver);
        self.publish(CatalogState {
            records: current.records.clone(),
            index,
            catalog,
        });
    }

    fn publish(&self, state: CatalogState) {
        info!(
            records = state.records.len(),
            resolved = state.catalog.stats().resolved,
            "Published frame catalog"
        );
        *self.state.write() = Arc::new(state);
    }

    /// Current published catalog.
    #[inline]
    pub fn snapshot(&self) -> Arc<CatalogState> {
        self.state.read().clone()
    }

    pub fn saddle(&self) -> SaddleConfig {
        *self.snapshot().catalog.saddle()
    }

    pub fn records(&self) -> Vec<RawFrameRecord> {
        self.snapshot().records.clone()
    }

    pub fn brands(&self) -> Vec<String> {
        self.snapshot().index.brands()
    }

    pub fn models_of(&self, brand: &str) -> framefit_core::Result<Vec<String>> {
        self.snapshot().index.models_of(brand)
    }

    pub fn sizes_of(&self, brand: &str, model: &str) -> framefit_core::Result<Vec<String>> {
        self.snapshot().index.sizes_of(brand, model)
    }

    pub fn years_of(&self, brand: &str, model: &str, size: &str) -> framefit_core::Result<Vec<String>> {
        self.snapshot().index.years_of(brand, model, size)
    }

    pub fn get_frame(&self, brand: &str, model: &str, size: &str, year: &str) -> framefit_core::Result<ResolvedFrame> {
        self.snapshot().get_frame(brand, model, size, year).cloned()
    }

    pub fn get_frame_by_id(&self, id: &str) -> framefit_core::Result<ResolvedFrame> {
        self.snapshot().catalog.get(id).cloned()
    }

    /// The `n` catalog frames closest to `reference`.
    pub fn rank_nearest(&self, reference: &ResolvedFrame, modes: &DistanceModes, n: usize) -> Vec<RankedFrame> {
        let state = self.snapshot();
        Ranker::new(*modes).top_n(reference, state.catalog.frames(), n)
    }

    pub fn stats(&self) -> CatalogStats {
        *self.snapshot().catalog.stats()
    }

    pub fn len(&self) -> usize {
        self.snapshot().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
