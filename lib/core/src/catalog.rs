use crate::config::SaddleConfig;
use crate::frame::ResolvedFrame;
use crate::geometry::GeometryResolver;
use crate::record::RawFrameRecord;
use crate::stats::CatalogStats;
use crate::{Error, Result};
use ahash::AHashMap;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::info;

/// Leaf of the index: the record's id and its position in the record slice.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    id: String,
    position: usize,
}

type Years = BTreeMap<String, Slot>;
type Sizes = BTreeMap<String, Years>;
type Models = BTreeMap<String, Sizes>;

/// Discrimination tree `brand → model → size → year → record`.
///
/// Positions index the record slice the tree was built from, which is also
/// the frame order of [`ResolvedCatalog`]. Keys enumerate in sorted order.
/// When two records share the same four labels the first one seen keeps the
/// slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogIndex {
    tree: BTreeMap<String, Models>,
}

impl CatalogIndex {
    pub fn build<'a>(records: impl IntoIterator<Item = &'a RawFrameRecord>) -> Self {
        let mut tree: BTreeMap<String, Models> = BTreeMap::new();
        for (position, r) in records.into_iter().enumerate() {
            tree.entry(r.brand.clone())
                .or_default()
                .entry(r.model.clone())
                .or_default()
                .entry(r.size.clone())
                .or_default()
                .entry(r.year.clone())
                .or_insert_with(|| Slot {
                    id: r.id.clone(),
                    position,
                });
        }
        Self { tree }
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn brands(&self) -> Vec<String> {
        self.tree.keys().cloned().collect()
    }

    pub fn models_of(&self, brand: &str) -> Result<Vec<String>> {
        Ok(self.models(brand)?.keys().cloned().collect())
    }

    pub fn sizes_of(&self, brand: &str, model: &str) -> Result<Vec<String>> {
        Ok(self.sizes(brand, model)?.keys().cloned().collect())
    }

    pub fn years_of(&self, brand: &str, model: &str, size: &str) -> Result<Vec<String>> {
        Ok(self.years(brand, model, size)?.keys().cloned().collect())
    }

    pub fn id_of(&self, brand: &str, model: &str, size: &str, year: &str) -> Result<&str> {
        Ok(&self.slot(brand, model, size, year)?.id)
    }

    /// Position of the record in the slice the index was built from.
    pub fn position_of(&self, brand: &str, model: &str, size: &str, year: &str) -> Result<usize> {
        Ok(self.slot(brand, model, size, year)?.position)
    }

    fn slot(&self, brand: &str, model: &str, size: &str, year: &str) -> Result<&Slot> {
        self.years(brand, model, size)?
            .get(year)
            .ok_or_else(|| Error::UnknownYear {
                brand: brand.to_string(),
                model: model.to_string(),
                size: size.to_string(),
                year: year.to_string(),
            })
    }

    fn models(&self, brand: &str) -> Result<&Models> {
        self.tree
            .get(brand)
            .ok_or_else(|| Error::UnknownBrand(brand.to_string()))
    }

    fn sizes(&self, brand: &str, model: &str) -> Result<&Sizes> {
        self.models(brand)?
            .get(model)
            .ok_or_else(|| Error::UnknownModel {
                brand: brand.to_string(),
                model: model.to_string(),
            })
    }

    fn years(&self, brand: &str, model: &str, size: &str) -> Result<&Years> {
        self.sizes(brand, model)?
            .get(size)
            .ok_or_else(|| Error::UnknownSize {
                brand: brand.to_string(),
                model: model.to_string(),
                size: size.to_string(),
            })
    }
}

/// Every catalog record resolved for one saddle configuration.
#[derive(Debug, Clone, Default)]
pub struct ResolvedCatalog {
    saddle: SaddleConfig,
    frames: Vec<ResolvedFrame>,
    by_id: AHashMap<String, usize>,
    stats: CatalogStats,
}

impl ResolvedCatalog {
    /// Resolve every record in parallel, then annotate each resolved frame
    /// with its catalog ratio indicators. Record order is preserved.
    pub fn resolve_all(
        records: &[RawFrameRecord],
        saddle: SaddleConfig,
        resolver: &GeometryResolver,
    ) -> Self {
        let frames: Vec<ResolvedFrame> = records
            .par_iter()
            .map(|r| resolver.resolve(r, &saddle))
            .collect();

        let stats = CatalogStats::compute(&frames);
        let frames: Vec<ResolvedFrame> = frames
            .into_par_iter()
            .map(|f| match stats.indicators(&f) {
                Some(indicators) => f.with_indicators(indicators),
                None => f,
            })
            .collect();

        let mut by_id = AHashMap::with_capacity(frames.len());
        for (i, f) in frames.iter().enumerate() {
            by_id.entry(f.record.id.clone()).or_insert(i);
        }

        info!(
            frames = stats.frames,
            resolved = stats.resolved,
            saddle_height = saddle.saddle_height,
            saddle_fore_aft = saddle.saddle_fore_aft,
            "Resolved frame catalog"
        );

        Self {
            saddle,
            frames,
            by_id,
            stats,
        }
    }

    pub fn saddle(&self) -> &SaddleConfig {
        &self.saddle
    }

    pub fn frames(&self) -> &[ResolvedFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn stats(&self) -> &CatalogStats {
        &self.stats
    }

    /// Frame at `position` in record order.
    pub fn frame_at(&self, position: usize) -> Option<&ResolvedFrame> {
        self.frames.get(position)
    }

    /// Frame with record id `id`. A repeated id resolves to its first record.
    pub fn get(&self, id: &str) -> Result<&ResolvedFrame> {
        self.by_id
            .get(id)
            .and_then(|&i| self.frames.get(i))
            .ok_or_else(|| Error::FrameNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Measurement as M;

    fn record(id: &str, brand: &str, model: &str, size: &str, year: &str) -> RawFrameRecord {
        RawFrameRecord::new(id, brand, model, size, year)
    }

    fn resolvable(id: &str, reach: f64, stack: f64) -> RawFrameRecord {
        record(id, "Time", "Skylon", id, "2015")
            .with(M::HeadTubeAngle, "73")
            .with(M::SeatTubeAngle, "73.5")
            .with(M::HeadTubeLength, "15")
            .with(M::ChainStayLength, "40.5")
            .with(M::BracketHeight, "26")
            .with(M::Reach, reach)
            .with(M::Stack, stack)
            .with(M::ForkRate, "4.5")
    }

    #[test]
    fn test_index_enumeration_sorted() {
        let records = vec![
            record("1", "Time", "Skylon", "M", "2015"),
            record("2", "Look", "695", "S", "2014"),
            record("3", "Time", "NXR", "L", "2011"),
            record("4", "Time", "NXR", "S", "2011"),
            record("5", "Time", "NXR", "S", "2010"),
        ];
        let index = CatalogIndex::build(&records);

        assert_eq!(index.brands(), vec!["Look", "Time"]);
        assert_eq!(index.models_of("Time").unwrap(), vec!["NXR", "Skylon"]);
        assert_eq!(index.sizes_of("Time", "NXR").unwrap(), vec!["L", "S"]);
        assert_eq!(index.years_of("Time", "NXR", "S").unwrap(), vec!["2010", "2011"]);
        assert_eq!(index.id_of("Time", "NXR", "S", "2011").unwrap(), "4");
        assert_eq!(index.position_of("Time", "NXR", "S", "2011").unwrap(), 3);
    }

    #[test]
    fn test_index_first_seen_wins() {
        let records = vec![
            record("a", "Time", "NXR", "S", "2011"),
            record("b", "Time", "NXR", "S", "2011"),
        ];
        let index = CatalogIndex::build(&records);
        assert_eq!(index.id_of("Time", "NXR", "S", "2011").unwrap(), "a");
        assert_eq!(index.position_of("Time", "NXR", "S", "2011").unwrap(), 0);
    }

    #[test]
    fn test_index_lookup_errors() {
        let records = vec![record("1", "Time", "NXR", "S", "2011")];
        let index = CatalogIndex::build(&records);

        assert_eq!(
            index.models_of("Colnago"),
            Err(Error::UnknownBrand("Colnago".to_string()))
        );
        assert!(matches!(index.sizes_of("Time", "VXRS"), Err(Error::UnknownModel { .. })));
        assert!(matches!(index.years_of("Time", "NXR", "XL"), Err(Error::UnknownSize { .. })));
        assert!(matches!(index.id_of("Time", "NXR", "S", "2020"), Err(Error::UnknownYear { .. })));
        assert!(matches!(index.position_of("Time", "NXR", "S", "2020"), Err(Error::UnknownYear { .. })));
    }

    #[test]
    fn test_resolve_all_preserves_order_and_annotates() {
        let records = vec![
            resolvable("s", 37.5, 52.0),
            record("bad", "Time", "Skylon", "x", "2015"),
            resolvable("m", 38.5, 55.0),
            resolvable("l", 39.5, 58.0),
        ];
        let catalog =
            ResolvedCatalog::resolve_all(&records, SaddleConfig::default(), &GeometryResolver::default());

        let ids: Vec<&str> = catalog.frames().iter().map(|f| f.id()).collect();
        assert_eq!(ids, vec!["s", "bad", "m", "l"]);
        assert_eq!(catalog.stats().frames, 4);
        assert_eq!(catalog.stats().resolved, 3);

        let bad = catalog.get("bad").unwrap();
        assert!(!bad.is_resolved());
        assert!(bad.indicators.is_none());

        let stack_reach = catalog.stats().stack_reach.unwrap();
        assert_eq!(stack_reach.count, 3);
        let small = catalog.get("s").unwrap().indicators.unwrap();
        let large = catalog.get("l").unwrap().indicators.unwrap();
        assert_eq!(small.stack_reach.normalized, Some(0.0));
        assert_eq!(large.stack_reach.normalized, Some(10.0));
        assert_eq!(small.stack_reach.mean, stack_reach.mean);
    }

    #[test]
    fn test_repeated_id_keeps_labels_apart() {
        let records = vec![
            resolvable("dup", 37.5, 52.0),
            record("other", "Look", "695", "S", "2014"),
            RawFrameRecord {
                size: "L".to_string(),
                ..resolvable("dup", 39.5, 58.0)
            },
        ];
        let index = CatalogIndex::build(&records);
        let catalog =
            ResolvedCatalog::resolve_all(&records, SaddleConfig::default(), &GeometryResolver::default());

        assert_eq!(index.id_of("Time", "Skylon", "L", "2015").unwrap(), "dup");
        let position = index.position_of("Time", "Skylon", "L", "2015").unwrap();
        let large = catalog.frame_at(position).unwrap();
        assert_eq!(large.record.size, "L");
        assert_eq!(large.geometry.stack, 58.0);
        // lookup by id still finds the first record
        assert_eq!(catalog.get("dup").unwrap().record.size, "dup");
        assert!(catalog.frame_at(records.len()).is_none());
    }

    #[test]
    fn test_get_unknown_frame() {
        let catalog = ResolvedCatalog::resolve_all(&[], SaddleConfig::default(), &GeometryResolver::default());
        assert!(catalog.is_empty());
        assert_eq!(catalog.get("nope").unwrap_err(), Error::FrameNotFound("nope".to_string()));
        assert!(catalog.stats().stack_reach.is_none());
    }
}
