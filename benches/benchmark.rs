// Benchmarks for catalog resolution and ranking
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use framefit_core::{GeometryResolver, Measurement as M, RawFrameRecord, ResolvedCatalog, SaddleConfig};
use framefit_similarity::{DistanceModes, Ranker};
use rand::prelude::*;

fn generate_record(id: usize, rng: &mut impl Rng) -> RawFrameRecord {
    let record = RawFrameRecord::new(
        id.to_string(),
        format!("brand{}", id % 20),
        format!("model{}", id % 7),
        format!("{}", 48 + id % 12),
        "2019",
    )
    .with(M::HeadTubeAngle, rng.random_range(70.0..74.5))
    .with(M::SeatTubeAngle, rng.random_range(72.0..75.0))
    .with(M::HeadTubeLength, rng.random_range(10.0..22.0))
    .with(M::ChainStayLength, rng.random_range(39.5..43.0));

    // mix the derivation paths the way a real catalog does
    let record = match id % 3 {
        0 => record.with(M::BracketHeight, rng.random_range(25.5..28.0)),
        _ => record.with(M::BottomBracketDrop, rng.random_range(6.5..8.0)),
    };
    let record = match id % 2 {
        0 => record
            .with(M::Reach, rng.random_range(36.0..41.0))
            .with(M::Stack, rng.random_range(50.0..62.0)),
        _ => record
            .with(M::VirtualSeatTube, rng.random_range(48.0..60.0))
            .with(M::VirtualTopTube, rng.random_range(51.0..59.0)),
    };
    match id % 4 {
        0 => record.with(M::ForkRate, rng.random_range(4.0..5.0)),
        1 => record.with(M::FrontCenter, rng.random_range(57.0..62.0)),
        _ => record.with(M::Wheelbase, rng.random_range(97.0..102.0)),
    }
}

fn generate_catalog(size: usize) -> Vec<RawFrameRecord> {
    let mut rng = rand::rng();
    (0..size).map(|i| generate_record(i, &mut rng)).collect()
}

fn benchmark_resolve_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_all");
    let resolver = GeometryResolver::default();

    for size in [100, 1000, 10000].iter() {
        let records = generate_catalog(*size);
        group.bench_with_input(BenchmarkId::new("framefit", size), size, |b, _| {
            b.iter(|| ResolvedCatalog::resolve_all(black_box(&records), SaddleConfig::default(), &resolver));
        });
    }

    group.finish();
}

fn benchmark_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");

    for size in [1000, 10000].iter() {
        let records = generate_catalog(*size);
        let catalog = ResolvedCatalog::resolve_all(&records, SaddleConfig::default(), &GeometryResolver::default());
        let frames = catalog.frames();
        let reference = &frames[0];
        let ranker = Ranker::new(DistanceModes::catalog_default());

        group.bench_with_input(BenchmarkId::new("top_10", size), size, |b, _| {
            b.iter(|| ranker.top_n(black_box(reference), frames, 10));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_resolve_all, benchmark_rank);
criterion_main!(benches);
