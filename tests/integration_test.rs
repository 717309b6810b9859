// Integration tests for FrameFit
use framefit_core::{
    resolve, Diagnostic, GeometryConstants, Measurement as M, RawFrameRecord, ResolvedFrame, SaddleConfig,
};
use framefit_similarity::{distance, DistanceModes, Ranker, TermMode, SENTINEL};
use framefit_storage::{CatalogManager, CatalogSource};
use serde_json::json;

fn base(id: &str) -> RawFrameRecord {
    RawFrameRecord::new(id, "Time", "Skylon", "M", "2015")
        .with(M::HeadTubeAngle, "73")
        .with(M::SeatTubeAngle, "73.5")
        .with(M::HeadTubeLength, "15")
        .with(M::ChainStayLength, "40.5")
        .with(M::Reach, "38.5")
        .with(M::Stack, "55")
}

fn resolved(record: &RawFrameRecord) -> ResolvedFrame {
    resolve(record, &SaddleConfig::default())
}

#[test]
fn test_bracket_height_only_gives_drop() {
    let frame = resolved(&base("a").with(M::BracketHeight, "26").with(M::ForkRate, "4.5"));
    assert!(frame.is_resolved());
    assert!((frame.geometry.bottom_bracket_drop - 7.58).abs() < 0.01);
    assert!(frame.diagnostics.is_empty());
}

#[test]
fn test_bracket_pair_recovers_wheel_radius() {
    let radius = GeometryConstants::default().wheel_radius();
    for record in [
        base("a").with(M::BracketHeight, "27").with(M::Wheelbase, "99"),
        base("b").with(M::BottomBracketDrop, "7").with(M::Wheelbase, "99"),
        base("c").with(M::BracketHeight, "26.5").with(M::BottomBracketDrop, "7.2").with(M::Wheelbase, "99"),
    ] {
        let g = resolved(&record).geometry;
        let sum = g.bracket_height + g.bottom_bracket_drop;
        assert!((sum - radius).abs() / radius <= 0.03, "{}: {}", record.id, sum);
    }
}

#[test]
fn test_incompatible_wheelbase_and_front_center() {
    let frame = resolved(
        &base("a")
            .with(M::BracketHeight, "26")
            .with(M::Wheelbase, "101")
            .with(M::FrontCenter, "59"),
    );
    assert!(frame.is_resolved());
    assert_eq!(frame.geometry.wheelbase, 101.0);
    assert_eq!(frame.geometry.front_center, 59.0);
    assert!(frame
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::WheelbaseMismatch { .. })));
}

#[test]
fn test_no_bracket_and_no_wheelbase_reference() {
    let frame = resolved(&base("a"));
    assert!(!frame.is_resolved());
    assert_eq!(frame.geometry.stack, 0.0);
    assert_eq!(frame.geometry.wheelbase, 0.0);
    assert_eq!(frame.saddle.y, 0.0);
    assert!(frame.diagnostics.contains(&Diagnostic::MissingBracketReference));
    assert!(frame.diagnostics.contains(&Diagnostic::MissingWheelbaseReference));
}

#[test]
fn test_round_trip_reach_stack_virtual_tubes() {
    let constants = GeometryConstants {
        virtual_tube_top_tube_offset: 4.25,
        ..Default::default()
    };
    let resolver = framefit_core::GeometryResolver::new(constants);
    let saddle = SaddleConfig::default();

    let forward = resolver.resolve(&base("a").with(M::BracketHeight, "26").with(M::ForkRate, "4.5"), &saddle);
    let projected = base("b")
        .with(M::Reach, "None")
        .with(M::Stack, "None")
        .with(M::BracketHeight, "26")
        .with(M::ForkRate, "4.5")
        .with(M::VirtualSeatTube, forward.geometry.virtual_seat_tube)
        .with(M::VirtualTopTube, forward.geometry.virtual_top_tube);
    let back = resolver.resolve(&projected, &saddle);

    assert!((back.geometry.reach - 38.5).abs() < 1e-9);
    assert!((back.geometry.stack - 55.0).abs() < 1e-9);
    assert!((distance(&forward, &back, &DistanceModes::all_unsigned())).abs() < 1e-12);
}

#[test]
fn test_distance_properties() {
    let a = resolved(&base("a").with(M::BracketHeight, "26").with(M::ForkRate, "4.5"));
    let b = resolved(&base("b").with(M::BracketHeight, "26").with(M::ForkRate, "4.0"));

    assert_eq!(distance(&a, &a, &DistanceModes::all_unsigned()), 0.0);

    let non_negative_fork = DistanceModes::default().with_fork_rate(TermMode::NonNegative);
    assert_eq!(distance(&a, &b, &non_negative_fork), SENTINEL);
}

#[test]
fn test_ranking_properties() {
    let records: Vec<RawFrameRecord> = (0..12)
        .map(|i| {
            base(&format!("f{i}"))
                .with(M::BracketHeight, "26")
                .with(M::ForkRate, "4.5")
                .with(M::Stack, 50.0 + (i % 6) as f64)
        })
        .collect();
    let frames: Vec<ResolvedFrame> = records.iter().map(resolved).collect();

    let ranked = Ranker::catalog_default().top_n(&frames[3], &frames, 5);
    assert_eq!(ranked.len(), 5);
    assert!(ranked.windows(2).all(|w| w[0].distance <= w[1].distance));
    // f3 and f9 are identical; catalog order decides
    assert_eq!(ranked[0].id(), "f3");
    assert_eq!(ranked[1].id(), "f9");

    let all = Ranker::catalog_default().top_n(&frames[3], &frames, 50);
    assert_eq!(all.len(), frames.len());
}

#[tokio::test]
async fn test_pipeline_from_dump_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frames.json");
    let dump = json!([
        {"_id": {"$oid": "1"}, "brand": "Time", "model": "Skylon", "size": "M", "year": 2015,
         "headTubeAngle": "73", "seatTubeAngle": "73.5", "headTubeLength": "15",
         "chainStayLength": "40.5", "bracketHeight": "26", "reach": "38.5", "stack": "55",
         "forkRate": "4.5", "wheelbase": "None"},
        {"_id": {"$oid": "2"}, "brand": "Time", "model": "Skylon", "size": "L", "year": 2015,
         "headTubeAngle": "73", "seatTubeAngle": "73", "headTubeLength": "17",
         "chainStayLength": "40.5", "bottomBracketDrop": "7", "virtualSeatTube": "55",
         "virtualTopTube": "56", "wheelbase": "99.5"},
        {"_id": {"$oid": "3"}, "brand": "Look", "model": "695", "size": "S", "year": 2014,
         "headTubeAngle": "72", "seatTubeAngle": "74", "headTubeLength": "12",
         "chainStayLength": "40.5", "reach": "37.5", "stack": "51.5"}
    ]);
    std::fs::write(&path, serde_json::to_vec(&dump).unwrap()).unwrap();

    let manager = CatalogManager::new(Some(CatalogSource::File(path)), SaddleConfig::default());
    assert_eq!(manager.populate().await.unwrap(), 3);

    assert_eq!(manager.brands(), vec!["Look", "Time"]);
    assert_eq!(manager.sizes_of("Time", "Skylon").unwrap(), vec!["L", "M"]);

    let stats = manager.stats();
    assert_eq!(stats.frames, 3);
    assert_eq!(stats.resolved, 2);

    let look = manager.get_frame("Look", "695", "S", "2014").unwrap();
    assert!(!look.is_resolved());

    let reference = manager.get_frame("Time", "Skylon", "M", "2015").unwrap();
    let ranked = manager.rank_nearest(&reference, &DistanceModes::catalog_default(), 10);
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].id(), "1");
    // unresolved frames rank after every resolved one
    assert_eq!(ranked[2].id(), "3");
    assert!(ranked[2].distance >= SENTINEL);
}
