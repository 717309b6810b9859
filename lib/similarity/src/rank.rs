//! Ranking of a resolved catalog against a reference frame

use crate::distance::{distance, is_comparable};
use crate::schema::DistanceModes;
use framefit_core::ResolvedFrame;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Number of frames the frame finder shows.
pub const DEFAULT_TOP_N: usize = 10;

/// A catalog frame with its distance to the reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFrame {
    pub frame: ResolvedFrame,
    pub distance: f64,
}

impl RankedFrame {
    pub fn id(&self) -> &str {
        self.frame.id()
    }
}

/// Scores frames against a reference under fixed [`DistanceModes`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ranker {
    modes: DistanceModes,
}

impl Ranker {
    pub fn new(modes: DistanceModes) -> Self {
        Self { modes }
    }

    /// Ranker with the modes the frame finder uses.
    pub fn catalog_default() -> Self {
        Self::new(DistanceModes::catalog_default())
    }

    pub fn modes(&self) -> &DistanceModes {
        &self.modes
    }

    /// Distance of every frame to `reference`, in catalog order.
    pub fn score_all(&self, reference: &ResolvedFrame, frames: &[ResolvedFrame]) -> Vec<f64> {
        frames
            .par_iter()
            .map(|f| distance(reference, f, &self.modes))
            .collect()
    }

    /// The `n` closest frames, ascending by distance. Ties keep catalog
    /// order. The reference itself is not excluded.
    ///
    /// Frames that are not [comparable](is_comparable) to the reference rank
    /// after every comparable one, whatever their distance.
    pub fn top_n(&self, reference: &ResolvedFrame, frames: &[ResolvedFrame], n: usize) -> Vec<RankedFrame> {
        let mut scored: Vec<(usize, bool, f64)> = frames
            .par_iter()
            .enumerate()
            .map(|(i, f)| {
                (
                    i,
                    !is_comparable(reference, f, &self.modes),
                    distance(reference, f, &self.modes),
                )
            })
            .collect();

        // stable: equal keys stay in catalog order
        scored.sort_by(|a, b| a.1.cmp(&b.1).then(a.2.total_cmp(&b.2)));
        scored.truncate(n);

        debug!(
            reference = %reference.id(),
            candidates = frames.len(),
            returned = scored.len(),
            best = scored.first().map(|s| s.2),
            "Ranked frames"
        );

        scored
            .into_iter()
            .map(|(i, _, distance)| RankedFrame {
                frame: frames[i].clone(),
                distance,
            })
            .collect()
    }
}

/// [`Ranker::top_n`] with explicit modes.
pub fn top_n(
    reference: &ResolvedFrame,
    frames: &[ResolvedFrame],
    modes: &DistanceModes,
    n: usize,
) -> Vec<RankedFrame> {
    Ranker::new(*modes).top_n(reference, frames, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TermMode;
    use framefit_core::{resolve, Measurement as M, RawFrameRecord, SaddleConfig};

    fn frame(id: &str, stack: f64, fork_rate: f64) -> ResolvedFrame {
        let record = RawFrameRecord::new(id, "Time", "Skylon", id, "2015")
            .with(M::HeadTubeAngle, "73")
            .with(M::SeatTubeAngle, "73.5")
            .with(M::HeadTubeLength, "15")
            .with(M::ChainStayLength, "40.5")
            .with(M::BracketHeight, "26")
            .with(M::Reach, "38.5")
            .with(M::Stack, stack)
            .with(M::ForkRate, fork_rate);
        resolve(&record, &SaddleConfig::default())
    }

    fn catalog() -> Vec<ResolvedFrame> {
        vec![
            frame("a", 55.0, 4.5),
            frame("b", 57.0, 4.5),
            frame("c", 53.0, 4.5),
            frame("d", 55.0, 4.0),
            frame("e", 56.0, 4.5),
            frame("f", 55.0, 5.0),
        ]
    }

    #[test]
    fn test_top_n_sorted_and_truncated() {
        let frames = catalog();
        let ranked = Ranker::new(DistanceModes::all_unsigned()).top_n(&frames[0], &frames, 4);
        assert_eq!(ranked.len(), 4);
        assert!(ranked.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert_eq!(ranked[0].id(), "a");
        assert_eq!(ranked[0].distance, 0.0);

        let all = Ranker::default().top_n(&frames[0], &frames, 100);
        assert_eq!(all.len(), frames.len());
        assert!(Ranker::default().top_n(&frames[0], &frames, 0).is_empty());
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let frames = catalog();
        // fork rate ignored: a, d, f are identical to the reference
        let ranked = Ranker::new(DistanceModes::default()).top_n(&frames[0], &frames, 3);
        let ids: Vec<&str> = ranked.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["a", "d", "f"]);
        assert!(ranked.iter().all(|r| r.distance == 0.0));
    }

    #[test]
    fn test_catalog_default_pushes_higher_drop_back() {
        let frames = catalog();
        // reference "a"; "c" has a lower stack, hence a larger drop
        let ranked = Ranker::catalog_default().top_n(&frames[0], &frames, frames.len());
        let last = ranked.last().unwrap();
        assert_eq!(last.id(), "c");
        assert!(last.distance >= crate::distance::SENTINEL);
    }

    #[test]
    fn test_unresolved_frames_rank_after_distant_frames() {
        let reference = frame("ref", 55.0, 4.5);
        let far = resolve(
            &RawFrameRecord::new("far", "Time", "Skylon", "far", "2015")
                .with(M::HeadTubeAngle, "73")
                .with(M::SeatTubeAngle, "73.5")
                .with(M::HeadTubeLength, "15")
                .with(M::ChainStayLength, "40.5")
                .with(M::BracketHeight, "26")
                .with(M::Reach, "42.5")
                .with(M::Stack, "55")
                .with(M::ForkRate, "4.5"),
            &SaddleConfig::default(),
        );
        let broken = resolve(&RawFrameRecord::new("broken", "x", "y", "z", "w"), &SaddleConfig::default());
        let frames = vec![reference.clone(), broken, far];

        let ranker = Ranker::catalog_default();
        let scores = ranker.score_all(&reference, &frames);
        // the zeroed frame scores below the distant real one
        assert!(scores[1] < scores[2]);
        assert!(scores[2] > crate::distance::SENTINEL);

        let ranked = ranker.top_n(&reference, &frames, frames.len());
        let ids: Vec<&str> = ranked.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["ref", "far", "broken"]);

        let ranked = ranker.top_n(&reference, &frames, 2);
        assert!(ranked.iter().all(|r| r.frame.is_resolved()));
    }

    #[test]
    fn test_free_function_matches_ranker() {
        let frames = catalog();
        let modes = DistanceModes::default().with_fork_rate(TermMode::Unsigned);
        let a = top_n(&frames[1], &frames, &modes, 5);
        let b = Ranker::new(modes).top_n(&frames[1], &frames, 5);
        assert_eq!(a, b);
    }
}
