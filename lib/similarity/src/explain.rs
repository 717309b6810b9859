//! Presentation of ranking results
//!
//! Raw distances are unbounded. For display they are divided by the largest
//! distance in the result list and turned into a match percentage.

use crate::distance::{explain_distance, TermContribution};
use crate::rank::RankedFrame;
use crate::schema::DistanceModes;
use framefit_core::ResolvedFrame;
use serde::Serialize;

/// `distance / max`, with a zero max treated as 1.
pub fn relative_distances(distances: &[f64]) -> Vec<f64> {
    let max = distances.iter().copied().fold(0.0_f64, f64::max);
    let max = if max == 0.0 { 1.0 } else { max };
    distances.iter().map(|d| d / max).collect()
}

/// `floor(100 × (1 − relative))`.
pub fn match_percent(relative: f64) -> u32 {
    (100.0 * (1.0 - relative)).floor().clamp(0.0, 100.0) as u32
}

/// A ranked frame ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainedFrame {
    pub id: String,
    pub label: String,
    pub distance: f64,
    pub relative: f64,
    pub percent: u32,
    pub frame: ResolvedFrame,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<Vec<TermContribution>>,
}

impl ExplainedFrame {
    /// Build display entries from a ranked list. With `explain` each entry
    /// also carries the per-term breakdown against `reference`.
    pub fn from_ranked_list(
        reference: &ResolvedFrame,
        ranked: Vec<RankedFrame>,
        modes: &DistanceModes,
        explain: bool,
    ) -> Vec<Self> {
        let distances: Vec<f64> = ranked.iter().map(|r| r.distance).collect();
        let relative = relative_distances(&distances);
        ranked
            .into_iter()
            .zip(relative)
            .map(|(r, relative)| {
                let terms = explain.then(|| explain_distance(reference, &r.frame, modes));
                Self {
                    id: r.frame.id().to_string(),
                    label: r.frame.label(),
                    distance: r.distance,
                    relative,
                    percent: match_percent(relative),
                    frame: r.frame,
                    terms,
                }
            })
            .collect()
    }
}

/// Summary of a ranking call.
#[derive(Debug, Clone, Serialize)]
pub struct RankingStats {
    pub candidates_count: usize,
    pub results_count: usize,
    pub best_distance: f64,
    pub max_distance: f64,
    /// Results that hit the violation sentinel.
    pub violations: usize,
}

impl RankingStats {
    pub fn compute(results: &[RankedFrame], candidates_count: usize) -> Self {
        Self {
            candidates_count,
            results_count: results.len(),
            best_distance: results.first().map(|r| r.distance).unwrap_or(0.0),
            max_distance: results.iter().map(|r| r.distance).fold(0.0, f64::max),
            violations: results
                .iter()
                .filter(|r| r.distance >= crate::distance::SENTINEL)
                .count(),
        }
    }
}

/// Response of a ranking request.
#[derive(Debug, Clone, Serialize)]
pub struct RankingResponse {
    pub reference: ResolvedFrame,
    pub modes: DistanceModes,
    pub result: Vec<ExplainedFrame>,
    pub stats: RankingStats,
}

impl RankingResponse {
    pub fn new(
        reference: ResolvedFrame,
        ranked: Vec<RankedFrame>,
        modes: DistanceModes,
        candidates_count: usize,
        explain: bool,
    ) -> Self {
        let stats = RankingStats::compute(&ranked, candidates_count);
        let result = ExplainedFrame::from_ranked_list(&reference, ranked, &modes, explain);
        Self {
            reference,
            modes,
            result,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Ranker;
    use framefit_core::{resolve, Measurement as M, RawFrameRecord, SaddleConfig};

    fn frame(id: &str, stack: f64) -> ResolvedFrame {
        let record = RawFrameRecord::new(id, "Time", "Skylon", id, "2015")
            .with(M::HeadTubeAngle, "73")
            .with(M::SeatTubeAngle, "73.5")
            .with(M::HeadTubeLength, "15")
            .with(M::ChainStayLength, "40.5")
            .with(M::BracketHeight, "26")
            .with(M::Reach, "38.5")
            .with(M::Stack, stack)
            .with(M::ForkRate, "4.5");
        resolve(&record, &SaddleConfig::default())
    }

    #[test]
    fn test_relative_distances() {
        assert_eq!(relative_distances(&[0.0, 50.0, 200.0]), vec![0.0, 0.25, 1.0]);
        assert_eq!(relative_distances(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert!(relative_distances(&[]).is_empty());
    }

    #[test]
    fn test_match_percent() {
        assert_eq!(match_percent(0.0), 100);
        assert_eq!(match_percent(0.25), 75);
        assert_eq!(match_percent(0.333), 66);
        assert_eq!(match_percent(1.0), 0);
    }

    #[test]
    fn test_response() {
        let frames = vec![frame("a", 55.0), frame("b", 56.0), frame("c", 57.0)];
        let modes = DistanceModes::default();
        let ranked = Ranker::new(modes).top_n(&frames[0], &frames, 10);
        let response = RankingResponse::new(frames[0].clone(), ranked, modes, frames.len(), true);

        assert_eq!(response.result.len(), 3);
        assert_eq!(response.result[0].percent, 100);
        assert_eq!(response.result[2].percent, 0);
        assert_eq!(response.stats.violations, 0);
        assert_eq!(response.stats.best_distance, 0.0);
        let terms = response.result[1].terms.as_ref().unwrap();
        assert_eq!(terms.last().unwrap().total, response.result[1].distance);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["result"][0]["id"], "a");
        assert_eq!(value["modes"]["forkRate"], "ignore");
    }
}
