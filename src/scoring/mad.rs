//! Cohort-relative normalization
//!
//! Places one surgeon's value inside a peer cohort on a 10–100 scale anchored
//! at the cohort median (50). Distance from the median is measured in
//! effective MADs; three effective MADs reach the clamp boundary.

use super::stats::{mad, median, min_max};
use serde::{Deserialize, Serialize};

/// Score for a cohort that carries no information
pub const NEUTRAL_SCORE: f64 = 50.0;
pub const MIN_SCORE: f64 = 10.0;
pub const MAX_SCORE: f64 = 100.0;

/// Effective MADs from the median that map to the clamp boundary
pub const MAD_BAND: f64 = 3.0;

/// Smallest effective MAD as a fraction of |median|
pub const MAD_FLOOR_RATIO: f64 = 0.05;

/// Which branch produced a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CohortMethod {
    /// No peers
    Empty,
    /// One peer, scored by ratio
    SinglePeer,
    /// Median and MAD both zero, interpolated over min..max
    RangeFallback,
    /// Median-anchored MAD distance
    Mad,
}

/// Score plus the cohort statistics behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MadScoreBreakdown {
    pub score: f64,
    pub method: CohortMethod,
    pub peer_count: usize,
    pub median: f64,
    pub mad: f64,
    pub mad_floor: f64,
    pub effective_mad: f64,
}

impl MadScoreBreakdown {
    fn trivial(score: f64, method: CohortMethod, peers: &[f64]) -> Self {
        Self {
            score,
            method,
            peer_count: peers.len(),
            median: median(peers),
            mad: 0.0,
            mad_floor: 0.0,
            effective_mad: 0.0,
        }
    }
}

pub fn clamp_score(score: f64) -> f64 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// Score `value` against `peers`. See [`mad_score_detailed`].
pub fn mad_score(value: f64, peers: &[f64], higher_is_better: bool) -> f64 {
    mad_score_detailed(value, peers, higher_is_better).score
}

pub fn mad_score_detailed(value: f64, peers: &[f64], higher_is_better: bool) -> MadScoreBreakdown {
    match peers {
        [] => MadScoreBreakdown::trivial(NEUTRAL_SCORE, CohortMethod::Empty, peers),
        [peer] => {
            let peer = *peer;
            let score = if peer == 0.0 {
                NEUTRAL_SCORE
            } else {
                let delta = (value / peer - 1.0) * 100.0;
                if higher_is_better {
                    clamp_score(NEUTRAL_SCORE + delta)
                } else {
                    clamp_score(NEUTRAL_SCORE - delta)
                }
            };
            MadScoreBreakdown::trivial(score, CohortMethod::SinglePeer, peers)
        }
        _ => cohort_score(value, peers, higher_is_better),
    }
}

fn cohort_score(value: f64, peers: &[f64], higher_is_better: bool) -> MadScoreBreakdown {
    let med = median(peers);
    let actual_mad = mad(peers);
    let mad_floor = med.abs() * MAD_FLOOR_RATIO;
    let effective_mad = actual_mad.max(mad_floor);

    let mut breakdown = MadScoreBreakdown {
        score: NEUTRAL_SCORE,
        method: CohortMethod::Mad,
        peer_count: peers.len(),
        median: med,
        mad: actual_mad,
        mad_floor,
        effective_mad,
    };

    if effective_mad == 0.0 {
        breakdown.method = CohortMethod::RangeFallback;
        breakdown.score = match min_max(peers) {
            Some((lo, hi)) if hi != lo => {
                let position = (value - lo) / (hi - lo);
                if higher_is_better {
                    clamp_score(position * 100.0)
                } else {
                    clamp_score((1.0 - position) * 100.0)
                }
            }
            _ => NEUTRAL_SCORE,
        };
        return breakdown;
    }

    let normalized = (value - med) / effective_mad;
    let step = NEUTRAL_SCORE / MAD_BAND;
    let raw = if higher_is_better {
        NEUTRAL_SCORE + normalized * step
    } else {
        NEUTRAL_SCORE - normalized * step
    };
    breakdown.score = clamp_score(raw).round();
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    const COHORT: [f64; 5] = [10.0, 12.0, 14.0, 16.0, 18.0];

    #[test]
    fn test_empty_cohort_is_neutral() {
        assert_eq!(mad_score(123.0, &[], true), 50.0);
        assert_eq!(mad_score(-4.0, &[], false), 50.0);
    }

    #[test]
    fn test_single_peer_ratio() {
        assert_eq!(mad_score(100.0, &[50.0], true), 100.0);
        assert_eq!(mad_score(25.0, &[50.0], true), 10.0);
        assert_eq!(mad_score(62.5, &[50.0], true), 75.0);
        assert_eq!(mad_score(62.5, &[50.0], false), 25.0);
    }

    #[test]
    fn test_single_zero_peer_is_neutral() {
        assert_eq!(mad_score(10.0, &[0.0], true), 50.0);
    }

    #[test]
    fn test_median_anchoring() {
        assert_eq!(mad_score(14.0, &COHORT, true), 50.0);
        assert_eq!(mad_score(14.0, &COHORT, false), 50.0);
    }

    #[test]
    fn test_worked_cohort() {
        let breakdown = mad_score_detailed(16.0, &COHORT, true);
        assert_eq!(breakdown.median, 14.0);
        assert_eq!(breakdown.mad, 2.0);
        assert!((breakdown.mad_floor - 0.7).abs() < 1e-12);
        assert_eq!(breakdown.effective_mad, 2.0);
        assert_eq!(breakdown.method, CohortMethod::Mad);
        assert_eq!(breakdown.score, 67.0);
    }

    #[test]
    fn test_lower_is_better_mirrors() {
        assert_eq!(mad_score(16.0, &COHORT, false), 33.0);
    }

    #[test]
    fn test_three_mads_hits_clamp() {
        assert_eq!(mad_score(20.0, &COHORT, true), 100.0);
        assert_eq!(mad_score(8.0, &COHORT, true), 10.0);
        assert_eq!(mad_score(1000.0, &COHORT, true), 100.0);
        assert_eq!(mad_score(-1000.0, &COHORT, true), 10.0);
    }

    #[test]
    fn test_mad_floor_applies_to_tight_cohort() {
        // MAD is 0, floor is 5% of 100 = 5
        let peers = [100.0, 100.0, 100.0, 101.0];
        let breakdown = mad_score_detailed(105.0, &peers, true);
        assert_eq!(breakdown.mad, 0.0);
        assert_eq!(breakdown.effective_mad, 5.0);
        // one effective MAD above: 50 + 16.67
        assert_eq!(breakdown.score, 67.0);
    }

    #[test]
    fn test_range_fallback_when_median_is_zero() {
        let peers = [0.0, 0.0, 0.0, 4.0];
        let breakdown = mad_score_detailed(2.0, &peers, true);
        assert_eq!(breakdown.method, CohortMethod::RangeFallback);
        assert_eq!(breakdown.score, 50.0);
        assert_eq!(mad_score(3.0, &peers, true), 75.0);
        assert_eq!(mad_score(3.0, &peers, false), 25.0);
        assert_eq!(mad_score(8.0, &peers, true), 100.0);
    }

    #[test]
    fn test_range_fallback_flat_cohort() {
        assert_eq!(mad_score(7.0, &[0.0, 0.0, 0.0], true), 50.0);
    }
}
