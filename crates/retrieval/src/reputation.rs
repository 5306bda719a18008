//! Reputation tier: a coarse standing used to gate templates (spec §3, §4.9).
//!
//! Modeled the way the teacher models its disposition/relationship levels: a
//! closed, ordered enum with an `all()` listing and string round-tripping.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReputationTier {
    Hostile,
    Suspicious,
    Neutral,
    Trusted,
    Revered,
}

impl ReputationTier {
    pub fn all() -> &'static [ReputationTier] {
        &[
            ReputationTier::Hostile,
            ReputationTier::Suspicious,
            ReputationTier::Neutral,
            ReputationTier::Trusted,
            ReputationTier::Revered,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReputationTier::Hostile => "hostile",
            ReputationTier::Suspicious => "suspicious",
            ReputationTier::Neutral => "neutral",
            ReputationTier::Trusted => "trusted",
            ReputationTier::Revered => "revered",
        }
    }
}

impl fmt::Display for ReputationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ReputationTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReputationTier::all()
            .iter()
            .copied()
            .find(|t| t.label() == s)
            .ok_or_else(|| format!("unknown reputation tier: {s}"))
    }
}

/// A total, non-overlapping threshold table mapping a numeric reputation
/// score onto a tier (spec §4.9.1, §6: "explicit thresholds are part of the
/// config and must be total and non-overlapping").
#[derive(Debug, Clone)]
pub struct ReputationThresholds {
    /// Ascending `(tier, minimum_score_inclusive)` pairs. The tier for a
    /// given score is the highest-threshold tier whose minimum it meets.
    thresholds: Vec<(ReputationTier, i64)>,
}

impl ReputationThresholds {
    /// The spec's own worked example: `+600` pushes a neutral standing to
    /// `revered` (S2), so `revered` starts at 500 here.
    pub fn default_thresholds() -> Self {
        Self {
            thresholds: vec![
                (ReputationTier::Hostile, i64::MIN),
                (ReputationTier::Suspicious, -200),
                (ReputationTier::Neutral, 0),
                (ReputationTier::Trusted, 200),
                (ReputationTier::Revered, 500),
            ],
        }
    }

    pub fn tier_for(&self, score: i64) -> ReputationTier {
        self.thresholds
            .iter()
            .rev()
            .find(|(_, min)| score >= *min)
            .map(|(tier, _)| *tier)
            .unwrap_or(ReputationTier::Hostile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for tier in ReputationTier::all() {
            let parsed: ReputationTier = tier.label().parse().unwrap();
            assert_eq!(parsed, *tier);
        }
    }

    #[test]
    fn thresholds_are_total_and_ordered() {
        let thresholds = ReputationThresholds::default_thresholds();
        assert_eq!(thresholds.tier_for(-1000), ReputationTier::Hostile);
        assert_eq!(thresholds.tier_for(0), ReputationTier::Neutral);
        assert_eq!(thresholds.tier_for(600), ReputationTier::Revered);
    }

    #[test]
    fn modify_reputation_can_cross_a_tier_boundary() {
        let thresholds = ReputationThresholds::default_thresholds();
        let base = 0i64;
        assert_eq!(thresholds.tier_for(base), ReputationTier::Neutral);
        assert_eq!(thresholds.tier_for(base + 600), ReputationTier::Revered);
    }
}
