//! STAT7: the seven-dimensional address space entities live in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Inclusive bound on `horizon`. The realm/lineage/adjacency dimensions are
/// open-ended counters; `resonance`/`velocity`/`density` are bounded 0..=100
/// per spec §3.
pub const HORIZON_MAX: u32 = 64;
pub const PERCENT_MAX: u32 = 100;

/// A seven-dimensional coordinate: `(realm, lineage, adjacency, horizon,
/// resonance, velocity, density)`.
///
/// Equality is structural. Construction validates every field; `to_mapping`
/// re-validates so a canonical serialization can never smuggle out an
/// address that drifted out of range via direct field construction
/// elsewhere in the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stat7Address {
    realm: u32,
    lineage: u64,
    adjacency: u32,
    horizon: u32,
    resonance: u32,
    velocity: u32,
    density: u32,
}

impl Stat7Address {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        realm: u32,
        lineage: u64,
        adjacency: u32,
        horizon: u32,
        resonance: u32,
        velocity: u32,
        density: u32,
    ) -> Result<Self, DomainError> {
        let addr = Self {
            realm,
            lineage,
            adjacency,
            horizon,
            resonance,
            velocity,
            density,
        };
        addr.validate()?;
        Ok(addr)
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.horizon > HORIZON_MAX {
            return Err(DomainError::invalid_address(format!(
                "horizon {} exceeds max {}",
                self.horizon, HORIZON_MAX
            )));
        }
        for (name, value) in [
            ("resonance", self.resonance),
            ("velocity", self.velocity),
            ("density", self.density),
        ] {
            if value > PERCENT_MAX {
                return Err(DomainError::invalid_address(format!(
                    "{name} {value} exceeds max {PERCENT_MAX}"
                )));
            }
        }
        Ok(())
    }

    pub fn realm(&self) -> u32 {
        self.realm
    }

    pub fn lineage(&self) -> u64 {
        self.lineage
    }

    pub fn adjacency(&self) -> u32 {
        self.adjacency
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    pub fn resonance(&self) -> u32 {
        self.resonance
    }

    pub fn velocity(&self) -> u32 {
        self.velocity
    }

    pub fn density(&self) -> u32 {
        self.density
    }

    /// `(realm, lineage + 1, adjacency, horizon, resonance, velocity, density)`.
    pub fn advance_orbit(&self) -> Self {
        Self {
            lineage: self.lineage + 1,
            ..*self
        }
    }

    /// Canonical serialization: all seven fields, always present, re-validated.
    pub fn to_mapping(&self) -> Result<BTreeMap<&'static str, u64>, DomainError> {
        self.validate()?;
        let mut map = BTreeMap::new();
        map.insert("realm", self.realm as u64);
        map.insert("lineage", self.lineage);
        map.insert("adjacency", self.adjacency as u64);
        map.insert("horizon", self.horizon as u64);
        map.insert("resonance", self.resonance as u64);
        map.insert("velocity", self.velocity as u64);
        map.insert("density", self.density as u64);
        Ok(map)
    }
}

/// Pluggable STAT7-resonance capability for hybrid semantic+address scoring
/// (spec §9 Open Questions: the resolution formula is intentionally left
/// pluggable). `resonance` must return a value in `[0, 1]`.
pub trait Resonance: Send + Sync {
    fn resonance(&self, a: &Stat7Address, b: &Stat7Address) -> f32;
}

/// Default resonance: normalized inverse Euclidean distance over the three
/// bounded dimensions (resonance/velocity/density) plus adjacency, scaled so
/// identical addresses score 1.0 and maximally distant ones score near 0.0.
#[derive(Debug, Default, Clone, Copy)]
pub struct EuclideanResonance;

impl Resonance for EuclideanResonance {
    fn resonance(&self, a: &Stat7Address, b: &Stat7Address) -> f32 {
        let dr = (a.resonance as f32 - b.resonance as f32).powi(2);
        let dv = (a.velocity as f32 - b.velocity as f32).powi(2);
        let dd = (a.density as f32 - b.density as f32).powi(2);
        let da = (a.adjacency as f32 - b.adjacency as f32).min(100.0).powi(2);
        let dist = (dr + dv + dd + da).sqrt();
        let max_dist = (3.0 * (PERCENT_MAX as f32).powi(2) + (100f32).powi(2)).sqrt();
        1.0 - (dist / max_dist).clamp(0.0, 1.0)
    }
}
