//! Orchestrator configuration (spec §6): the closed set of recognized
//! options. Unknown keys fail with `InvalidConfig`, grounded on the
//! teacher's `AppConfig::from_env` (validate-at-the-boundary, not silently
//! ignore unrecognized input).

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::OrchestratorError;

const RECOGNIZED_KEYS: &[&str] = &[
    "seed",
    "orbits",
    "realms",
    "enrichment_types",
    "embedding_dim",
    "embedding_batch_size",
    "weight_semantic",
    "weight_stat7",
    "session_idle_timeout_seconds",
    "default_fallback_template_id",
    "max_turns_per_conversation",
];

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub seed: u64,
    pub orbits: u32,
    pub realms: Vec<String>,
    pub enrichment_types: Vec<String>,
    pub embedding_dim: usize,
    pub embedding_batch_size: usize,
    pub weight_semantic: f64,
    pub session_idle_timeout_seconds: u64,
    pub default_fallback_template_id: String,
    /// Uncapped by default (spec §9 Open Questions leaves this optional).
    pub max_turns_per_conversation: Option<u32>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            orbits: 1,
            realms: Vec::new(),
            enrichment_types: Vec::new(),
            embedding_dim: 384,
            embedding_batch_size: 32,
            weight_semantic: 1.0,
            session_idle_timeout_seconds: 300,
            default_fallback_template_id: "default_fallback".to_string(),
            max_turns_per_conversation: None,
        }
    }
}

impl OrchestratorConfig {
    /// `weight_semantic` must fall in `[0, 1]`; `weight_stat7` is derived as
    /// `1 - weight_semantic`, never stored independently (spec §6).
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        if !(0.0..=1.0).contains(&self.weight_semantic) {
            return Err(OrchestratorError::InvalidConfigValue {
                reason: format!("weight_semantic must be in [0, 1], got {}", self.weight_semantic),
            });
        }
        Ok(())
    }

    pub fn weight_stat7(&self) -> f64 {
        1.0 - self.weight_semantic
    }

    /// Builds a config from a loosely-typed map (e.g. parsed from JSON),
    /// rejecting any key outside the closed recognized set.
    pub fn from_map(map: &BTreeMap<String, Value>) -> Result<Self, OrchestratorError> {
        for key in map.keys() {
            if !RECOGNIZED_KEYS.contains(&key.as_str()) {
                return Err(OrchestratorError::InvalidConfig(key.clone()));
            }
        }

        let mut config = OrchestratorConfig::default();

        if let Some(v) = map.get("seed") {
            config.seed = v.as_u64().ok_or_else(|| invalid("seed must be an integer"))?;
        }
        if let Some(v) = map.get("orbits") {
            config.orbits = v
                .as_u64()
                .ok_or_else(|| invalid("orbits must be an integer"))?
                .try_into()
                .map_err(|_| invalid("orbits out of range"))?;
        }
        if let Some(v) = map.get("realms") {
            config.realms = v
                .as_array()
                .ok_or_else(|| invalid("realms must be an array of strings"))?
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| invalid("realms must be an array of strings"))?;
        }
        if let Some(v) = map.get("enrichment_types") {
            config.enrichment_types = v
                .as_array()
                .ok_or_else(|| invalid("enrichment_types must be an array of strings"))?
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| invalid("enrichment_types must be an array of strings"))?;
        }
        if let Some(v) = map.get("embedding_dim") {
            config.embedding_dim = v
                .as_u64()
                .ok_or_else(|| invalid("embedding_dim must be an integer"))? as usize;
        }
        if let Some(v) = map.get("embedding_batch_size") {
            config.embedding_batch_size = v
                .as_u64()
                .ok_or_else(|| invalid("embedding_batch_size must be an integer"))? as usize;
        }
        if let Some(v) = map.get("weight_semantic") {
            config.weight_semantic = v
                .as_f64()
                .ok_or_else(|| invalid("weight_semantic must be a number"))?;
        }
        if let Some(v) = map.get("weight_stat7") {
            let given = v.as_f64().ok_or_else(|| invalid("weight_stat7 must be a number"))?;
            let derived = 1.0 - config.weight_semantic;
            if (given - derived).abs() > 1e-9 {
                return Err(invalid("weight_stat7 must equal 1 - weight_semantic"));
            }
        }
        if let Some(v) = map.get("session_idle_timeout_seconds") {
            config.session_idle_timeout_seconds = v
                .as_u64()
                .ok_or_else(|| invalid("session_idle_timeout_seconds must be an integer"))?;
        }
        if let Some(v) = map.get("default_fallback_template_id") {
            config.default_fallback_template_id = v
                .as_str()
                .ok_or_else(|| invalid("default_fallback_template_id must be a string"))?
                .to_string();
        }
        if let Some(v) = map.get("max_turns_per_conversation") {
            config.max_turns_per_conversation = Some(
                v.as_u64()
                    .ok_or_else(|| invalid("max_turns_per_conversation must be an integer"))?
                    .try_into()
                    .map_err(|_| invalid("max_turns_per_conversation out of range"))?,
            );
        }

        config.validate()?;
        Ok(config)
    }
}

fn invalid(reason: &str) -> OrchestratorError {
    OrchestratorError::InvalidConfigValue {
        reason: reason.to_string(),
    }
}
