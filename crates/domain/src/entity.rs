//! Entities: the things that live inside a realm and accumulate enrichments.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DomainError;
use crate::ids::EntityId;
use crate::stat7::Stat7Address;

/// The closed set of narrative event kinds an enrichment may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoryElement {
    Dialogue,
    NpcHistory,
    Quest,
    Contradiction,
    SemanticContext,
}

impl StoryElement {
    pub const ALL: [StoryElement; 5] = [
        StoryElement::Dialogue,
        StoryElement::NpcHistory,
        StoryElement::Quest,
        StoryElement::Contradiction,
        StoryElement::SemanticContext,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StoryElement::Dialogue => "dialogue",
            StoryElement::NpcHistory => "npc_history",
            StoryElement::Quest => "quest",
            StoryElement::Contradiction => "contradiction",
            StoryElement::SemanticContext => "semantic_context",
        }
    }
}

impl fmt::Display for StoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for StoryElement {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoryElement::ALL
            .into_iter()
            .find(|e| e.label() == s)
            .ok_or_else(|| DomainError::invalid_enrichment(s))
    }
}

/// An append-only narrative record attached to an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrichment {
    #[serde(rename = "type")]
    pub kind: StoryElement,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
}

/// A simulated entity: an NPC, district, or any other procedurally
/// generated object that lives at a STAT7 address inside a realm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    #[serde(rename = "type")]
    entity_type: String,
    address: Stat7Address,
    metadata: HashMap<String, Value>,
    enrichments: Vec<Enrichment>,
}

impl Entity {
    pub fn new(id: EntityId, entity_type: impl Into<String>, address: Stat7Address) -> Self {
        Self {
            id,
            entity_type: entity_type.into(),
            address,
            metadata: HashMap::new(),
            enrichments: Vec::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn is_npc(&self) -> bool {
        self.entity_type.starts_with("npc_")
    }

    pub fn address(&self) -> &Stat7Address {
        &self.address
    }

    pub fn metadata(&self) -> &HashMap<String, Value> {
        &self.metadata
    }

    pub fn enrichments(&self) -> &[Enrichment] {
        &self.enrichments
    }

    pub fn enrichment_count(&self) -> usize {
        self.enrichments.len()
    }

    /// Append an enrichment record. Fails with `InvalidEnrichment` and
    /// leaves the entity unchanged if `kind` is not in `StoryElement`
    /// (callers pass a `StoryElement` directly, so this only fails on the
    /// string-parsing entry point used by handlers that receive raw labels).
    pub fn enrich(&mut self, kind: StoryElement, data: Value, now: DateTime<Utc>) {
        self.enrichments.push(Enrichment {
            kind,
            data,
            timestamp: now,
        });
    }

    /// Replace the address with a lineage-advanced one. Lineage must be
    /// nondecreasing; callers that violate this get `LineageRegression`.
    pub fn advance_to_orbit(&mut self, new_address: Stat7Address) -> Result<(), DomainError> {
        if new_address.lineage() < self.address.lineage() {
            return Err(DomainError::LineageRegression {
                current: self.address.lineage(),
                attempted: new_address.lineage(),
            });
        }
        self.address = new_address;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn addr() -> Stat7Address {
        Stat7Address::new(0, 0, 0, 0, 0, 0, 0).unwrap()
    }

    #[test]
    fn enrich_is_append_only() {
        let mut e = Entity::new("npc_1".into(), "npc_merchant", addr());
        e.enrich(StoryElement::Dialogue, json!({"line": "hi"}), Utc::now());
        e.enrich(StoryElement::Quest, json!({"goal": "find key"}), Utc::now());
        assert_eq!(e.enrichment_count(), 2);
        assert_eq!(e.enrichments()[0].kind, StoryElement::Dialogue);
        assert_eq!(e.enrichments()[1].kind, StoryElement::Quest);
    }

    #[test]
    fn story_element_round_trips_through_str() {
        for kind in StoryElement::ALL {
            let parsed: StoryElement = kind.label().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("bogus".parse::<StoryElement>().is_err());
    }

    #[test]
    fn advance_to_orbit_rejects_lineage_regression() {
        let mut e = Entity::new("npc_1".into(), "npc_merchant", addr());
        let regressed = Stat7Address::new(0, 0, 0, 0, 0, 0, 0).unwrap();
        e.advance_to_orbit(Stat7Address::new(0, 5, 0, 0, 0, 0, 0).unwrap())
            .unwrap();
        assert!(e.advance_to_orbit(regressed).is_err());
        assert_eq!(e.address().lineage(), 5);
    }

    #[test]
    fn is_npc_checks_type_prefix() {
        let npc = Entity::new("e1".into(), "npc_guard", addr());
        let district = Entity::new("e2".into(), "district_market", addr());
        assert!(npc.is_npc());
        assert!(!district.is_npc());
    }
}
