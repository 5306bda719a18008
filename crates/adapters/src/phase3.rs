//! Phase-3 adapter: projects an entity's enrichment history into a semantic
//! context (spec §4.10), and serves as the `SemanticReprojectionPort`
//! implementation the Torus Cycle Engine's `SEMANTIC_CONTEXT` handler
//! delegates to (`multiverse-engine::torus::SemanticReprojectionPort`).

use std::collections::{BTreeMap, HashMap};

use multiverse_domain::Entity;
use multiverse_engine::SemanticReprojectionPort;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct SemanticContext {
    pub entity_id: String,
    pub realm_id: String,
    pub modal_type: Option<String>,
    pub related_topics: Vec<String>,
    pub narrative_arc: Vec<String>,
    pub enrichment_density: f64,
    /// Count of enrichments folded into this context; doubles as the depth
    /// of the audit trail a player-facing "why does the NPC know this"
    /// explanation could walk.
    pub audit_trail_depth: usize,
    pub keywords: Vec<String>,
}

/// `{realm_id}` and `{type_prefix}` derived keywords, used alongside topics
/// so phase-3 search can be entered by realm or entity kind as well as
/// subject matter (spec §3: `semantic_keywords = topics ∪ realm_{realm_id}
/// ∪ entity_{type_prefix}`).
fn type_prefix(entity_type: &str) -> &str {
    entity_type.split('_').next().unwrap_or(entity_type)
}

fn brief(data: &Value) -> String {
    let rendered = data.to_string();
    if rendered.len() > 40 {
        format!("{}...", &rendered[..40])
    } else {
        rendered
    }
}

/// Pure projection from an entity's enrichment history, used both by
/// `integrate_universe` (to build the registry) and by the torus engine's
/// mid-cycle `SEMANTIC_CONTEXT` reprojection.
pub fn extract_semantic_context(entity: &Entity, realm_id: &str) -> SemanticContext {
    let enrichments = entity.enrichments();

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut first_seen: Vec<&'static str> = Vec::new();
    for e in enrichments {
        let label = e.kind.label();
        if !counts.contains_key(label) {
            first_seen.push(label);
        }
        *counts.entry(label).or_insert(0) += 1;
    }

    // Modal type: highest count, ties broken lexicographically.
    let modal_type = counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(label, _)| label.to_string());

    let related_topics: Vec<String> = first_seen
        .iter()
        .filter(|label| Some(label.to_string()) != modal_type)
        .map(|label| label.to_string())
        .collect();

    let narrative_arc: Vec<String> = enrichments
        .iter()
        .map(|e| format!("{}: {}", e.kind.label(), brief(&e.data)))
        .collect();

    let enrichment_density = enrichments.len() as f64 / 7.0;
    let audit_trail_depth = enrichments.len();

    // keywords = topics ∪ realm_{realm_id} ∪ entity_{type_prefix}
    let mut keywords: Vec<String> = Vec::new();
    if let Some(modal) = &modal_type {
        keywords.push(modal.clone());
    }
    keywords.extend(related_topics.iter().cloned());
    keywords.push(format!("realm_{realm_id}"));
    keywords.push(format!("entity_{}", type_prefix(entity.entity_type())));

    SemanticContext {
        entity_id: entity.id().clone(),
        realm_id: realm_id.to_string(),
        modal_type,
        related_topics,
        narrative_arc,
        enrichment_density,
        audit_trail_depth,
        keywords,
    }
}

/// Indexes extracted contexts by topic, keyword, and realm, preserving
/// first-registration order within each index (spec §4.10: "stable ordering
/// by first registration").
#[derive(Debug, Default)]
pub struct Phase3Registry {
    contexts: BTreeMap<String, SemanticContext>,
    by_topic: HashMap<String, Vec<String>>,
    by_keyword: HashMap<String, Vec<String>>,
    by_realm: HashMap<String, Vec<String>>,
}

impl Phase3Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract_and_register(&mut self, entity: &Entity, realm_id: &str) -> &SemanticContext {
        let context = extract_semantic_context(entity, realm_id);
        let entity_id = context.entity_id.clone();

        if let Some(modal) = &context.modal_type {
            self.by_topic.entry(modal.clone()).or_default().push(entity_id.clone());
        }
        for topic in &context.related_topics {
            self.by_topic.entry(topic.clone()).or_default().push(entity_id.clone());
        }
        for keyword in &context.keywords {
            self.by_keyword.entry(keyword.clone()).or_default().push(entity_id.clone());
        }
        self.by_realm.entry(realm_id.to_string()).or_default().push(entity_id.clone());

        self.contexts.entry(entity_id).or_insert(context)
    }

    pub fn get(&self, entity_id: &str) -> Option<&SemanticContext> {
        self.contexts.get(entity_id)
    }

    pub fn search_by_topic(&self, topic: &str) -> &[String] {
        self.by_topic.get(topic).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn search_by_keyword(&self, keyword: &str) -> &[String] {
        self.by_keyword.get(keyword).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn search_by_realm(&self, realm_id: &str) -> &[String] {
        self.by_realm.get(realm_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

impl SemanticReprojectionPort for Phase3Registry {
    fn reproject(&self, entity: &Entity, realm_id: &str) -> Value {
        serde_json::to_value(extract_semantic_context(entity, realm_id))
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use multiverse_domain::{Stat7Address, StoryElement};
    use serde_json::json;

    fn addr() -> Stat7Address {
        Stat7Address::new(0, 0, 0, 0, 0, 0, 0).unwrap()
    }

    #[test]
    fn modal_type_is_the_most_frequent_enrichment() {
        let mut entity = Entity::new("npc_1".to_string(), "npc_merchant", addr());
        entity.enrich(StoryElement::Dialogue, json!({"note": "hi"}), Utc::now());
        entity.enrich(StoryElement::Dialogue, json!({"note": "hi again"}), Utc::now());
        entity.enrich(StoryElement::Quest, json!({"note": "go fetch"}), Utc::now());

        let context = extract_semantic_context(&entity, "tavern");
        assert_eq!(context.modal_type.as_deref(), Some("dialogue"));
        assert_eq!(context.related_topics, vec!["quest".to_string()]);
    }

    #[test]
    fn tie_breaks_modal_type_lexicographically() {
        let mut entity = Entity::new("npc_1".to_string(), "npc_merchant", addr());
        entity.enrich(StoryElement::Quest, json!({}), Utc::now());
        entity.enrich(StoryElement::Dialogue, json!({}), Utc::now());

        let context = extract_semantic_context(&entity, "tavern");
        assert_eq!(context.modal_type.as_deref(), Some("dialogue"));
    }

    #[test]
    fn keywords_are_topics_plus_realm_and_entity_type_prefix() {
        let mut entity = Entity::new("npc_1".to_string(), "npc_merchant", addr());
        entity.enrich(StoryElement::Dialogue, json!({"note": "hi"}), Utc::now());

        let context = extract_semantic_context(&entity, "tavern");
        assert!(context.keywords.contains(&"dialogue".to_string()));
        assert!(context.keywords.contains(&"realm_tavern".to_string()));
        assert!(context.keywords.contains(&"entity_npc".to_string()));
        assert_eq!(context.audit_trail_depth, 1);
        assert_eq!(context.realm_id, "tavern");
    }

    #[test]
    fn registry_indexes_by_realm_and_entity_type_keywords() {
        let mut entity = Entity::new("npc_1".to_string(), "npc_merchant", addr());
        entity.enrich(StoryElement::Dialogue, json!({}), Utc::now());

        let mut registry = Phase3Registry::new();
        registry.extract_and_register(&entity, "tavern");

        assert_eq!(registry.search_by_keyword("realm_tavern"), &["npc_1".to_string()]);
        assert_eq!(registry.search_by_keyword("entity_npc"), &["npc_1".to_string()]);
    }

    #[test]
    fn search_by_topic_returns_both_entities_in_registration_order() {
        let mut e1 = Entity::new("npc_1".to_string(), "npc_merchant", addr());
        e1.enrich(StoryElement::Dialogue, json!({}), Utc::now());
        let mut e2 = Entity::new("npc_2".to_string(), "npc_guard", addr());
        e2.enrich(StoryElement::Dialogue, json!({}), Utc::now());

        let mut registry = Phase3Registry::new();
        registry.extract_and_register(&e1, "tavern");
        registry.extract_and_register(&e2, "tavern");

        assert_eq!(registry.search_by_topic("dialogue"), &["npc_1".to_string(), "npc_2".to_string()]);
    }
}
