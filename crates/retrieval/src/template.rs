//! Templates and documents: the two tagged variants a pack is built from
//! (spec §9 redesign note: "dynamic-typed pack loader → tagged variants").

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::reputation::ReputationTier;

/// A curated, slot-fillable dialogue template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub template_id: String,
    pub content: String,
    pub tags: BTreeSet<String>,
    /// Whitelist of reputation tiers allowed to receive this template; `None`
    /// means unrestricted.
    pub reputation_tier: Option<BTreeSet<ReputationTier>>,
}

impl Template {
    pub fn new(template_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            content: content.into(),
            tags: BTreeSet::new(),
            reputation_tier: None,
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    pub fn with_reputation_tiers(mut self, tiers: impl IntoIterator<Item = ReputationTier>) -> Self {
        self.reputation_tier = Some(tiers.into_iter().collect());
        self
    }

    pub fn allows_tier(&self, tier: ReputationTier) -> bool {
        self.reputation_tier
            .as_ref()
            .map(|whitelist| whitelist.contains(&tier))
            .unwrap_or(true)
    }
}

/// A bulk dialogue document loaded from a newline-delimited record source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// One pack entry: either a curated template or a bulk document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PackItem {
    Template(Template),
    Document(Document),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_tier_is_unrestricted_without_a_whitelist() {
        let template = Template::new("t1", "hello");
        assert!(template.allows_tier(ReputationTier::Hostile));
    }

    #[test]
    fn allows_tier_respects_the_whitelist() {
        let template =
            Template::new("t1", "hello").with_reputation_tiers([ReputationTier::Neutral]);
        assert!(template.allows_tier(ReputationTier::Neutral));
        assert!(!template.allows_tier(ReputationTier::Revered));
    }
}
