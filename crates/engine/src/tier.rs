//! Tier Classifier: an optional coarse-classification perspective over a
//! universe's realms (spec C6). Affects personality generation only; never
//! surfaced in any UI (out of scope per spec §1).

use std::collections::HashMap;

use multiverse_domain::RealmId;

/// The three closed classifications a realm may be assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Celestial,
    Terran,
    Subterran,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Celestial => "celestial",
            Tier::Terran => "terran",
            Tier::Subterran => "subterran",
        }
    }
}

/// A theme drawn from a closed set, paired with a tier at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Heaven,
    Aether,
    CityState,
    Frontier,
    Hell,
    Abyss,
}

impl Theme {
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Heaven => "heaven",
            Theme::Aether => "aether",
            Theme::CityState => "city_state",
            Theme::Frontier => "frontier",
            Theme::Hell => "hell",
            Theme::Abyss => "abyss",
        }
    }
}

/// One realm's classification record.
#[derive(Debug, Clone)]
pub struct TierAssignment {
    pub tier: Tier,
    pub theme: Theme,
    pub anchors: Vec<String>,
    pub tier_depth: u32,
    pub parent_realm_id: Option<RealmId>,
}

/// Maps `realm_id -> TierAssignment` plus reverse indices by tier, theme, and
/// anchor for O(1) lookup (spec §4.6).
#[derive(Debug, Default)]
pub struct TierRegistry {
    assignments: HashMap<RealmId, TierAssignment>,
    by_tier: HashMap<&'static str, Vec<RealmId>>,
    by_theme: HashMap<&'static str, Vec<RealmId>>,
    by_anchor: HashMap<String, Vec<RealmId>>,
}

impl TierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        realm_id: impl Into<RealmId>,
        tier: Tier,
        theme: Theme,
        anchors: Vec<String>,
    ) {
        let realm_id = realm_id.into();
        self.by_tier.entry(tier.label()).or_default().push(realm_id.clone());
        self.by_theme.entry(theme.label()).or_default().push(realm_id.clone());
        for anchor in &anchors {
            self.by_anchor.entry(anchor.clone()).or_default().push(realm_id.clone());
        }
        self.assignments.insert(
            realm_id,
            TierAssignment {
                tier,
                theme,
                anchors,
                tier_depth: 0,
                parent_realm_id: None,
            },
        );
    }

    pub fn get(&self, realm_id: &str) -> Option<&TierAssignment> {
        self.assignments.get(realm_id)
    }

    pub fn realms_in_tier(&self, tier: Tier) -> &[RealmId] {
        self.by_tier.get(tier.label()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn realms_with_theme(&self, theme: Theme) -> &[RealmId] {
        self.by_theme.get(theme.label()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn realms_with_anchor(&self, anchor: &str) -> &[RealmId] {
        self.by_anchor.get(anchor).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `zoom`: create a sub-realm id for a (parent, entity) pair, inheriting
    /// the parent's tier/theme and merging in additional anchors.
    pub fn zoom(
        &mut self,
        parent_realm_id: &str,
        entity_id: &str,
        additional_anchors: Vec<String>,
    ) -> Option<RealmId> {
        let parent = self.assignments.get(parent_realm_id)?;
        let tier = parent.tier;
        let theme = parent.theme;
        let depth = parent.tier_depth + 1;
        let mut anchors = parent.anchors.clone();
        anchors.extend(additional_anchors);

        let sub_realm_id = format!("sub_{parent_realm_id}_{entity_id}_{depth}");
        self.by_tier.entry(tier.label()).or_default().push(sub_realm_id.clone());
        self.by_theme.entry(theme.label()).or_default().push(sub_realm_id.clone());
        for anchor in &anchors {
            self.by_anchor.entry(anchor.clone()).or_default().push(sub_realm_id.clone());
        }
        self.assignments.insert(
            sub_realm_id.clone(),
            TierAssignment {
                tier,
                theme,
                anchors,
                tier_depth: depth,
                parent_realm_id: Some(parent_realm_id.to_string()),
            },
        );
        Some(sub_realm_id)
    }
}

/// Curated trait/dialogue-seed pools per (tier, theme), deterministically
/// selected by a stable hash of the entity id (spec §4.6 personality
/// generation).
pub fn personality_seed_traits(tier: Tier, theme: Theme, entity_id: &str) -> Vec<&'static str> {
    const POOLS: &[(&[&str], &str)] = &[
        (&["luminous", "serene", "distant"], "heaven"),
        (&["ethereal", "curious", "drifting"], "aether"),
        (&["shrewd", "bustling", "ambitious"], "city_state"),
        (&["hardy", "wary", "self-reliant"], "frontier"),
        (&["cruel", "cunning", "relentless"], "hell"),
        (&["feral", "hungry", "silent"], "abyss"),
    ];
    let _ = tier;
    let pool = POOLS
        .iter()
        .find(|(_, label)| *label == theme.label())
        .map(|(traits, _)| *traits)
        .unwrap_or(&["neutral"]);

    let index = stable_hash(entity_id) as usize % pool.len();
    vec![pool[index]]
}

fn stable_hash(s: &str) -> u64 {
    // FNV-1a: deterministic across runs and platforms, unlike `RandomState`.
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in s.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_inherits_tier_and_theme_and_increments_depth() {
        let mut registry = TierRegistry::new();
        registry.register("overworld", Tier::Terran, Theme::CityState, vec!["market".into()]);

        let sub = registry.zoom("overworld", "npc_1", vec!["shrine".into()]).unwrap();
        assert_eq!(sub, "sub_overworld_npc_1_1");
        let assignment = registry.get(&sub).unwrap();
        assert_eq!(assignment.tier, Tier::Terran);
        assert_eq!(assignment.theme, Theme::CityState);
        assert_eq!(assignment.tier_depth, 1);
        assert_eq!(assignment.parent_realm_id.as_deref(), Some("overworld"));
        assert!(assignment.anchors.contains(&"market".to_string()));
        assert!(assignment.anchors.contains(&"shrine".to_string()));
    }

    #[test]
    fn personality_traits_are_deterministic_for_an_entity_id() {
        let a = personality_seed_traits(Tier::Terran, Theme::Frontier, "npc_edrin");
        let b = personality_seed_traits(Tier::Terran, Theme::Frontier, "npc_edrin");
        assert_eq!(a, b);
    }

    #[test]
    fn reverse_indices_support_lookup_by_tier_and_theme() {
        let mut registry = TierRegistry::new();
        registry.register("heavenspire", Tier::Celestial, Theme::Heaven, vec![]);
        registry.register("underdark", Tier::Subterran, Theme::Abyss, vec![]);

        assert_eq!(registry.realms_in_tier(Tier::Celestial), &["heavenspire".to_string()]);
        assert_eq!(registry.realms_with_theme(Theme::Abyss), &["underdark".to_string()]);
    }
}
