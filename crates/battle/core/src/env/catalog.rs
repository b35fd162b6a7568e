//! Unit templates served by the catalog collaborator.

use crate::fury::FuryState;
use crate::state::{
    InstanceId, Meter, Side, Slot, StatusEffects, UnitId, UnitTags, UnitToken,
};
use crate::ultimate::UltimateDef;

/// Immutable description of a unit kind, materialized into [`UnitToken`]s
/// at spawn time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTemplate {
    pub id: UnitId,
    pub name: String,
    pub hp_max: u32,
    pub fury_max: u32,
    pub attack: u32,
    pub follow_up_hits: u8,
    pub hp_regen: u32,
    pub fury_regen: u32,
    pub tags: UnitTags,
    pub ultimate: UltimateDef,
}

impl UnitTemplate {
    pub fn new(id: UnitId, name: impl Into<String>, hp_max: u32, attack: u32) -> Self {
        Self {
            id,
            name: name.into(),
            hp_max,
            fury_max: 100,
            attack,
            follow_up_hits: 0,
            hp_regen: 0,
            fury_regen: 0,
            tags: UnitTags::empty(),
            ultimate: UltimateDef::inert(),
        }
    }

    pub fn with_tags(mut self, tags: UnitTags) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_ultimate(mut self, ultimate: UltimateDef) -> Self {
        self.ultimate = ultimate;
        self
    }

    pub fn with_regen(mut self, hp_regen: u32, fury_regen: u32) -> Self {
        self.hp_regen = hp_regen;
        self.fury_regen = fury_regen;
        self
    }

    pub fn with_follow_up_hits(mut self, hits: u8) -> Self {
        self.follow_up_hits = hits;
        self
    }

    pub fn with_fury_max(mut self, fury_max: u32) -> Self {
        self.fury_max = fury_max;
        self
    }

    /// Creates a live token from this template.
    ///
    /// Fresh spawns start at full hp with an empty, initialized fury pool
    /// and carry the fresh-summon drain immunity until their first turn
    /// completes.
    pub fn materialize(&self, instance: InstanceId, side: Side, slot: Slot) -> UnitToken {
        UnitToken {
            unit: self.id,
            instance,
            side,
            slot,
            hp: Meter::full(self.hp_max),
            fury: Meter::new(0, self.fury_max),
            alive: true,
            died_at: None,
            tags: self.tags,
            minion: None,
            statuses: StatusEffects::empty(),
            fury_acct: FuryState::new(),
            freshly_summoned: true,
            attack: self.attack,
            follow_up_hits: self.follow_up_hits,
            hp_regen: self.hp_regen,
            fury_regen: self.fury_regen,
            ultimate: self.ultimate.clone(),
        }
    }
}

/// Unit template catalog collaborator.
pub trait CatalogOracle {
    fn unit_template(&self, id: UnitId) -> Option<&UnitTemplate>;
}
