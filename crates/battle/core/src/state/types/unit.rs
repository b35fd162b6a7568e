//! Unit token state.
//!
//! A [`UnitToken`] is one combatant on the board: identity, vitals, status
//! effects, and the opaque fury-accounting state. Tokens are created at
//! spawn (leaders at battle start, everything else through the summon
//! queue) and stop acting the instant `alive` flips false.

use super::common::{InstanceId, Meter, Position, Side, Slot, UnitId};
use super::status::{StatusEffects, StatusKind};
use crate::config::BattleConfig;
use crate::fury::FuryState;
use crate::ultimate::UltimateDef;

bitflags::bitflags! {
    /// Role markers carried by a unit for termination rules.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitTags: u8 {
        /// The side loses when its last LEADER dies.
        const LEADER = 1 << 0;
        /// Asymmetric timeouts resolve in this unit's side's favor while it lives.
        const BOSS = 1 << 1;
    }
}

/// Minion bookkeeping for summoned units with bounded lifetimes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinionState {
    /// Instance id of the summoner; unique and stable for the battle.
    pub owner: InstanceId,
    /// Remaining lifetime in completed side phases. Zero removes the minion.
    pub lifetime: u8,
}

/// One combatant on the board.
///
/// # Invariants
///
/// - `hp.current` stays within `[0, hp.maximum]` while alive.
/// - `alive == false` implies `hp.current == 0` and `died_at` set; revival
///   clears both.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitToken {
    pub unit: UnitId,
    pub instance: InstanceId,
    pub side: Side,
    pub slot: Slot,

    pub hp: Meter,
    pub fury: Meter,
    pub alive: bool,
    /// Turn ordinal at which this unit died. Cleared on revival.
    pub died_at: Option<u64>,

    pub tags: UnitTags,
    pub minion: Option<MinionState>,

    pub statuses: StatusEffects,
    pub fury_acct: FuryState,
    /// Set at spawn, cleared at the end of the unit's first turn. Fresh
    /// summons are immune to fury drain.
    pub freshly_summoned: bool,

    // === combat profile (copied from the catalog template at spawn) ===
    pub attack: u32,
    pub follow_up_hits: u8,
    pub hp_regen: u32,
    pub fury_regen: u32,
    pub ultimate: UltimateDef,
}

impl UnitToken {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn is_minion(&self) -> bool {
        self.minion.is_some()
    }

    #[inline]
    pub fn is_leader(&self) -> bool {
        self.tags.contains(UnitTags::LEADER)
    }

    /// Position on the shared battlefield grid. Enemy rows are mirrored so
    /// the two front rows face each other, which makes Manhattan distances
    /// between opposing units meaningful.
    pub fn battlefield_position(&self) -> Position {
        let local = self.slot.position();
        match self.side {
            Side::Ally => local,
            Side::Enemy => Position::new(local.col, 3 - local.row),
        }
    }

    /// Basic-attack damage after AttackUp/AttackDown modifiers.
    pub fn effective_attack(&self) -> u32 {
        let mut pct: i64 = 100;
        if let Some(up) = self.statuses.get(StatusKind::AttackUp) {
            pct += (up.magnitude as i64) * (up.stacks as i64);
        }
        if let Some(down) = self.statuses.get(StatusKind::AttackDown) {
            pct -= (down.magnitude as i64) * (down.stacks as i64);
        }
        let scaled = (self.attack as i64) * pct.max(0) / 100;
        scaled.max(0) as u32
    }

    /// Number of basic-attack hits this unit performs per turn, bounded by
    /// the configured follow-up cap. Haste adds one follow-up.
    pub fn attack_hits(&self) -> u8 {
        let mut follow_ups = self.follow_up_hits;
        if self.statuses.has(StatusKind::Haste) {
            follow_ups = follow_ups.saturating_add(1);
        }
        1 + follow_ups.min(BattleConfig::MAX_FOLLOW_UP_HITS)
    }
}
