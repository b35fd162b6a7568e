//! Status effect storage for units.
//!
//! This module owns the per-unit effect list and its merge/expiry rules.
//! The gameplay consequences of effects (periodic damage, action gating,
//! lethal interception) live in [`crate::status`] and [`crate::combat`].
//!
//! # Duration model
//!
//! Effects carry a remaining duration in ticks of their cadence: unit-turn
//! effects count the bearer's turns, side-phase effects count completed
//! phases of the bearer's side. A duration of zero removes the effect.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;

/// Broad classification of a status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusCategory {
    Buff,
    Debuff,
    Mark,
}

/// When an effect's duration ticks down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TickCadence {
    /// Ticks at the end of the bearer's own turn.
    UnitTurn,
    /// Ticks when the bearer's side completes a phase.
    SidePhase,
}

/// Remaining lifetime of an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusDuration {
    Turns(u16),
    UntilBattleEnd,
}

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    // ========================================================================
    // Crowd control
    // ========================================================================
    /// Cannot act; the turn is skipped.
    Sleep,

    // ========================================================================
    // Buffs
    // ========================================================================
    /// Extra follow-up hit on basic attacks.
    Haste,

    /// Basic-attack damage raised by `magnitude` percent per stack.
    AttackUp,

    /// One-shot lethal interception: otherwise-lethal damage leaves 1 hp.
    Undying,

    // ========================================================================
    // Debuffs
    // ========================================================================
    /// Basic-attack damage lowered by `magnitude` percent per stack.
    AttackDown,

    /// Damage over time, ticking on the bearer's turn.
    Poison,

    /// Damage over time, ticking on the bearer's side-phase boundary.
    Scorch,

    // ========================================================================
    // Marks
    // ========================================================================
    /// Reflects `magnitude` percent of dealt melee damage to the attacker.
    Thorns,

    /// Instant-kill through the lethal path when the mark expires.
    Doom,
}

impl StatusKind {
    pub const fn category(self) -> StatusCategory {
        match self {
            StatusKind::Haste | StatusKind::AttackUp | StatusKind::Undying => StatusCategory::Buff,
            StatusKind::Sleep
            | StatusKind::AttackDown
            | StatusKind::Poison
            | StatusKind::Scorch => StatusCategory::Debuff,
            StatusKind::Thorns | StatusKind::Doom => StatusCategory::Mark,
        }
    }

    /// Stack ceiling; reapplication beyond this only refreshes duration.
    pub const fn max_stacks(self) -> u8 {
        match self {
            StatusKind::Sleep | StatusKind::Haste | StatusKind::Undying | StatusKind::Doom => 1,
            StatusKind::Poison | StatusKind::Scorch => 5,
            StatusKind::Thorns | StatusKind::AttackUp | StatusKind::AttackDown => 3,
        }
    }

    pub const fn cadence(self) -> TickCadence {
        match self {
            StatusKind::Scorch => TickCadence::SidePhase,
            _ => TickCadence::UnitTurn,
        }
    }

    /// Whether the bearer is prevented from acting on its turn.
    pub const fn blocks_action(self) -> bool {
        matches!(self, StatusKind::Sleep)
    }

    /// Per-stack periodic damage, if this effect deals any.
    pub const fn is_periodic(self) -> bool {
        matches!(self, StatusKind::Poison | StatusKind::Scorch)
    }
}

/// A single live status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Current stack count, `1..=kind.max_stacks()`.
    pub stacks: u8,
    /// Effect strength; meaning depends on the kind (damage per stack,
    /// percent modifier, reflect percent).
    pub magnitude: u32,
    pub duration: StatusDuration,
    pub cadence: TickCadence,
}

/// Ordered list of active status effects on one unit.
///
/// Holds at most one live entry per kind; [`StatusEffects::add`] merges
/// reapplications.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Adds or merges a status effect.
    ///
    /// An existing entry of the same kind gains a stack (capped at the
    /// per-kind maximum), refreshes its duration to the incoming one, and
    /// keeps the stronger magnitude. Returns the resulting stack count, or
    /// `None` if the list is full and the kind was not already present.
    pub fn add(
        &mut self,
        kind: StatusKind,
        magnitude: u32,
        duration: StatusDuration,
    ) -> Option<u8> {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.stacks = existing.stacks.saturating_add(1).min(kind.max_stacks());
            existing.duration = duration;
            existing.magnitude = existing.magnitude.max(magnitude);
            return Some(existing.stacks);
        }

        if self.effects.is_full() {
            return None;
        }
        self.effects.push(StatusEffect {
            kind,
            stacks: 1,
            magnitude,
            duration,
            cadence: kind.cadence(),
        });
        Some(1)
    }

    /// Removes a status effect immediately. Returns true if it was present.
    pub fn remove(&mut self, kind: StatusKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        self.effects.len() != before
    }

    /// Decrements duration-bearing effects of the given cadence and removes
    /// those that reached zero, returning the expired kinds in list order.
    pub fn tick(&mut self, cadence: TickCadence) -> ArrayVec<StatusKind, { BattleConfig::MAX_STATUS_EFFECTS }> {
        let mut expired = ArrayVec::new();
        for effect in self.effects.iter_mut() {
            if effect.cadence != cadence {
                continue;
            }
            if let StatusDuration::Turns(remaining) = effect.duration {
                let remaining = remaining.saturating_sub(1);
                effect.duration = StatusDuration::Turns(remaining);
                if remaining == 0 {
                    expired.push(effect.kind);
                }
            }
        }
        self.effects
            .retain(|e| !matches!(e.duration, StatusDuration::Turns(0)));
        expired
    }

    /// Whether any active effect prevents the bearer from acting.
    pub fn blocking_kind(&self) -> Option<StatusKind> {
        self.effects
            .iter()
            .find(|e| e.kind.blocks_action())
            .map(|e| e.kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_merges_instead_of_duplicating() {
        let mut statuses = StatusEffects::empty();
        assert_eq!(
            statuses.add(StatusKind::Poison, 4, StatusDuration::Turns(2)),
            Some(1)
        );
        assert_eq!(
            statuses.add(StatusKind::Poison, 3, StatusDuration::Turns(5)),
            Some(2)
        );
        assert_eq!(statuses.len(), 1);

        let effect = statuses.get(StatusKind::Poison).unwrap();
        assert_eq!(effect.stacks, 2);
        assert_eq!(effect.duration, StatusDuration::Turns(5));
        assert_eq!(effect.magnitude, 4);
    }

    #[test]
    fn stacks_cap_at_kind_maximum() {
        let mut statuses = StatusEffects::empty();
        for _ in 0..10 {
            statuses.add(StatusKind::Undying, 0, StatusDuration::UntilBattleEnd);
        }
        assert_eq!(statuses.get(StatusKind::Undying).unwrap().stacks, 1);
    }

    #[test]
    fn tick_removes_expired_effects_of_matching_cadence() {
        let mut statuses = StatusEffects::empty();
        statuses.add(StatusKind::Sleep, 0, StatusDuration::Turns(1));
        statuses.add(StatusKind::Scorch, 2, StatusDuration::Turns(1));

        let expired = statuses.tick(TickCadence::UnitTurn);
        assert_eq!(expired.as_slice(), &[StatusKind::Sleep]);
        assert!(statuses.has(StatusKind::Scorch));

        let expired = statuses.tick(TickCadence::SidePhase);
        assert_eq!(expired.as_slice(), &[StatusKind::Scorch]);
        assert!(statuses.is_empty());
    }
}
