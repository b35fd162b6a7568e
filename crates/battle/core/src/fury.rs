//! Fury accounting (§resource rules).
//!
//! Every unit carries a fury pool and an opaque [`FuryState`] tracking the
//! cast-scoped ceilings. All mutation goes through the free functions here
//! so the clamping rules cannot be bypassed:
//!
//! - turn-start grant: fixed, unconditional;
//! - single-target hit gain: percent-of-target-max-hp dealt, cumulative per
//!   cast, clamped so the cast total never exceeds the single-cast ceiling;
//! - area hit gain: same formula, capped per target-hit, no cumulative
//!   ceiling (bounded by per-hit cap x targets hit);
//! - damage-taken gain: percent of own max hp taken, not cast-scoped;
//! - drain: base + percent transfer from the target's pool, capped per
//!   cast; fresh summons are fully immune.

use crate::config::BattleConfig;
use crate::state::UnitToken;

/// Identifies one cast for the cast-scoped ceilings. Tags are allocated
/// monotonically by the battle state; a tag change re-arms every ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastTag(pub u32);

/// Opaque per-unit fury bookkeeping.
///
/// The default state is uninitialized: spend and drain are no-ops until the
/// unit is materialized on the board with [`FuryState::new`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuryState {
    initialized: bool,
    /// Revival override: a locked pool accepts no grants or gains.
    locked: bool,
    cast_tag: Option<CastTag>,
    /// Fury credited toward the single-target ceiling this cast.
    single_gained: u32,
    /// Fury credited toward the drain ceiling this cast.
    drain_gained: u32,
}

impl FuryState {
    pub fn new() -> Self {
        Self {
            initialized: true,
            ..Self::default()
        }
    }

    pub fn new_locked() -> Self {
        Self {
            initialized: true,
            locked: true,
            ..Self::default()
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

/// Starts a new cast scope. Resets the cast-scoped accumulators when the
/// tag differs from the current one; re-issuing the same tag is a no-op.
pub fn begin_cast(unit: &mut UnitToken, tag: CastTag) {
    if unit.fury_acct.cast_tag != Some(tag) {
        unit.fury_acct.cast_tag = Some(tag);
        unit.fury_acct.single_gained = 0;
        unit.fury_acct.drain_gained = 0;
    }
}

/// Explicitly re-arms the cast-scoped ceilings without changing the tag.
pub fn reset_cast_scope(unit: &mut UnitToken) {
    unit.fury_acct.single_gained = 0;
    unit.fury_acct.drain_gained = 0;
}

/// Unconditional turn-start grant. Returns the fury actually added.
pub fn grant_turn_start(unit: &mut UnitToken, config: &BattleConfig) -> u32 {
    if !unit.fury_acct.initialized || unit.fury_acct.locked {
        return 0;
    }
    unit.fury.raise(config.turn_start_fury)
}

/// Raw hit gain: percent of the target's max hp dealt, scaled.
fn hit_gain(dealt: u32, target_hp_max: u32, scale_pct: u32) -> u32 {
    if target_hp_max == 0 {
        return 0;
    }
    (dealt * 100 / target_hp_max) * scale_pct / 100
}

/// Single-target hit gain, summed per cast and clamped so the cumulative
/// cast total never exceeds the single-cast ceiling — even when an
/// individual call's raw amount would overshoot it. Returns the fury added.
pub fn gain_single_hit(
    unit: &mut UnitToken,
    dealt: u32,
    target_hp_max: u32,
    config: &BattleConfig,
) -> u32 {
    if !unit.fury_acct.initialized || unit.fury_acct.locked {
        return 0;
    }
    let raw = hit_gain(dealt, target_hp_max, config.hit_gain_scale_pct);
    let headroom = config
        .single_cast_fury_cap
        .saturating_sub(unit.fury_acct.single_gained);
    let credited = raw.min(headroom);
    unit.fury_acct.single_gained += credited;
    unit.fury.raise(credited)
}

/// Area hit gain: capped per target-hit, summed without the single-target
/// ceiling. Returns the fury added.
pub fn gain_area_hit(
    unit: &mut UnitToken,
    dealt: u32,
    target_hp_max: u32,
    config: &BattleConfig,
) -> u32 {
    if !unit.fury_acct.initialized || unit.fury_acct.locked {
        return 0;
    }
    let raw = hit_gain(dealt, target_hp_max, config.hit_gain_scale_pct);
    unit.fury.raise(raw.min(config.area_hit_fury_cap))
}

/// Damage-taken gain: percent of own max hp taken, not cast-scoped.
pub fn gain_damage_taken(unit: &mut UnitToken, taken: u32, config: &BattleConfig) -> u32 {
    if !unit.fury_acct.initialized || unit.fury_acct.locked {
        return 0;
    }
    let raw = hit_gain(taken, unit.hp.maximum, config.taken_gain_scale_pct);
    unit.fury.raise(raw)
}

/// Drains fury from `target` into `caster`.
///
/// A freshly summoned target is fully immune: the call returns 0 and does
/// not mutate either pool. Uninitialized parties make the call a no-op.
/// The transfer is `base + pct` of the target's current pool, bounded by
/// the target's pool and the caster's remaining per-cast drain headroom.
pub fn drain(caster: &mut UnitToken, target: &mut UnitToken, config: &BattleConfig) -> u32 {
    if target.freshly_summoned {
        return 0;
    }
    if !caster.fury_acct.initialized || !target.fury_acct.initialized {
        return 0;
    }
    let requested = config.drain_base + target.fury.current * config.drain_pct / 100;
    let headroom = config
        .drain_cast_cap
        .saturating_sub(caster.fury_acct.drain_gained);
    let amount = requested.min(headroom).min(target.fury.current);
    if amount == 0 {
        return 0;
    }
    target.fury.lower(amount);
    caster.fury_acct.drain_gained += amount;
    caster.fury.raise(amount);
    amount
}

/// Passive fury regen applied at turn start, clamped like every gain.
pub fn regen(unit: &mut UnitToken, amount: u32) -> u32 {
    if !unit.fury_acct.initialized || unit.fury_acct.locked {
        return 0;
    }
    unit.fury.raise(amount)
}

/// Spends fury if the pool covers the cost. A no-op on uninitialized units.
pub fn spend(unit: &mut UnitToken, cost: u32) -> bool {
    if !unit.fury_acct.initialized || unit.fury.current < cost {
        return false;
    }
    unit.fury.lower(cost);
    true
}
