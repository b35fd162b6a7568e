//! The single lethal-resolution path.
//!
//! Every point of damage in the simulation — basic attacks, ultimate hits,
//! periodic status ticks, thorns reflect, instant kills, even hp payments —
//! lands through [`apply_lethal`]. It is the only code allowed to drop a
//! unit's hp to zero or consume an Undying charge, so the interception
//! precedence is identical for all sources.

use crate::state::{StatusKind, UnitToken};

/// What produced the damage. Carried on events for observers; the
/// interception precedence does not depend on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageSource {
    Attack,
    Periodic,
    Reflect,
    InstantKill,
}

/// How a potentially-lethal hit resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LethalOutcome {
    /// Hp stayed above zero.
    Survived,
    /// The hit would have killed; a one-shot Undying charge was consumed
    /// and the unit stands at 1 hp. No death is recorded.
    UndyingConsumed,
    /// Hp reached zero; the unit is dead and its death timestamp set.
    Died,
}

/// Result of applying damage to one unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageOutcome {
    /// Hp actually removed.
    pub dealt: u32,
    pub outcome: LethalOutcome,
}

/// Applies `amount` damage to `unit` through the lethal precedence chain.
///
/// Precedence when hp would fall to zero:
/// (a) a one-shot Undying effect is consumed, hp becomes 1, the unit stays
/// alive, no death recorded; (b) otherwise hp becomes 0, `alive` flips
/// false, and `at_turn` is recorded as the death timestamp.
///
/// Damage against an already-dead unit is a no-op.
pub fn apply_lethal(
    unit: &mut UnitToken,
    amount: u32,
    _source: DamageSource,
    at_turn: u64,
) -> DamageOutcome {
    if !unit.alive {
        return DamageOutcome {
            dealt: 0,
            outcome: LethalOutcome::Survived,
        };
    }

    if amount < unit.hp.current {
        unit.hp.lower(amount);
        return DamageOutcome {
            dealt: amount,
            outcome: LethalOutcome::Survived,
        };
    }

    // Lethal from here on.
    if unit.statuses.has(StatusKind::Undying) {
        unit.statuses.remove(StatusKind::Undying);
        let dealt = unit.hp.current.saturating_sub(1);
        unit.hp.current = 1;
        return DamageOutcome {
            dealt,
            outcome: LethalOutcome::UndyingConsumed,
        };
    }

    let dealt = unit.hp.current;
    unit.hp.current = 0;
    unit.alive = false;
    unit.died_at = Some(at_turn);
    DamageOutcome {
        dealt,
        outcome: LethalOutcome::Died,
    }
}

/// Heals `unit`, clamped to max hp. Returns the hp actually restored.
/// Healing a dead unit is a no-op; revival goes through the summon queue.
pub fn apply_heal(unit: &mut UnitToken, amount: u32) -> u32 {
    if !unit.alive {
        return 0;
    }
    unit.hp.raise(amount)
}

/// Kills `unit` outright through the same precedence chain, so Undying
/// intercepts instant kills exactly like ordinary damage.
pub fn instant_kill(unit: &mut UnitToken, at_turn: u64) -> DamageOutcome {
    let amount = unit.hp.current.max(1);
    apply_lethal(unit, amount, DamageSource::InstantKill, at_turn)
}
