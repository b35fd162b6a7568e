//! Status effect engine.
//!
//! Storage and merge rules live in [`crate::state::StatusEffects`]; this
//! module applies the gameplay consequences: the act gate, periodic damage
//! (routed through the single lethal path like every other damage source),
//! duration ticking on both cadences, and expiry effects.

use crate::combat::{self, DamageSource};
use crate::events::BattleEvent;
use crate::state::{
    Board, Side, Slot, StatusDuration, StatusKind, TickCadence, UnitToken,
};

/// Applies a status to a unit, emitting a notification when it lands.
/// Returns the resulting stack count (None if the effect list was full).
pub fn apply_status(
    unit: &mut UnitToken,
    kind: StatusKind,
    magnitude: u32,
    duration: StatusDuration,
    events: &mut Vec<BattleEvent>,
) -> Option<u8> {
    let stacks = unit.statuses.add(kind, magnitude, duration)?;
    events.push(BattleEvent::StatusApplied {
        target: unit.instance,
        kind,
        stacks,
    });
    Some(stacks)
}

/// Whether the unit may act this turn; `Err` carries the blocking kind.
pub fn gate(unit: &UnitToken) -> Result<(), StatusKind> {
    match unit.statuses.blocking_kind() {
        Some(kind) => Err(kind),
        None => Ok(()),
    }
}

/// Runs one cadence tick for a single unit: periodic damage first, then
/// duration decrements, then expiry effects (a Doom mark kills through the
/// lethal path when it runs out).
pub fn tick_unit(
    unit: &mut UnitToken,
    cadence: TickCadence,
    at_turn: u64,
    events: &mut Vec<BattleEvent>,
) {
    // Periodic damage.
    let mut periodic = 0u32;
    for effect in unit.statuses.iter() {
        if effect.cadence == cadence && effect.kind.is_periodic() {
            periodic += effect.magnitude * effect.stacks as u32;
        }
    }
    if periodic > 0 {
        let outcome = combat::apply_lethal(unit, periodic, DamageSource::Periodic, at_turn);
        events.push(BattleEvent::DamageDealt {
            source: None,
            target: unit.instance,
            amount: outcome.dealt,
            absorbed: 0,
            damage_source: DamageSource::Periodic,
            outcome: outcome.outcome,
        });
        if !unit.is_alive() {
            return;
        }
    }

    // Duration ticking and expiry.
    let expired = unit.statuses.tick(cadence);
    for kind in expired {
        events.push(BattleEvent::StatusExpired {
            unit: unit.instance,
            kind,
        });
        if kind == StatusKind::Doom {
            let outcome = combat::instant_kill(unit, at_turn);
            events.push(BattleEvent::DamageDealt {
                source: None,
                target: unit.instance,
                amount: outcome.dealt,
                absorbed: 0,
                damage_source: DamageSource::InstantKill,
                outcome: outcome.outcome,
            });
            if !unit.is_alive() {
                return;
            }
        }
    }
}

/// Runs the side-phase cadence tick for every living unit of a side.
/// Called by the engine on each completed side phase.
pub fn tick_side_phase(board: &mut Board, side: Side, at_turn: u64, events: &mut Vec<BattleEvent>) {
    for slot in Slot::all() {
        if let Some(unit) = board.unit_mut(side, slot) {
            if unit.is_alive() {
                tick_unit(unit, TickCadence::SidePhase, at_turn, events);
            }
        }
    }
}
