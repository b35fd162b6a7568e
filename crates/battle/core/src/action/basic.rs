//! Basic-attack sequence.

use super::ActionCtx;
use crate::combat::{self, AttackKind, DamageKind, DamageSource, LethalOutcome};
use crate::engine::EngineError;
use crate::env::BattleEnv;
use crate::events::BattleEvent;
use crate::fury;
use crate::state::{Side, Slot, StatusKind, UnitToken};
use crate::ultimate::targeting;

/// Performs the basic-attack sequence for the unit at (side, slot):
/// nearest living enemy, one hit plus bounded follow-ups, hit-based fury
/// gain on both sides, and thorns reflect back through the lethal path.
pub(crate) fn basic_attack(
    ctx: &mut ActionCtx<'_>,
    env: &BattleEnv<'_>,
    events: &mut Vec<BattleEvent>,
    side: Side,
    slot: Slot,
) -> Result<(), EngineError> {
    let Some(mut attacker) = ctx.board.take(side, slot) else {
        return Ok(());
    };
    let result = run_sequence(ctx, env, events, &mut attacker);
    // The slot stayed empty while the attacker was off the board.
    let _ = ctx.board.place(attacker);
    result
}

fn run_sequence(
    ctx: &mut ActionCtx<'_>,
    env: &BattleEnv<'_>,
    events: &mut Vec<BattleEvent>,
    attacker: &mut UnitToken,
) -> Result<(), EngineError> {
    let enemy_side = attacker.side.opponent();
    let Some(target_slot) =
        targeting::nearest_living(ctx.board, enemy_side, attacker.battlefield_position())
            .into_iter()
            .next()
    else {
        return Ok(());
    };

    let damage_oracle = env.damage()?;
    let at_turn = ctx.at_turn;
    let config = ctx.config;
    let hits = attacker.attack_hits();

    for _ in 0..hits {
        if !attacker.is_alive() {
            break;
        }
        let Some(target) = ctx.board.unit_mut(enemy_side, target_slot) else {
            break;
        };
        if !target.is_alive() {
            break;
        }

        let base = attacker.effective_attack();
        let breakdown =
            damage_oracle.compute(attacker, target, base, DamageKind::Physical, AttackKind::Basic, 0);
        let target_hp_max = target.hp.maximum;
        let outcome = combat::apply_lethal(target, breakdown.dealt, DamageSource::Attack, at_turn);
        events.push(BattleEvent::DamageDealt {
            source: Some(attacker.instance),
            target: target.instance,
            amount: outcome.dealt,
            absorbed: breakdown.absorbed,
            damage_source: DamageSource::Attack,
            outcome: outcome.outcome,
        });

        let taken_gain = fury::gain_damage_taken(target, outcome.dealt, config);
        if taken_gain > 0 {
            events.push(BattleEvent::FuryChanged {
                unit: target.instance,
                delta: taken_gain as i64,
                current: target.fury.current,
            });
        }

        let reflect = target
            .statuses
            .get(StatusKind::Thorns)
            .map(|e| outcome.dealt * e.magnitude * e.stacks as u32 / 100)
            .unwrap_or(0);
        let target_instance = target.instance;

        let gained = fury::gain_single_hit(attacker, outcome.dealt, target_hp_max, config);
        if gained > 0 {
            events.push(BattleEvent::FuryChanged {
                unit: attacker.instance,
                delta: gained as i64,
                current: attacker.fury.current,
            });
        }

        if reflect > 0 {
            let reflected =
                combat::apply_lethal(attacker, reflect, DamageSource::Reflect, at_turn);
            events.push(BattleEvent::DamageDealt {
                source: Some(target_instance),
                target: attacker.instance,
                amount: reflected.dealt,
                absorbed: 0,
                damage_source: DamageSource::Reflect,
                outcome: reflected.outcome,
            });
        }

        if outcome.outcome == LethalOutcome::Died {
            break;
        }
    }

    Ok(())
}
