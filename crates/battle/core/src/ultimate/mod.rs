//! Ultimate resolution.
//!
//! Ultimates dispatch on the closed [`UltimateShape`] union — one handler
//! per variant, validated at data-load time by the content layer. Every
//! handler selects targets deterministically (nearest by Manhattan
//! distance, ties to the lower slot index) and applies damage, healing, and
//! statuses only through the combat/status/fury paths, so lethal
//! interception is never bypassed.

pub mod targeting;

use crate::action::ActionCtx;
use crate::combat::{self, AttackKind, DamageKind, DamageSource};
use crate::engine::EngineError;
use crate::env::BattleEnv;
use crate::events::BattleEvent;
use crate::fury;
use crate::state::{
    Side, Slot, StatusDuration, StatusKind, UnitId, UnitToken,
};
use crate::status;
use crate::summon::{RevivalOverrides, SpawnOverrides};

/// Crowd-control flavors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrowdControlKind {
    Sleep,
    Haste,
}

/// The closed set of ultimate shapes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UltimateShape {
    /// Burst damage on the nearest `targets` enemies.
    Burst { targets: u8, power_pct: u32 },

    /// Life drain: damage the nearest enemy, heal the caster for a share of
    /// the damage, and drain fury from the target's pool.
    Drain { power_pct: u32, leech_pct: u32 },

    /// Multi-hit sweep of every enemy in the caster's lane.
    LaneSweep { hits: u8, power_pct: u32 },

    /// Self-buff paid with a share of current hp.
    Overload {
        hp_cost_pct: u32,
        attack_up_pct: u32,
        duration: u16,
    },

    /// Sleep the nearest enemies or hasten the nearest allies.
    CrowdControl {
        effect: CrowdControlKind,
        targets: u8,
        duration: u16,
    },

    /// Revive the most recently fallen ally at its old slot.
    Revive {
        hp_pct: u32,
        fury: u32,
        fury_locked: bool,
    },

    /// Equalize hp among living allies.
    EqualizeHp,

    /// Queue minion spawns in free slots around the caster, under the
    /// live-minion limit with evict-oldest replacement. Minions inherit a
    /// percentage of the caster's current (not base) stats.
    SummonPack {
        unit: UnitId,
        count: u8,
        inherit_pct: u32,
        lifetime: u8,
    },

    /// Degraded form of a malformed definition: the cast spends its fury
    /// and does nothing else.
    Inert,
}

/// One unit's ultimate: cost, shape, and the default busy duration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UltimateDef {
    pub name: String,
    pub cost: u32,
    pub shape: UltimateShape,
    /// Fixed per-shape busy default in milliseconds; the resolver reports
    /// the max of this and the externally reported animation duration.
    pub busy_ms: u32,
}

impl UltimateDef {
    /// Placeholder for units without a castable ultimate. The cost is
    /// unreachable, so the decision step always falls back to the basic
    /// attack.
    pub fn inert() -> Self {
        Self {
            name: "none".to_string(),
            cost: u32::MAX,
            shape: UltimateShape::Inert,
            busy_ms: 0,
        }
    }
}

/// Resolves one ultimate cast for the unit at (side, slot). The cost has
/// already been spent by the action resolver. Returns the busy duration.
pub(crate) fn resolve(
    ctx: &mut ActionCtx<'_>,
    env: &BattleEnv<'_>,
    events: &mut Vec<BattleEvent>,
    side: Side,
    slot: Slot,
) -> Result<u32, EngineError> {
    // The caster steps off the board for the duration of the cast so
    // handlers can mutate targets on the same board without aliasing.
    let Some(mut caster) = ctx.board.take(side, slot) else {
        return Ok(0);
    };

    let def = caster.ultimate.clone();
    let result = dispatch(ctx, env, events, &mut caster, &def);

    let reported = env
        .vfx()
        .ok()
        .and_then(|vfx| vfx.play(crate::env::VfxCue::UltimateCast(caster.unit), caster.instance));

    // Board invariant: the slot was empty while the caster was out.
    let _ = ctx.board.place(caster);

    result?;
    Ok(def.busy_ms.max(reported.unwrap_or(0)))
}

fn dispatch(
    ctx: &mut ActionCtx<'_>,
    env: &BattleEnv<'_>,
    events: &mut Vec<BattleEvent>,
    caster: &mut UnitToken,
    def: &UltimateDef,
) -> Result<(), EngineError> {
    match &def.shape {
        UltimateShape::Burst { targets, power_pct } => {
            burst(ctx, env, events, caster, *targets, *power_pct)
        }
        UltimateShape::Drain {
            power_pct,
            leech_pct,
        } => drain(ctx, env, events, caster, *power_pct, *leech_pct),
        UltimateShape::LaneSweep { hits, power_pct } => {
            lane_sweep(ctx, env, events, caster, *hits, *power_pct)
        }
        UltimateShape::Overload {
            hp_cost_pct,
            attack_up_pct,
            duration,
        } => {
            overload(ctx, events, caster, *hp_cost_pct, *attack_up_pct, *duration);
            Ok(())
        }
        UltimateShape::CrowdControl {
            effect,
            targets,
            duration,
        } => {
            crowd_control(ctx, events, caster, *effect, *targets, *duration);
            Ok(())
        }
        UltimateShape::Revive {
            hp_pct,
            fury,
            fury_locked,
        } => {
            revive(ctx, caster, *hp_pct, *fury, *fury_locked);
            Ok(())
        }
        UltimateShape::EqualizeHp => {
            equalize_hp(ctx, events, caster);
            Ok(())
        }
        UltimateShape::SummonPack {
            unit,
            count,
            inherit_pct,
            lifetime,
        } => summon_pack(ctx, env, events, caster, *unit, *count, *inherit_pct, *lifetime),
        UltimateShape::Inert => Ok(()),
    }
}

/// Damages one enemy slot and books the caster's fury gain through the
/// chosen accounting channel. Returns the dealt amount.
fn strike(
    ctx: &mut ActionCtx<'_>,
    env: &BattleEnv<'_>,
    events: &mut Vec<BattleEvent>,
    caster: &mut UnitToken,
    target_slot: Slot,
    power_pct: u32,
    area: bool,
) -> Result<u32, EngineError> {
    let enemy_side = caster.side.opponent();
    let damage_oracle = env.damage()?;
    let at_turn = ctx.at_turn;
    let config = ctx.config;

    let Some(target) = ctx.board.unit_mut(enemy_side, target_slot) else {
        return Ok(0);
    };
    if !target.is_alive() {
        return Ok(0);
    }

    let base = caster.effective_attack() * power_pct / 100;
    let breakdown = damage_oracle.compute(caster, target, base, DamageKind::Magic, AttackKind::Ultimate, 0);
    let target_hp_max = target.hp.maximum;
    let outcome = combat::apply_lethal(target, breakdown.dealt, DamageSource::Attack, at_turn);
    events.push(BattleEvent::DamageDealt {
        source: Some(caster.instance),
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

    let gained = if area {
        fury::gain_area_hit(caster, outcome.dealt, target_hp_max, config)
    } else {
        fury::gain_single_hit(caster, outcome.dealt, target_hp_max, config)
    };
    if gained > 0 {
        events.push(BattleEvent::FuryChanged {
            unit: caster.instance,
            delta: gained as i64,
            current: caster.fury.current,
        });
    }

    Ok(outcome.dealt)
}

fn burst(
    ctx: &mut ActionCtx<'_>,
    env: &BattleEnv<'_>,
    events: &mut Vec<BattleEvent>,
    caster: &mut UnitToken,
    targets: u8,
    power_pct: u32,
) -> Result<(), EngineError> {
    let enemy_side = caster.side.opponent();
    let chosen: Vec<Slot> =
        targeting::nearest_living(ctx.board, enemy_side, caster.battlefield_position())
            .into_iter()
            .take(targets as usize)
            .collect();
    for slot in chosen {
        strike(ctx, env, events, caster, slot, power_pct, false)?;
    }
    Ok(())
}

fn drain(
    ctx: &mut ActionCtx<'_>,
    env: &BattleEnv<'_>,
    events: &mut Vec<BattleEvent>,
    caster: &mut UnitToken,
    power_pct: u32,
    leech_pct: u32,
) -> Result<(), EngineError> {
    let enemy_side = caster.side.opponent();
    let Some(target_slot) =
        targeting::nearest_living(ctx.board, enemy_side, caster.battlefield_position())
            .into_iter()
            .next()
    else {
        return Ok(());
    };

    let dealt = strike(ctx, env, events, caster, target_slot, power_pct, false)?;

    let healed = combat::apply_heal(caster, dealt * leech_pct / 100);
    if healed > 0 {
        events.push(BattleEvent::Healed {
            source: Some(caster.instance),
            target: caster.instance,
            amount: healed,
        });
    }

    if let Some(target) = ctx.board.unit_mut(enemy_side, target_slot) {
        let drained = fury::drain(caster, target, ctx.config);
        if drained > 0 {
            events.push(BattleEvent::FuryChanged {
                unit: target.instance,
                delta: -(drained as i64),
                current: target.fury.current,
            });
            events.push(BattleEvent::FuryChanged {
                unit: caster.instance,
                delta: drained as i64,
                current: caster.fury.current,
            });
        }
    }
    Ok(())
}

fn lane_sweep(
    ctx: &mut ActionCtx<'_>,
    env: &BattleEnv<'_>,
    events: &mut Vec<BattleEvent>,
    caster: &mut UnitToken,
    hits: u8,
    power_pct: u32,
) -> Result<(), EngineError> {
    let enemy_side = caster.side.opponent();
    let column = caster.battlefield_position().col;
    let lane = targeting::lane_living(ctx.board, enemy_side, column);
    for slot in lane {
        for _ in 0..hits.max(1) {
            let dealt = strike(ctx, env, events, caster, slot, power_pct, true)?;
            if dealt == 0 {
                break;
            }
        }
    }
    Ok(())
}

fn overload(
    ctx: &mut ActionCtx<'_>,
    events: &mut Vec<BattleEvent>,
    caster: &mut UnitToken,
    hp_cost_pct: u32,
    attack_up_pct: u32,
    duration: u16,
) {
    // The hp payment goes through the lethal path: an overload at death's
    // door can consume Undying instead of killing the caster.
    let payment = caster.hp.current * hp_cost_pct / 100;
    if payment > 0 {
        let outcome = combat::apply_lethal(caster, payment, DamageSource::Attack, ctx.at_turn);
        events.push(BattleEvent::DamageDealt {
            source: None,
            target: caster.instance,
            amount: outcome.dealt,
            absorbed: 0,
            damage_source: DamageSource::Attack,
            outcome: outcome.outcome,
        });
        if !caster.is_alive() {
            return;
        }
    }
    let _ = status::apply_status(
        caster,
        StatusKind::AttackUp,
        attack_up_pct,
        StatusDuration::Turns(duration),
        events,
    );
}

fn crowd_control(
    ctx: &mut ActionCtx<'_>,
    events: &mut Vec<BattleEvent>,
    caster: &mut UnitToken,
    effect: CrowdControlKind,
    targets: u8,
    duration: u16,
) {
    match effect {
        CrowdControlKind::Sleep => {
            let enemy_side = caster.side.opponent();
            let chosen: Vec<Slot> =
                targeting::nearest_living(ctx.board, enemy_side, caster.battlefield_position())
                    .into_iter()
                    .take(targets as usize)
                    .collect();
            for slot in chosen {
                if let Some(target) = ctx.board.unit_mut(enemy_side, slot) {
                    let _ = status::apply_status(
                        target,
                        StatusKind::Sleep,
                        0,
                        StatusDuration::Turns(duration),
                        events,
                    );
                }
            }
        }
        CrowdControlKind::Haste => {
            // The caster counts as its own nearest ally.
            let _ = status::apply_status(
                caster,
                StatusKind::Haste,
                0,
                StatusDuration::Turns(duration),
                events,
            );
            let chosen: Vec<Slot> =
                targeting::nearest_living(ctx.board, caster.side, caster.battlefield_position())
                    .into_iter()
                    .take(targets.saturating_sub(1) as usize)
                    .collect();
            for slot in chosen {
                if let Some(ally) = ctx.board.unit_mut(caster.side, slot) {
                    let _ = status::apply_status(
                        ally,
                        StatusKind::Haste,
                        0,
                        StatusDuration::Turns(duration),
                        events,
                    );
                }
            }
        }
    }
}

fn revive(
    ctx: &mut ActionCtx<'_>,
    caster: &mut UnitToken,
    hp_pct: u32,
    fury: u32,
    fury_locked: bool,
) {
    // Most recent death first; ties go to the lower slot. The caster's own
    // slot is excluded: it only looks free while the caster is mid-cast.
    let mut candidates: Vec<usize> = (0..ctx.graveyard.len())
        .filter(|&i| ctx.graveyard[i].side == caster.side && ctx.graveyard[i].slot != caster.slot)
        .collect();
    candidates.sort_by_key(|&i| (std::cmp::Reverse(ctx.graveyard[i].died_at), ctx.graveyard[i].slot));

    for index in candidates {
        let fallen = ctx.graveyard[index];
        let revival = RevivalOverrides {
            hp: (fallen.hp_max * hp_pct / 100).max(1),
            fury,
            fury_locked,
        };
        let accepted = ctx.summons.enqueue(
            ctx.board,
            ctx.scheduler,
            fallen.side,
            fallen.slot,
            caster.instance,
            fallen.unit,
            SpawnOverrides::default(),
            Some(revival),
        );
        if accepted {
            ctx.graveyard.remove(index);
            return;
        }
    }
}

fn equalize_hp(ctx: &mut ActionCtx<'_>, events: &mut Vec<BattleEvent>, caster: &mut UnitToken) {
    let side = caster.side;
    let (mut total, mut count) = (caster.hp.current as u64, 1u64);
    for ally in ctx.board.side(side).living() {
        total += ally.hp.current as u64;
        count += 1;
    }
    let average = (total / count).max(1) as u32;
    let at_turn = ctx.at_turn;

    let mut level = |unit: &mut UnitToken, events: &mut Vec<BattleEvent>| {
        if unit.hp.current < average {
            let healed = combat::apply_heal(unit, average - unit.hp.current);
            if healed > 0 {
                events.push(BattleEvent::Healed {
                    source: None,
                    target: unit.instance,
                    amount: healed,
                });
            }
        } else if unit.hp.current > average {
            // Never lethal: the average of living allies is at least 1.
            let outcome = combat::apply_lethal(
                unit,
                unit.hp.current - average,
                DamageSource::Periodic,
                at_turn,
            );
            events.push(BattleEvent::DamageDealt {
                source: None,
                target: unit.instance,
                amount: outcome.dealt,
                absorbed: 0,
                damage_source: DamageSource::Periodic,
                outcome: outcome.outcome,
            });
        }
    };

    level(caster, events);
    for slot in Slot::all() {
        let side_board = ctx.board.side_mut(side);
        if let Some(unit) = side_board.unit_mut(slot) {
            if unit.is_alive() {
                level(unit, events);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn summon_pack(
    ctx: &mut ActionCtx<'_>,
    env: &BattleEnv<'_>,
    events: &mut Vec<BattleEvent>,
    caster: &mut UnitToken,
    unit: UnitId,
    count: u8,
    inherit_pct: u32,
    lifetime: u8,
) -> Result<(), EngineError> {
    // Validated at load time; a stale id degrades to a no-op cast.
    if env.catalog()?.unit_template(unit).is_none() {
        return Ok(());
    }

    let side = caster.side;
    let overrides = SpawnOverrides {
        // Current stats, not base: buffs and lost hp both carry over.
        hp_max: Some((caster.hp.current * inherit_pct / 100).max(1)),
        attack: Some((caster.effective_attack() * inherit_pct / 100).max(1)),
        lifetime: Some(lifetime.max(1)),
        owner: Some(caster.instance),
    };

    for _ in 0..count {
        if ctx.board.minion_count(side) >= ctx.config.minion_limit {
            evict_oldest_minion(ctx, events, side);
        }

        // The caster is off the board mid-cast; its own slot is not free.
        let Some(slot) = targeting::free_slots_near(
            ctx.board,
            ctx.summons,
            side,
            caster.battlefield_position(),
        )
        .into_iter()
        .find(|&slot| slot != caster.slot) else {
            break;
        };

        let accepted = ctx.summons.enqueue(
            ctx.board,
            ctx.scheduler,
            side,
            slot,
            caster.instance,
            unit,
            overrides,
            None,
        );
        if !accepted {
            break;
        }
    }
    Ok(())
}

/// Removes the oldest living minion of `side` (lowest instance id — the
/// birth-order serial) to free a slot.
fn evict_oldest_minion(ctx: &mut ActionCtx<'_>, events: &mut Vec<BattleEvent>, side: Side) {
    let oldest = ctx
        .board
        .minions(side)
        .min_by_key(|u| u.instance)
        .map(|u| u.slot);
    if let Some(slot) = oldest {
        if let Some(minion) = ctx.board.take(side, slot) {
            events.push(BattleEvent::UnitRemoved {
                instance: minion.instance,
                reason: crate::events::RemovalReason::Evicted,
            });
        }
    }
}
