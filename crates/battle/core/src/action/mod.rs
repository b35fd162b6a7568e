//! Action resolution: one unit's turn.
//!
//! Resolution order for a scheduled (side, slot):
//! 1. a due spawn request materializes and the new unit acts this step;
//! 2. otherwise the living occupant acts; nothing resolvable is a typed
//!    system-error skip that must not advance phase bookkeeping;
//! 3. turn-start regen (hp and fury, clamped), notified only on change;
//! 4. the status gate may skip the turn with a reason;
//! 5. turn-start fury grant, then ultimate (pool covers cost) or the
//!    basic-attack sequence;
//! 6. turn and action notifications bracket the step with scheduling
//!    metadata.

mod basic;

use crate::config::BattleConfig;
use crate::engine::EngineError;
use crate::env::BattleEnv;
use crate::events::{BattleEvent, StepMeta};
use crate::fury::{self, CastTag};
use crate::scheduler::{Scheduler, TurnStep};
use crate::state::{Board, FallenUnit, InstanceId, StatusKind, TickCadence};
use crate::status;
use crate::summon::{self, SummonQueue};
use crate::ultimate;

/// What the unit did with its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    BasicAttack,
    Ultimate,
    /// No action was performed (skipped turn).
    Idle,
}

/// Why a scheduled step performed no action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipReason {
    /// Normal skip: the unit exists but a status blocks it. Counts toward
    /// phase bookkeeping.
    StatusBlocked(StatusKind),

    /// System-error skip: the resolver was invoked without a resolvable
    /// unit. Must not advance phase-scoped bookkeeping.
    EmptySlot,
}

impl SkipReason {
    pub fn is_system_error(&self) -> bool {
        matches!(self, SkipReason::EmptySlot)
    }
}

/// Outcome of resolving one scheduled step.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnReport {
    pub step: TurnStep,
    pub unit: Option<InstanceId>,
    pub action: ActionKind,
    pub skipped: Option<SkipReason>,
    /// Busy duration for the driving loop's pacing, in milliseconds.
    pub busy_ms: u32,
    /// Every notification the step produced, in mutation order.
    pub events: Vec<BattleEvent>,
}

impl TurnReport {
    /// True when this step must not advance phase bookkeeping.
    pub fn is_system_skip(&self) -> bool {
        self.skipped.is_some_and(|s| s.is_system_error())
    }
}

/// Mutable slice of battle state the resolver and the ultimate handlers
/// operate on. Borrowed field-by-field from `BattleState` so the engine
/// keeps exclusive ownership.
pub(crate) struct ActionCtx<'a> {
    pub board: &'a mut Board,
    pub summons: &'a mut SummonQueue,
    pub scheduler: &'a Scheduler,
    pub graveyard: &'a mut Vec<FallenUnit>,
    pub config: &'a BattleConfig,
    pub next_instance: &'a mut u32,
    /// Turn ordinal used as the deterministic timestamp.
    pub at_turn: u64,
}

impl ActionCtx<'_> {
    pub fn alloc_instance(&mut self) -> InstanceId {
        let id = InstanceId(*self.next_instance);
        *self.next_instance += 1;
        id
    }
}

/// Resolves one scheduled step. See the module docs for the order.
pub(crate) fn resolve_turn(
    ctx: &mut ActionCtx<'_>,
    env: &BattleEnv<'_>,
    step: TurnStep,
    cast_tag: CastTag,
) -> Result<TurnReport, EngineError> {
    let meta = StepMeta::from(step);
    let mut events = Vec::new();

    // 1. Materialize a due spawn request; the new unit acts this same step.
    let mut spawned = None;
    if let Some(request) = ctx.summons.take_due(step.side, step.slot, step.cycle) {
        if let Some(template) = env.catalog()?.unit_template(request.unit) {
            let instance = ctx.alloc_instance();
            let token = summon::materialize(&request, template, instance);
            let revived = request.revival.is_some();
            if ctx.board.place(token).is_ok() {
                spawned = Some((instance, request.unit, revived));
            }
        }
        // A stale template id drops the request and falls through; the
        // slot then resolves like any other.
    }

    // 2. Resolve the live occupant.
    let Some(unit_id) = ctx
        .board
        .living_unit(step.side, step.slot)
        .map(|u| u.instance)
    else {
        events.push(BattleEvent::TurnStart { meta, unit: None });
        events.push(BattleEvent::TurnEnd { meta, unit: None });
        return Ok(TurnReport {
            step,
            unit: None,
            action: ActionKind::Idle,
            skipped: Some(SkipReason::EmptySlot),
            busy_ms: 0,
            events,
        });
    };

    events.push(BattleEvent::TurnStart {
        meta,
        unit: Some(unit_id),
    });
    if let Some((instance, unit, revived)) = spawned {
        events.push(BattleEvent::UnitSpawned {
            instance,
            unit,
            side: step.side,
            slot: step.slot,
            revived,
        });
    }

    // 3. Turn-start regen.
    apply_regen(ctx, &mut events, step);

    // 4. Status gate.
    let gate = ctx
        .board
        .living_unit(step.side, step.slot)
        .map(status::gate)
        .unwrap_or(Ok(()));

    let (action, skipped, busy_ms) = match gate {
        Err(kind) => {
            events.push(BattleEvent::ActionStart {
                meta,
                unit: unit_id,
                kind: ActionKind::Idle,
            });
            events.push(BattleEvent::ActionEnd {
                meta,
                unit: unit_id,
                kind: ActionKind::Idle,
                skipped: true,
                reason: Some(SkipReason::StatusBlocked(kind)),
            });
            (ActionKind::Idle, Some(SkipReason::StatusBlocked(kind)), 0)
        }
        Ok(()) => {
            // 5. Turn-start grant, then the cast decision.
            let castable = grant_and_decide(ctx, &mut events, step, cast_tag, unit_id);
            let (kind, busy) = if castable {
                events.push(BattleEvent::ActionStart {
                    meta,
                    unit: unit_id,
                    kind: ActionKind::Ultimate,
                });
                let busy = ultimate::resolve(ctx, env, &mut events, step.side, step.slot)?;
                (ActionKind::Ultimate, busy)
            } else {
                events.push(BattleEvent::ActionStart {
                    meta,
                    unit: unit_id,
                    kind: ActionKind::BasicAttack,
                });
                basic::basic_attack(ctx, env, &mut events, step.side, step.slot)?;
                (ActionKind::BasicAttack, 0)
            };
            events.push(BattleEvent::ActionEnd {
                meta,
                unit: unit_id,
                kind,
                skipped: false,
                reason: None,
            });
            (kind, None, busy)
        }
    };

    // End-of-turn status tick; a skipped turn still ages its effects, so
    // Sleep expires even while it blocks.
    if let Some(unit) = ctx.board.unit_mut(step.side, step.slot) {
        if unit.is_alive() {
            status::tick_unit(unit, TickCadence::UnitTurn, ctx.at_turn, &mut events);
        }
        // The first turn window closes here regardless of what happened.
        unit.freshly_summoned = false;
    }

    events.push(BattleEvent::TurnEnd {
        meta,
        unit: Some(unit_id),
    });

    Ok(TurnReport {
        step,
        unit: Some(unit_id),
        action,
        skipped,
        busy_ms,
        events,
    })
}

fn apply_regen(ctx: &mut ActionCtx<'_>, events: &mut Vec<BattleEvent>, step: TurnStep) {
    let Some(unit) = ctx.board.unit_mut(step.side, step.slot) else {
        return;
    };
    if !unit.is_alive() {
        return;
    }
    let hp_regen = unit.hp_regen;
    let fury_regen = unit.fury_regen;
    let hp_delta = if hp_regen > 0 {
        crate::combat::apply_heal(unit, hp_regen)
    } else {
        0
    };
    let fury_delta = if fury_regen > 0 {
        fury::regen(unit, fury_regen)
    } else {
        0
    };
    if hp_delta > 0 || fury_delta > 0 {
        events.push(BattleEvent::RegenApplied {
            unit: unit.instance,
            hp_delta,
            fury_delta,
        });
    }
}

/// Opens the cast scope, grants turn-start fury, and answers whether the
/// pool covers the ultimate cost.
fn grant_and_decide(
    ctx: &mut ActionCtx<'_>,
    events: &mut Vec<BattleEvent>,
    step: TurnStep,
    cast_tag: CastTag,
    unit_id: InstanceId,
) -> bool {
    let config = ctx.config;
    let Some(unit) = ctx.board.unit_mut(step.side, step.slot) else {
        return false;
    };

    fury::begin_cast(unit, cast_tag);
    let granted = fury::grant_turn_start(unit, config);
    if granted > 0 {
        events.push(BattleEvent::FuryChanged {
            unit: unit_id,
            delta: granted as i64,
            current: unit.fury.current,
        });
    }

    let cost = unit.ultimate.cost;
    if unit.fury.current >= cost && fury::spend(unit, cost) {
        events.push(BattleEvent::FuryChanged {
            unit: unit_id,
            delta: -(cost as i64),
            current: unit.fury.current,
        });
        true
    } else {
        false
    }
}

