//! Turn stepping and battle orchestration.
//!
//! The [`BattleEngine`] is the authoritative reducer for [`BattleState`].
//! One `advance_turn` call resolves exactly one complete turn: scheduler →
//! summon due-check → action resolver → dead sweep → phase bookkeeping →
//! arbiter. Nothing inside a turn suspends, and the arbiter is re-checked
//! before the next scheduler step, so stopping the driving loop between
//! turns always leaves consistent state.

use crate::action::{self, ActionCtx, TurnReport};
use crate::arbiter;
use crate::env::{BattleEnv, OracleError};
use crate::error::{CoreError, ErrorSeverity};
use crate::events::{BattleEvent, RemovalReason};
use crate::fury::CastTag;
use crate::scheduler::ScheduleView;
use crate::state::{BattleState, Board, FallenUnit, Side, Slot, UnitId};
use crate::status;
use crate::summon::{self, RevivalOverrides, SpawnOverrides};

/// Errors surfaced while stepping the battle.
#[derive(Clone, Debug, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineError {
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl CoreError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::Oracle(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EngineError::Oracle(e) => e.error_code(),
        }
    }
}

/// Result of one `advance_turn` call.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepOutcome {
    /// One turn was resolved.
    Turn(TurnReport),
    /// Nothing actionable on either side; no turn was produced. The
    /// driving loop decides whether to stop.
    Idle,
    /// The record is frozen; stepping is a no-op.
    Finished,
}

/// Battle engine that manages turn stepping and termination checks.
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    /// Submits a summon request through the queue. Both sides — player and
    /// opponent policy — use this same entry point. Returns false when the
    /// request is rejected (occupied slot, pending request, full queue).
    pub fn submit_summon(
        &mut self,
        side: Side,
        slot: Slot,
        unit: UnitId,
        overrides: SpawnOverrides,
        revival: Option<RevivalOverrides>,
    ) -> bool {
        let source = self
            .state
            .board
            .side(side)
            .leader()
            .map(|u| u.instance)
            .unwrap_or(crate::state::InstanceId(0));
        self.state.summons.enqueue(
            &self.state.board,
            &self.state.scheduler,
            side,
            slot,
            source,
            unit,
            overrides,
            revival,
        )
    }

    /// External timeout signal. Evaluates the timeout rule and returns the
    /// battle-end notification when this call froze the record.
    pub fn signal_timeout(&mut self) -> Vec<BattleEvent> {
        let at_turn = self.state.scheduler.total_turns();
        match arbiter::evaluate_timeout(
            &self.state.board,
            self.state.timeout_context,
            &mut self.state.record,
            at_turn,
        ) {
            Some((winner, reason, detail)) => vec![BattleEvent::BattleEnded {
                winner,
                reason,
                detail,
                at_turn,
            }],
            None => Vec::new(),
        }
    }

    /// Advances the simulation by exactly one turn.
    pub fn advance_turn(&mut self, env: &BattleEnv<'_>) -> Result<StepOutcome, EngineError> {
        let BattleState {
            config,
            next_instance,
            next_cast_tag,
            board,
            scheduler,
            summons,
            graveyard,
            phases,
            record,
            ..
        } = &mut *self.state;

        if record.is_over() {
            return Ok(StepOutcome::Finished);
        }

        let step = {
            let view = ScheduleView {
                board: &*board,
                summons: &*summons,
            };
            scheduler.next_step(&view)
        };
        let Some(step) = step else {
            return Ok(StepOutcome::Idle);
        };

        let at_turn = scheduler.total_turns();
        let cast_tag = CastTag(*next_cast_tag);
        *next_cast_tag += 1;

        let mut report = {
            let mut ctx = ActionCtx {
                board: &mut *board,
                summons: &mut *summons,
                scheduler: &*scheduler,
                graveyard: &mut *graveyard,
                config: &*config,
                next_instance: &mut *next_instance,
                at_turn,
            };
            action::resolve_turn(&mut ctx, env, step, cast_tag)?
        };

        sweep_dead(board, graveyard, at_turn, &mut report.events);

        // Phase bookkeeping: a system-error skip taints the side's current
        // phase; crossing a boundary runs the phase-scoped effects only on
        // untainted phases.
        if report.is_system_skip() {
            phases.taint(step.side);
        }
        for side in Side::ALL {
            let Some(end) = phases.observe_cycle(side, scheduler.cycle_of(side)) else {
                continue;
            };
            if end.tainted {
                continue;
            }
            for instance in summon::tick_minion_lifetimes(board, side) {
                report.events.push(BattleEvent::UnitRemoved {
                    instance,
                    reason: RemovalReason::LifetimeExpired,
                });
            }
            status::tick_side_phase(board, side, at_turn, &mut report.events);
            sweep_dead(board, graveyard, at_turn, &mut report.events);
        }

        // Arbiter re-check before the next scheduler step.
        if let Some((winner, reason, detail)) = arbiter::evaluate_leaders(board, record, at_turn) {
            report.events.push(BattleEvent::BattleEnded {
                winner,
                reason,
                detail,
                at_turn,
            });
        }

        Ok(StepOutcome::Turn(report))
    }
}

/// Moves dead tokens off the board into the graveyard, notifying each.
fn sweep_dead(
    board: &mut Board,
    graveyard: &mut Vec<FallenUnit>,
    at_turn: u64,
    events: &mut Vec<BattleEvent>,
) {
    for unit in board.sweep_dead() {
        events.push(BattleEvent::UnitDied {
            instance: unit.instance,
            side: unit.side,
            slot: unit.slot,
        });
        graveyard.push(FallenUnit {
            instance: unit.instance,
            unit: unit.unit,
            side: unit.side,
            slot: unit.slot,
            died_at: unit.died_at.unwrap_or(at_turn),
            hp_max: unit.hp.maximum,
        });
    }
}
