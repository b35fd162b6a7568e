//! Driver worker that owns the authoritative [`BattleState`].
//!
//! Receives commands from [`crate::DriverHandle`], advances the simulation
//! one complete turn at a time through [`battle_core::BattleEngine`], and
//! publishes every notification to the event bus. Pacing: auto-advance
//! fires at a fixed minimum interval, stretched by the busy duration the
//! core reports for a turn. The worker never resolves two turns
//! concurrently — one command or tick at a time, to completion.

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use battle_core::{
    BattleEngine, BattleState, EndReason, Outcome, RevivalOverrides, Side, Slot, SpawnOverrides,
    StepOutcome, UnitId,
};

use crate::error::Result;
use crate::events::EventBus;
use crate::oracle::OracleBundle;

/// Commands that can be sent to the driver worker.
pub enum Command {
    /// Advance exactly one turn, bypassing the pacing interval.
    AdvanceTurn {
        reply: oneshot::Sender<Result<StepOutcome>>,
    },
    /// Submit a summon request. Both sides use this same entry point.
    SubmitSummon {
        side: Side,
        slot: Slot,
        unit: UnitId,
        overrides: SpawnOverrides,
        revival: Option<RevivalOverrides>,
        reply: oneshot::Sender<bool>,
    },
    /// Raise the external battle-timeout signal.
    SignalTimeout {
        reply: oneshot::Sender<Option<(Outcome, EndReason)>>,
    },
    /// Query a snapshot of the current battle state (read-only clone).
    QueryState {
        reply: oneshot::Sender<BattleState>,
    },
}

/// Driver configuration.
#[derive(Clone, Copy, Debug)]
pub struct DriverOptions {
    /// Minimum spacing between auto-advanced turns.
    pub min_interval: Duration,
    /// When false the driver only advances on explicit AdvanceTurn commands.
    pub auto_advance: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(400),
            auto_advance: true,
        }
    }
}

/// Background task that steps the battle.
pub struct DriverWorker {
    state: BattleState,
    oracles: OracleBundle,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    options: DriverOptions,
    /// Cleared when the battle finishes, stalls, or the engine errors.
    running: bool,
}

impl DriverWorker {
    pub fn new(
        state: BattleState,
        oracles: OracleBundle,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        options: DriverOptions,
    ) -> Self {
        info!(
            auto_advance = options.auto_advance,
            "driver initialized with {} ally / {} enemy units",
            state.board.side(Side::Ally).living_count(),
            state.board.side(Side::Enemy).living_count(),
        );
        Self {
            state,
            oracles,
            command_rx,
            event_bus,
            options,
            running: true,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        let mut next_tick = Instant::now() + self.options.min_interval;
        loop {
            let auto = self.options.auto_advance && self.running;
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd),
                        None => break,
                    }
                }
                _ = tokio::time::sleep_until(next_tick), if auto => {
                    let pause = self.advance_once();
                    next_tick = Instant::now() + pause.max(self.options.min_interval);
                }
            }
        }
        debug!("driver channel closed, worker exiting");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::AdvanceTurn { reply } => {
                let env = self.oracles.env();
                let mut engine = BattleEngine::new(&mut self.state);
                let outcome = engine.advance_turn(&env).map_err(Into::into);
                if let Ok(outcome) = &outcome {
                    self.after_step(outcome);
                }
                if reply.send(outcome).is_err() {
                    debug!("AdvanceTurn reply channel closed (caller dropped)");
                }
            }
            Command::SubmitSummon {
                side,
                slot,
                unit,
                overrides,
                revival,
                reply,
            } => {
                let mut engine = BattleEngine::new(&mut self.state);
                let accepted = engine.submit_summon(side, slot, unit, overrides, revival);
                if accepted {
                    // A stalled board may be actionable again.
                    self.running = !self.state.record.is_over();
                } else {
                    debug!(?side, %slot, "summon request rejected");
                }
                if reply.send(accepted).is_err() {
                    debug!("SubmitSummon reply channel closed (caller dropped)");
                }
            }
            Command::SignalTimeout { reply } => {
                let mut engine = BattleEngine::new(&mut self.state);
                let events = engine.signal_timeout();
                for event in events {
                    self.event_bus.publish(event);
                }
                let result = self.state.record.result();
                if result.is_some() {
                    info!(?result, "battle ended by timeout");
                    self.running = false;
                }
                if reply.send(result).is_err() {
                    debug!("SignalTimeout reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// One paced auto-advance. Returns how long to wait before the next.
    fn advance_once(&mut self) -> Duration {
        let env = self.oracles.env();
        let mut engine = BattleEngine::new(&mut self.state);
        match engine.advance_turn(&env) {
            Ok(outcome) => {
                let pause = match &outcome {
                    StepOutcome::Turn(report) => Duration::from_millis(report.busy_ms as u64),
                    _ => Duration::ZERO,
                };
                self.after_step(&outcome);
                pause
            }
            Err(e) => {
                error!(error = %e, "engine failed to advance; stopping auto-advance");
                self.running = false;
                Duration::ZERO
            }
        }
    }

    /// Publishes a step's events and updates the running flag.
    fn after_step(&mut self, outcome: &StepOutcome) {
        match outcome {
            StepOutcome::Turn(report) => {
                debug!(
                    side = ?report.step.side,
                    slot = %report.step.slot,
                    cycle = report.step.cycle,
                    action = report.action.as_ref(),
                    skipped = report.skipped.is_some(),
                    "turn resolved"
                );
                for event in report.events.iter().cloned() {
                    self.event_bus.publish(event);
                }
                if self.state.record.is_over() {
                    info!(result = ?self.state.record.result(), "battle over");
                    self.running = false;
                }
            }
            StepOutcome::Idle => {
                warn!("nothing actionable on either side; pausing auto-advance");
                self.running = false;
            }
            StepOutcome::Finished => {
                self.running = false;
            }
        }
    }
}
