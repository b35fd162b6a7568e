//! Typed handle to a running driver.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use battle_core::{
    BattleState, EndReason, Outcome, RevivalOverrides, Side, Slot, SpawnOverrides, StepOutcome,
    UnitId,
};

use crate::driver::{Command, DriverOptions, DriverWorker};
use crate::error::{Result, RuntimeError};
use crate::events::{EventBus, Topic};
use crate::oracle::OracleBundle;

/// Handle used by collaborators to talk to the driver task.
#[derive(Clone)]
pub struct DriverHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl DriverHandle {
    /// Spawns a driver task owning `state` and returns the handle plus the
    /// task join handle.
    pub fn spawn(
        state: BattleState,
        oracles: OracleBundle,
        options: DriverOptions,
    ) -> (Self, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(64);
        let event_bus = EventBus::new();
        let worker = DriverWorker::new(state, oracles, command_rx, event_bus.clone(), options);
        let join = tokio::spawn(worker.run());
        (
            Self {
                command_tx,
                event_bus,
            },
            join,
        )
    }

    /// Subscribes to one event topic.
    pub fn subscribe(&self, topic: Topic) -> tokio::sync::broadcast::Receiver<battle_core::BattleEvent> {
        self.event_bus.subscribe(topic)
    }

    /// Advances exactly one turn, bypassing the pacing interval.
    pub async fn advance_turn(&self) -> Result<StepOutcome> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(Command::AdvanceTurn { reply })
            .await
            .map_err(|_| RuntimeError::DriverGone)?;
        rx.await.map_err(|_| RuntimeError::DriverGone)?
    }

    /// Submits a summon request; false means it was rejected.
    pub async fn submit_summon(
        &self,
        side: Side,
        slot: Slot,
        unit: UnitId,
        overrides: SpawnOverrides,
        revival: Option<RevivalOverrides>,
    ) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(Command::SubmitSummon {
                side,
                slot,
                unit,
                overrides,
                revival,
                reply,
            })
            .await
            .map_err(|_| RuntimeError::DriverGone)?;
        rx.await.map_err(|_| RuntimeError::DriverGone)
    }

    /// Raises the external timeout signal; returns the frozen result if
    /// this call (or an earlier one) ended the battle.
    pub async fn signal_timeout(&self) -> Result<Option<(Outcome, EndReason)>> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(Command::SignalTimeout { reply })
            .await
            .map_err(|_| RuntimeError::DriverGone)?;
        rx.await.map_err(|_| RuntimeError::DriverGone)
    }

    /// Clones the current battle state for read-only inspection.
    pub async fn snapshot(&self) -> Result<BattleState> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(Command::QueryState { reply })
            .await
            .map_err(|_| RuntimeError::DriverGone)?;
        rx.await.map_err(|_| RuntimeError::DriverGone)
    }
}
