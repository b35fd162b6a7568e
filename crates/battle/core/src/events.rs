//! Outbound battle notifications.
//!
//! Every engine step returns its notifications synchronously, in the exact
//! order the mutations happened. The runtime republishes them to listeners;
//! nothing in the core waits on a consumer.

use crate::action::{ActionKind, SkipReason};
use crate::combat::{DamageSource, LethalOutcome};
use crate::scheduler::TurnStep;
use crate::state::{
    EndDetail, EndReason, InstanceId, Outcome, Side, Slot, StatusKind, UnitId,
};

/// Scheduling metadata attached to the turn-bracketing events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepMeta {
    pub side: Side,
    pub slot: Slot,
    pub cycle: u32,
    pub order_index: u32,
    pub order_len: u32,
}

impl From<TurnStep> for StepMeta {
    fn from(step: TurnStep) -> Self {
        Self {
            side: step.side,
            slot: step.slot,
            cycle: step.cycle,
            order_index: step.order_index,
            order_len: step.order_len,
        }
    }
}

/// Why a unit left the board without dying.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RemovalReason {
    /// Minion lifetime reached zero on a side-phase boundary.
    LifetimeExpired,
    /// Evicted to make room for a newer summon.
    Evicted,
}

/// Notifications produced while resolving turns.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum BattleEvent {
    TurnStart {
        meta: StepMeta,
        unit: Option<InstanceId>,
    },
    TurnEnd {
        meta: StepMeta,
        unit: Option<InstanceId>,
    },
    ActionStart {
        meta: StepMeta,
        unit: InstanceId,
        kind: ActionKind,
    },
    ActionEnd {
        meta: StepMeta,
        unit: InstanceId,
        kind: ActionKind,
        skipped: bool,
        reason: Option<SkipReason>,
    },
    /// Emitted only when a turn-start regen changed either meter.
    RegenApplied {
        unit: InstanceId,
        hp_delta: u32,
        fury_delta: u32,
    },
    DamageDealt {
        source: Option<InstanceId>,
        target: InstanceId,
        amount: u32,
        absorbed: u32,
        damage_source: DamageSource,
        outcome: LethalOutcome,
    },
    Healed {
        source: Option<InstanceId>,
        target: InstanceId,
        amount: u32,
    },
    StatusApplied {
        target: InstanceId,
        kind: StatusKind,
        stacks: u8,
    },
    StatusExpired {
        unit: InstanceId,
        kind: StatusKind,
    },
    FuryChanged {
        unit: InstanceId,
        delta: i64,
        current: u32,
    },
    UnitSpawned {
        instance: InstanceId,
        unit: UnitId,
        side: Side,
        slot: Slot,
        revived: bool,
    },
    UnitDied {
        instance: InstanceId,
        side: Side,
        slot: Slot,
    },
    UnitRemoved {
        instance: InstanceId,
        reason: RemovalReason,
    },
    BattleEnded {
        winner: Outcome,
        reason: EndReason,
        detail: EndDetail,
        at_turn: u64,
    },
}
