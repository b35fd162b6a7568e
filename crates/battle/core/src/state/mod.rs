//! Authoritative battle state.
//!
//! This module owns the data structures that describe the board, pending
//! summons, scheduler position, phase bookkeeping, and the terminal record.
//! Collaborators clone or query this state but mutate it exclusively
//! through [`crate::engine::BattleEngine`] — there is no hidden
//! process-wide session; every core call receives this context explicitly.
pub mod phase;
pub mod record;
pub mod types;

pub use phase::{PhaseBook, PhaseEnd};
pub use record::{BattleRecord, EndDetail, EndReason, Outcome};
pub use types::{
    Board, InstanceId, Meter, MinionState, Position, Side, SideBoard, Slot, StatusCategory,
    StatusDuration, StatusEffect, StatusEffects, StatusKind, TickCadence, UnitId, UnitTags,
    UnitToken,
};

use crate::arbiter::TimeoutContext;
use crate::config::BattleConfig;
use crate::env::UnitTemplate;
use crate::scheduler::Scheduler;
use crate::summon::SummonQueue;

/// A unit that died this battle, kept for revival targeting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FallenUnit {
    pub instance: InstanceId,
    pub unit: UnitId,
    pub side: Side,
    pub slot: Slot,
    pub died_at: u64,
    pub hp_max: u32,
}

/// Canonical snapshot of one battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub config: BattleConfig,

    /// Sequential instance id allocator (birth-order serial, never reused).
    pub(crate) next_instance: u32,
    /// Cast tag allocator; each acting turn opens a fresh cast scope.
    pub(crate) next_cast_tag: u32,

    pub board: Board,
    pub scheduler: Scheduler,
    pub summons: SummonQueue,
    /// Units that died this battle, in death order.
    pub graveyard: Vec<FallenUnit>,
    pub phases: PhaseBook,
    pub record: BattleRecord,
    /// How a timeout signal resolves for this battle.
    pub timeout_context: TimeoutContext,
}

impl BattleState {
    pub fn new(config: BattleConfig, scheduler: Scheduler, timeout_context: TimeoutContext) -> Self {
        Self {
            config,
            next_instance: 1,
            next_cast_tag: 1,
            board: Board::empty(),
            scheduler,
            summons: SummonQueue::new(),
            graveyard: Vec::new(),
            phases: PhaseBook::new(),
            record: BattleRecord::default(),
            timeout_context,
        }
    }

    /// Allocates the next instance id.
    pub(crate) fn allocate_instance(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance);
        self.next_instance += 1;
        id
    }

    /// Places a unit from a template directly on the board, used for the
    /// initial lineup before the first turn.
    pub fn spawn_unit(
        &mut self,
        template: &UnitTemplate,
        side: Side,
        slot: Slot,
    ) -> Result<InstanceId, &'static str> {
        if self.board.is_occupied(side, slot) {
            return Err("slot already occupied");
        }
        let instance = self.allocate_instance();
        let token = template.materialize(instance, side, slot);
        self.board
            .place(token)
            .map_err(|_| "slot out of range or occupied")?;
        Ok(instance)
    }

    /// Total turns resolved so far; doubles as the deterministic timestamp.
    pub fn total_turns(&self) -> u64 {
        self.scheduler.total_turns()
    }

    /// Locates a living unit by instance id.
    pub fn find_unit(&self, instance: InstanceId) -> Option<&UnitToken> {
        let (side, slot) = self.board.locate(instance)?;
        self.board.unit(side, slot)
    }
}
