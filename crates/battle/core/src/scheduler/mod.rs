//! Turn scheduling.
//!
//! Two mutually exclusive strategies decide the next (side, slot):
//! a [`SequentialCursor`] walking a fixed ordered list, and an
//! [`InterleavedPosition`] alternating sides with per-side position scans.
//! Downstream components are agnostic to which is active — both sit behind
//! the single [`Scheduler::next_step`] contract, and both answer the
//! queries the summon queue needs for arrival-cycle prediction.
//!
//! The scheduler never errors: "nothing actionable" yields `None` and
//! leaves the cursor untouched, and the driving loop decides when to stop.

mod interleaved;
mod sequential;

pub use interleaved::InterleavedPosition;
pub use sequential::SequentialCursor;

use crate::state::{Board, Side, Slot};
use crate::summon::SummonQueue;

/// One scheduled turn: where, and with which ordering metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnStep {
    pub side: Side,
    pub slot: Slot,
    /// Scheduling cycle in which the step was offered (sequential: global
    /// pass count; interleaved: the side's wrap count).
    pub cycle: u32,
    /// Position of the step within the active ordering.
    pub order_index: u32,
    pub order_len: u32,
}

/// Read-only view the scheduler scans for actionable slots.
#[derive(Clone, Copy)]
pub struct ScheduleView<'a> {
    pub board: &'a Board,
    pub summons: &'a SummonQueue,
}

impl ScheduleView<'_> {
    /// A slot is actionable if it holds a living unit or a pending spawn
    /// request due at the given cycle.
    pub fn actionable(&self, side: Side, slot: Slot, cycle: u32) -> bool {
        self.board.living_unit(side, slot).is_some() || self.summons.is_due(side, slot, cycle)
    }
}

/// Polymorphic scheduler capability with two variants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scheduler {
    Sequential(SequentialCursor),
    Interleaved(InterleavedPosition),
}

impl Scheduler {
    /// Advances to the next actionable step, or `None` when neither side
    /// has anything actionable this tick.
    pub fn next_step(&mut self, view: &ScheduleView<'_>) -> Option<TurnStep> {
        match self {
            Scheduler::Sequential(cursor) => cursor.next_step(view),
            Scheduler::Interleaved(position) => position.next_step(view),
        }
    }

    /// The cycle a spawn enqueued now for a not-yet-passed slot would
    /// arrive in.
    pub fn cycle_of(&self, side: Side) -> u32 {
        match self {
            Scheduler::Sequential(cursor) => cursor.cycle(),
            Scheduler::Interleaved(position) => position.wraps(side),
        }
    }

    /// Whether the slot's turn has already been offered in the current
    /// cycle of its side.
    pub fn slot_passed_this_cycle(&self, side: Side, slot: Slot) -> bool {
        match self {
            Scheduler::Sequential(cursor) => cursor.slot_passed_this_cycle(side, slot),
            Scheduler::Interleaved(position) => position.slot_passed_this_cycle(side, slot),
        }
    }

    /// Total turns produced so far; doubles as the deterministic timestamp.
    pub fn total_turns(&self) -> u64 {
        match self {
            Scheduler::Sequential(cursor) => cursor.total_turns(),
            Scheduler::Interleaved(position) => position.total_turns(),
        }
    }
}
