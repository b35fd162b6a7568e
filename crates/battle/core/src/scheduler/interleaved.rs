//! Interleaved per-side position scanning.

use super::{ScheduleView, TurnStep};
use crate::config::BattleConfig;
use crate::state::{Side, Slot};

/// Alternates the offered side, scanning each side's slots in ring order.
///
/// For the offered side the scan starts after the last visited slot,
/// wrapping at the end (which increments that side's wrap counter). A side
/// with nothing actionable is skipped without consuming a turn or a wrap,
/// so it never stalls the opponent. With both sides empty no turn is
/// produced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterleavedPosition {
    last_visited: [Option<Slot>; 2],
    wraps: [u32; 2],
    turns: u64,
    next_side: Side,
}

impl InterleavedPosition {
    pub fn new(first: Side) -> Self {
        Self {
            last_visited: [None, None],
            wraps: [0, 0],
            turns: 0,
            next_side: first,
        }
    }

    pub fn wraps(&self, side: Side) -> u32 {
        self.wraps[side.index()]
    }

    pub fn total_turns(&self) -> u64 {
        self.turns
    }

    pub fn side_scheduled_next(&self) -> Side {
        self.next_side
    }

    /// Slots scan in ascending order within a wrap, so a slot has been
    /// offered this wrap iff it is at or before the last visited one.
    pub fn slot_passed_this_cycle(&self, side: Side, slot: Slot) -> bool {
        self.last_visited[side.index()].is_some_and(|last| slot <= last)
    }

    pub(super) fn next_step(&mut self, view: &ScheduleView<'_>) -> Option<TurnStep> {
        let first = self.next_side;
        for side in [first, first.opponent()] {
            if let Some(step) = self.scan_side(side, view) {
                self.turns += 1;
                self.next_side = side.opponent();
                return Some(step);
            }
        }
        None
    }

    /// Scans one side for an actionable slot. A fruitless scan leaves the
    /// position and wrap counter untouched.
    fn scan_side(&mut self, side: Side, view: &ScheduleView<'_>) -> Option<TurnStep> {
        let n = BattleConfig::MAX_SLOTS_PER_SIDE as u8;
        let i = side.index();
        let start = self.last_visited[i].map_or(0, |s| s.0 + 1);

        for offset in 0..n {
            let raw = start + offset;
            let wrapped = raw >= n;
            let slot = Slot(raw % n);
            let cycle = self.wraps[i] + u32::from(wrapped);
            if view.actionable(side, slot, cycle) {
                if wrapped {
                    self.wraps[i] += 1;
                }
                self.last_visited[i] = Some(slot);
                return Some(TurnStep {
                    side,
                    slot,
                    cycle,
                    order_index: slot.0 as u32,
                    order_len: n as u32,
                });
            }
        }
        None
    }
}
