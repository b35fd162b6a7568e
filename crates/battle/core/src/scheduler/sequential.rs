//! Sequential list-cursor scheduling.

use super::{ScheduleView, TurnStep};
use crate::state::{Side, Slot};

/// Fixed ordered (side, slot) list with a wrapping cursor.
///
/// Advancing scans forward from the cursor for the next actionable entry;
/// passing the end wraps to 0 and increments the cycle. Entries skipped by
/// the scan were offered and found empty — their slots count as "passed"
/// for arrival-cycle prediction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequentialCursor {
    order: Vec<(Side, Slot)>,
    index: usize,
    cycle: u32,
    turns: u64,
}

impl SequentialCursor {
    pub fn new(order: Vec<(Side, Slot)>) -> Self {
        Self {
            order,
            index: 0,
            cycle: 0,
            turns: 0,
        }
    }

    /// Default ordering: sides alternate slot by slot, ally first.
    pub fn alternating() -> Self {
        let mut order = Vec::new();
        for slot in Slot::all() {
            order.push((Side::Ally, slot));
            order.push((Side::Enemy, slot));
        }
        Self::new(order)
    }

    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn total_turns(&self) -> u64 {
        self.turns
    }

    pub fn cursor_index(&self) -> usize {
        self.index
    }

    /// List position of a (side, slot) entry, if it is scheduled at all.
    pub fn position_of(&self, side: Side, slot: Slot) -> Option<usize> {
        self.order.iter().position(|&e| e == (side, slot))
    }

    pub fn slot_passed_this_cycle(&self, side: Side, slot: Slot) -> bool {
        self.position_of(side, slot)
            .is_some_and(|pos| pos < self.index)
    }

    pub(super) fn next_step(&mut self, view: &ScheduleView<'_>) -> Option<TurnStep> {
        let len = self.order.len();
        if len == 0 {
            return None;
        }

        let mut index = self.index;
        let mut cycle = self.cycle;
        for _ in 0..len {
            let (side, slot) = self.order[index];
            if view.actionable(side, slot, cycle) {
                let step = TurnStep {
                    side,
                    slot,
                    cycle,
                    order_index: index as u32,
                    order_len: len as u32,
                };
                if index + 1 >= len {
                    self.index = 0;
                    self.cycle = cycle + 1;
                } else {
                    self.index = index + 1;
                    self.cycle = cycle;
                }
                self.turns += 1;
                return Some(step);
            }
            index += 1;
            if index >= len {
                index = 0;
                cycle += 1;
            }
        }

        // Nothing actionable anywhere: leave the cursor untouched.
        None
    }
}
