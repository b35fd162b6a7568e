//! Side-phase bookkeeping.
//!
//! A side phase spans until every slot of one side has had an opportunity
//! to act once. Completion is read off the scheduler's cycle counters
//! (sequential: the global pass count; interleaved: the side's wrap count),
//! and a phase containing a system-error skip is tainted: the boundary
//! still resets, but phase-scoped effects (minion lifetimes) must not run.

use super::types::common::Side;

/// A crossed phase boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseEnd {
    /// True when a system-error skip occurred during the phase.
    pub tainted: bool,
}

/// Tracks per-side phase boundaries and taint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseBook {
    last_cycle: [u32; 2],
    tainted: [bool; 2],
    completed: [u32; 2],
}

impl PhaseBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the current phase of a side as aborted by a system-error skip.
    pub fn taint(&mut self, side: Side) {
        self.tainted[side.index()] = true;
    }

    pub fn is_tainted(&self, side: Side) -> bool {
        self.tainted[side.index()]
    }

    /// Completed (untainted or not) phases of a side so far.
    pub fn completed(&self, side: Side) -> u32 {
        self.completed[side.index()]
    }

    /// Observes the side's current scheduler cycle. Crossing a boundary
    /// returns the phase end and re-arms the taint flag. Cycles that
    /// elapsed while the side had nothing actionable collapse into one
    /// boundary.
    pub fn observe_cycle(&mut self, side: Side, cycle: u32) -> Option<PhaseEnd> {
        let i = side.index();
        if cycle <= self.last_cycle[i] {
            return None;
        }
        self.last_cycle[i] = cycle;
        self.completed[i] += 1;
        let tainted = self.tainted[i];
        self.tainted[i] = false;
        Some(PhaseEnd { tainted })
    }
}
