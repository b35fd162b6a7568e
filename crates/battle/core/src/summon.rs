//! Summon queue: pending spawn requests keyed by (side, slot).
//!
//! Requests predict their arrival cycle at enqueue time: if the slot's turn
//! already passed in the current cycle the spawn arrives next cycle,
//! otherwise this cycle — so a queued summon is neither skipped nor spawned
//! prematurely. Materialization happens in the action resolver when the
//! scheduler offers the slot.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::scheduler::Scheduler;
use crate::state::{Board, InstanceId, Side, Slot, UnitId, UnitToken};

/// Stat overrides applied when a request materializes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnOverrides {
    pub hp_max: Option<u32>,
    pub attack: Option<u32>,
    /// Present for minions: remaining lifetime in side phases.
    pub lifetime: Option<u8>,
    /// Present for minions: the summoner's instance id.
    pub owner: Option<InstanceId>,
}

/// Revival-specific resource overrides, used instead of fresh-spawn
/// defaults when a fallen unit returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevivalOverrides {
    pub hp: u32,
    pub fury: u32,
    /// A locked pool accepts no fury grants or gains.
    pub fury_locked: bool,
}

/// A pending spawn, at most one per slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnRequest {
    pub side: Side,
    pub slot: Slot,
    pub source: InstanceId,
    pub unit: UnitId,
    pub arrival_cycle: u32,
    pub overrides: SpawnOverrides,
    pub revival: Option<RevivalOverrides>,
}

/// Pending spawn requests for both sides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummonQueue {
    pending: ArrayVec<SpawnRequest, { BattleConfig::MAX_PENDING_SPAWNS }>,
}

impl SummonQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_at(&self, side: Side, slot: Slot) -> Option<&SpawnRequest> {
        self.pending
            .iter()
            .find(|r| r.side == side && r.slot == slot)
    }

    /// Enqueues a spawn request.
    ///
    /// Rejected (returning false, not queued) when the slot is occupied,
    /// already has a pending request, or the queue is full. On success the
    /// arrival cycle is predicted against the scheduler's current position.
    #[allow(clippy::too_many_arguments)]
    pub fn enqueue(
        &mut self,
        board: &Board,
        scheduler: &Scheduler,
        side: Side,
        slot: Slot,
        source: InstanceId,
        unit: UnitId,
        overrides: SpawnOverrides,
        revival: Option<RevivalOverrides>,
    ) -> bool {
        if slot.0 as usize >= BattleConfig::MAX_SLOTS_PER_SIDE {
            return false;
        }
        if board.is_occupied(side, slot) || self.pending_at(side, slot).is_some() {
            return false;
        }
        if self.pending.is_full() {
            return false;
        }

        let cycle = scheduler.cycle_of(side);
        let arrival_cycle = if scheduler.slot_passed_this_cycle(side, slot) {
            cycle + 1
        } else {
            cycle
        };

        self.pending.push(SpawnRequest {
            side,
            slot,
            source,
            unit,
            arrival_cycle,
            overrides,
            revival,
        });
        true
    }

    /// Whether a pending request at (side, slot) has arrived by `cycle`.
    ///
    /// Arrival is predicted as an exact cycle; the comparison tolerates
    /// cycles that elapsed while the slot's side had nothing actionable.
    pub fn is_due(&self, side: Side, slot: Slot, cycle: u32) -> bool {
        self.pending_at(side, slot)
            .is_some_and(|r| cycle >= r.arrival_cycle)
    }

    /// Removes and returns the due request at (side, slot), if any.
    pub fn take_due(&mut self, side: Side, slot: Slot, cycle: u32) -> Option<SpawnRequest> {
        let index = self
            .pending
            .iter()
            .position(|r| r.side == side && r.slot == slot && cycle >= r.arrival_cycle)?;
        Some(self.pending.remove(index))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Decrements every living minion lifetime of one side and removes those
/// that reach zero. Called once per completed, untainted side phase.
/// Returns the removed minions' instance ids in slot order.
pub fn tick_minion_lifetimes(board: &mut Board, side: Side) -> Vec<InstanceId> {
    let mut removed = Vec::new();
    for slot in Slot::all() {
        let expired = {
            let Some(unit) = board.unit_mut(side, slot) else {
                continue;
            };
            if !unit.is_alive() {
                continue;
            }
            match unit.minion.as_mut() {
                Some(minion) => {
                    minion.lifetime = minion.lifetime.saturating_sub(1);
                    minion.lifetime == 0
                }
                None => false,
            }
        };
        if expired {
            if let Some(unit) = board.take(side, slot) {
                removed.push(unit.instance);
            }
        }
    }
    removed
}

/// Materializes a spawn request into a unit token.
///
/// Fresh spawns start with full hp, an initialized fury pool, and the
/// fresh-summon drain immunity; revivals use the caller-supplied resource
/// overrides instead.
pub fn materialize(
    request: &SpawnRequest,
    template: &crate::env::UnitTemplate,
    instance: InstanceId,
) -> UnitToken {
    let mut token = template.materialize(instance, request.side, request.slot);

    if let Some(hp_max) = request.overrides.hp_max {
        token.hp = crate::state::Meter::full(hp_max);
    }
    if let Some(attack) = request.overrides.attack {
        token.attack = attack;
    }
    if let Some(lifetime) = request.overrides.lifetime {
        token.minion = Some(crate::state::MinionState {
            owner: request.overrides.owner.unwrap_or(request.source),
            lifetime,
        });
    }

    if let Some(revival) = &request.revival {
        token.hp.current = revival.hp.clamp(1, token.hp.maximum);
        token.fury = crate::state::Meter::new(revival.fury, token.fury.maximum);
        token.fury_acct = if revival.fury_locked {
            crate::fury::FuryState::new_locked()
        } else {
            crate::fury::FuryState::new()
        };
    }

    token
}
