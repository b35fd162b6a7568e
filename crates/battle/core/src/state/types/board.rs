//! Board occupancy: one fixed slot array per side.

use super::common::{InstanceId, Side, Slot};
use super::unit::UnitToken;
use crate::config::BattleConfig;

/// Slot array for one side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideBoard {
    slots: [Option<UnitToken>; BattleConfig::MAX_SLOTS_PER_SIDE],
}

impl SideBoard {
    pub fn unit(&self, slot: Slot) -> Option<&UnitToken> {
        self.slots.get(slot.0 as usize)?.as_ref()
    }

    pub fn unit_mut(&mut self, slot: Slot) -> Option<&mut UnitToken> {
        self.slots.get_mut(slot.0 as usize)?.as_mut()
    }

    pub fn is_occupied(&self, slot: Slot) -> bool {
        self.unit(slot).is_some()
    }

    /// Living units of this side in slot order.
    pub fn living(&self) -> impl Iterator<Item = &UnitToken> {
        self.slots
            .iter()
            .filter_map(|s| s.as_ref())
            .filter(|u| u.is_alive())
    }

    pub fn living_count(&self) -> usize {
        self.living().count()
    }

    /// First living LEADER-tagged unit, in slot order.
    pub fn leader(&self) -> Option<&UnitToken> {
        self.living().find(|u| u.is_leader())
    }
}

/// The full battlefield: both sides' slot arrays.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    sides: [SideBoard; 2],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn side(&self, side: Side) -> &SideBoard {
        &self.sides[side.index()]
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideBoard {
        &mut self.sides[side.index()]
    }

    pub fn unit(&self, side: Side, slot: Slot) -> Option<&UnitToken> {
        self.side(side).unit(slot)
    }

    pub fn unit_mut(&mut self, side: Side, slot: Slot) -> Option<&mut UnitToken> {
        self.side_mut(side).unit_mut(slot)
    }

    /// Living unit at a position, if any.
    pub fn living_unit(&self, side: Side, slot: Slot) -> Option<&UnitToken> {
        self.unit(side, slot).filter(|u| u.is_alive())
    }

    pub fn is_occupied(&self, side: Side, slot: Slot) -> bool {
        self.side(side).is_occupied(slot)
    }

    /// Places a token on its own (side, slot). Returns the token back if the
    /// slot is occupied or out of range.
    pub fn place(&mut self, token: UnitToken) -> Result<(), UnitToken> {
        let side = token.side;
        let index = token.slot.0 as usize;
        match self.sides[side.index()].slots.get_mut(index) {
            Some(cell) if cell.is_none() => {
                *cell = Some(token);
                Ok(())
            }
            _ => Err(token),
        }
    }

    /// Removes and returns the occupant of a slot.
    pub fn take(&mut self, side: Side, slot: Slot) -> Option<UnitToken> {
        self.sides[side.index()]
            .slots
            .get_mut(slot.0 as usize)?
            .take()
    }

    /// Locates a unit instance anywhere on the board.
    pub fn locate(&self, instance: InstanceId) -> Option<(Side, Slot)> {
        for side in Side::ALL {
            for slot in Slot::all() {
                if let Some(unit) = self.unit(side, slot) {
                    if unit.instance == instance {
                        return Some((side, slot));
                    }
                }
            }
        }
        None
    }

    /// Removes every dead token from the board, returning them in
    /// (side, slot) order.
    pub fn sweep_dead(&mut self) -> Vec<UnitToken> {
        let mut dead = Vec::new();
        for side in Side::ALL {
            for slot in Slot::all() {
                let cell = &mut self.sides[side.index()].slots[slot.0 as usize];
                if cell.as_ref().is_some_and(|u| !u.is_alive()) {
                    if let Some(unit) = cell.take() {
                        dead.push(unit);
                    }
                }
            }
        }
        dead
    }

    /// Living minions of one side in slot order.
    pub fn minions(&self, side: Side) -> impl Iterator<Item = &UnitToken> {
        self.side(side).living().filter(|u| u.is_minion())
    }

    pub fn minion_count(&self, side: Side) -> usize {
        self.minions(side).count()
    }
}
