//! Deterministic target selection.
//!
//! Tie-break rule used everywhere: nearest by Manhattan distance on the
//! battlefield grid, then lower slot index. No randomness.

use crate::state::{Board, Position, Side, Slot};

/// Living units of `side` ordered by distance from `origin`, ties broken by
/// lower slot index. Returns their slots.
pub fn nearest_living(board: &Board, side: Side, origin: Position) -> Vec<Slot> {
    let mut slots: Vec<(u32, Slot)> = board
        .side(side)
        .living()
        .map(|u| (origin.manhattan(u.battlefield_position()), u.slot))
        .collect();
    slots.sort_by_key(|&(distance, slot)| (distance, slot));
    slots.into_iter().map(|(_, slot)| slot).collect()
}

/// Living units of `side` in the given battlefield column, in slot order.
pub fn lane_living(board: &Board, side: Side, column: i32) -> Vec<Slot> {
    board
        .side(side)
        .living()
        .filter(|u| u.battlefield_position().col == column)
        .map(|u| u.slot)
        .collect()
}

/// Free slots of `side` (no occupant, no pending spawn) ordered by distance
/// from `origin`, ties broken by lower slot index.
pub fn free_slots_near(
    board: &Board,
    summons: &crate::summon::SummonQueue,
    side: Side,
    origin: Position,
) -> Vec<Slot> {
    let mut slots: Vec<(u32, Slot)> = Slot::all()
        .filter(|&slot| !board.is_occupied(side, slot) && summons.pending_at(side, slot).is_none())
        .map(|slot| {
            let mut position = slot.position();
            if side == Side::Enemy {
                position = Position::new(position.col, 3 - position.row);
            }
            (origin.manhattan(position), slot)
        })
        .collect();
    slots.sort_by_key(|&(distance, slot)| (distance, slot));
    slots.into_iter().map(|(_, slot)| slot).collect()
}
