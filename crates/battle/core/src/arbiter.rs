//! Battle arbiter: termination evaluation.
//!
//! Checked after every resolved action and on the external timeout signal.
//! The first decisive condition freezes the [`BattleRecord`]; once frozen,
//! every further evaluation is a no-op returning nothing new.

use crate::state::{BattleRecord, Board, EndDetail, EndReason, Outcome, Side, UnitTags};

/// How a timeout resolves for this battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeoutContext {
    /// Leader hp ratios decide; the higher ratio wins, a tie draws.
    Symmetric,
    /// The boss side wins iff a BOSS-tagged unit of it still lives.
    Asymmetric { boss_side: Side },
}

fn detail(board: &Board) -> EndDetail {
    EndDetail {
        ally_leader_hp: board
            .side(Side::Ally)
            .leader()
            .map(|u| (u.hp.current, u.hp.maximum)),
        enemy_leader_hp: board
            .side(Side::Enemy)
            .leader()
            .map(|u| (u.hp.current, u.hp.maximum)),
    }
}

/// Leader-down evaluation. Freezes and returns the result when decisive.
pub fn evaluate_leaders(
    board: &Board,
    record: &mut BattleRecord,
    at_turn: u64,
) -> Option<(Outcome, EndReason, EndDetail)> {
    if record.is_over() {
        return None;
    }

    let ally_up = board.side(Side::Ally).leader().is_some();
    let enemy_up = board.side(Side::Enemy).leader().is_some();
    let winner = match (ally_up, enemy_up) {
        (true, true) => return None,
        (true, false) => Outcome::Winner(Side::Ally),
        (false, true) => Outcome::Winner(Side::Enemy),
        (false, false) => Outcome::Draw,
    };

    let snapshot = detail(board);
    record.freeze(winner, EndReason::LeaderDown, snapshot, at_turn);
    Some((winner, EndReason::LeaderDown, snapshot))
}

/// Timeout evaluation, run only on the explicit external signal.
pub fn evaluate_timeout(
    board: &Board,
    context: TimeoutContext,
    record: &mut BattleRecord,
    at_turn: u64,
) -> Option<(Outcome, EndReason, EndDetail)> {
    if record.is_over() {
        return None;
    }

    let winner = match context {
        TimeoutContext::Symmetric => {
            let ally = board.side(Side::Ally).leader();
            let enemy = board.side(Side::Enemy).leader();
            match (ally, enemy) {
                (Some(a), Some(e)) => {
                    // Cross-multiplied ratios avoid integer division loss.
                    let lhs = a.hp.current as u64 * e.hp.maximum.max(1) as u64;
                    let rhs = e.hp.current as u64 * a.hp.maximum.max(1) as u64;
                    match lhs.cmp(&rhs) {
                        std::cmp::Ordering::Greater => Outcome::Winner(Side::Ally),
                        std::cmp::Ordering::Less => Outcome::Winner(Side::Enemy),
                        std::cmp::Ordering::Equal => Outcome::Draw,
                    }
                }
                (Some(_), None) => Outcome::Winner(Side::Ally),
                (None, Some(_)) => Outcome::Winner(Side::Enemy),
                (None, None) => Outcome::Draw,
            }
        }
        TimeoutContext::Asymmetric { boss_side } => {
            let boss_alive = board
                .side(boss_side)
                .living()
                .any(|u| u.tags.contains(UnitTags::BOSS));
            if boss_alive {
                Outcome::Winner(boss_side)
            } else {
                Outcome::Winner(boss_side.opponent())
            }
        }
    };

    let snapshot = detail(board);
    record.freeze(winner, EndReason::Timeout, snapshot, at_turn);
    Some((winner, EndReason::Timeout, snapshot))
}
