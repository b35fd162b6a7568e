//! Terminal battle result, frozen once decided.

use super::types::common::Side;

/// Final outcome of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Winner(Side),
    Draw,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Winner(Side::Ally) => "ally",
            Outcome::Winner(Side::Enemy) => "enemy",
            Outcome::Draw => "draw",
        }
    }
}

/// Why the battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndReason {
    LeaderDown,
    Timeout,
}

/// Leader vitals captured at the moment the result froze.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndDetail {
    /// (current, maximum) hp of the ally leader, if one still stands.
    pub ally_leader_hp: Option<(u32, u32)>,
    /// (current, maximum) hp of the enemy leader, if one still stands.
    pub enemy_leader_hp: Option<(u32, u32)>,
}

/// Battle termination state machine: `Running -> Over`, frozen thereafter.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleRecord {
    #[default]
    Running,
    Over {
        winner: Outcome,
        reason: EndReason,
        detail: EndDetail,
        /// Turn ordinal at which the result froze.
        at_turn: u64,
    },
}

impl BattleRecord {
    pub fn is_over(&self) -> bool {
        matches!(self, BattleRecord::Over { .. })
    }

    /// The frozen result, if the battle is over.
    pub fn result(&self) -> Option<(Outcome, EndReason)> {
        match self {
            BattleRecord::Running => None,
            BattleRecord::Over { winner, reason, .. } => Some((*winner, *reason)),
        }
    }

    /// Freezes the record. A no-op returning false once terminal; the first
    /// decisive condition wins.
    pub fn freeze(
        &mut self,
        winner: Outcome,
        reason: EndReason,
        detail: EndDetail,
        at_turn: u64,
    ) -> bool {
        if self.is_over() {
            return false;
        }
        *self = BattleRecord::Over {
            winner,
            reason,
            detail,
            at_turn,
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freeze_is_idempotent() {
        let mut record = BattleRecord::default();
        assert!(record.freeze(
            Outcome::Winner(Side::Ally),
            EndReason::LeaderDown,
            EndDetail::default(),
            7,
        ));
        assert!(!record.freeze(
            Outcome::Winner(Side::Enemy),
            EndReason::Timeout,
            EndDetail::default(),
            9,
        ));
        assert_eq!(
            record.result(),
            Some((Outcome::Winner(Side::Ally), EndReason::LeaderDown))
        );
        match record {
            BattleRecord::Over { at_turn, .. } => assert_eq!(at_turn, 7),
            BattleRecord::Running => unreachable!(),
        }
    }
}
