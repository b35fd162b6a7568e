//! Cast providers: the decision-policy surface.
//!
//! A provider chooses *what* to cast; the core only executes it. Both the
//! player UI and the opponent AI submit through the same summon API on the
//! handle, so the two sides are treated identically.

use std::collections::VecDeque;

use async_trait::async_trait;

use battle_core::{BattleState, Side, Slot, SpawnOverrides, UnitId};

/// One summon decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastRequest {
    pub slot: Slot,
    pub unit: UnitId,
    pub overrides: SpawnOverrides,
}

/// Decision policy for one side.
#[async_trait]
pub trait CastProvider: Send {
    /// The next summon this side wants, given a state snapshot. `None`
    /// means the policy has nothing to cast right now.
    async fn next_cast(&mut self, side: Side, state: &BattleState) -> Option<CastRequest>;
}

/// Deterministic provider that plays a pre-written script of casts.
#[derive(Debug, Default)]
pub struct ScriptedCaster {
    script: VecDeque<CastRequest>,
}

impl ScriptedCaster {
    pub fn new(casts: impl IntoIterator<Item = CastRequest>) -> Self {
        Self {
            script: casts.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

#[async_trait]
impl CastProvider for ScriptedCaster {
    async fn next_cast(&mut self, _side: Side, _state: &BattleState) -> Option<CastRequest> {
        self.script.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::scheduler::SequentialCursor;
    use battle_core::{BattleConfig, Scheduler, TimeoutContext};

    #[tokio::test]
    async fn scripted_caster_plays_its_script_in_order() {
        let state = BattleState::new(
            BattleConfig::default(),
            Scheduler::Sequential(SequentialCursor::alternating()),
            TimeoutContext::Symmetric,
        );
        let first = CastRequest {
            slot: Slot(1),
            unit: UnitId(100),
            overrides: SpawnOverrides::default(),
        };
        let second = CastRequest {
            slot: Slot(2),
            unit: UnitId(100),
            overrides: SpawnOverrides::default(),
        };
        let mut caster = ScriptedCaster::new([first, second]);

        assert_eq!(caster.remaining(), 2);
        assert_eq!(caster.next_cast(Side::Ally, &state).await, Some(first));
        assert_eq!(caster.next_cast(Side::Ally, &state).await, Some(second));
        assert_eq!(caster.next_cast(Side::Ally, &state).await, None);
    }
}
