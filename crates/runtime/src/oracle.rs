//! Concrete oracle implementations wired into the driver.

use battle_core::{
    AttackKind, BattleEnv, DamageBreakdown, DamageKind, DamageOracle, Env, UnitToken,
};
use battle_content::UnitCatalog;

use crate::vfx::VfxBoard;

/// Deterministic damage model: a flat guard percentage absorbs part of the
/// base damage, reduced by penetration; true damage ignores the guard.
#[derive(Clone, Copy, Debug)]
pub struct StandardDamageModel {
    pub guard_pct: u32,
}

impl StandardDamageModel {
    pub const DEFAULT_GUARD_PCT: u32 = 20;

    pub fn new() -> Self {
        Self {
            guard_pct: Self::DEFAULT_GUARD_PCT,
        }
    }
}

impl Default for StandardDamageModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DamageOracle for StandardDamageModel {
    fn compute(
        &self,
        _attacker: &UnitToken,
        _target: &UnitToken,
        base: u32,
        damage: DamageKind,
        _attack: AttackKind,
        penetration: u32,
    ) -> DamageBreakdown {
        if damage == DamageKind::True {
            return DamageBreakdown::new(base, 0);
        }
        let guard = self.guard_pct.saturating_sub(penetration).min(90);
        let absorbed = base * guard / 100;
        DamageBreakdown::new(base - absorbed, absorbed)
    }
}

/// The collaborators the driver hands to the engine each turn.
pub struct OracleBundle {
    pub damage: StandardDamageModel,
    pub vfx: VfxBoard,
    pub catalog: UnitCatalog,
}

impl OracleBundle {
    pub fn new(catalog: UnitCatalog) -> Self {
        Self {
            damage: StandardDamageModel::new(),
            vfx: VfxBoard::new(),
            catalog,
        }
    }

    /// Borrows the bundle as the core's environment aggregate.
    pub fn env(&self) -> BattleEnv<'_> {
        Env::with_all(&self.damage, &self.vfx, &self.catalog)
    }
}
