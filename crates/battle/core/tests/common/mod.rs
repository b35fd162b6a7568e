//! Shared fixtures for battle-core integration tests.
#![allow(dead_code)]

use battle_core::{
    AttackKind, BattleConfig, BattleEnv, BattleState, CatalogOracle, DamageBreakdown, DamageKind,
    DamageOracle, Env, InstanceId, Scheduler, Side, Slot, TimeoutContext, UnitId, UnitTags,
    UnitTemplate, UnitToken, VfxCue, VfxOracle,
};
use battle_core::scheduler::SequentialCursor;

/// Damage model that deals exactly the base amount.
pub struct FlatDamage;

impl DamageOracle for FlatDamage {
    fn compute(
        &self,
        _attacker: &UnitToken,
        _target: &UnitToken,
        base: u32,
        _damage: DamageKind,
        _attack: AttackKind,
        _penetration: u32,
    ) -> DamageBreakdown {
        DamageBreakdown::new(base, 0)
    }
}

/// VFX collaborator with a fixed last-reported duration (None = silent).
pub struct StubVfx(pub Option<u32>);

impl VfxOracle for StubVfx {
    fn play(&self, _cue: VfxCue, _anchor: InstanceId) -> Option<u32> {
        self.0
    }
}

/// In-memory catalog for tests.
#[derive(Default)]
pub struct TestCatalog {
    templates: Vec<UnitTemplate>,
}

impl TestCatalog {
    pub fn new(templates: Vec<UnitTemplate>) -> Self {
        Self { templates }
    }
}

impl CatalogOracle for TestCatalog {
    fn unit_template(&self, id: UnitId) -> Option<&UnitTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }
}

/// Owns the three oracles and lends them out as a `BattleEnv`.
pub struct TestEnv {
    pub damage: FlatDamage,
    pub vfx: StubVfx,
    pub catalog: TestCatalog,
}

impl TestEnv {
    pub fn new(catalog: TestCatalog) -> Self {
        Self {
            damage: FlatDamage,
            vfx: StubVfx(None),
            catalog,
        }
    }

    pub fn env(&self) -> BattleEnv<'_> {
        Env::with_all(&self.damage, &self.vfx, &self.catalog)
    }
}

/// 1600 hp leader with a modest attack and no castable ultimate.
pub fn leader_template(id: u32) -> UnitTemplate {
    UnitTemplate::new(UnitId(id), format!("Leader {}", id), 1600, 100).with_tags(UnitTags::LEADER)
}

/// Small non-leader filler unit.
pub fn grunt_template(id: u32) -> UnitTemplate {
    UnitTemplate::new(UnitId(id), format!("Grunt {}", id), 400, 30)
}

/// Fresh sequential-scheduled battle with one leader per side at slot 0.
pub fn duel_state() -> (BattleState, TestEnv) {
    let mut state = BattleState::new(
        BattleConfig::default(),
        Scheduler::Sequential(SequentialCursor::alternating()),
        TimeoutContext::Symmetric,
    );
    let ally = leader_template(1);
    let enemy = leader_template(2);
    state.spawn_unit(&ally, Side::Ally, Slot(0)).unwrap();
    state.spawn_unit(&enemy, Side::Enemy, Slot(0)).unwrap();
    let env = TestEnv::new(TestCatalog::new(vec![ally, enemy]));
    (state, env)
}
