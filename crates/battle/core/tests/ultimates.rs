mod common;

use battle_core::combat::{apply_lethal, DamageSource};
use battle_core::{
    ActionKind, BattleEngine, BattleEvent, CrowdControlKind, MinionState, Side, Slot,
    StatusDuration, StatusKind, StepOutcome, UltimateDef, UltimateShape, UnitId,
};
use common::{duel_state, grunt_template, TestCatalog, TestEnv};

fn advance(state: &mut battle_core::BattleState, env: &TestEnv) -> battle_core::TurnReport {
    let mut engine = BattleEngine::new(state);
    match engine.advance_turn(&env.env()).unwrap() {
        StepOutcome::Turn(report) => report,
        other => panic!("expected a turn, got {:?}", other),
    }
}

fn arm_ultimate(state: &mut battle_core::BattleState, shape: UltimateShape, cost: u32) {
    let leader = state.board.unit_mut(Side::Ally, Slot(0)).unwrap();
    leader.ultimate = UltimateDef {
        name: "Armed".to_string(),
        cost,
        shape,
        busy_ms: 100,
    };
    leader.fury.current = cost; // the turn-start grant gives headroom
}

#[test]
fn burst_picks_the_nearest_enemies_with_slot_tie_break() {
    let (mut state, env) = duel_state();
    // Three enemies: slots 0, 1, 2 sit at distances 3, 4, 5 from ally slot 0.
    let g1 = state
        .spawn_unit(&grunt_template(11), Side::Enemy, Slot(1))
        .unwrap();
    let g2 = state
        .spawn_unit(&grunt_template(12), Side::Enemy, Slot(2))
        .unwrap();
    arm_ultimate(
        &mut state,
        UltimateShape::Burst {
            targets: 2,
            power_pct: 100,
        },
        30,
    );

    let report = advance(&mut state, &env);
    assert_eq!(report.action, ActionKind::Ultimate);

    let hit: Vec<_> = report
        .events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::DamageDealt { target, .. } => Some(*target),
            _ => None,
        })
        .collect();
    assert!(state.graveyard.is_empty());
    assert_eq!(hit.len(), 2);
    // Enemy leader (slot 0) is nearest, then the slot-1 grunt. Slot 2 untouched.
    assert!(hit.contains(&state.board.unit(Side::Enemy, Slot(0)).unwrap().instance));
    assert!(hit.contains(&g1));
    assert!(!hit.contains(&g2));
}

#[test]
fn drain_damages_leeches_and_steals_fury() {
    let (mut state, env) = duel_state();
    {
        let caster = state.board.unit_mut(Side::Ally, Slot(0)).unwrap();
        caster.hp.current = 1000;
    }
    {
        let target = state.board.unit_mut(Side::Enemy, Slot(0)).unwrap();
        target.freshly_summoned = false;
        target.fury.current = 50;
    }
    arm_ultimate(
        &mut state,
        UltimateShape::Drain {
            power_pct: 100,
            leech_pct: 50,
        },
        20,
    );

    let report = advance(&mut state, &env);
    assert_eq!(report.action, ActionKind::Ultimate);

    // 100 damage dealt, half leeched back.
    assert!(report.events.iter().any(|e| matches!(
        e,
        BattleEvent::Healed { amount: 50, .. }
    )));
    let caster = state.board.unit(Side::Ally, Slot(0)).unwrap();
    assert_eq!(caster.hp.current, 1050);

    // Target pool: 50, plus 6 damage-taken gain (100 of 1600 max), minus
    // the drain of base 10 + 20% of 56 = 21.
    let target = state.board.unit(Side::Enemy, Slot(0)).unwrap();
    assert_eq!(target.fury.current, 35);
}

#[test]
fn drain_leaves_fresh_summons_untouched() {
    let (mut state, env) = duel_state();
    {
        let target = state.board.unit_mut(Side::Enemy, Slot(0)).unwrap();
        assert!(target.freshly_summoned);
        target.fury.current = 80;
    }
    arm_ultimate(
        &mut state,
        UltimateShape::Drain {
            power_pct: 100,
            leech_pct: 0,
        },
        20,
    );

    advance(&mut state, &env);
    // Damage and damage-taken gain still land; the drain itself is zero.
    let target = state.board.unit(Side::Enemy, Slot(0)).unwrap();
    assert_eq!(target.fury.current, 80 + 6);
}

#[test]
fn lane_sweep_hits_only_the_casters_column() {
    let (mut state, env) = duel_state();
    // Caster column 0. Enemy leader slot 0 is column 0; grunt slot 1 is
    // column 1; grunt slot 3 is column 0, back row.
    let off_lane = state
        .spawn_unit(&grunt_template(11), Side::Enemy, Slot(1))
        .unwrap();
    let in_lane = state
        .spawn_unit(&grunt_template(12), Side::Enemy, Slot(3))
        .unwrap();
    arm_ultimate(
        &mut state,
        UltimateShape::LaneSweep {
            hits: 2,
            power_pct: 50,
        },
        30,
    );

    let report = advance(&mut state, &env);
    let hits_on = |instance| {
        report
            .events
            .iter()
            .filter(|e| matches!(e, BattleEvent::DamageDealt { target, .. } if *target == instance))
            .count()
    };
    assert_eq!(hits_on(in_lane), 2);
    assert_eq!(hits_on(off_lane), 0);
    assert_eq!(
        hits_on(state.board.unit(Side::Enemy, Slot(0)).unwrap().instance),
        2
    );
}

#[test]
fn overload_pays_hp_and_buffs_attack() {
    let (mut state, env) = duel_state();
    arm_ultimate(
        &mut state,
        UltimateShape::Overload {
            hp_cost_pct: 20,
            attack_up_pct: 30,
            duration: 3,
        },
        25,
    );

    advance(&mut state, &env);
    let caster = state.board.unit(Side::Ally, Slot(0)).unwrap();
    assert_eq!(caster.hp.current, 1600 - 320);
    assert!(caster.statuses.has(StatusKind::AttackUp));
    assert_eq!(caster.effective_attack(), 130);
}

#[test]
fn overload_at_full_cost_is_intercepted_by_undying() {
    let (mut state, env) = duel_state();
    {
        let caster = state.board.unit_mut(Side::Ally, Slot(0)).unwrap();
        caster
            .statuses
            .add(StatusKind::Undying, 0, StatusDuration::UntilBattleEnd);
    }
    arm_ultimate(
        &mut state,
        UltimateShape::Overload {
            hp_cost_pct: 100,
            attack_up_pct: 30,
            duration: 2,
        },
        25,
    );

    advance(&mut state, &env);
    let caster = state.board.unit(Side::Ally, Slot(0)).unwrap();
    assert!(caster.alive);
    assert_eq!(caster.hp.current, 1);
    assert!(!caster.statuses.has(StatusKind::Undying));
    assert!(caster.statuses.has(StatusKind::AttackUp));
}

#[test]
fn crowd_control_puts_the_nearest_enemies_to_sleep() {
    let (mut state, env) = duel_state();
    state
        .spawn_unit(&grunt_template(11), Side::Enemy, Slot(1))
        .unwrap();
    state
        .spawn_unit(&grunt_template(12), Side::Enemy, Slot(2))
        .unwrap();
    arm_ultimate(
        &mut state,
        UltimateShape::CrowdControl {
            effect: CrowdControlKind::Sleep,
            targets: 2,
            duration: 2,
        },
        30,
    );

    advance(&mut state, &env);
    assert!(state
        .board
        .unit(Side::Enemy, Slot(0))
        .unwrap()
        .statuses
        .has(StatusKind::Sleep));
    assert!(state
        .board
        .unit(Side::Enemy, Slot(1))
        .unwrap()
        .statuses
        .has(StatusKind::Sleep));
    assert!(!state
        .board
        .unit(Side::Enemy, Slot(2))
        .unwrap()
        .statuses
        .has(StatusKind::Sleep));
}

#[test]
fn revive_returns_the_latest_fallen_ally_with_overrides() {
    let (mut state, _env) = duel_state();
    // The catalog must know the grunt so the revival can materialize.
    let env = TestEnv::new(TestCatalog::new(vec![
        common::leader_template(1),
        common::leader_template(2),
        grunt_template(11),
    ]));
    state
        .spawn_unit(&grunt_template(11), Side::Ally, Slot(1))
        .unwrap();

    // The grunt dies; the next advance sweeps it into the graveyard.
    {
        let grunt = state.board.unit_mut(Side::Ally, Slot(1)).unwrap();
        apply_lethal(grunt, 9_999, DamageSource::Attack, 0);
    }
    advance(&mut state, &env);
    assert_eq!(state.graveyard.len(), 1);

    arm_ultimate(
        &mut state,
        UltimateShape::Revive {
            hp_pct: 40,
            fury: 0,
            fury_locked: true,
        },
        30,
    );
    // Enemy turn, then the armed caster revives.
    advance(&mut state, &env);
    let report = advance(&mut state, &env);
    assert_eq!(report.step.side, Side::Ally);
    assert_eq!(report.action, ActionKind::Ultimate);

    let request = state
        .summons
        .pending_at(Side::Ally, Slot(1))
        .expect("revival request queued at the fallen slot");
    let revival = request.revival.expect("revival overrides supplied");
    assert_eq!(revival.hp, 160); // 40% of the grunt's 400 max
    assert!(revival.fury_locked);
    assert!(state.graveyard.is_empty());

    // Let the revival spawn; it enters play alive with the override hp and
    // a locked pool (no turn-start grant).
    let mut revived_events = Vec::new();
    for _ in 0..8 {
        let report = advance(&mut state, &env);
        let spawned = report
            .events
            .iter()
            .any(|e| matches!(e, BattleEvent::UnitSpawned { revived: true, .. }));
        if spawned {
            revived_events = report.events;
            break;
        }
    }
    assert!(!revived_events.is_empty(), "revival must materialize");
    let unit = state.board.living_unit(Side::Ally, Slot(1)).unwrap();
    assert_eq!(unit.hp.current, 160);
    assert!(unit.died_at.is_none());
    assert_eq!(unit.fury.current, 0, "locked pool ignores the grant");
}

#[test]
fn equalize_levels_living_allies_toward_the_average() {
    let (mut state, env) = duel_state();
    state
        .spawn_unit(&grunt_template(11), Side::Ally, Slot(1))
        .unwrap();
    {
        let leader = state.board.unit_mut(Side::Ally, Slot(0)).unwrap();
        leader.hp.current = 1000;
    }
    arm_ultimate(&mut state, UltimateShape::EqualizeHp, 25);

    advance(&mut state, &env);
    // Average of 1000 and 400 is 700: the leader is brought down, the
    // grunt is capped by its own maximum.
    assert_eq!(
        state.board.unit(Side::Ally, Slot(0)).unwrap().hp.current,
        700
    );
    assert_eq!(
        state.board.unit(Side::Ally, Slot(1)).unwrap().hp.current,
        400
    );
}

fn summoner_env() -> TestEnv {
    TestEnv::new(TestCatalog::new(vec![
        common::leader_template(1),
        common::leader_template(2),
        grunt_template(100),
    ]))
}

#[test]
fn summon_pack_queues_minions_with_inherited_current_stats() {
    let (mut state, _env) = duel_state();
    {
        let caster = state.board.unit_mut(Side::Ally, Slot(0)).unwrap();
        caster.hp.current = 1000;
    }
    arm_ultimate(
        &mut state,
        UltimateShape::SummonPack {
            unit: UnitId(100),
            count: 2,
            inherit_pct: 50,
            lifetime: 2,
        },
        30,
    );
    let env = summoner_env();

    let report = advance(&mut state, &env);
    assert_eq!(report.action, ActionKind::Ultimate);

    // Nearest free slots to ally slot 0, ties to the lower index: 1 then 3.
    let caster_instance = state.board.unit(Side::Ally, Slot(0)).unwrap().instance;
    for slot in [Slot(1), Slot(3)] {
        let request = state
            .summons
            .pending_at(Side::Ally, slot)
            .unwrap_or_else(|| panic!("pending spawn at {}", slot));
        assert_eq!(request.unit, UnitId(100));
        assert_eq!(request.overrides.lifetime, Some(2));
        assert_eq!(request.overrides.owner, Some(caster_instance));
        // Half of the caster's current 1000 hp and 100 attack.
        assert_eq!(request.overrides.hp_max, Some(500));
        assert_eq!(request.overrides.attack, Some(50));
    }
}

#[test]
fn summon_pack_evicts_the_oldest_minion_at_the_limit() {
    let (mut state, _env) = duel_state();
    let mut oldest = None;
    for (i, slot) in [Slot(1), Slot(2), Slot(3)].into_iter().enumerate() {
        let instance = state
            .spawn_unit(&grunt_template(20 + i as u32), Side::Ally, slot)
            .unwrap();
        let unit = state.board.unit_mut(Side::Ally, slot).unwrap();
        unit.minion = Some(MinionState {
            owner: instance,
            lifetime: 9,
        });
        unit.freshly_summoned = false;
        if oldest.is_none() {
            oldest = Some(instance);
        }
    }
    arm_ultimate(
        &mut state,
        UltimateShape::SummonPack {
            unit: UnitId(100),
            count: 1,
            inherit_pct: 50,
            lifetime: 2,
        },
        30,
    );
    let env = summoner_env();

    let report = advance(&mut state, &env);
    let oldest = oldest.unwrap();
    assert!(report.events.iter().any(|e| matches!(
        e,
        BattleEvent::UnitRemoved { instance, .. } if *instance == oldest
    )));
    // The freed slot 1 is the nearest free slot and receives the spawn.
    assert!(state.summons.pending_at(Side::Ally, Slot(1)).is_some());
    assert!(state.board.unit(Side::Ally, Slot(1)).is_none());
}
