mod common;

use battle_core::{fury, BattleConfig, InstanceId, Side, Slot, UnitToken};
use common::grunt_template;

fn unit(instance: u32, side: Side, slot: u8) -> UnitToken {
    grunt_template(instance).materialize(InstanceId(instance), side, Slot(slot))
}

/// Veteran unit: past its first turn, so drain applies normally.
fn veteran(instance: u32, side: Side, slot: u8) -> UnitToken {
    let mut u = unit(instance, side, slot);
    u.freshly_summoned = false;
    u
}

#[test]
fn single_target_gain_caps_the_cast_total_not_each_call() {
    let config = BattleConfig::default();
    let mut caster = veteran(1, Side::Ally, 0);
    fury::begin_cast(&mut caster, battle_core::CastTag(1));

    // Hits dealing 9%, 16%, and 15% of a 100-max-hp target: raw gains of
    // 9, 16, and 15 must net exactly the 30 ceiling, the last call being
    // clipped to the remaining headroom rather than dropped.
    assert_eq!(fury::gain_single_hit(&mut caster, 9, 100, &config), 9);
    assert_eq!(fury::gain_single_hit(&mut caster, 16, 100, &config), 16);
    assert_eq!(fury::gain_single_hit(&mut caster, 15, 100, &config), 5);
    assert_eq!(caster.fury.current, 30);

    // The ceiling stays exhausted for the rest of the cast.
    assert_eq!(fury::gain_single_hit(&mut caster, 50, 100, &config), 0);

    // A new cast re-arms it.
    fury::begin_cast(&mut caster, battle_core::CastTag(2));
    assert_eq!(fury::gain_single_hit(&mut caster, 9, 100, &config), 9);
}

#[test]
fn reissuing_the_same_cast_tag_does_not_rearm() {
    let config = BattleConfig::default();
    let mut caster = veteran(1, Side::Ally, 0);
    fury::begin_cast(&mut caster, battle_core::CastTag(7));
    assert_eq!(fury::gain_single_hit(&mut caster, 30, 100, &config), 30);

    fury::begin_cast(&mut caster, battle_core::CastTag(7));
    assert_eq!(fury::gain_single_hit(&mut caster, 30, 100, &config), 0);

    fury::reset_cast_scope(&mut caster);
    assert_eq!(fury::gain_single_hit(&mut caster, 10, 100, &config), 10);
}

#[test]
fn area_gain_caps_each_hit_but_not_the_total() {
    let config = BattleConfig::default();
    let mut caster = veteran(1, Side::Ally, 0);
    fury::begin_cast(&mut caster, battle_core::CastTag(1));

    // Raw 20 per hit, clamped to the 12 per-hit ceiling, four targets:
    // the total 48 exceeds the single-target ceiling by design.
    for _ in 0..4 {
        assert_eq!(fury::gain_area_hit(&mut caster, 20, 100, &config), 12);
    }
    assert_eq!(caster.fury.current, 48);
}

#[test]
fn damage_taken_gain_is_not_cast_scoped() {
    let config = BattleConfig::default();
    let mut unit = veteran(1, Side::Ally, 0);
    fury::begin_cast(&mut unit, battle_core::CastTag(1));

    // 20% of own max hp taken, twice: both credit in full.
    assert_eq!(fury::gain_damage_taken(&mut unit, 80, &config), 20);
    assert_eq!(fury::gain_damage_taken(&mut unit, 80, &config), 20);
    assert_eq!(unit.fury.current, 40);
}

#[test]
fn drain_is_zero_against_fresh_summons_and_mutates_nothing() {
    let config = BattleConfig::default();
    let mut caster = veteran(1, Side::Ally, 0);
    let mut target = unit(2, Side::Enemy, 0);
    assert!(target.freshly_summoned);
    target.fury.current = 90;

    fury::begin_cast(&mut caster, battle_core::CastTag(1));
    assert_eq!(fury::drain(&mut caster, &mut target, &config), 0);
    assert_eq!(target.fury.current, 90);
    assert_eq!(caster.fury.current, 0);
}

#[test]
fn drain_transfers_base_plus_percent_capped_per_cast() {
    let config = BattleConfig::default();
    let mut caster = veteran(1, Side::Ally, 0);
    let mut target = veteran(2, Side::Enemy, 0);
    target.fury.current = 100;

    fury::begin_cast(&mut caster, battle_core::CastTag(1));
    // base 10 + 20% of 100 = 30.
    assert_eq!(fury::drain(&mut caster, &mut target, &config), 30);
    assert_eq!(target.fury.current, 70);
    assert_eq!(caster.fury.current, 30);

    // base 10 + 20% of 70 = 24, but only 10 of the 40 cast cap remains.
    assert_eq!(fury::drain(&mut caster, &mut target, &config), 10);
    assert_eq!(caster.fury.current, 40);
    assert_eq!(target.fury.current, 60);

    // Cap exhausted for this cast.
    assert_eq!(fury::drain(&mut caster, &mut target, &config), 0);
}

#[test]
fn drain_never_takes_more_than_the_target_pool() {
    let config = BattleConfig::default();
    let mut caster = veteran(1, Side::Ally, 0);
    let mut target = veteran(2, Side::Enemy, 0);
    target.fury.current = 4;

    fury::begin_cast(&mut caster, battle_core::CastTag(1));
    assert_eq!(fury::drain(&mut caster, &mut target, &config), 4);
    assert_eq!(target.fury.current, 0);
}

#[test]
fn spend_on_uninitialized_pool_is_a_no_op() {
    let config = BattleConfig::default();
    let mut unit = veteran(1, Side::Ally, 0);
    unit.fury_acct = battle_core::fury::FuryState::default();
    unit.fury.current = 50;

    assert!(!fury::spend(&mut unit, 20));
    assert_eq!(unit.fury.current, 50);
    assert_eq!(fury::grant_turn_start(&mut unit, &config), 0);
}

#[test]
fn grant_and_gains_clamp_to_the_pool_maximum() {
    let config = BattleConfig::default();
    let mut unit = veteran(1, Side::Ally, 0);
    unit.fury.current = 95; // maximum is 100

    assert_eq!(fury::grant_turn_start(&mut unit, &config), 5);
    assert_eq!(unit.fury.current, 100);
    assert_eq!(fury::grant_turn_start(&mut unit, &config), 0);
}
