use battle_core::scheduler::SequentialCursor;
use battle_core::{
    BattleConfig, BattleEvent, BattleState, Scheduler, Side, Slot, SpawnOverrides, StepOutcome,
    TimeoutContext, UnitId,
};
use battle_content::UnitCatalog;
use battle_runtime::{DriverHandle, DriverOptions, OracleBundle, Topic};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Vanguard-vs-Vanguard duel from the builtin catalog.
fn duel_state(catalog: &UnitCatalog) -> BattleState {
    let mut state = BattleState::new(
        BattleConfig::default(),
        Scheduler::Sequential(SequentialCursor::alternating()),
        TimeoutContext::Symmetric,
    );
    let vanguard = catalog.get(UnitId(1)).expect("builtin Vanguard");
    state.spawn_unit(vanguard, Side::Ally, Slot(0)).unwrap();
    state.spawn_unit(vanguard, Side::Enemy, Slot(0)).unwrap();
    state
}

#[tokio::test]
async fn manual_stepping_runs_a_duel_to_completion() {
    init_tracing();
    let catalog = UnitCatalog::builtin().unwrap();
    let state = duel_state(&catalog);
    let options = DriverOptions {
        auto_advance: false,
        ..DriverOptions::default()
    };
    let (handle, join) = DriverHandle::spawn(state, OracleBundle::new(catalog), options);

    let mut battle_rx = handle.subscribe(Topic::Battle);

    let mut finished = false;
    for _ in 0..400 {
        match handle.advance_turn().await.unwrap() {
            StepOutcome::Turn(_) => {}
            StepOutcome::Finished => {
                finished = true;
                break;
            }
            StepOutcome::Idle => panic!("a duel never goes idle"),
        }
        let snapshot = handle.snapshot().await.unwrap();
        if snapshot.record.is_over() {
            finished = true;
            break;
        }
    }
    assert!(finished, "two identical leaders must still produce a result");

    // The bus carried the termination notification.
    use tokio::sync::broadcast::error::TryRecvError;
    let mut saw_end = false;
    loop {
        match battle_rx.try_recv() {
            Ok(BattleEvent::BattleEnded { .. }) => saw_end = true,
            Ok(_) => {}
            Err(TryRecvError::Lagged(_)) => {}
            Err(_) => break,
        }
    }
    assert!(saw_end, "BattleEnded must be published on the Battle topic");

    drop(handle);
    join.await.unwrap();
}

#[tokio::test]
async fn summon_requests_follow_the_same_rules_for_both_sides() {
    init_tracing();
    let catalog = UnitCatalog::builtin().unwrap();
    let state = duel_state(&catalog);
    let options = DriverOptions {
        auto_advance: false,
        ..DriverOptions::default()
    };
    let (handle, _join) = DriverHandle::spawn(state, OracleBundle::new(catalog), options);

    // Occupied slots are rejected for either side.
    for side in [Side::Ally, Side::Enemy] {
        assert!(
            !handle
                .submit_summon(side, Slot(0), UnitId(100), SpawnOverrides::default(), None)
                .await
                .unwrap()
        );
        assert!(
            handle
                .submit_summon(side, Slot(2), UnitId(100), SpawnOverrides::default(), None)
                .await
                .unwrap()
        );
        // Only one pending request per slot.
        assert!(
            !handle
                .submit_summon(side, Slot(2), UnitId(100), SpawnOverrides::default(), None)
                .await
                .unwrap()
        );
    }

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.summons.len(), 2);
}

#[tokio::test]
async fn timeout_signal_freezes_a_symmetric_duel_on_hp_ratio() {
    init_tracing();
    let catalog = UnitCatalog::builtin().unwrap();
    let state = duel_state(&catalog);
    let options = DriverOptions {
        auto_advance: false,
        ..DriverOptions::default()
    };
    let (handle, _join) = DriverHandle::spawn(state, OracleBundle::new(catalog), options);

    // Let the ally strike first so the enemy leader is lower.
    handle.advance_turn().await.unwrap();

    let result = handle.signal_timeout().await.unwrap();
    let (winner, reason) = result.expect("timeout must freeze the record");
    assert_eq!(winner.as_str(), "ally");
    assert_eq!(reason.as_ref(), "timeout");

    // Idempotent once frozen.
    let again = handle.signal_timeout().await.unwrap();
    assert_eq!(again, Some((winner, reason)));

    // Stepping after the freeze is a no-op.
    assert!(matches!(
        handle.advance_turn().await.unwrap(),
        StepOutcome::Finished
    ));
}

#[tokio::test]
async fn auto_advance_paces_the_battle_without_commands() {
    init_tracing();
    let catalog = UnitCatalog::builtin().unwrap();
    let state = duel_state(&catalog);
    let options = DriverOptions {
        auto_advance: true,
        min_interval: std::time::Duration::from_millis(1),
    };
    let (handle, _join) = DriverHandle::spawn(state, OracleBundle::new(catalog), options);

    let mut turn_rx = handle.subscribe(Topic::Turn);
    // The driver ticks on its own; a turn-start arrives without any
    // advance command.
    let event = tokio::time::timeout(std::time::Duration::from_secs(5), turn_rx.recv())
        .await
        .expect("auto-advance must produce events")
        .expect("bus open");
    assert!(matches!(
        event,
        BattleEvent::TurnStart { .. } | BattleEvent::TurnEnd { .. } | BattleEvent::ActionStart { .. } | BattleEvent::ActionEnd { .. } | BattleEvent::RegenApplied { .. }
    ));
}
