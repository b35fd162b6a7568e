//! Deterministic turn-based combat simulation for the auto-battler mode.
//!
//! `battle-core` defines the canonical battle rules: turn scheduling, action
//! resolution, status effects, fury accounting, summon queuing, and battle
//! termination. All state mutation flows through [`engine::BattleEngine`],
//! one complete turn per call, and every notification a turn produces is
//! returned synchronously in order. Rendering, pacing, and decision policy
//! live outside this crate behind the [`env`] oracle traits.
pub mod action;
pub mod arbiter;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod fury;
pub mod scheduler;
pub mod state;
pub mod status;
pub mod summon;
pub mod ultimate;

pub use action::{ActionKind, SkipReason, TurnReport};
pub use arbiter::TimeoutContext;
pub use combat::{AttackKind, DamageBreakdown, DamageKind, DamageSource, LethalOutcome};
pub use config::BattleConfig;
pub use engine::{BattleEngine, EngineError, StepOutcome};
pub use env::{
    BattleEnv, CatalogOracle, DamageOracle, Env, OracleError, UnitTemplate, VfxCue, VfxOracle,
};
pub use events::{BattleEvent, RemovalReason, StepMeta};
pub use fury::CastTag;
pub use scheduler::{Scheduler, TurnStep};
pub use state::{
    BattleRecord, BattleState, Board, EndDetail, EndReason, FallenUnit, InstanceId, Meter,
    MinionState, Outcome, PhaseBook, Position, Side, Slot, StatusCategory, StatusDuration,
    StatusEffect, StatusEffects, StatusKind, TickCadence, UnitId, UnitTags, UnitToken,
};
pub use summon::{RevivalOverrides, SpawnOverrides, SpawnRequest, SummonQueue};
pub use ultimate::{CrowdControlKind, UltimateDef, UltimateShape};
