//! Damage vocabulary and the single lethal-resolution path.
pub mod damage;
pub mod lethal;

pub use damage::{AttackKind, DamageBreakdown, DamageKind};
pub use lethal::{DamageOutcome, DamageSource, LethalOutcome, apply_heal, apply_lethal, instant_kill};
