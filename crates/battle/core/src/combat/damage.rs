//! Damage classification passed to the damage collaborator.
//!
//! The core does not compute damage numbers itself; it hands the attacker,
//! target, and this classification to the [`crate::env::DamageOracle`] and
//! receives a [`DamageBreakdown`]. The core owns only the lethal/undying
//! decision (see [`super::lethal`]).

/// Damage type for resistance handling in the damage collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageKind {
    Physical,
    Magic,
    /// Ignores resistances.
    True,
}

/// What produced the hit, for the collaborator's scaling rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackKind {
    Basic,
    Ultimate,
}

/// Result of one damage computation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageBreakdown {
    /// Damage to apply to the target's hp.
    pub dealt: u32,
    /// Damage removed by the target's defenses, reported for observers.
    pub absorbed: u32,
}

impl DamageBreakdown {
    pub fn new(dealt: u32, absorbed: u32) -> Self {
        Self { dealt, absorbed }
    }
}
