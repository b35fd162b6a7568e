//! Traits describing the engine's external collaborators.
//!
//! The core computes no damage numbers, plays no animations, and stores no
//! catalogs; those concerns sit behind oracle traits bundled into
//! [`BattleEnv`] so the engine can reach everything it needs without hard
//! coupling to concrete implementations. Every oracle call is a synchronous
//! read — the core never awaits a collaborator.
mod catalog;
mod error;

pub use catalog::{CatalogOracle, UnitTemplate};
pub use error::OracleError;

use crate::combat::{AttackKind, DamageBreakdown, DamageKind};
use crate::state::{InstanceId, UnitId, UnitToken};

/// Damage/heal computation collaborator. The core supplies the combat
/// context and owns only the lethal/undying decision on the result.
pub trait DamageOracle {
    fn compute(
        &self,
        attacker: &UnitToken,
        target: &UnitToken,
        base: u32,
        damage: DamageKind,
        attack: AttackKind,
        penetration: u32,
    ) -> DamageBreakdown;
}

/// Visual-effect cue requested from the rendering collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VfxCue {
    /// Ultimate cast animation of the given unit template.
    UltimateCast(UnitId),
    BasicHit,
    Spawn,
}

/// Rendering/VFX collaborator.
///
/// `play` requests an effect anchored to a unit and may return the
/// last-reported duration in milliseconds, used only to extend the
/// caster's busy window. The call never blocks.
pub trait VfxOracle {
    fn play(&self, cue: VfxCue, anchor: InstanceId) -> Option<u32>;
}

/// Aggregates the read-only oracles required by the action pipeline.
#[derive(Clone, Copy)]
pub struct Env<'a, D, V, C>
where
    D: DamageOracle + ?Sized,
    V: VfxOracle + ?Sized,
    C: CatalogOracle + ?Sized,
{
    damage: Option<&'a D>,
    vfx: Option<&'a V>,
    catalog: Option<&'a C>,
}

pub type BattleEnv<'a> = Env<'a, dyn DamageOracle + 'a, dyn VfxOracle + 'a, dyn CatalogOracle + 'a>;

impl<'a, D, V, C> Env<'a, D, V, C>
where
    D: DamageOracle + ?Sized,
    V: VfxOracle + ?Sized,
    C: CatalogOracle + ?Sized,
{
    pub fn new(damage: Option<&'a D>, vfx: Option<&'a V>, catalog: Option<&'a C>) -> Self {
        Self {
            damage,
            vfx,
            catalog,
        }
    }

    pub fn with_all(damage: &'a D, vfx: &'a V, catalog: &'a C) -> Self {
        Self::new(Some(damage), Some(vfx), Some(catalog))
    }

    pub fn empty() -> Self {
        Self {
            damage: None,
            vfx: None,
            catalog: None,
        }
    }

    /// Returns the DamageOracle, or an error if not available.
    pub fn damage(&self) -> Result<&'a D, OracleError> {
        self.damage.ok_or(OracleError::DamageNotAvailable)
    }

    /// Returns the VfxOracle, or an error if not available.
    pub fn vfx(&self) -> Result<&'a V, OracleError> {
        self.vfx.ok_or(OracleError::VfxNotAvailable)
    }

    /// Returns the CatalogOracle, or an error if not available.
    pub fn catalog(&self) -> Result<&'a C, OracleError> {
        self.catalog.ok_or(OracleError::CatalogNotAvailable)
    }
}
