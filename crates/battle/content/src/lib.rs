//! Data-driven unit and ultimate catalogs.
//!
//! This crate houses the persisted content the simulation consumes: unit
//! templates and their ultimate definitions, loaded from RON files and
//! validated at load time. String shape tags from data become the closed
//! [`battle_core::UltimateShape`] union here — a malformed entry degrades
//! to the `Inert` shape (spend the fury, do nothing) with a recorded
//! warning instead of failing the battle later.
//!
//! Content is consumed through the [`battle_core::CatalogOracle`] trait and
//! never appears in battle state.

pub mod formats;
pub mod loaders;

pub use formats::{UltimateSpec, UnitSpec};
pub use loaders::{LoadResult, UnitCatalog};
