//! Imperative shell around the deterministic battle core.
//!
//! The runtime owns the authoritative [`battle_core::BattleState`] inside a
//! background driver task, paces it at a minimum interval (stretched by the
//! busy durations the core reports), and republishes every notification on
//! a topic-based event bus. Collaborators — UIs, the opponent policy, the
//! timeout timer — talk to the driver through [`DriverHandle`] and only
//! ever read snapshots or submit requests.

pub mod driver;
pub mod error;
pub mod events;
pub mod handle;
pub mod oracle;
pub mod providers;
pub mod vfx;

pub use driver::{Command, DriverOptions, DriverWorker};
pub use error::{Result, RuntimeError};
pub use events::{EventBus, Topic, topic_of};
pub use handle::DriverHandle;
pub use oracle::{OracleBundle, StandardDamageModel};
pub use providers::{CastProvider, CastRequest, ScriptedCaster};
pub use vfx::VfxBoard;
