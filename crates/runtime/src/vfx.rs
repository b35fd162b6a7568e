//! Last-reported animation durations.
//!
//! The renderer reports how long an effect takes whenever it plays one; the
//! core reads the last-reported value synchronously through
//! [`battle_core::VfxOracle`] to extend a caster's busy window. The core
//! never waits for an animation to complete.

use std::collections::HashMap;
use std::sync::Mutex;

use battle_core::{InstanceId, VfxCue, VfxOracle};

/// Thread-safe store of last-reported effect durations in milliseconds.
#[derive(Debug, Default)]
pub struct VfxBoard {
    durations: Mutex<HashMap<VfxCue, u32>>,
}

impl VfxBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called by the rendering side whenever it measures an effect.
    pub fn report(&self, cue: VfxCue, millis: u32) {
        if let Ok(mut durations) = self.durations.lock() {
            durations.insert(cue, millis);
        }
    }

    /// Last-reported duration for a cue, if any.
    pub fn last_reported(&self, cue: VfxCue) -> Option<u32> {
        self.durations.lock().ok()?.get(&cue).copied()
    }
}

impl VfxOracle for VfxBoard {
    fn play(&self, cue: VfxCue, _anchor: InstanceId) -> Option<u32> {
        self.last_reported(cue)
    }
}
