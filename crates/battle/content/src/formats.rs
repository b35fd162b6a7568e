//! Serde formats for RON content files.
//!
//! These mirror the data files, not the engine types: shapes arrive as
//! string tags plus a flat parameter bag and are resolved into the closed
//! engine union by the loader.

use serde::{Deserialize, Serialize};

fn default_fury_max() -> u32 {
    100
}

/// One unit template entry in `units.ron`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UnitSpec {
    pub id: u32,
    pub name: String,
    pub hp_max: u32,
    pub attack: u32,
    #[serde(default = "default_fury_max")]
    pub fury_max: u32,
    #[serde(default)]
    pub follow_up_hits: u8,
    #[serde(default)]
    pub hp_regen: u32,
    #[serde(default)]
    pub fury_regen: u32,
    #[serde(default)]
    pub leader: bool,
    #[serde(default)]
    pub boss: bool,
    #[serde(default)]
    pub ultimate: Option<UltimateSpec>,
}

/// Ultimate definition as written in data: a string shape tag plus the
/// parameters that tag requires.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UltimateSpec {
    pub name: String,
    pub cost: u32,
    pub shape: String,
    #[serde(default)]
    pub busy_ms: u32,

    // Shape parameters; which ones are required depends on `shape`.
    #[serde(default)]
    pub targets: Option<u8>,
    #[serde(default)]
    pub power_pct: Option<u32>,
    #[serde(default)]
    pub leech_pct: Option<u32>,
    #[serde(default)]
    pub hits: Option<u8>,
    #[serde(default)]
    pub hp_cost_pct: Option<u32>,
    #[serde(default)]
    pub attack_up_pct: Option<u32>,
    #[serde(default)]
    pub duration: Option<u16>,
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default)]
    pub hp_pct: Option<u32>,
    #[serde(default)]
    pub fury: Option<u32>,
    #[serde(default)]
    pub fury_locked: Option<bool>,
    #[serde(default)]
    pub unit: Option<u32>,
    #[serde(default)]
    pub count: Option<u8>,
    #[serde(default)]
    pub inherit_pct: Option<u32>,
    #[serde(default)]
    pub lifetime: Option<u8>,
}
