/// Battle configuration constants and tunable balance parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Fury granted unconditionally at the start of every acting unit's turn.
    pub turn_start_fury: u32,

    /// Ceiling on cumulative single-target hit gain within one cast.
    pub single_cast_fury_cap: u32,

    /// Ceiling applied to each individual target-hit of an area cast.
    pub area_hit_fury_cap: u32,

    /// Ceiling on cumulative fury drained from targets within one cast.
    pub drain_cast_cap: u32,

    /// Flat component of a fury drain.
    pub drain_base: u32,

    /// Percentage of the target's current fury pool added to a drain.
    pub drain_pct: u32,

    /// Scale applied to hit-based fury gain (percent of the raw
    /// percent-of-max-hp amount; 100 = one fury per percentage point).
    pub hit_gain_scale_pct: u32,

    /// Scale applied to damage-taken fury gain.
    pub taken_gain_scale_pct: u32,

    /// Live minions allowed per side before summoning evicts the oldest.
    pub minion_limit: usize,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Board slots per side (2 rows x 3 columns).
    pub const MAX_SLOTS_PER_SIDE: usize = 6;
    /// Columns per side; slot index = row * COLUMNS + column.
    pub const COLUMNS: usize = 3;
    pub const MAX_STATUS_EFFECTS: usize = 8;
    /// Pending spawn requests can never exceed the board.
    pub const MAX_PENDING_SPAWNS: usize = 2 * Self::MAX_SLOTS_PER_SIDE;
    /// Hard cap on follow-up hits in a basic-attack sequence.
    pub const MAX_FOLLOW_UP_HITS: u8 = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TURN_START_FURY: u32 = 10;
    pub const DEFAULT_SINGLE_CAST_FURY_CAP: u32 = 30;
    pub const DEFAULT_AREA_HIT_FURY_CAP: u32 = 12;
    pub const DEFAULT_DRAIN_CAST_CAP: u32 = 40;
    pub const DEFAULT_MINION_LIMIT: usize = 3;

    pub fn new() -> Self {
        Self {
            turn_start_fury: Self::DEFAULT_TURN_START_FURY,
            single_cast_fury_cap: Self::DEFAULT_SINGLE_CAST_FURY_CAP,
            area_hit_fury_cap: Self::DEFAULT_AREA_HIT_FURY_CAP,
            drain_cast_cap: Self::DEFAULT_DRAIN_CAST_CAP,
            drain_base: 10,
            drain_pct: 20,
            hit_gain_scale_pct: 100,
            taken_gain_scale_pct: 100,
            minion_limit: Self::DEFAULT_MINION_LIMIT,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
