//! Level/XP curve and the stats derived from it
//!
//! Progression persists across runs per address; the run engine only reads
//! derived damage/max-HP and feeds kill XP back through [`Progress::apply_xp`].

/// XP required to advance from `level` to `level + 1`.
/// Strictly increasing in `level`, which bounds the apply_xp loop.
#[inline]
pub fn xp_for_next_level(level: u32) -> u64 {
    let l = level as u64;
    40 + 30 * l + 6 * l * l
}

/// Attack damage at a given level, rounded to two decimals.
#[inline]
pub fn damage_for_level(level: u32) -> f32 {
    let raw = 1.0 + 0.15 * (level.saturating_sub(1)) as f32;
    (raw * 100.0).round() / 100.0
}

/// Maximum hit points at a given level.
#[inline]
pub fn max_hp_for_level(level: u32) -> u32 {
    3 + level.saturating_sub(1) / 2
}

/// Persistent per-address progression: level plus XP toward the next level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub level: u32,
    pub xp: u64,
}

impl Progress {
    pub fn new(level: u32, xp: u64) -> Self {
        Self {
            level: level.max(1),
            xp,
        }
    }

    /// Add XP and advance levels while the threshold is met.
    /// Returns the number of levels gained. XP is carried over, never lost.
    pub fn apply_xp(&mut self, gained: u64) -> u32 {
        if gained == 0 {
            return 0;
        }
        self.xp += gained;
        let mut levels_gained = 0;
        while self.xp >= xp_for_next_level(self.level) {
            self.xp -= xp_for_next_level(self.level);
            self.level += 1;
            levels_gained += 1;
        }
        levels_gained
    }

    pub fn damage(&self) -> f32 {
        damage_for_level(self.level)
    }

    pub fn max_hp(&self) -> u32 {
        max_hp_for_level(self.level)
    }

    pub fn next_level_xp(&self) -> u64 {
        xp_for_next_level(self.level)
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self { level: 1, xp: 0 }
    }
}
