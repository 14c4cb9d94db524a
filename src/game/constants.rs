//! Tuning constants for the survival run simulation
//!
//! All distances are in arena units (CSS pixels on the client),
//! all durations in seconds unless suffixed `_MS`.

/// Arena bounds
pub mod arena {
    /// Playfield width
    pub const WIDTH: f32 = 320.0;
    /// Playfield height
    pub const HEIGHT: f32 = 440.0;
    /// Enemies spawn this far outside the visible bounds
    pub const SPAWN_MARGIN: f32 = 16.0;
    /// Bullets are culled this far outside the visible bounds
    pub const BULLET_CULL_MARGIN: f32 = 20.0;
}

/// Player constants
pub mod player {
    /// Collision radius (fixed, level-independent)
    pub const RADIUS: f32 = 10.0;
    /// Base movement speed in units per second
    pub const BASE_SPEED: f32 = 165.0;
    /// Speed multiplier while the haste buff is active
    pub const HASTE_MULTIPLIER: f32 = 1.45;
    /// Collision immunity granted at run start
    pub const INITIAL_GRACE: f32 = 1.0;
    /// Collision immunity granted after each hit (or shield absorb)
    pub const HIT_GRACE: f32 = 0.8;
}

/// Auto-fire constants
pub mod shoot {
    /// Base cooldown between shots
    pub const BASE_COOLDOWN: f32 = 0.33;
    /// Cooldown reduction per player level above 1
    pub const COOLDOWN_PER_LEVEL: f32 = 0.005;
    /// Cooldown never drops below this
    pub const MIN_COOLDOWN: f32 = 0.18;
    /// Cooldown multiplier while rapid-fire is active
    pub const RAPID_FIRE_MULTIPLIER: f32 = 0.55;
}

/// Bullet constants
pub mod bullet {
    pub const RADIUS: f32 = 3.0;
    /// Base muzzle speed
    pub const BASE_SPEED: f32 = 280.0;
    /// Speed bonus per player level above 1
    pub const SPEED_PER_LEVEL: f32 = 6.0;
    /// Muzzle speed cap
    pub const MAX_SPEED: f32 = 360.0;
    /// Lifetime in seconds
    pub const LIFETIME: f32 = 1.2;
}

/// Enemy constants
pub mod enemy {
    /// Collision radius for the normal variant
    pub const RADIUS: f32 = 11.0;
    /// Collision radius for the elite variant
    pub const ELITE_RADIUS: f32 = 15.0;
    /// Hit points for the normal variant
    pub const BASE_HP: f32 = 1.0;
    /// Extra hit points for the elite variant
    pub const ELITE_BONUS_HP: f32 = 1.0;
    /// Minimum roll of the per-enemy base speed
    pub const SPEED_MIN: f32 = 40.0;
    /// Random speed jitter added on top of the minimum
    pub const SPEED_JITTER: f32 = 35.0;
}

/// Enemy spawn scheduling
pub mod spawn {
    /// Spawn interval at wave 1
    pub const BASE_INTERVAL: f32 = 0.9;
    /// Interval reduction per wave above 1
    pub const INTERVAL_STEP: f32 = 0.07;
    /// Interval floor
    pub const MIN_INTERVAL: f32 = 0.25;
    /// One extra enemy per batch every this many waves
    pub const EXTRA_ENEMY_EVERY: u32 = 3;
    /// Elite probability at wave 1
    pub const ELITE_BASE_PROBABILITY: f32 = 0.05;
    /// Elite probability increase per wave above 1
    pub const ELITE_PROBABILITY_STEP: f32 = 0.03;
    /// Elite probability cap
    pub const ELITE_MAX_PROBABILITY: f32 = 0.35;
}

/// Wave scheduling
pub mod wave {
    /// Fixed duration of one wave in milliseconds
    pub const DURATION_MS: u64 = 20_000;
    /// Enemy speed bonus per wave above 1
    pub const SPEED_STEP: f32 = 12.0;
    /// Enemy speed bonus cap
    pub const SPEED_CAP: f32 = 90.0;
}

/// Buff pickup constants
pub mod buff {
    /// Pickup collision radius
    pub const PICKUP_RADIUS: f32 = 9.0;
    /// Pickup lifetime before despawn
    pub const LIFETIME: f32 = 8.0;
    /// Minimum delay between pickup spawns
    pub const SPAWN_INTERVAL_MIN: f32 = 6.0;
    /// Maximum delay between pickup spawns
    pub const SPAWN_INTERVAL_MAX: f32 = 10.0;
    /// Pickups spawn at least this far from the arena walls
    pub const SPAWN_WALL_MARGIN: f32 = 24.0;
    /// Timed buffs (haste, rapid-fire, area-blades) run this long per pickup
    pub const DURATION: f32 = 6.0;
    /// Pickups inside this radius are pulled toward the player
    pub const MAGNET_RADIUS: f32 = 70.0;
    /// Peak pull speed at zero distance (design-tuned, not physical)
    pub const MAGNET_PULL: f32 = 180.0;
}

/// Orbiting blade constants (area-blades buff)
pub mod blades {
    /// Number of hit volumes orbiting the player
    pub const COUNT: u32 = 3;
    /// Orbit radius around the player center
    pub const ORBIT_RADIUS: f32 = 34.0;
    /// Radius of each blade hit volume
    pub const HIT_RADIUS: f32 = 7.0;
    /// Angular velocity in radians per second
    pub const ANGULAR_VELOCITY: f32 = 4.2;
    /// Per-enemy re-hit cooldown, prevents multiple kills per revolution
    pub const REHIT_COOLDOWN: f32 = 0.35;
    /// Blade damage as a fraction of player damage
    pub const DAMAGE_FACTOR: f32 = 0.8;
}

/// Scoring and XP
pub mod score {
    /// Score per kill
    pub const KILL_VALUE: u64 = 6;
    /// Score per completed wave (wave - 1)
    pub const WAVE_VALUE: u64 = 10;
    /// XP per kill, flat
    pub const XP_KILL_BASE: u64 = 4;
    /// Extra XP per kill per wave above 1
    pub const XP_KILL_WAVE_BONUS: u64 = 2;
}

/// Frame timing
pub mod frame {
    /// Largest dt accepted per update, guards against tab-switch stalls
    pub const MAX_DT: f32 = 0.04;
}

/// Compute the run score from elapsed time, kills and wave index.
/// Used both for the live HUD value and the final submission.
#[inline]
pub fn run_score(elapsed_ms: u64, kills: u32, wave: u32) -> u64 {
    elapsed_ms / 1000
        + kills as u64 * score::KILL_VALUE
        + (wave.saturating_sub(1)) as u64 * score::WAVE_VALUE
}
