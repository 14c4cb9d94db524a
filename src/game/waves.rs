//! Wave scheduler
//!
//! Maps elapsed run time to a wave index and the difficulty knobs attached to
//! it. Every knob is monotone in the wave index with a cap or floor so the
//! simulation stays bounded on long runs.

use crate::game::constants::{spawn, wave};

/// Wave index for an elapsed run time. Waves are 1-based.
#[inline]
pub fn wave_for_elapsed(elapsed_ms: u64) -> u32 {
    let w = elapsed_ms.div_ceil(wave::DURATION_MS);
    w.max(1) as u32
}

/// Delay until the next enemy spawn batch, shrinking per wave down to a floor.
#[inline]
pub fn spawn_interval(wave_index: u32) -> f32 {
    let reduced = spawn::BASE_INTERVAL - spawn::INTERVAL_STEP * wave_index.saturating_sub(1) as f32;
    reduced.max(spawn::MIN_INTERVAL)
}

/// Number of enemies per spawn batch: one extra every three waves.
#[inline]
pub fn spawn_batch_size(wave_index: u32) -> u32 {
    1 + wave_index.saturating_sub(1) / spawn::EXTRA_ENEMY_EVERY
}

/// Probability that a spawned enemy is the elite variant, capped.
#[inline]
pub fn elite_probability(wave_index: u32) -> f32 {
    let p = spawn::ELITE_BASE_PROBABILITY
        + spawn::ELITE_PROBABILITY_STEP * wave_index.saturating_sub(1) as f32;
    p.min(spawn::ELITE_MAX_PROBABILITY)
}

/// Additive enemy speed bonus for a wave, capped.
#[inline]
pub fn enemy_speed_bonus(wave_index: u32) -> f32 {
    (wave::SPEED_STEP * wave_index.saturating_sub(1) as f32).min(wave::SPEED_CAP)
}
