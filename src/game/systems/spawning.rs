//! Enemy and buff pickup spawners
//!
//! Enemies spawn outside the visible arena on a random edge; pickups spawn at
//! a random interior point. Both run off countdown timers owned by the run
//! state, with the enemy interval driven by the wave scheduler.

use rand::Rng;

use crate::game::constants::{arena, buff, enemy};
use crate::game::state::{BuffKind, BuffPickup, Enemy, RunState};
use crate::game::waves;
use crate::util::vec2::Vec2;

/// Sample a spawn point just outside the arena, uniform along a random edge
pub fn random_edge_point(rng: &mut impl Rng) -> Vec2 {
    let m = arena::SPAWN_MARGIN;
    match rng.gen_range(0..4u8) {
        0 => Vec2::new(rng.gen_range(0.0..arena::WIDTH), -m),
        1 => Vec2::new(arena::WIDTH + m, rng.gen_range(0.0..arena::HEIGHT)),
        2 => Vec2::new(rng.gen_range(0.0..arena::WIDTH), arena::HEIGHT + m),
        _ => Vec2::new(-m, rng.gen_range(0.0..arena::HEIGHT)),
    }
}

/// Sample an interior point away from the walls for a buff pickup
pub fn random_interior_point(rng: &mut impl Rng) -> Vec2 {
    let m = buff::SPAWN_WALL_MARGIN;
    Vec2::new(
        rng.gen_range(m..arena::WIDTH - m),
        rng.gen_range(m..arena::HEIGHT - m),
    )
}

/// Roll per-enemy pursuit speed: random base plus the capped wave bonus
fn roll_enemy_speed(rng: &mut impl Rng, wave_index: u32) -> f32 {
    enemy::SPEED_MIN
        + rng.gen_range(0.0..enemy::SPEED_JITTER)
        + waves::enemy_speed_bonus(wave_index)
}

/// Count the enemy spawn cooldown down; on expiry, re-arm it to the wave
/// interval and spawn a batch of enemies on random edges.
pub fn update_enemy_spawner(state: &mut RunState, rng: &mut impl Rng, dt: f32) {
    state.spawn_cooldown -= dt;
    if state.spawn_cooldown > 0.0 {
        return;
    }
    state.spawn_cooldown = waves::spawn_interval(state.wave);

    let batch = waves::spawn_batch_size(state.wave);
    let elite_p = waves::elite_probability(state.wave);
    for _ in 0..batch {
        let position = random_edge_point(rng);
        let elite = rng.gen::<f32>() < elite_p;
        let speed = roll_enemy_speed(rng, state.wave);
        let id = state.alloc_entity_id();
        state.enemies.push(Enemy::new(id, position, speed, elite));
    }
}

/// Count the buff spawn cooldown down; on expiry, re-arm to a randomized
/// interval and drop a pickup of a uniformly random kind.
pub fn update_buff_spawner(state: &mut RunState, rng: &mut impl Rng, dt: f32) {
    state.buff_spawn_cooldown -= dt;
    if state.buff_spawn_cooldown > 0.0 {
        return;
    }
    state.buff_spawn_cooldown =
        rng.gen_range(buff::SPAWN_INTERVAL_MIN..buff::SPAWN_INTERVAL_MAX);

    let kind = BuffKind::ALL[rng.gen_range(0..BuffKind::ALL.len())];
    let position = random_interior_point(rng);
    let id = state.alloc_entity_id();
    state.pickups.push(BuffPickup::new(id, position, kind));
}
