//! Player movement: input vector, haste boost, arena clamping

use crate::game::constants::{arena, player};
use crate::game::state::{InputState, RunState};

/// Integrate player position from the sampled input.
/// The position is clamped so the full player circle stays inside the arena.
pub fn update_player(state: &mut RunState, input: &InputState, dt: f32) {
    let dir = input.move_vector();
    if dir.is_zero(1e-6) {
        return;
    }

    let mut speed = player::BASE_SPEED;
    if state.buffs.haste_active() {
        speed *= player::HASTE_MULTIPLIER;
    }

    let p = &mut state.player;
    p.position += dir * speed * dt;
    p.position.x = p.position.x.clamp(player::RADIUS, arena::WIDTH - player::RADIUS);
    p.position.y = p.position.y.clamp(player::RADIUS, arena::HEIGHT - player::RADIUS);
}
