//! Buff pickup lifecycle: magnetism, despawn, and collection.

use crate::game::constants::buff;
use crate::game::state::{BuffKind, RunState};

/// Pull nearby pickups toward the player, decay lifetimes, and cull expired
/// pickups. Pull speed ramps linearly from full at zero distance to nothing
/// at the magnet radius.
pub fn update_pickups(state: &mut RunState, dt: f32) {
    let target = state.player.position;
    for pickup in &mut state.pickups {
        let (dir, dist) = (target - pickup.position).normalize_with_length();
        if dist > 0.0 && dist < buff::MAGNET_RADIUS {
            let pull = buff::MAGNET_PULL * (1.0 - dist / buff::MAGNET_RADIUS);
            pickup.position += dir * pull * dt;
        }
        pickup.lifetime -= dt;
    }
    state.pickups.retain(|p| p.lifetime > 0.0);
}

/// Collect every pickup overlapping the player and apply its effect.
/// Returns the kinds collected this tick in pickup order.
pub fn collect_pickups(state: &mut RunState) -> Vec<BuffKind> {
    let ppos = state.player.position;
    let prad = state.player.radius();
    let mut collected = Vec::new();

    let mut i = 0;
    while i < state.pickups.len() {
        let reach = prad + state.pickups[i].radius();
        if state.pickups[i].position.distance_sq_to(ppos) <= reach * reach {
            let pickup = state.pickups.swap_remove(i);
            state.buffs.apply(pickup.kind);
            collected.push(pickup.kind);
        } else {
            i += 1;
        }
    }
    collected
}
