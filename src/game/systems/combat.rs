//! Combat systems: auto-fire, enemy pursuit, bullet and blade damage, and
//! player contact resolution.
//!
//! Kill attribution is same-tick: an enemy whose HP reaches zero is removed,
//! counted, and awards XP inside the same update that dealt the damage.

use crate::game::constants::{blades, bullet, player, shoot};
use crate::game::state::{Bullet, Enemy, RunState};
use crate::util::vec2::Vec2;

/// How a player contact resolved this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// No enemy touched the player (or grace was active)
    None,
    /// A shield charge absorbed the hit
    ShieldAbsorbed,
    /// The player lost one HP and survived
    Damaged,
    /// The player lost their last HP
    Died,
}

/// Effective cooldown between shots for the current level and buffs
pub fn effective_shoot_cooldown(state: &RunState) -> f32 {
    let leveled = shoot::BASE_COOLDOWN
        - shoot::COOLDOWN_PER_LEVEL * (state.progress.level.saturating_sub(1)) as f32;
    let mut cd = leveled.max(shoot::MIN_COOLDOWN);
    if state.buffs.rapid_fire_active() {
        cd *= shoot::RAPID_FIRE_MULTIPLIER;
    }
    cd
}

/// Muzzle speed for the current level, capped
pub fn effective_bullet_speed(level: u32) -> f32 {
    (bullet::BASE_SPEED + bullet::SPEED_PER_LEVEL * level.saturating_sub(1) as f32)
        .min(bullet::MAX_SPEED)
}

/// Index of the enemy nearest to the player. First-found wins on exact ties.
fn nearest_enemy(state: &RunState) -> Option<usize> {
    let origin = state.player.position;
    let mut best: Option<(usize, f32)> = None;
    for (i, e) in state.enemies.iter().enumerate() {
        let d = origin.distance_sq_to(e.position);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Count the shoot cooldown down and fire at the nearest enemy on expiry.
/// Holds fire (cooldown stays expired) while no enemy is alive.
pub fn update_auto_fire(state: &mut RunState, dt: f32) {
    state.shoot_cooldown = (state.shoot_cooldown - dt).max(0.0);
    if state.shoot_cooldown > 0.0 {
        return;
    }
    let Some(target_idx) = nearest_enemy(state) else {
        return;
    };
    let target = state.enemies[target_idx].position;
    let Some(dir) = aim_at(state.player.position, target) else {
        return;
    };
    let velocity = dir * effective_bullet_speed(state.progress.level);
    let id = state.alloc_entity_id();
    state
        .bullets
        .push(Bullet::new(id, state.player.position, velocity));
    state.shoot_cooldown = effective_shoot_cooldown(state);
}

/// Move every enemy straight toward the player and tick blade cooldowns
pub fn update_enemies(state: &mut RunState, dt: f32) {
    let target = state.player.position;
    for enemy in &mut state.enemies {
        let dir = (target - enemy.position).normalize();
        enemy.position += dir * enemy.speed * dt;
        enemy.blade_cooldown = (enemy.blade_cooldown - dt).max(0.0);
    }
}

/// Integrate bullets and cull the expired and out-of-bounds ones
pub fn update_bullets(state: &mut RunState, dt: f32) {
    for b in &mut state.bullets {
        b.position += b.velocity * dt;
        b.lifetime -= dt;
    }
    state
        .bullets
        .retain(|b| b.lifetime > 0.0 && !b.out_of_bounds());
}

fn kill_enemy(state: &mut RunState, idx: usize) -> Enemy {
    let enemy = state.enemies.swap_remove(idx);
    state.kills += 1;
    enemy
}

/// Resolve bullet hits. Each bullet is consumed by its first hit; enemies at
/// zero HP are removed immediately. Returns the enemies killed this tick.
pub fn resolve_bullet_hits(state: &mut RunState) -> Vec<Enemy> {
    let damage = state.progress.damage();
    let mut killed = Vec::new();

    let mut bi = 0;
    while bi < state.bullets.len() {
        let bpos = state.bullets[bi].position;
        let brad = state.bullets[bi].radius();
        let hit = state
            .enemies
            .iter()
            .position(|e| e.position.distance_sq_to(bpos) <= (e.radius + brad).powi(2));
        match hit {
            Some(ei) => {
                state.bullets.swap_remove(bi);
                state.enemies[ei].hp -= damage;
                if state.enemies[ei].hp <= 0.0 {
                    killed.push(kill_enemy(state, ei));
                }
            }
            None => bi += 1,
        }
    }
    killed
}

/// Advance the blade orbit and apply blade damage to enemies in reach.
/// A no-op while the area-blades buff is inactive. Returns kills.
pub fn resolve_blade_hits(state: &mut RunState, dt: f32) -> Vec<Enemy> {
    if !state.buffs.blades_active() {
        return Vec::new();
    }
    state.blade_phase =
        (state.blade_phase + blades::ANGULAR_VELOCITY * dt) % std::f32::consts::TAU;

    let damage = state.progress.damage() * blades::DAMAGE_FACTOR;
    let positions = state.blade_positions();
    let mut killed = Vec::new();

    let mut ei = 0;
    while ei < state.enemies.len() {
        let enemy = &mut state.enemies[ei];
        if enemy.blade_cooldown > 0.0 {
            ei += 1;
            continue;
        }
        let reach = enemy.radius + blades::HIT_RADIUS;
        let struck = positions
            .iter()
            .any(|bp| bp.distance_sq_to(enemy.position) <= reach * reach);
        if struck {
            enemy.hp -= damage;
            enemy.blade_cooldown = blades::REHIT_COOLDOWN;
            if enemy.hp <= 0.0 {
                killed.push(kill_enemy(state, ei));
                continue;
            }
        }
        ei += 1;
    }
    killed
}

/// Resolve enemy contact with the player.
///
/// Grace makes the player untouchable. Otherwise the first overlapping enemy
/// lands one hit: a shield charge absorbs it, else the player loses one HP.
/// Either way the toucher is destroyed (not scored) and hit grace is armed.
pub fn resolve_player_contact(state: &mut RunState) -> ContactOutcome {
    if state.player.has_grace() {
        return ContactOutcome::None;
    }
    let ppos = state.player.position;
    let prad = state.player.radius();
    let Some(idx) = state
        .enemies
        .iter()
        .position(|e| e.position.distance_sq_to(ppos) <= (e.radius + prad).powi(2))
    else {
        return ContactOutcome::None;
    };

    state.enemies.swap_remove(idx);
    state.player.grace_timer = player::HIT_GRACE;

    if state.buffs.consume_shield() {
        return ContactOutcome::ShieldAbsorbed;
    }
    state.player.hp = state.player.hp.saturating_sub(1);
    if state.player.hp == 0 {
        ContactOutcome::Died
    } else {
        ContactOutcome::Damaged
    }
}

/// Aim direction toward a target, None when degenerate (same point)
pub fn aim_at(origin: Vec2, target: Vec2) -> Option<Vec2> {
    let dir = (target - origin).normalize();
    if dir.is_zero(1e-6) {
        None
    } else {
        Some(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::progression::Progress;
    use crate::game::state::BuffKind;

    fn running_state() -> RunState {
        let mut state = RunState::new(Progress::default());
        state.player.grace_timer = 0.0;
        state
    }

    fn spawn_enemy_at(state: &mut RunState, x: f32, y: f32) -> u64 {
        let id = state.alloc_entity_id();
        state
            .enemies
            .push(Enemy::new(id, Vec2::new(x, y), 50.0, false));
        id
    }

    #[test]
    fn test_auto_fire_targets_nearest() {
        let mut state = running_state();
        spawn_enemy_at(&mut state, 300.0, 400.0);
        let near = state.player.position + Vec2::new(40.0, 0.0);
        spawn_enemy_at(&mut state, near.x, near.y);

        update_auto_fire(&mut state, 0.01);

        assert_eq!(state.bullets.len(), 1);
        let v = state.bullets[0].velocity;
        assert!(v.x > 0.0);
        assert!(v.y.abs() < 1e-3);
    }

    #[test]
    fn test_auto_fire_holds_without_targets() {
        let mut state = running_state();
        update_auto_fire(&mut state, 0.5);
        assert!(state.bullets.is_empty());
        // cooldown stays expired so the first enemy is engaged immediately
        assert_eq!(state.shoot_cooldown, 0.0);
    }

    #[test]
    fn test_auto_fire_respects_cooldown() {
        let mut state = running_state();
        spawn_enemy_at(&mut state, 100.0, 100.0);

        update_auto_fire(&mut state, 0.01);
        update_auto_fire(&mut state, 0.01);

        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_rapid_fire_shortens_cooldown() {
        let mut state = running_state();
        let base = effective_shoot_cooldown(&state);
        state.buffs.apply(BuffKind::RapidFire);
        let rapid = effective_shoot_cooldown(&state);
        assert!((rapid - base * shoot::RAPID_FIRE_MULTIPLIER).abs() < 1e-6);
    }

    #[test]
    fn test_shoot_cooldown_floors_at_min() {
        let mut state = running_state();
        state.progress = Progress::new(200, 0);
        assert_eq!(effective_shoot_cooldown(&state), shoot::MIN_COOLDOWN);
    }

    #[test]
    fn test_bullet_speed_caps() {
        assert_eq!(effective_bullet_speed(1), bullet::BASE_SPEED);
        assert_eq!(effective_bullet_speed(100), bullet::MAX_SPEED);
    }

    #[test]
    fn test_enemies_pursue_player() {
        let mut state = running_state();
        spawn_enemy_at(&mut state, 0.0, 0.0);
        let before = state.enemies[0].position.distance_to(state.player.position);

        update_enemies(&mut state, 0.1);

        let after = state.enemies[0].position.distance_to(state.player.position);
        assert!(after < before);
    }

    #[test]
    fn test_bullet_culled_on_lifetime() {
        let mut state = running_state();
        let id = state.alloc_entity_id();
        state
            .bullets
            .push(Bullet::new(id, state.player.position, Vec2::new(1.0, 0.0)));
        state.bullets[0].lifetime = 0.05;

        update_bullets(&mut state, 0.1);

        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_bullet_kills_normal_enemy() {
        let mut state = running_state();
        spawn_enemy_at(&mut state, 100.0, 100.0);
        let id = state.alloc_entity_id();
        state
            .bullets
            .push(Bullet::new(id, Vec2::new(100.0, 100.0), Vec2::ZERO));

        let killed = resolve_bullet_hits(&mut state);

        assert_eq!(killed.len(), 1);
        assert_eq!(state.kills, 1);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_elite_survives_first_level_one_hit() {
        let mut state = running_state();
        let id = state.alloc_entity_id();
        state
            .enemies
            .push(Enemy::new(id, Vec2::new(100.0, 100.0), 50.0, true));
        let bid = state.alloc_entity_id();
        state
            .bullets
            .push(Bullet::new(bid, Vec2::new(100.0, 100.0), Vec2::ZERO));

        let killed = resolve_bullet_hits(&mut state);

        assert!(killed.is_empty());
        assert_eq!(state.enemies.len(), 1);
        assert!(state.enemies[0].hp < 2.0);
    }

    #[test]
    fn test_blades_inactive_without_buff() {
        let mut state = running_state();
        let on_orbit = state.player.position + Vec2::new(blades::ORBIT_RADIUS, 0.0);
        spawn_enemy_at(&mut state, on_orbit.x, on_orbit.y);

        let killed = resolve_blade_hits(&mut state, 0.016);

        assert!(killed.is_empty());
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_blade_rehit_cooldown_blocks_second_strike() {
        let mut state = running_state();
        state.buffs.apply(BuffKind::AreaBlades);
        // park an elite on the first blade so it survives the strike
        state.blade_phase = 0.0;
        let on_blade = state.player.position + Vec2::new(blades::ORBIT_RADIUS, 0.0);
        let id = state.alloc_entity_id();
        state
            .enemies
            .push(Enemy::new(id, on_blade, 0.0, true));

        let first = resolve_blade_hits(&mut state, 0.0);
        let hp_after_first = state.enemies[0].hp;
        let second = resolve_blade_hits(&mut state, 0.0);

        assert!(first.is_empty() && second.is_empty());
        assert_eq!(state.enemies[0].hp, hp_after_first);
    }

    #[test]
    fn test_contact_skipped_under_grace() {
        let mut state = running_state();
        state.player.grace_timer = 0.5;
        let p = state.player.position;
        spawn_enemy_at(&mut state, p.x, p.y);

        assert_eq!(resolve_player_contact(&mut state), ContactOutcome::None);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_contact_shield_absorbs_before_hp() {
        let mut state = running_state();
        state.buffs.apply(BuffKind::Shield);
        let p = state.player.position;
        spawn_enemy_at(&mut state, p.x, p.y);
        let hp_before = state.player.hp;

        let outcome = resolve_player_contact(&mut state);

        assert_eq!(outcome, ContactOutcome::ShieldAbsorbed);
        assert_eq!(state.player.hp, hp_before);
        assert_eq!(state.buffs.shield_charges, 0);
        assert!(state.enemies.is_empty());
        assert!(state.player.has_grace());
    }

    #[test]
    fn test_contact_damages_then_kills() {
        let mut state = running_state();
        state.player.hp = 2;
        let p = state.player.position;
        spawn_enemy_at(&mut state, p.x, p.y);

        assert_eq!(resolve_player_contact(&mut state), ContactOutcome::Damaged);
        assert_eq!(state.player.hp, 1);

        state.player.grace_timer = 0.0;
        spawn_enemy_at(&mut state, p.x, p.y);
        assert_eq!(resolve_player_contact(&mut state), ContactOutcome::Died);
        assert_eq!(state.player.hp, 0);
    }

    #[test]
    fn test_contact_kills_are_not_scored() {
        let mut state = running_state();
        let p = state.player.position;
        spawn_enemy_at(&mut state, p.x, p.y);

        resolve_player_contact(&mut state);

        assert_eq!(state.kills, 0);
    }

    #[test]
    fn test_aim_at_degenerate() {
        assert!(aim_at(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0)).is_none());
        let dir = aim_at(Vec2::ZERO, Vec2::new(0.0, 10.0)).unwrap();
        assert!((dir.y - 1.0).abs() < 1e-6);
    }
}
