//! Run state definitions
//!
//! Contains all transient entities of one run (player, enemies, bullets, buff
//! pickups) plus run-scoped counters. Everything here is cleared by
//! `RunEngine::start`; only the progression profile survives across runs.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

use crate::game::constants::{arena, blades, buff, bullet, enemy, player};
use crate::game::progression::Progress;
use crate::util::vec2::Vec2;

/// Entity identifier, unique within a run
pub type EntityId = u64;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Idle,
    Running,
    Ended,
}

/// Player state for the current run.
/// Derived damage and max HP live on [`Progress`], not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec2,
    /// Current hit points, healed only by the cap rising on level-up
    pub hp: u32,
    /// Remaining collision immunity in seconds
    pub grace_timer: f32,
}

impl PlayerState {
    pub fn centered(hp: u32) -> Self {
        Self {
            position: Vec2::new(arena::WIDTH / 2.0, arena::HEIGHT / 2.0),
            hp,
            grace_timer: player::INITIAL_GRACE,
        }
    }

    pub fn radius(&self) -> f32 {
        player::RADIUS
    }

    pub fn has_grace(&self) -> bool {
        self.grace_timer > 0.0
    }
}

/// Enemy state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub position: Vec2,
    pub radius: f32,
    /// Pursuit speed, rolled at spawn with the wave bonus baked in
    pub speed: f32,
    pub hp: f32,
    pub elite: bool,
    /// Re-hit cooldown for the orbiting-blades ability (player-owned offense,
    /// tracked per enemy so one blade pass cannot kill twice per revolution)
    pub blade_cooldown: f32,
}

impl Enemy {
    pub fn new(id: EntityId, position: Vec2, speed: f32, elite: bool) -> Self {
        let (radius, hp) = if elite {
            (enemy::ELITE_RADIUS, enemy::BASE_HP + enemy::ELITE_BONUS_HP)
        } else {
            (enemy::RADIUS, enemy::BASE_HP)
        };
        Self {
            id,
            position,
            radius,
            speed,
            hp,
            elite,
            blade_cooldown: 0.0,
        }
    }
}

/// Bullet state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Remaining lifetime in seconds; culled at zero
    pub lifetime: f32,
}

impl Bullet {
    pub fn new(id: EntityId, position: Vec2, velocity: Vec2) -> Self {
        Self {
            id,
            position,
            velocity,
            lifetime: bullet::LIFETIME,
        }
    }

    pub fn radius(&self) -> f32 {
        bullet::RADIUS
    }

    /// True once the bullet left the arena bounds plus the cull margin
    pub fn out_of_bounds(&self) -> bool {
        let m = arena::BULLET_CULL_MARGIN;
        self.position.x < -m
            || self.position.x > arena::WIDTH + m
            || self.position.y < -m
            || self.position.y > arena::HEIGHT + m
    }
}

/// The four buff pickup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuffKind {
    Haste,
    RapidFire,
    Shield,
    AreaBlades,
}

impl BuffKind {
    pub const ALL: [BuffKind; 4] = [
        BuffKind::Haste,
        BuffKind::RapidFire,
        BuffKind::Shield,
        BuffKind::AreaBlades,
    ];
}

/// A buff pickup waiting on the floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuffPickup {
    pub id: EntityId,
    pub position: Vec2,
    pub kind: BuffKind,
    /// Remaining lifetime in seconds; despawns at zero
    pub lifetime: f32,
}

impl BuffPickup {
    pub fn new(id: EntityId, position: Vec2, kind: BuffKind) -> Self {
        Self {
            id,
            position,
            kind,
            lifetime: buff::LIFETIME,
        }
    }

    pub fn radius(&self) -> f32 {
        buff::PICKUP_RADIUS
    }
}

/// Per-run buff timers and the shield charge counter.
///
/// Timed buffs are re-armed to the full duration on pickup (never additive);
/// shield charges stack and are consumed one per hit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveBuffs {
    pub haste: f32,
    pub rapid_fire: f32,
    pub area_blades: f32,
    pub shield_charges: u32,
}

impl ActiveBuffs {
    /// Single dispatch point for applying a collected pickup
    pub fn apply(&mut self, kind: BuffKind) {
        match kind {
            BuffKind::Haste => self.haste = buff::DURATION,
            BuffKind::RapidFire => self.rapid_fire = buff::DURATION,
            BuffKind::AreaBlades => self.area_blades = buff::DURATION,
            BuffKind::Shield => self.shield_charges += 1,
        }
    }

    /// Count the timed buffs down, floored at zero
    pub fn tick(&mut self, dt: f32) {
        self.haste = (self.haste - dt).max(0.0);
        self.rapid_fire = (self.rapid_fire - dt).max(0.0);
        self.area_blades = (self.area_blades - dt).max(0.0);
    }

    pub fn haste_active(&self) -> bool {
        self.haste > 0.0
    }

    pub fn rapid_fire_active(&self) -> bool {
        self.rapid_fire > 0.0
    }

    pub fn blades_active(&self) -> bool {
        self.area_blades > 0.0
    }

    /// Consume one shield charge if available
    pub fn consume_shield(&mut self) -> bool {
        if self.shield_charges > 0 {
            self.shield_charges -= 1;
            true
        } else {
            false
        }
    }
}

/// Movement intents sampled by the host shell each frame.
/// The touch/drag vector takes precedence over keyboard keys when active.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub touch: Option<Vec2>,
}

impl InputState {
    /// Combined movement direction, normalized to unit length (or zero)
    pub fn move_vector(&self) -> Vec2 {
        if let Some(touch) = self.touch {
            if !touch.is_zero(1e-3) {
                return touch.normalize();
            }
        }
        let mut dir = Vec2::ZERO;
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        dir.normalize()
    }
}

/// Full transient state of one run
#[derive(Debug, Clone)]
pub struct RunState {
    pub phase: RunPhase,
    /// Fresh per run; async submission results are keyed by this so a stale
    /// response cannot be applied to a newer run
    pub run_id: Uuid,
    pub elapsed_ms: u64,
    /// Sub-millisecond remainder carried between ticks
    pub elapsed_carry: f32,
    pub wave: u32,
    pub player: PlayerState,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub pickups: Vec<BuffPickup>,
    pub buffs: ActiveBuffs,
    /// Current rotation angle of the orbiting blades
    pub blade_phase: f32,
    pub kills: u32,
    /// XP earned this run, submitted with the final score
    pub xp_gained: u64,
    pub progress: Progress,
    pub shoot_cooldown: f32,
    pub spawn_cooldown: f32,
    pub buff_spawn_cooldown: f32,
    next_entity_id: EntityId,
}

impl RunState {
    pub fn new(progress: Progress) -> Self {
        Self {
            phase: RunPhase::Idle,
            run_id: Uuid::new_v4(),
            elapsed_ms: 0,
            elapsed_carry: 0.0,
            wave: 1,
            player: PlayerState::centered(progress.max_hp()),
            enemies: Vec::new(),
            bullets: Vec::new(),
            pickups: Vec::new(),
            buffs: ActiveBuffs::default(),
            blade_phase: 0.0,
            kills: 0,
            xp_gained: 0,
            progress,
            shoot_cooldown: 0.0,
            spawn_cooldown: 0.0,
            buff_spawn_cooldown: 0.0,
            next_entity_id: 1,
        }
    }

    pub fn alloc_entity_id(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    /// Positions of the active blade hit volumes, evenly spaced on the orbit
    pub fn blade_positions(&self) -> SmallVec<[Vec2; 3]> {
        (0..blades::COUNT)
            .map(|i| {
                let angle = self.blade_phase
                    + std::f32::consts::TAU * i as f32 / blades::COUNT as f32;
                self.player.position + Vec2::from_angle(angle) * blades::ORBIT_RADIUS
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_variants() {
        let normal = Enemy::new(1, Vec2::ZERO, 50.0, false);
        let elite = Enemy::new(2, Vec2::ZERO, 50.0, true);
        assert_eq!(normal.hp, 1.0);
        assert_eq!(elite.hp, 2.0);
        assert!(elite.radius > normal.radius);
    }

    #[test]
    fn test_bullet_out_of_bounds() {
        let mut b = Bullet::new(1, Vec2::new(10.0, 10.0), Vec2::ZERO);
        assert!(!b.out_of_bounds());
        b.position = Vec2::new(-21.0, 10.0);
        assert!(b.out_of_bounds());
        b.position = Vec2::new(10.0, arena::HEIGHT + 21.0);
        assert!(b.out_of_bounds());
    }

    #[test]
    fn test_buff_apply_rearms_instead_of_stacking() {
        let mut buffs = ActiveBuffs::default();
        buffs.apply(BuffKind::Haste);
        buffs.tick(2.0);
        assert!((buffs.haste - (buff::DURATION - 2.0)).abs() < 1e-6);
        buffs.apply(BuffKind::Haste);
        assert_eq!(buffs.haste, buff::DURATION);
    }

    #[test]
    fn test_shield_charges_stack() {
        let mut buffs = ActiveBuffs::default();
        buffs.apply(BuffKind::Shield);
        buffs.apply(BuffKind::Shield);
        assert_eq!(buffs.shield_charges, 2);
        assert!(buffs.consume_shield());
        assert_eq!(buffs.shield_charges, 1);
        assert!(buffs.consume_shield());
        assert!(!buffs.consume_shield());
    }

    #[test]
    fn test_buff_timers_floor_at_zero() {
        let mut buffs = ActiveBuffs::default();
        buffs.apply(BuffKind::RapidFire);
        buffs.tick(100.0);
        assert_eq!(buffs.rapid_fire, 0.0);
        assert!(!buffs.rapid_fire_active());
    }

    #[test]
    fn test_input_keyboard_diagonal_normalized() {
        let input = InputState {
            right: true,
            down: true,
            ..Default::default()
        };
        let v = input.move_vector();
        assert!((v.length() - 1.0).abs() < 1e-5);
        assert!(v.x > 0.0 && v.y > 0.0);
    }

    #[test]
    fn test_input_touch_overrides_keyboard() {
        let input = InputState {
            left: true,
            touch: Some(Vec2::new(5.0, 0.0)),
            ..Default::default()
        };
        let v = input.move_vector();
        assert!((v.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_input_zero_touch_falls_back_to_keys() {
        let input = InputState {
            left: true,
            touch: Some(Vec2::ZERO),
            ..Default::default()
        };
        let v = input.move_vector();
        assert!((v.x + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_blade_positions_on_orbit() {
        let state = RunState::new(Progress::default());
        let positions = state.blade_positions();
        assert_eq!(positions.len(), blades::COUNT as usize);
        for p in positions {
            let d = p.distance_to(state.player.position);
            assert!((d - blades::ORBIT_RADIUS).abs() < 1e-3);
        }
    }

    #[test]
    fn test_entity_ids_unique() {
        let mut state = RunState::new(Progress::default());
        let a = state.alloc_entity_id();
        let b = state.alloc_entity_id();
        assert_ne!(a, b);
    }
}
