//! Fixed-order run update loop
//!
//! `RunEngine` owns the run state and the RNG and advances both through a
//! single `update` call per frame. The step order matters: spawning happens
//! before integration, damage before collection, player contact last, so a
//! kill and its XP land in the same tick that dealt the damage.

use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use crate::game::constants::{self, frame, score};
use crate::game::progression::Progress;
use crate::game::state::{BuffKind, InputState, RunPhase, RunState};
use crate::game::systems::{buffs, combat, movement, spawning};
use crate::game::waves;

/// Events emitted by one update, in occurrence order
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    EnemyKilled { elite: bool },
    LeveledUp { level: u32 },
    BuffCollected { kind: BuffKind },
    ShieldAbsorbed,
    PlayerHit { hp_left: u32 },
    RunEnded { summary: RunSummary },
}

/// Final tally of a run, produced when the player dies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub score: u64,
    pub kills: u32,
    pub wave: u32,
    pub elapsed_ms: u64,
    pub xp_gained: u64,
    /// Progression after the run's XP was applied
    pub level: u32,
    pub xp: u64,
}

/// Drives one survival run from start to death
pub struct RunEngine {
    state: RunState,
    rng: StdRng,
}

impl RunEngine {
    pub fn new(progress: Progress) -> Self {
        Self::with_rng(progress, StdRng::from_entropy())
    }

    /// Deterministic engine for tests and headless demo runs
    pub fn from_seed(progress: Progress, seed: u64) -> Self {
        Self::with_rng(progress, StdRng::seed_from_u64(seed))
    }

    fn with_rng(progress: Progress, rng: StdRng) -> Self {
        Self {
            state: RunState::new(progress),
            rng,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RunState {
        &mut self.state
    }

    /// Begin a fresh run, keeping only the progression profile.
    /// Safe to call from any phase; a run in progress is discarded.
    pub fn start(&mut self) {
        let progress = self.state.progress;
        self.state = RunState::new(progress);
        self.state.phase = RunPhase::Running;
    }

    /// Abandon the current run without a summary
    pub fn stop(&mut self) {
        if self.state.phase == RunPhase::Running {
            self.state.phase = RunPhase::Ended;
        }
    }

    /// Live score under the same formula as the final submission
    pub fn score(&self) -> u64 {
        constants::run_score(self.state.elapsed_ms, self.state.kills, self.state.wave)
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: self.state.run_id,
            score: self.score(),
            kills: self.state.kills,
            wave: self.state.wave,
            elapsed_ms: self.state.elapsed_ms,
            xp_gained: self.state.xp_gained,
            level: self.state.progress.level,
            xp: self.state.progress.xp,
        }
    }

    /// Advance the run by one frame. Ignored unless the run is Running;
    /// dt is capped so a stalled host cannot teleport the simulation.
    pub fn update(&mut self, input: &InputState, dt: f32) -> Vec<RunEvent> {
        let mut events = Vec::new();
        if self.state.phase != RunPhase::Running {
            return events;
        }
        let dt = dt.clamp(0.0, frame::MAX_DT);
        let state = &mut self.state;

        // clock and wave index
        let ms = state.elapsed_carry + dt * 1000.0;
        let whole = ms as u64;
        state.elapsed_ms += whole;
        state.elapsed_carry = ms - whole as f32;
        state.wave = waves::wave_for_elapsed(state.elapsed_ms);

        // timers
        state.buffs.tick(dt);
        state.player.grace_timer = (state.player.grace_timer - dt).max(0.0);

        movement::update_player(state, input, dt);
        spawning::update_enemy_spawner(state, &mut self.rng, dt);
        spawning::update_buff_spawner(state, &mut self.rng, dt);
        combat::update_auto_fire(state, dt);
        combat::update_enemies(state, dt);
        combat::update_bullets(state, dt);
        buffs::update_pickups(state, dt);

        let mut killed = combat::resolve_bullet_hits(state);
        killed.extend(combat::resolve_blade_hits(state, dt));
        for enemy in &killed {
            events.push(RunEvent::EnemyKilled { elite: enemy.elite });
        }

        if !killed.is_empty() {
            let per_kill = score::XP_KILL_BASE
                + score::XP_KILL_WAVE_BONUS * (state.wave.saturating_sub(1)) as u64;
            let gained = per_kill * killed.len() as u64;
            state.xp_gained += gained;
            let levels = state.progress.apply_xp(gained);
            if levels > 0 {
                // the cap rose; current hp stays, the clamp only guards it
                state.player.hp = state.player.hp.min(state.progress.max_hp());
                events.push(RunEvent::LeveledUp {
                    level: state.progress.level,
                });
            }
        }

        for kind in buffs::collect_pickups(state) {
            events.push(RunEvent::BuffCollected { kind });
        }

        match combat::resolve_player_contact(state) {
            combat::ContactOutcome::None => {}
            combat::ContactOutcome::ShieldAbsorbed => events.push(RunEvent::ShieldAbsorbed),
            combat::ContactOutcome::Damaged => events.push(RunEvent::PlayerHit {
                hp_left: state.player.hp,
            }),
            combat::ContactOutcome::Died => {
                events.push(RunEvent::PlayerHit { hp_left: 0 });
                state.phase = RunPhase::Ended;
                events.push(RunEvent::RunEnded {
                    summary: self.summary(),
                });
            }
        }
        events
    }
}
