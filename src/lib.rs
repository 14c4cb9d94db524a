//! Pragma Survival Server Library
//!
//! Server-side core of a browser survival mini-game: the run simulation
//! (movement, spawning, combat, buffs), the persistent progression model, and
//! the leaderboard merge service behind a small JSON API.

pub mod config;
pub mod demo;
pub mod game;
pub mod leaderboard;
pub mod metrics;
pub mod net;
pub mod util;
