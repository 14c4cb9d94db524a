//! Survival run simulation: constants, state, progression, waves and the
//! fixed-order update loop.

pub mod constants;
pub mod progression;
pub mod run_loop;
pub mod state;
pub mod systems;
pub mod waves;
