pub mod buffs;
pub mod combat;
pub mod movement;
pub mod spawning;
