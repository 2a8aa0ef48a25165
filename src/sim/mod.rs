//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, DOM or audio dependencies
//!
//! Side effects the host cares about (sounds, HUD cues) leave the module as
//! `GameEvent`s drained once per frame.

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, overlap_pairs};
pub use state::{
    DamageOutcome, Explosion, GameEvent, GamePhase, GameState, Hostile, HostileKind, MovePattern,
    Owner, Player, Projectile,
};
pub use tick::{TickInput, tick};
